/// Terminal renderer, double-buffered.
///
/// Each frame is composed into the front buffer, diffed cell by cell
/// against the back buffer (the previous frame), and only the changed
/// cells are emitted — queued with `queue!` and flushed once. The
/// buffers then swap. Full-screen redraws (and their flicker) only
/// happen on resize or screen change. Every glyph the game draws is a
/// single terminal column, so a cell holds one char.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::robot::Robot;
use crate::domain::tile::Tile;
use crate::sim::session::{GameSession, Screen};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every "empty" cell. Some terminals
    /// paint inter-row gap pixels with the color of the last Clear, so
    /// clearing and cell backgrounds must agree on one RGB value or the
    /// gaps show up as horizontal lines.
    const BASE_BG: Color = Color::Rgb { r: 24, g: 22, b: 30 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell {
            ch,
            fg,
            bg: Self::norm_bg(bg),
        }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if (w, h) != (self.width, self.height) {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Writes outside the buffer are dropped, so screen composition
    /// never has to clamp against a small terminal.
    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        self.index(x, y).map_or(Cell::BLANK, |i| self.cells[i])
    }

    /// Write a string left to right from (x, y), one column per char,
    /// clipped at the right edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Fill a whole row with a background color.
    fn fill_row(&mut self, y: usize, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', fg, bg));
        }
    }
}

// ── Renderer ──

/// Each board cell = 2 terminal columns, so the grid reads roughly square.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

/// One accent color per robot, cycled by id.
const ROBOT_COLORS: [Color; 6] = [
    Color::Rgb { r: 80, g: 200, b: 255 },
    Color::Rgb { r: 255, g: 215, b: 60 },
    Color::Rgb { r: 90, g: 250, b: 90 },
    Color::Rgb { r: 255, g: 110, b: 200 },
    Color::Rgb { r: 255, g: 150, b: 60 },
    Color::Rgb { r: 210, g: 210, b: 210 },
];

const HUD_BG: Color = Color::Rgb { r: 25, g: 20, b: 55 };
const MSG_FG: Color = Color::Black;
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

fn robot_color(id: usize) -> Color {
    ROBOT_COLORS[id % ROBOT_COLORS.len()]
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize_buffers(tw as usize, th as usize);
        Ok(())
    }

    /// Resize both buffers and poison the back buffer so the next
    /// diff repaints every cell.
    fn resize_buffers(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, session: &GameSession) -> io::Result<()> {
        // A resize or a screen switch invalidates everything on screen
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if (tw as usize, th as usize) != (self.term_w, self.term_h) {
            self.resize_buffers(tw as usize, th as usize);
            queue!(
                self.writer,
                SetBackgroundColor(Cell::BASE_BG),
                Clear(ClearType::All)
            )?;
        }
        if self.last_screen != Some(session.screen) {
            self.last_screen = Some(session.screen);
            self.back.cells.fill(Cell::INVALID);
            queue!(
                self.writer,
                SetBackgroundColor(Cell::BASE_BG),
                Clear(ClearType::All)
            )?;
        }

        // Build front buffer
        self.front.clear();

        match session.screen {
            Screen::Title => self.compose_title(session),
            Screen::BoardSelect => self.compose_board_select(session),
            Screen::Programming => self.compose_programming(session),
            Screen::Executing => self.compose_executing(session),
            Screen::Drive => self.compose_drive(session),
            Screen::GameOver => self.compose_game_over(session),
        }

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        // Explicit base colors each frame; ResetColor would fall back
        // to the terminal default, which may not match BASE_BG.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        let mut fg = Color::White;
        let mut bg = Cell::BASE_BG;
        // Cursor position after the last emitted cell; None means the
        // next emitted cell must reposition first.
        let mut cursor: Option<(usize, usize)> = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor != Some((x.wrapping_sub(1), y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    fg = cell.fg;
                }
                if cell.bg != bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor = Some((x, y));
            }
            cursor = None;
        }

        self.writer.flush()
    }

    // ── Shared pieces ──

    /// Left column where the board starts, horizontally centered.
    fn board_left(&self, s: &GameSession) -> usize {
        let cols = s.board.width() * CELL_W;
        self.front.width.saturating_sub(cols) / 2
    }

    fn hud(&mut self, s: &GameSession, right: &str) {
        self.front.fill_row(HUD_ROW, Color::White, HUD_BG);
        let line = format!(
            " BOT RALLY  ◈ {}  Round {:<3} Phase {:<4} Bots {}/{}  {}",
            s.board_name,
            s.round,
            s.phase,
            s.robots_alive(),
            s.robots.len(),
            right,
        );
        self.front.put_str(0, HUD_ROW, &line, Color::White, HUD_BG);
    }

    fn message_bar(&mut self, s: &GameSession, row: usize) {
        if row < self.front.height && !s.message.is_empty() {
            self.front.fill_row(row, MSG_FG, MSG_BG);
            let msg = format!(" ◈ {} ", s.message);
            self.front.put_str(0, row, &msg, MSG_FG, MSG_BG);
        }
    }

    fn help_bar(&mut self, row: usize, text: &str) {
        if row < self.front.height {
            self.front.put_str(0, row, text, Color::DarkGrey, Color::Reset);
        }
    }

    /// Draw the board grid with all robots at (left, MAP_ROW).
    fn draw_board(&mut self, s: &GameSession, left: usize) {
        for gy in 0..s.board.height() {
            let row = MAP_ROW + gy;
            if row >= self.front.height {
                break;
            }
            for gx in 0..s.board.width() {
                let col = left + gx * CELL_W;
                if col + 1 >= self.front.width {
                    break;
                }
                if let Some(tile) = s.board.tile_at(gx as i32, gy as i32) {
                    self.draw_tile(tile, s.anim_tick, col, row);
                }
            }
        }

        // Wrecks first, live robots on top of them
        for r in s.robots.iter().filter(|r| r.destroyed) {
            self.draw_robot(r, left);
        }
        for r in s.robots.iter().filter(|r| !r.destroyed) {
            self.draw_robot(r, left);
        }
    }

    fn draw_tile(&mut self, tile: Tile, anim_tick: u32, col: usize, row: usize) {
        let (c0, c1, fg) = match tile {
            Tile::Floor => ('·', ' ', Color::Rgb { r: 55, g: 52, b: 70 }),
            Tile::Wall => ('█', '█', Color::Rgb { r: 130, g: 130, b: 140 }),
            Tile::Pit => (' ', ' ', Color::Reset),
            Tile::Spawn => ('◎', ' ', Color::Rgb { r: 0, g: 190, b: 190 }),
            Tile::Belt(dir) => {
                // Alternating arrow position gives a crawl effect
                let arrow = match dir.index() {
                    0 => '↑',
                    1 => '→',
                    2 => '↓',
                    _ => '←',
                };
                let fg = Color::Rgb { r: 210, g: 170, b: 50 };
                if (anim_tick / 4) % 2 == 0 {
                    (arrow, ' ', fg)
                } else {
                    (' ', arrow, fg)
                }
            }
        };
        // Pads sit on the floor backdrop; structural tiles fill the cell
        let bg = if tile.draws_over_floor() {
            Color::Reset
        } else {
            match tile {
                Tile::Wall => Color::Rgb { r: 75, g: 75, b: 85 },
                Tile::Pit => Color::Rgb { r: 6, g: 5, b: 10 },
                _ => Color::Rgb { r: 48, g: 40, b: 16 },
            }
        };
        self.front.set(col, row, Cell::new(c0, fg, bg));
        self.front.set(col + 1, row, Cell::new(c1, fg, bg));
    }

    /// A robot is its facing glyph plus its number, in its own color.
    /// Wrecks render as a dimmed ✖ marker.
    fn draw_robot(&mut self, r: &Robot, left: usize) {
        let row = MAP_ROW + r.y;
        let col = left + r.x * CELL_W;
        if row >= self.front.height || col + 1 >= self.front.width {
            return;
        }
        let digit = char::from_digit((r.id as u32 + 1) % 10, 10).unwrap_or('?');
        if r.destroyed {
            let grey = Color::Rgb { r: 90, g: 90, b: 95 };
            let bg = self.front.get(col, row).bg;
            self.front.set(col, row, Cell::new('✖', grey, bg));
            self.front.set(col + 1, row, Cell::new(digit, grey, bg));
        } else {
            let color = robot_color(r.id);
            let bg = Color::Rgb { r: 40, g: 40, b: 52 };
            self.front.set(col, row, Cell::new(r.facing.glyph(), color, bg));
            self.front.set(col + 1, row, Cell::new(digit, color, bg));
        }
    }

    // ── Screens ──

    fn compose_title(&mut self, s: &GameSession) {
        let title = [
            r"  ___        _      ___        _  _       ",
            r" | _ ) ___  | |_   | _ \ __ _ | || | _  _ ",
            r" | _ \/ _ \ |  _|  |   // _` || || || || |",
            r" |___/\___/  \__|  |_|_\\__,_||_||_| \_, |",
            r"                                     |__/ ",
        ];

        for (i, line) in title.iter().enumerate() {
            self.front.put_str(
                2,
                1 + i,
                line,
                Color::Rgb { r: 255, g: 200, b: 50 },
                Color::Reset,
            );
        }

        let subtitle = "◈◈  Robot Shoving League  ◈◈";
        let sx = 2 + (title[1].len().saturating_sub(subtitle.chars().count())) / 2;
        self.front.put_str(
            sx,
            7,
            subtitle,
            Color::Rgb { r: 80, g: 255, b: 80 },
            Color::Reset,
        );

        let tagline = "━━━ Terminal Edition ━━━";
        let tx = 2 + (title[1].len().saturating_sub(tagline.chars().count())) / 2;
        self.front.put_str(
            tx,
            9,
            tagline,
            Color::Rgb { r: 180, g: 140, b: 50 },
            Color::Reset,
        );

        // Menu options
        let menu_base = 12;
        let hi = Color::Rgb { r: 80, g: 255, b: 80 };

        self.front
            .put_str(8, menu_base, "ENTER   Pick a Board", hi, Color::Reset);
        self.front
            .put_str(8, menu_base + 1, "  Q     Quit", Color::White, Color::Reset);

        // Controls reference
        let help = [
            "How a round goes",
            "  Each player programs five registers from a dealt hand,",
            "  then all programs run at once, highest priority first.",
            "  Bots shove bots. Pits end careers. Belts do not care.",
            "",
            "  1-9 pick card   BKSP undo   ENTER lock in",
        ];
        let help_base = menu_base + 3;
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 {
                Color::Rgb { r: 255, g: 200, b: 50 }
            } else {
                Color::White
            };
            self.front.put_str(8, help_base + i, line, color, Color::Reset);
        }

        self.message_bar(s, self.front.height.saturating_sub(1));
    }

    fn compose_board_select(&mut self, s: &GameSession) {
        let gold = Color::Rgb { r: 255, g: 200, b: 50 };
        let hi = Color::Rgb { r: 80, g: 255, b: 80 };
        let dim = Color::DarkGrey;
        let cursor_bg = Color::Rgb { r: 30, g: 60, b: 30 };

        self.front.put_str(2, 1, "╔═══════════════════════════╗", gold, Color::Reset);
        self.front.put_str(2, 2, "║       PICK  A  BOARD      ║", gold, Color::Reset);
        self.front.put_str(2, 3, "╚═══════════════════════════╝", gold, Color::Reset);

        let list_top = 5;
        let visible = 14_usize.min(self.front.height.saturating_sub(list_top + 4));
        let total = s.board_names.len();
        // Keep the cursor inside the window without separate scroll state
        let scroll = s.select_cursor.saturating_sub(visible.saturating_sub(1));

        if scroll > 0 {
            self.front.put_str(2, list_top - 1, "    ▲ ▲ ▲", dim, Color::Reset);
        }

        for i in 0..visible {
            let idx = scroll + i;
            if idx >= total {
                break;
            }
            let row = list_top + i;
            if row >= self.front.height {
                break;
            }

            let name = &s.board_names[idx];
            if idx == s.select_cursor {
                let blink = (s.anim_tick / 5) % 2 == 0;
                let arrow = if blink { "▸" } else { " " };
                for x in 0..40.min(self.front.width) {
                    self.front.set(x, row, Cell::new(' ', Color::White, cursor_bg));
                }
                self.front.put_str(2, row, arrow, hi, cursor_bg);
                self.front.put_str(4, row, name, hi, cursor_bg);
            } else {
                self.front.put_str(4, row, name, Color::White, Color::Reset);
            }
        }

        if scroll + visible < total {
            let ind_row = list_top + visible;
            if ind_row < self.front.height {
                self.front.put_str(2, ind_row, "    ▼ ▼ ▼", dim, Color::Reset);
            }
        }

        let footer_row = list_top + visible + 2;
        self.help_bar(
            footer_row,
            "  ENTER: Play   D: Drive mode   ↑↓: Select   ESC: Back",
        );

        self.message_bar(s, self.front.height.saturating_sub(1));
    }

    fn compose_programming(&mut self, s: &GameSession) {
        let turn = match s.players.get(s.active) {
            Some(p) => format!("▮ {} programming", p.name),
            None => String::new(),
        };
        self.hud(s, &turn);

        let left = self.board_left(s);
        self.draw_board(s, left);

        // Side panel: active player's hand and program
        let panel = left + s.board.width() * CELL_W + 4;
        if let Some(player) = s.players.get(s.active) {
            let color = robot_color(player.robot);
            let mut row = MAP_ROW;
            self.front.put_str(panel, row, &player.name, color, Color::Reset);
            row += 2;

            self.front.put_str(panel, row, "── hand ──", Color::DarkGrey, Color::Reset);
            row += 1;
            for (i, card) in player.hand.iter().enumerate() {
                let line = format!("{}) {:<8} ·{}", i + 1, card.kind.label(), card.priority);
                self.front.put_str(panel, row, &line, Color::White, Color::Reset);
                row += 1;
            }

            row += 1;
            self.front.put_str(panel, row, "── program ──", Color::DarkGrey, Color::Reset);
            row += 1;
            for slot in 0..s.registers {
                let line = match player.program.get(slot) {
                    Some(card) => {
                        format!("R{} {:<8} ·{}", slot + 1, card.kind.label(), card.priority)
                    }
                    None => format!("R{} ··", slot + 1),
                };
                let fg = if player.program.get(slot).is_some() {
                    Color::Rgb { r: 80, g: 255, b: 80 }
                } else {
                    Color::DarkGrey
                };
                self.front.put_str(panel, row, &line, fg, Color::Reset);
                row += 1;
            }
        }

        let base = MAP_ROW + s.board.height().max(12);
        self.message_bar(s, base + 1);
        self.help_bar(base + 3, " 1-9: pick card   BKSP: undo   ENTER: lock in   ESC: Title");
    }

    fn compose_executing(&mut self, s: &GameSession) {
        let reg = format!("▶ Register {}/{}", s.register + 1, s.registers);
        self.hud(s, &reg);

        let left = self.board_left(s);
        self.draw_board(s, left);

        // Side panel: whose card just fired
        let panel = left + s.board.width() * CELL_W + 4;
        let mut row = MAP_ROW;
        self.front.put_str(panel, row, "── this register ──", Color::DarkGrey, Color::Reset);
        row += 1;
        let current = s.current_play();
        for (i, player) in s.players.iter().enumerate() {
            let card = player.program.get(s.register.min(s.registers.saturating_sub(1)));
            let is_current = current.map(|(p, _)| p == i).unwrap_or(false);
            let marker = if is_current { "▶" } else { " " };
            let line = match card {
                Some(c) if !s.robots[player.robot].destroyed => {
                    format!("{} {} {:<8} ·{}", marker, player.name, c.kind.label(), c.priority)
                }
                _ => format!("  {} (down)", player.name),
            };
            let fg = if is_current {
                robot_color(player.robot)
            } else if s.robots[player.robot].destroyed {
                Color::DarkGrey
            } else {
                Color::White
            };
            self.front.put_str(panel, row, &line, fg, Color::Reset);
            row += 1;
        }

        let base = MAP_ROW + s.board.height().max(12);
        self.message_bar(s, base + 1);
        self.help_bar(base + 3, " Programs running...   ESC: Title");
    }

    fn compose_drive(&mut self, s: &GameSession) {
        let turn = match s.players.get(s.active) {
            Some(p) => format!("▮ driving {}", p.name),
            None => String::new(),
        };
        self.hud(s, &turn);

        let left = self.board_left(s);
        self.draw_board(s, left);

        let base = MAP_ROW + s.board.height().max(12);
        self.message_bar(s, base + 1);
        self.help_bar(
            base + 3,
            " ↑: forward  ↓: back  ←→: turn  N: next bot  P: next phase  ESC: Title",
        );
    }

    fn compose_game_over(&mut self, s: &GameSession) {
        self.hud(s, "");

        let left = self.board_left(s);
        self.draw_board(s, left);

        let box_art = [
            "╔═══════════════════════════════╗",
            "║     ✖  ALL ROBOTS DOWN  ✖     ║",
            "╚═══════════════════════════════╝",
        ];
        let box_y = MAP_ROW + s.board.height() + 1;
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(
                6,
                box_y + i,
                l,
                Color::Rgb { r: 255, g: 60, b: 60 },
                Color::Reset,
            );
        }
        let survived = format!("◈ Rounds survived: {}", s.round);
        let phases = format!("◈ Phases executed: {}", s.phase);
        self.front.put_str(8, box_y + 4, &survived, Color::White, Color::Reset);
        self.front.put_str(8, box_y + 5, &phases, Color::White, Color::Reset);
        self.front.put_str(
            8,
            box_y + 7,
            "▸ ENTER / ESC: Back to Title",
            Color::Rgb { r: 80, g: 255, b: 80 },
            Color::Reset,
        );
    }
}
