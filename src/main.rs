/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use sim::event::GameEvent;
use sim::loader::{self, BoardEntry};
use sim::session::{GameSession, Screen};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    // Boards from disk plus the built-ins, for the select screen
    let boards = loader::list_boards(&config.boards_dir);

    let mut session = GameSession::new(config.deal.hand_size, config.deal.registers);
    session.board_names = boards.iter().map(|b| b.name.clone()).collect();

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &boards, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Bot Rally!");
}

fn game_loop(
    session: &mut GameSession,
    boards: &[BoardEntry],
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.pace.tick_rate_ms);

    // Ticks until the next execution beat
    let mut beat_timer: u32 = 0;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_keys(session, boards, sound, &kb, config.free_drive) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            session.anim_tick = session.anim_tick.wrapping_add(1);
            session.tick_message();

            if session.screen == Screen::Executing {
                if beat_timer > 0 {
                    beat_timer -= 1;
                } else {
                    let events = session.tick_execution();
                    process_sound_events(sound, &events);
                    beat_timer = config.pace.card_delay_ticks;
                    // Let a conveyor shift read before the next register
                    if events
                        .iter()
                        .any(|e| matches!(e, GameEvent::RobotCarried { .. }))
                    {
                        beat_timer += config.pace.belt_delay_ticks;
                    }
                }
            } else {
                beat_timer = 0;
            }

            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let Some(sfx) = sound else { return };
    for event in events {
        match event {
            GameEvent::RobotMoved { .. } => sfx.play_step(),
            GameEvent::RobotPushed { .. } => sfx.play_push(),
            GameEvent::RobotBlocked { .. } => sfx.play_blocked(),
            GameEvent::RobotRotated { .. } => sfx.play_turn(),
            GameEvent::RobotCarried { .. } => sfx.play_belt(),
            GameEvent::RobotDestroyed { .. } => sfx.play_destroy(),
            GameEvent::RoundStarted { .. } => sfx.play_deal(),
            GameEvent::AllRobotsDown => sfx.play_over(),
            GameEvent::CardPlayed { .. } => {}
        }
    }
}

// ── Key Constants ──

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_UNDO: &[KeyCode] = &[KeyCode::Backspace, KeyCode::Delete];
const KEYS_DRIVE: &[KeyCode] = &[KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_NEXT_BOT: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_NEXT_PHASE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Reset to the title screen, preserving the board list and deal setup.
fn return_to_title(session: &mut GameSession) {
    let names = std::mem::take(&mut session.board_names);
    let hand_size = session.hand_size;
    let registers = session.registers;
    *session = GameSession::new(hand_size, registers);
    session.board_names = names;
}

/// Load the highlighted board and start a game on it.
fn start_selected_board(
    session: &mut GameSession,
    boards: &[BoardEntry],
    sound: Option<&SoundEngine>,
    drive: bool,
) {
    let Some(entry) = boards.get(session.select_cursor) else {
        return;
    };
    match loader::load_entry(entry) {
        Ok(board) => {
            if board.spawn_points().is_empty() {
                session.set_message(&format!("{} has no spawn pads", entry.name), 60);
                return;
            }
            let events = session.start_board(&entry.name, board, drive);
            process_sound_events(sound, &events);
        }
        Err(e) => {
            session.set_message(&format!("Load failed: {e}"), 80);
        }
    }
}

/// Handle all non-simulation key input. Returns true to quit.
fn handle_keys(
    session: &mut GameSession,
    boards: &[BoardEntry],
    sound: Option<&SoundEngine>,
    kb: &InputState,
    free_drive: bool,
) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM);
    let esc = kb.any_pressed(&[KeyCode::Esc]);

    match session.screen {
        // ── Title Screen ──
        Screen::Title => {
            if confirm {
                session.screen = Screen::BoardSelect;
                session.select_cursor = 0;
                session.anim_tick = 0;
            } else if kb.any_pressed(KEYS_QUIT) || esc {
                return true;
            }
        }

        // ── Board Select ──
        Screen::BoardSelect => {
            let total = session.board_names.len();
            if total == 0 {
                return_to_title(session);
                return false;
            }

            if kb.any_pressed(&[KeyCode::Up]) {
                session.select_cursor = session.select_cursor.saturating_sub(1);
            } else if kb.any_pressed(&[KeyCode::Down]) {
                if session.select_cursor + 1 < total {
                    session.select_cursor += 1;
                }
            } else if confirm {
                start_selected_board(session, boards, sound, free_drive);
            } else if kb.any_pressed(KEYS_DRIVE) {
                start_selected_board(session, boards, sound, true);
            } else if esc {
                return_to_title(session);
            }
        }

        // ── Programming ──
        Screen::Programming => {
            if let Some(d) = kb.pressed_digit() {
                if d >= 1 {
                    session.pick_card(d - 1);
                }
            } else if kb.any_pressed(KEYS_UNDO) {
                session.unpick_card();
            } else if confirm {
                let events = session.lock_program();
                process_sound_events(sound, &events);
            } else if esc {
                return_to_title(session);
            }
        }

        // ── Executing (watch the programs run) ──
        Screen::Executing => {
            if esc {
                return_to_title(session);
            }
        }

        // ── Drive Mode ──
        Screen::Drive => {
            if let Some(idx) = session.current_robot_idx() {
                let events = if kb.any_pressed(KEYS_UP) {
                    session.move_robot(1, idx)
                } else if kb.any_pressed(KEYS_DOWN) {
                    session.move_robot(-1, idx)
                } else if kb.any_pressed(KEYS_LEFT) {
                    session.rotate_robot(-1, idx)
                } else if kb.any_pressed(KEYS_RIGHT) {
                    session.rotate_robot(1, idx)
                } else {
                    Vec::new()
                };
                process_sound_events(sound, &events);
            }

            if kb.any_pressed(KEYS_NEXT_BOT) {
                session.advance_player();
                if let Some(p) = session.players.get(session.active) {
                    let name = p.name.clone();
                    session.set_message(&format!("Driving {}", name), 40);
                }
            } else if kb.any_pressed(KEYS_NEXT_PHASE) {
                session.advance_phase();
            } else if esc {
                return_to_title(session);
            }
        }

        // ── Game Over ──
        Screen::GameOver => {
            if confirm || esc {
                return_to_title(session);
            }
        }
    }

    false
}
