/// The game session: board, robots, players, and the turn machinery.
///
/// Screen flow:
///   Title → BoardSelect → Programming ⇄ Executing → GameOver
/// Each round: deal hands, players program their registers in turn,
/// then registers execute one beat at a time (cards by descending
/// priority, conveyor pass, phase counter tick). Drive mode replaces
/// the card loop with direct key commands.
///
/// All robot mutation goes through the two engine entry points;
/// everything else here is bookkeeping around them.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::board::Board;
use crate::domain::cards::{self, Card, Instruction};
use crate::domain::robot::{Player, Robot};

use super::engine;
use super::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Title,
    BoardSelect,
    Programming,
    Executing,
    Drive,
    GameOver,
}

pub struct GameSession {
    pub board: Board,
    pub board_name: String,
    pub robots: Vec<Robot>,
    pub players: Vec<Player>,

    /// Whose turn it is: programming order, and the commanded robot
    /// in drive mode.
    pub active: usize,
    /// Monotonic phase counter, one tick per executed register.
    pub phase: u32,
    pub round: u32,
    /// Register slot currently executing, 0-based.
    pub register: usize,

    pub screen: Screen,

    // Board-select screen state
    pub board_names: Vec<String>,
    pub select_cursor: usize,

    // Execution pacing: one queued play per beat
    exec_queue: Vec<(usize, Card)>,
    exec_pos: usize,
    belt_pending: bool,

    // HUD message line with tick-based timeout
    pub message: String,
    pub message_timer: u32,
    pub anim_tick: u32,

    pub hand_size: usize,
    pub registers: usize,

    rng: StdRng,
}

impl GameSession {
    pub fn new(hand_size: usize, registers: usize) -> Self {
        GameSession {
            board: Board::from_rows(Vec::new()),
            board_name: String::new(),
            robots: Vec::new(),
            players: Vec::new(),
            active: 0,
            phase: 0,
            round: 0,
            register: 0,
            screen: Screen::Title,
            board_names: Vec::new(),
            select_cursor: 0,
            exec_queue: Vec::new(),
            exec_pos: 0,
            belt_pending: false,
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
            hand_size,
            registers,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn set_message(&mut self, text: &str, ticks: u32) {
        self.message = text.to_string();
        self.message_timer = ticks;
    }

    /// Tick the message timeout; called once per simulation tick.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    // ── Coordinator contract ──

    /// The robot of the active player; None with zero players.
    pub fn current_robot(&self) -> Option<&Robot> {
        self.players.get(self.active).map(|p| &self.robots[p.robot])
    }

    pub fn current_robot_idx(&self) -> Option<usize> {
        self.players.get(self.active).map(|p| p.robot)
    }

    /// Cycle to the next player. Silent no-op with zero players.
    pub fn advance_player(&mut self) {
        if !self.players.is_empty() {
            self.active = (self.active + 1) % self.players.len();
        }
    }

    /// Bump the phase counter. No upper bound; round bookkeeping is
    /// handled by the execution flow, not by the counter.
    pub fn advance_phase(&mut self) {
        self.phase += 1;
    }

    /// Rotate a robot. One of the two write paths into robot state.
    pub fn rotate_robot(&mut self, steps: i32, idx: usize) -> Vec<GameEvent> {
        if idx >= self.robots.len() {
            return Vec::new();
        }
        engine::rotate_robot(steps, idx, &mut self.robots)
    }

    /// Move a robot. The other write path.
    pub fn move_robot(&mut self, steps: i32, idx: usize) -> Vec<GameEvent> {
        if idx >= self.robots.len() {
            return Vec::new();
        }
        engine::move_robot(steps, idx, &self.board, &mut self.robots)
    }

    // ── Board + round lifecycle ──

    /// Take a freshly loaded board and spawn the roster: one robot and
    /// one player per spawn pad, in row-major pad order, facing north.
    /// Callers ensure the board has at least one spawn.
    pub fn start_board(&mut self, name: &str, board: Board, drive: bool) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.robots = board
            .spawn_points()
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| Robot::new(i, x, y))
            .collect();
        self.players = (0..self.robots.len()).map(Player::new).collect();
        self.board = board;
        self.board_name = name.to_string();
        self.active = 0;
        self.phase = 0;
        self.round = 0;
        self.register = 0;
        self.exec_queue.clear();
        self.exec_pos = 0;
        self.belt_pending = false;

        if drive {
            self.screen = Screen::Drive;
            self.set_message("Drive mode: arrows move, N next bot, P next phase", 90);
        } else {
            self.begin_round(&mut events);
        }
        events
    }

    /// Deal a fresh round and enter programming. Players whose robot
    /// is down get no cards and count as locked.
    fn begin_round(&mut self, events: &mut Vec<GameEvent>) {
        self.round += 1;
        for i in 0..self.players.len() {
            self.players[i].program.clear();
            let robot = self.players[i].robot;
            if self.robots[robot].destroyed {
                self.players[i].hand.clear();
                self.players[i].locked = true;
            } else {
                self.players[i].hand = cards::deal_hand(&mut self.rng, self.hand_size);
                self.players[i].locked = false;
            }
        }
        self.register = 0;
        self.active = 0;
        self.skip_locked_players();
        self.screen = Screen::Programming;
        events.push(GameEvent::RoundStarted { round: self.round });
        self.set_message(&format!("Round {} - program your bots", self.round), 60);
    }

    fn skip_locked_players(&mut self) {
        for _ in 0..self.players.len() {
            if !self.players[self.active].locked {
                return;
            }
            self.advance_player();
        }
    }

    // ── Programming commands ──

    /// Move a hand card into the next free register. Out-of-range
    /// picks and full programs are quiet no-ops.
    pub fn pick_card(&mut self, hand_idx: usize) {
        let Some(player) = self.players.get_mut(self.active) else {
            return;
        };
        if player.locked || player.program.len() >= self.registers {
            return;
        }
        if hand_idx >= player.hand.len() {
            return;
        }
        let card = player.hand.remove(hand_idx);
        player.program.push(card);
    }

    /// Take the most recent pick back into the hand.
    pub fn unpick_card(&mut self) {
        let Some(player) = self.players.get_mut(self.active) else {
            return;
        };
        if player.locked {
            return;
        }
        if let Some(card) = player.program.pop() {
            player.hand.push(card);
        }
    }

    /// Lock the active player's program when it is full, then hand
    /// off to the next unlocked player — or start executing when
    /// everyone is locked.
    pub fn lock_program(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(player) = self.players.get_mut(self.active) else {
            return events;
        };
        if player.locked || player.program.len() < self.registers {
            return events;
        }
        player.locked = true;

        if self.players.iter().all(|p| p.locked) {
            self.start_execution(&mut events);
        } else {
            self.advance_player();
            self.skip_locked_players();
        }
        events
    }

    // ── Execution ──

    fn start_execution(&mut self, _events: &mut Vec<GameEvent>) {
        self.screen = Screen::Executing;
        self.register = 0;
        self.queue_register();
        self.set_message(&format!("Round {} - executing", self.round), 40);
    }

    /// Queue this register's plays: every live player's card for the
    /// slot, highest priority first, ties by player index.
    fn queue_register(&mut self) {
        let mut plays: Vec<(usize, Card)> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !self.robots[p.robot].destroyed)
            .filter_map(|(i, p)| p.program.get(self.register).map(|c| (i, *c)))
            .collect();
        plays.sort_by(|a, b| b.1.priority.cmp(&a.1.priority).then(a.0.cmp(&b.0)));
        self.exec_queue = plays;
        self.exec_pos = 0;
        self.belt_pending = true;
    }

    /// Advance execution by one beat: play one card, or run the
    /// conveyor pass, or step to the next register / end the round.
    /// The main loop spaces beats out with the configured delay so
    /// each play is visible.
    pub fn tick_execution(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.screen != Screen::Executing {
            return events;
        }

        if self.exec_pos < self.exec_queue.len() {
            let (player_idx, card) = self.exec_queue[self.exec_pos];
            self.exec_pos += 1;
            let robot_idx = self.players[player_idx].robot;
            // A robot destroyed earlier in this register skips its card
            if !self.robots[robot_idx].destroyed {
                events.push(GameEvent::CardPlayed {
                    player: player_idx,
                    card,
                });
                let played = match card.kind.instruction() {
                    Instruction::Move(n) => {
                        engine::move_robot(n, robot_idx, &self.board, &mut self.robots)
                    }
                    Instruction::Rotate(n) => engine::rotate_robot(n, robot_idx, &mut self.robots),
                };
                events.extend(played);
            }
            self.check_all_down(&mut events);
            return events;
        }

        if self.belt_pending {
            self.belt_pending = false;
            events.extend(engine::convey(&self.board, &mut self.robots));
            self.advance_phase();
            self.check_all_down(&mut events);
            return events;
        }

        // Register finished
        self.register += 1;
        if self.register < self.registers && self.screen == Screen::Executing {
            self.queue_register();
        } else if self.screen == Screen::Executing {
            self.begin_round(&mut events);
        }
        events
    }

    /// The play most recently executed this register, for the HUD.
    pub fn current_play(&self) -> Option<(usize, Card)> {
        if self.exec_pos == 0 {
            return None;
        }
        self.exec_queue.get(self.exec_pos - 1).copied()
    }

    fn check_all_down(&mut self, events: &mut Vec<GameEvent>) {
        if !self.robots.is_empty() && self.robots.iter().all(|r| r.destroyed) {
            self.screen = Screen::GameOver;
            events.push(GameEvent::AllRobotsDown);
            self.set_message("ALL ROBOTS DOWN", 0);
        }
    }

    /// Live robot count, for the HUD.
    pub fn robots_alive(&self) -> usize {
        self.robots.iter().filter(|r| !r.destroyed).count()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::CardKind;
    use crate::domain::direction::Direction;
    use crate::domain::tile::Tile;

    /// Helper: build a Board from a string diagram.
    /// Legend:  '.'=Floor  '#'=Wall  'O'=Pit  'S'=Spawn
    ///          '^' '>' 'v' '<' = Belt north/east/south/west
    fn board_from(rows: &[&str]) -> Board {
        let tiles = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        '#' => Tile::Wall,
                        'O' => Tile::Pit,
                        'S' => Tile::Spawn,
                        '^' => Tile::Belt(Direction::North),
                        '>' => Tile::Belt(Direction::East),
                        'v' => Tile::Belt(Direction::South),
                        '<' => Tile::Belt(Direction::West),
                        _ => Tile::Floor,
                    })
                    .collect()
            })
            .collect();
        Board::from_rows(tiles)
    }

    fn card(kind: CardKind, priority: u16) -> Card {
        Card { kind, priority }
    }

    fn session_on(rows: &[&str]) -> GameSession {
        let mut s = GameSession::new(7, 5);
        s.start_board("test", board_from(rows), false);
        s
    }

    // ── Roster creation ──

    #[test]
    fn spawns_create_players_row_major() {
        let s = session_on(&[
            "..S.",
            "S...",
            "..S.",
        ]);
        assert_eq!(s.players.len(), 3);
        assert_eq!((s.robots[0].x, s.robots[0].y), (2, 0));
        assert_eq!((s.robots[1].x, s.robots[1].y), (0, 1));
        assert_eq!((s.robots[2].x, s.robots[2].y), (2, 2));
        for r in &s.robots {
            assert_eq!(r.facing, Direction::North);
            assert!(!r.destroyed);
        }
        assert_eq!(s.players[1].name, "P2");
        assert_eq!(s.players[1].robot, 1);
    }

    #[test]
    fn fresh_session_starts_at_player_zero_phase_zero() {
        let s = session_on(&["S.S"]);
        assert_eq!(s.active, 0);
        assert_eq!(s.phase, 0);
        assert_eq!(s.round, 1);
        assert_eq!(s.screen, Screen::Programming);
    }

    // ── Coordinator contract ──

    #[test]
    fn advance_player_wraps_after_full_cycle() {
        let mut s = session_on(&["S.S.S"]);
        assert_eq!(s.active, 0);
        for _ in 0..s.players.len() {
            s.advance_player();
        }
        assert_eq!(s.active, 0);
        s.advance_player();
        assert_eq!(s.active, 1);
    }

    #[test]
    fn advance_player_without_players_is_a_noop() {
        let mut s = GameSession::new(7, 5);
        s.advance_player();
        assert_eq!(s.active, 0);
        assert!(s.current_robot().is_none());
    }

    #[test]
    fn advance_phase_is_monotonic() {
        let mut s = session_on(&["S."]);
        for expect in 1..=5 {
            s.advance_phase();
            assert_eq!(s.phase, expect);
        }
    }

    #[test]
    fn current_robot_follows_active_player() {
        let mut s = session_on(&["S.S"]);
        assert_eq!(s.current_robot().map(|r| r.id), Some(0));
        s.advance_player();
        assert_eq!(s.current_robot().map(|r| r.id), Some(1));
    }

    #[test]
    fn command_entry_points_delegate_to_the_engine() {
        let mut s = session_on(&["S..."]);
        s.rotate_robot(1, 0);
        assert_eq!(s.robots[0].facing, Direction::East);
        s.move_robot(2, 0);
        assert_eq!((s.robots[0].x, s.robots[0].y), (2, 0));
    }

    #[test]
    fn out_of_range_robot_commands_are_noops() {
        let mut s = session_on(&["S."]);
        assert!(s.move_robot(1, 9).is_empty());
        assert!(s.rotate_robot(1, 9).is_empty());
    }

    // ── Dealing and programming ──

    #[test]
    fn round_start_deals_full_hands() {
        let s = session_on(&["S.S"]);
        for p in &s.players {
            assert_eq!(p.hand.len(), 7);
            assert!(p.program.is_empty());
            assert!(!p.locked);
        }
    }

    #[test]
    fn destroyed_players_get_no_cards_next_round() {
        let mut s = session_on(&["SOS"]);
        s.rotate_robot(1, 0); // face east, pit at (1,0)
        s.move_robot(1, 0);
        assert!(s.robots[0].destroyed);
        let mut events = Vec::new();
        s.begin_round(&mut events);
        assert!(s.players[0].hand.is_empty());
        assert!(s.players[0].locked);
        assert_eq!(s.players[1].hand.len(), 7);
        // active skips straight to the live player
        assert_eq!(s.active, 1);
    }

    #[test]
    fn pick_moves_cards_into_the_program() {
        let mut s = session_on(&["S."]);
        s.pick_card(0);
        s.pick_card(0);
        assert_eq!(s.players[0].program.len(), 2);
        assert_eq!(s.players[0].hand.len(), 5);
    }

    #[test]
    fn bad_picks_are_noops() {
        let mut s = session_on(&["S."]);
        s.pick_card(99);
        assert!(s.players[0].program.is_empty());
        for _ in 0..5 {
            s.pick_card(0);
        }
        s.pick_card(0); // program already full
        assert_eq!(s.players[0].program.len(), 5);
        assert_eq!(s.players[0].hand.len(), 2);
    }

    #[test]
    fn unpick_returns_the_last_card() {
        let mut s = session_on(&["S."]);
        s.pick_card(0);
        let picked = s.players[0].program[0];
        s.unpick_card();
        assert!(s.players[0].program.is_empty());
        assert_eq!(s.players[0].hand.len(), 7);
        assert_eq!(*s.players[0].hand.last().unwrap(), picked);
    }

    #[test]
    fn lock_requires_a_full_program() {
        let mut s = session_on(&["S.S"]);
        s.pick_card(0);
        s.lock_program();
        assert!(!s.players[0].locked);
        for _ in 0..4 {
            s.pick_card(0);
        }
        s.lock_program();
        assert!(s.players[0].locked);
        assert_eq!(s.active, 1);
        assert_eq!(s.screen, Screen::Programming);
    }

    #[test]
    fn last_lock_starts_execution() {
        let mut s = session_on(&["S.S"]);
        for _ in 0..2 {
            for _ in 0..5 {
                s.pick_card(0);
            }
            s.lock_program();
        }
        assert_eq!(s.screen, Screen::Executing);
    }

    // ── Execution ──

    /// Hand-build a locked two-player session with fixed programs.
    fn programmed(rows: &[&str], p0: Vec<Card>, p1: Vec<Card>) -> GameSession {
        let mut s = GameSession::new(7, p0.len());
        s.start_board("test", board_from(rows), false);
        s.players[0].program = p0;
        s.players[0].locked = true;
        s.players[1].program = p1;
        s.players[1].locked = true;
        let mut events = Vec::new();
        s.start_execution(&mut events);
        s
    }

    #[test]
    fn higher_priority_plays_first() {
        let mut s = programmed(
            &["S.S...."],
            vec![card(CardKind::Move1, 500)],
            vec![card(CardKind::Move2, 700)],
        );
        let events = s.tick_execution();
        assert!(matches!(events[0], GameEvent::CardPlayed { player: 1, .. }));
        let events = s.tick_execution();
        assert!(matches!(events[0], GameEvent::CardPlayed { player: 0, .. }));
    }

    #[test]
    fn priority_ties_fall_back_to_player_order() {
        let mut s = programmed(
            &["S.S...."],
            vec![card(CardKind::Move1, 500)],
            vec![card(CardKind::Move1, 500)],
        );
        let events = s.tick_execution();
        assert!(matches!(events[0], GameEvent::CardPlayed { player: 0, .. }));
    }

    #[test]
    fn register_runs_cards_then_belts_then_advances_phase() {
        let mut s = programmed(
            &["S>S...."],
            vec![card(CardKind::RotateRight, 200)],
            vec![card(CardKind::RotateLeft, 100)],
        );
        assert_eq!(s.phase, 0);
        s.tick_execution(); // card 1
        s.tick_execution(); // card 2
        assert_eq!(s.phase, 0);
        let events = s.tick_execution(); // conveyor pass + phase tick
        assert_eq!(s.phase, 1);
        // nobody stood on the belt
        assert!(!events.iter().any(|e| matches!(e, GameEvent::RobotCarried { .. })));
    }

    #[test]
    fn belt_pass_carries_standing_robots() {
        let mut s = programmed(
            &[
                ">....",
                "S...S",
            ],
            vec![card(CardKind::Move1, 900)],
            vec![card(CardKind::UTurn, 20)],
        );
        s.tick_execution(); // P1 steps north onto the belt
        s.tick_execution(); // P2 turns in place
        assert_eq!((s.robots[0].x, s.robots[0].y), (0, 0));
        let events = s.tick_execution(); // conveyor pass
        assert_eq!((s.robots[0].x, s.robots[0].y), (1, 0));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::RobotCarried { robot: 0, .. })));
    }

    #[test]
    fn destroyed_mid_register_skips_its_card() {
        // P2's Move2 plays first and bulldozes P1's robot into the
        // pit; P1's own card must then be skipped
        let mut s = programmed(
            &["O.SS"],
            vec![card(CardKind::Move1, 100)],
            vec![card(CardKind::Move2, 800)],
        );
        s.robots[1].facing = Direction::West;
        let events = s.tick_execution();
        assert!(s.robots[0].destroyed);
        assert!(!s.robots[1].destroyed);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::RobotDestroyed { robot: 0, .. })));
        let events = s.tick_execution();
        assert!(events.is_empty());
    }

    #[test]
    fn round_ends_into_a_fresh_deal() {
        let mut s = programmed(
            &["S..S"],
            vec![card(CardKind::Move1, 500)],
            vec![card(CardKind::Move1, 400)],
        );
        // registers = 1 here: 2 cards + belts + rollover
        s.tick_execution();
        s.tick_execution();
        s.tick_execution();
        let events = s.tick_execution();
        assert_eq!(s.screen, Screen::Programming);
        assert_eq!(s.round, 2);
        assert!(events.iter().any(|e| matches!(e, GameEvent::RoundStarted { round: 2 })));
        assert_eq!(s.players[0].hand.len(), 7);
    }

    #[test]
    fn all_robots_down_ends_the_game() {
        let mut s = programmed(
            &["SOSO"],
            vec![card(CardKind::Move1, 500)],
            vec![card(CardKind::Move1, 400)],
        );
        s.robots[0].facing = Direction::East;
        s.robots[1].facing = Direction::East;
        s.tick_execution(); // P1 into pit at (1,0)
        let events = s.tick_execution(); // P2 into pit at (3,0)
        assert_eq!(s.screen, Screen::GameOver);
        assert!(events.iter().any(|e| matches!(e, GameEvent::AllRobotsDown)));
    }

    #[test]
    fn phase_counter_counts_registers_across_rounds() {
        let mut s = programmed(
            &["S..S"],
            vec![card(CardKind::RotateRight, 500)],
            vec![card(CardKind::RotateLeft, 400)],
        );
        // one register per round here; run two full rounds
        for _ in 0..4 {
            s.tick_execution();
        }
        assert_eq!(s.round, 2);
        assert_eq!(s.phase, 1);
        s.players[0].program = vec![card(CardKind::RotateRight, 500)];
        s.players[1].program = vec![card(CardKind::RotateLeft, 400)];
        s.players[0].locked = true;
        s.players[1].locked = true;
        let mut events = Vec::new();
        s.start_execution(&mut events);
        for _ in 0..4 {
            s.tick_execution();
        }
        assert_eq!(s.phase, 2);
    }
}
