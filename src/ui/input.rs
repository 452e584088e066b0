/// Input state tracker.
///
/// The game is turn-based: every key does one thing per press, so
/// only edge events matter. Press and Repeat both count as a press,
/// which lets a held arrow key keep stepping a robot in drive mode.
/// Release events are ignored.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind};

pub struct InputState {
    /// Key codes pressed during the most recent drain_events() call.
    presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame,
    /// before the simulation tick.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key.code);
                }
            }
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.contains(&code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// First digit key pressed this frame, if any. Used for card
    /// picks on the programming screen.
    pub fn pressed_digit(&self) -> Option<usize> {
        self.presses.iter().find_map(|code| match code {
            KeyCode::Char(ch @ '0'..='9') => Some(*ch as usize - '0' as usize),
            _ => None,
        })
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        use crossterm::event::KeyModifiers;
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
