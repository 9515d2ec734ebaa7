//! Per-frame input snapshot.
//!
//! Terminals differ in what they report: keyboard-enhancement capable ones
//! (kitty protocol) send `Press` / `Repeat` / `Release`, classic ones only
//! send `Press`, with OS key-repeat showing up as more presses.
//! [`KeyTracker`] records the frame each key was last seen and treats it as
//! held until it is released or goes quiet for [`HOLD_WINDOW`] frames.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind};

/// Frames a key stays held after its last press/repeat.  OS key-repeat runs
/// at 15 Hz or faster, so a held key refreshes well inside this window.
pub const HOLD_WINDOW: u64 = 8;

/// What the simulation sees of the player's controls for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event observed during `frame`.
    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind, frame: u64) {
        let code = normalize(code);
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    pub fn is_held(&self, code: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&normalize(code))
            .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
    }

    fn any_held(&self, codes: &[KeyCode], frame: u64) -> bool {
        codes.iter().any(|&code| self.is_held(code, frame))
    }

    /// Forget every key, e.g. when leaving the game screen.
    pub fn clear(&mut self) {
        self.key_frame.clear();
    }

    /// Arrow keys or WASD move, Space fires.
    pub fn snapshot(&self, frame: u64) -> InputState {
        InputState {
            up: self.any_held(&[KeyCode::Up, KeyCode::Char('w')], frame),
            down: self.any_held(&[KeyCode::Down, KeyCode::Char('s')], frame),
            left: self.any_held(&[KeyCode::Left, KeyCode::Char('a')], frame),
            right: self.any_held(&[KeyCode::Right, KeyCode::Char('d')], frame),
            fire: self.is_held(KeyCode::Char(' '), frame),
        }
    }
}

/// Fold letter case so Shift or Caps Lock does not drop a held key.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
