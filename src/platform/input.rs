//! Keyboard input state
//!
//! The event thread records presses and releases; the game loop samples the
//! flags once per tick. Only five logical keys are tracked, everything else
//! is dropped on the floor.

use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::sim::Side;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
    Quit,
}

impl Key {
    pub const COUNT: usize = 5;

    pub const ALL: [Key; Key::COUNT] = [
        Key::LeftUp,
        Key::LeftDown,
        Key::RightUp,
        Key::RightDown,
        Key::Quit,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Character bindings for the paddle keys. `Esc` always quits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left_up: char,
    pub left_down: char,
    pub right_up: char,
    pub right_down: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_up: 'a',
            left_down: 'z',
            right_up: 'k',
            right_down: 'm',
        }
    }
}

impl KeyBindings {
    fn chars(&self) -> [char; 4] {
        [self.left_up, self.left_down, self.right_up, self.right_down]
    }

    /// A character bound to more than one key, lowercased
    pub fn duplicate(&self) -> Option<char> {
        let chars = self.chars().map(|c| c.to_ascii_lowercase());
        chars
            .iter()
            .enumerate()
            .find(|&(i, c)| chars[i + 1..].contains(c))
            .map(|(_, &c)| c)
    }

    /// Map a raw key code to a tracked key (letters match either case)
    pub fn resolve(&self, code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Esc => Some(Key::Quit),
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                self.chars()
                    .into_iter()
                    .zip(Key::ALL)
                    .find(|(bound, _)| bound.to_ascii_lowercase() == c)
                    .map(|(_, key)| key)
            }
            _ => None,
        }
    }
}

/// Up/down intent for one paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddleIntent {
    pub up: bool,
    pub down: bool,
}

/// Snapshot of the held keys taken at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSample {
    pub left: PaddleIntent,
    pub right: PaddleIntent,
    pub quit: bool,
}

impl InputSample {
    pub fn for_side(&self, side: Side) -> PaddleIntent {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Held-state of every tracked key, safe to share between threads
#[derive(Debug, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: [AtomicBool; Key::COUNT],
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: Default::default(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn on_key_down(&self, code: KeyCode) {
        if let Some(key) = self.bindings.resolve(code) {
            self.press(key);
        }
    }

    pub fn on_key_up(&self, code: KeyCode) {
        if let Some(key) = self.bindings.resolve(code) {
            self.release(key);
        }
    }

    pub fn press(&self, key: Key) {
        self.held[key.index()].store(true, Ordering::Release);
    }

    pub fn release(&self, key: Key) {
        self.held[key.index()].store(false, Ordering::Release);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()].load(Ordering::Acquire)
    }

    /// Read every flag for the current tick
    pub fn sample(&self) -> InputSample {
        InputSample {
            left: PaddleIntent {
                up: self.is_held(Key::LeftUp),
                down: self.is_held(Key::LeftDown),
            },
            right: PaddleIntent {
                up: self.is_held(Key::RightUp),
                down: self.is_held(Key::RightDown),
            },
            quit: self.is_held(Key::Quit),
        }
    }
}
