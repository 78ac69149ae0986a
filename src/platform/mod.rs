//! Platform layer
//!
//! Everything shared between the event thread and the game loop thread:
//! - Input state (key press/release flags)
//! - Loop control (pause/resume/stop requests)
//! - Time (monotonic clock, timed sleep, yield)
//! - Terminal session and event pump

pub mod control;
pub mod input;
pub mod terminal;
pub mod time;

pub use control::{Lifecycle, LoopControl, LoopState};
pub use input::{InputSample, InputState, Key, KeyBindings, PaddleIntent};
pub use time::{Clock, SystemClock};
