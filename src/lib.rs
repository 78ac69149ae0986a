//! Duo Pong - a two-player Pong game for the terminal
//!
//! Core modules:
//! - `sim`: Entities, collisions, scoring (the `Scene`)
//! - `scheduler`: Fixed-timestep loop with catch-up ticks
//! - `renderer`: Drawing traits, offscreen frame buffer, terminal presenter
//! - `platform`: Input state, loop control, clocks, terminal events
//! - `settings`: Data-driven configuration

pub mod error;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GameError, PresentError};
pub use scheduler::{Flow, LoopStats, Scheduler, Simulation};
pub use settings::Settings;
pub use sim::Scene;

/// Game configuration defaults
pub mod consts {
    /// Ticks (and frames) per second when no rate is given
    pub const DEFAULT_TICK_RATE: u32 = 20;

    /// Playfield dimensions
    pub const PANEL_WIDTH: i32 = 700;
    pub const PANEL_HEIGHT: i32 = 400;

    /// Ball defaults
    pub const BALL_RADIUS: i32 = 10;
    pub const BALL_STEP: i32 = 10;

    /// Paddle defaults
    pub const PADDLE_WIDTH: i32 = 25;
    pub const PADDLE_HEIGHT: i32 = 100;
    pub const PADDLE_STEP: i32 = 15;

    /// First side to reach this many points ends the match
    pub const WINNING_SCORE: u32 = 5;

    /// Iterations without a sleep before the loop yields its thread
    pub const NUM_DELAYS_FOR_YIELD: u32 = 16;
    /// Maximum catch-up ticks per loop iteration
    pub const MAX_SKIPPED_TICKS: u32 = 5;

    /// How long a key stays held when the terminal cannot report releases
    pub const KEY_HOLD_MS: u64 = 150;
}
