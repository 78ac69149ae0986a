//! Game settings
//!
//! Defaults match the classic 700x400 table at 20 ticks per second. Any
//! field can be overridden from a JSON file named by `DUO_PONG_SETTINGS`;
//! the tick rate can also come from the first command line argument.

use std::fs;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::platform::input::KeyBindings;

/// Environment variable naming an optional settings file
pub const SETTINGS_ENV: &str = "DUO_PONG_SETTINGS";

/// Largest accepted panel side, keeping all position arithmetic in range
const MAX_PANEL_EXTENT: i32 = 1 << 16;

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub width: i32,
    pub height: i32,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub radius: i32,
    /// Pixels moved per tick on each axis
    pub step: i32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            step: BALL_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleSettings {
    pub width: i32,
    pub height: i32,
    /// Pixels moved per tick while a key is held
    pub step: i32,
}

impl Default for PaddleSettings {
    fn default() -> Self {
        Self {
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            step: PADDLE_STEP,
        }
    }
}

/// Game loop pacing thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Consecutive iterations without sleeping before yielding the thread
    pub yield_after_delays: u32,
    /// Cap on catch-up ticks run in a single iteration
    pub max_skipped_ticks: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            yield_after_delays: NUM_DELAYS_FOR_YIELD,
            max_skipped_ticks: MAX_SKIPPED_TICKS,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ticks per second; every tick that is not a catch-up tick is also rendered
    pub tick_rate: u32,
    pub panel: PanelSettings,
    pub ball: BallSettings,
    pub paddle: PaddleSettings,
    pub winning_score: u32,
    pub timing: TimingSettings,
    pub keys: KeyBindings,
    /// Synthetic key hold when the terminal only reports presses
    pub key_hold_ms: u64,
    /// Fixed RNG seed for ball resets (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            panel: PanelSettings::default(),
            ball: BallSettings::default(),
            paddle: PaddleSettings::default(),
            winning_score: WINNING_SCORE,
            timing: TimingSettings::default(),
            keys: KeyBindings::default(),
            key_hold_ms: KEY_HOLD_MS,
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from the file named by `DUO_PONG_SETTINGS`, or defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn panel_size(&self) -> IVec2 {
        IVec2::new(self.panel.width, self.panel.height)
    }

    /// Settings file from the environment with the command line tick rate
    /// applied on top
    pub fn resolve(arg: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_env()?.with_tick_rate_arg(arg)
    }

    /// Override the tick rate from the command line argument. A missing or
    /// non-numeric argument keeps the configured rate.
    pub fn with_tick_rate_arg(mut self, arg: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(rate) = parse_tick_rate(arg)? {
            self.tick_rate = rate;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Invalid(message.into()));

        if self.tick_rate == 0 {
            return invalid("tick_rate must be positive");
        }
        let (width, height) = (self.panel.width, self.panel.height);
        if !(1..=MAX_PANEL_EXTENT).contains(&width) || !(1..=MAX_PANEL_EXTENT).contains(&height) {
            return invalid("panel size must be between 1 and 65536");
        }

        let ball = &self.ball;
        if ball.radius <= 0 || ball.step <= 0 {
            return invalid("ball radius and step must be positive");
        }
        match ball.radius.checked_mul(2) {
            Some(diameter) if diameter <= width.min(height) => {}
            _ => return invalid("ball does not fit inside the panel"),
        }
        if ball.step >= width.min(height) {
            return invalid("ball step must be smaller than the panel");
        }

        let paddle = &self.paddle;
        if paddle.width <= 0 || paddle.height <= 0 || paddle.step <= 0 {
            return invalid("paddle size and step must be positive");
        }
        let both_paddles = paddle.width.checked_mul(2);
        if paddle.height > height || both_paddles.is_none_or(|w| w > width) {
            return invalid("paddles do not fit inside the panel");
        }
        if paddle.step > height {
            return invalid("paddle step must not exceed the panel height");
        }

        if self.winning_score == 0 {
            return invalid("winning_score must be positive");
        }
        if let Some(key) = self.keys.duplicate() {
            return Err(ConfigError::Invalid(format!(
                "key '{key}' is bound more than once"
            )));
        }
        Ok(())
    }
}

/// Interpret the optional tick rate argument.
///
/// A missing argument, or one without any digits, gives `None`. An argument
/// that looks numeric but is not a positive whole number is an error; the
/// binary reports it and exits with status 0.
pub fn parse_tick_rate(arg: Option<&str>) -> Result<Option<u32>, ConfigError> {
    let Some(raw) = arg.map(str::trim) else {
        return Ok(None);
    };

    if !raw.chars().any(|c| c.is_ascii_digit()) {
        log::warn!("Ignoring non-numeric tick rate '{}'", raw);
        return Ok(None);
    }

    match raw.parse::<u32>() {
        Ok(rate) if rate > 0 => Ok(Some(rate)),
        _ => Err(ConfigError::InvalidTickRate(raw.to_string())),
    }
}
