use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::{Mode, PlanError};
use crate::plan::{DemoPlan, Timing, DEFAULT_PROMPT};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Speed must be 0 or between 0.01 and 1000, got {0}")]
    Speed(f64),
}

/// Slowest playback rate accepted, apart from 0
pub const MIN_SPEED: f64 = 0.01;
/// Fastest playback rate accepted
pub const MAX_SPEED: f64 = 1000.0;

/// Check a playback rate. `0` means no waiting; anything else must lie in
/// `MIN_SPEED..=MAX_SPEED`.
pub fn validate_speed(speed: f64) -> Result<f64, ConfigError> {
    if speed == 0.0 || (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(speed)
    } else {
        Err(ConfigError::Speed(speed))
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Mode used when playback is started without an explicit one
    pub mode: Mode,
    /// Playback rate multiplier (0 = no waiting)
    pub speed: f64,
    /// Prompt typed at the start of the demo
    pub prompt: String,
    /// Step delays, in milliseconds as written in the file
    pub timing: TimingConfig,
}

/// Step delays as configured. Kept signed so bad values can be reported
/// instead of silently wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub typing_ms: i64,
    pub post_enter_pause_ms: i64,
    pub cycle_tick_ms: i64,
    pub first_round_cycle_ticks: usize,
    pub round_cycle_ticks: usize,
    pub settle_stagger_ms: i64,
    pub select_transfer_ms: i64,
    pub between_rounds_ms: i64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typing_ms: 55,
            post_enter_pause_ms: 400,
            cycle_tick_ms: 110,
            first_round_cycle_ticks: 18,
            round_cycle_ticks: 10,
            settle_stagger_ms: 240,
            select_transfer_ms: 1200,
            between_rounds_ms: 520,
        }
    }
}

fn millis(field: &'static str, value: i64) -> Result<Duration, PlanError> {
    u64::try_from(value)
        .map(Duration::from_millis)
        .map_err(|_| PlanError::NegativeDuration { field, value })
}

impl TimingConfig {
    pub fn to_timing(&self) -> Result<Timing, PlanError> {
        Ok(Timing {
            typing: millis("typing_ms", self.typing_ms)?,
            post_enter_pause: millis("post_enter_pause_ms", self.post_enter_pause_ms)?,
            cycle_tick: millis("cycle_tick_ms", self.cycle_tick_ms)?,
            first_round_cycle_ticks: self.first_round_cycle_ticks,
            round_cycle_ticks: self.round_cycle_ticks,
            settle_stagger: millis("settle_stagger_ms", self.settle_stagger_ms)?,
            select_transfer: millis("select_transfer_ms", self.select_transfer_ms)?,
            between_rounds: millis("between_rounds_ms", self.between_rounds_ms)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Continuous,
            speed: 1.0,
            prompt: DEFAULT_PROMPT.to_string(),
            timing: TimingConfig::default(),
        }
    }
}

/// TOML representation of playback configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPlaybackConfig {
    pub mode: Option<Mode>,
    pub speed: Option<f64>,
}

/// TOML representation of step timing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlTimingConfig {
    pub typing_ms: Option<i64>,
    pub post_enter_pause_ms: Option<i64>,
    pub cycle_tick_ms: Option<i64>,
    pub first_round_cycle_ticks: Option<usize>,
    pub round_cycle_ticks: Option<usize>,
    pub settle_stagger_ms: Option<i64>,
    pub select_transfer_ms: Option<i64>,
    pub between_rounds_ms: Option<i64>,
}

/// TOML representation of the demo script
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlDemoConfig {
    pub prompt: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub playback: Option<TomlPlaybackConfig>,
    pub timing: Option<TomlTimingConfig>,
    pub demo: Option<TomlDemoConfig>,
}

impl Config {
    /// Load configuration from `path`, merging with defaults.
    ///
    /// Writes the bundled example on first run. A file that cannot be read or
    /// parsed is reported and the defaults are used.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            Self::create_default_config(path);
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No config file");
                Self::default()
            }
        }
    }

    /// Parse TOML contents on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(playback) = toml_config.playback {
            if let Some(mode) = playback.mode {
                config.mode = mode;
            }
            if let Some(speed) = playback.speed {
                config.speed = validate_speed(speed)?;
            }
        }

        if let Some(timing) = toml_config.timing {
            let t = &mut config.timing;
            if let Some(v) = timing.typing_ms {
                t.typing_ms = v;
            }
            if let Some(v) = timing.post_enter_pause_ms {
                t.post_enter_pause_ms = v;
            }
            if let Some(v) = timing.cycle_tick_ms {
                t.cycle_tick_ms = v;
            }
            if let Some(v) = timing.first_round_cycle_ticks {
                t.first_round_cycle_ticks = v;
            }
            if let Some(v) = timing.round_cycle_ticks {
                t.round_cycle_ticks = v;
            }
            if let Some(v) = timing.settle_stagger_ms {
                t.settle_stagger_ms = v;
            }
            if let Some(v) = timing.select_transfer_ms {
                t.select_transfer_ms = v;
            }
            if let Some(v) = timing.between_rounds_ms {
                t.between_rounds_ms = v;
            }
        }

        if let Some(prompt) = toml_config.demo.and_then(|demo| demo.prompt) {
            config.prompt = prompt;
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// The demo plan this configuration describes
    pub fn demo_plan(&self) -> Result<DemoPlan, PlanError> {
        let plan = DemoPlan {
            prompt: self.prompt.clone(),
            timing: self.timing.to_timing()?,
            ..DemoPlan::default()
        };
        plan.validate()?;
        Ok(plan)
    }
}
