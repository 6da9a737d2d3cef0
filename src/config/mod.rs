mod settings;

pub use settings::{
    validate_speed, Config, ConfigError, TimingConfig, TomlConfig, TomlDemoConfig,
    TomlPlaybackConfig, TomlTimingConfig, EXAMPLE_CONFIG, MAX_SPEED, MIN_SPEED,
};
