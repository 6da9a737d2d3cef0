//! Where stepline keeps its config file and logs.
//!
//! Everything hangs off one data directory, `~/.stepline` unless `--data-dir`
//! says otherwise.

use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

const DIR_NAME: &str = ".stepline";

/// Pin the data directory for the rest of the process. The first call wins;
/// later calls are logged and dropped.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(home_data_dir);
    if let Err(rejected) = DATA_DIR.set(path) {
        tracing::debug!(
            rejected = %rejected.display(),
            current = %data_dir().display(),
            "Data directory already set"
        );
    }
}

fn home_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DIR_NAME),
        None => PathBuf::from(DIR_NAME),
    }
}

pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(home_data_dir)
}

pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn log_file_path() -> PathBuf {
    logs_dir().join("stepline.log")
}
