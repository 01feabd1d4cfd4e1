use std::path::PathBuf;

use glyph_trace::{sanitize::clamp_sensitivity, DEFAULT_PROGRESS_KEY, DEFAULT_SENSITIVITY};

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub sensitivity: u8,
    pub store_dir: PathBuf,
    pub progress_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let sensitivity = lookup("TRACE_SENSITIVITY")
            .and_then(|value| value.trim().parse::<u8>().ok())
            .map(clamp_sensitivity)
            .unwrap_or(DEFAULT_SENSITIVITY);

        let store_dir = lookup("TRACE_STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_store_dir);

        let progress_key =
            lookup("TRACE_PROGRESS_KEY").unwrap_or_else(|| DEFAULT_PROGRESS_KEY.to_string());

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Self {
            log_level,
            sensitivity,
            store_dir,
            progress_key,
        }
    }
}

fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("glyph-trace"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}
