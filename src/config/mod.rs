//! Configuration module for FlowVis-RS.
//!
//! Application preferences persist in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.hxyulin.flowvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.flowvis-rs/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.flowvis-rs\`
//!
//! A single `config.toml` holds UI preferences; the graph itself is not
//! persisted (rebuild it through the registration API).

pub mod settings;

pub use settings::{AppConfig, UiPreferences};

use crate::error::{FlowVisError, Result};
use std::path::PathBuf;

/// Application identifier for data directories.
pub const APP_ID: &str = "dev.hxyulin.flowvis-rs";

/// Preferences filename.
pub const CONFIG_FILE: &str = "config.toml";

/// Get the application data directory path.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists.
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        FlowVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            FlowVisError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the preferences file.
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}
