//! Application preferences.
//!
//! These persist between sessions (unlike editor interaction state, which
//! lives and dies with the pane). Loading is forgiving: a missing or
//! unreadable file falls back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FlowVisError, Result};

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPreferences {
    /// Dark or light egui visuals.
    pub dark_mode: bool,

    /// Whether the inspector side panel is shown.
    pub show_inspector: bool,

    /// New data edges default to stateless.
    pub default_stateless: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_inspector: true,
            default_stateless: true,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiPreferences,

    /// Seed the editor with a small example graph on startup.
    pub seed_demo_graph: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ui: UiPreferences::default(),
            seed_demo_graph: true,
        }
    }
}

impl AppConfig {
    /// Load preferences from the default location, falling back to defaults
    /// on any failure (first run, unreadable file, schema drift).
    pub fn load_or_default() -> Self {
        let Some(path) = super::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Failed to load preferences: {}", e);
                }
                Self::default()
            }
        }
    }

    /// Save preferences to the default location.
    pub fn save(&self) -> Result<()> {
        let dir = super::ensure_app_data_dir()?;
        self.save_to(&dir.join(super::CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| FlowVisError::Config(format!("Invalid preferences file: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| FlowVisError::Config(format!("Failed to serialize preferences: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
