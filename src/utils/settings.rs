use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

const CONFIG_FILE: &str = "config.toml";

/// Application settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Per-user directories used for config, storage and logs.
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "stylist", "ai-image-stylist")
        .context("Failed to determine project directories")
}

impl Settings {
    /// Loads settings from the per-user config directory.
    ///
    /// Never fails: a missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        match project_dirs() {
            Ok(dirs) => Self::load_from(&dirs.config_dir().join(CONFIG_FILE)),
            Err(e) => {
                warn!("{:#}, using default settings", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse settings TOML")
    }

    /// URL of the `generateContent` endpoint for the configured model.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Directory holding the durable key/value file.
pub fn storage_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Directory holding rolling log files.
pub fn log_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("logs"))
}
