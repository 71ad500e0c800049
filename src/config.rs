//! Configuration handling for the console

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the console
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleConfig {
    /// Backend base URL (overridden by SEWERVISION_API_URL)
    pub api_base_url: Option<String>,
    /// Device sort field
    pub device_sort_field: Option<String>,
    /// Device sort direction
    pub device_sort_direction: Option<String>,
    /// Show offline devices by default
    pub show_offline_devices: Option<bool>,
}

impl ConsoleConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("ai", "sewervision", "sewervision-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: ConsoleConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }
}
