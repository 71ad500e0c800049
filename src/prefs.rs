//! User preference flags (first-run tour, dismissed hints).
//!
//! Kept behind a trait and injected into the app so screens never reach for
//! ambient global state and tests can substitute a mock.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const TOUR_SEEN: &str = "tourSeen";

/// Boolean preference flags keyed by name
#[cfg_attr(test, mockall::automock)]
pub trait PreferencesStore: Send {
    fn flag(&self, key: &str) -> bool;
    fn set_flag(&mut self, key: &str, value: bool);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    flags: HashMap<String, bool>,
}

/// File-backed preferences, persisted as JSON in the user config dir
pub struct FilePreferences {
    path: Option<PathBuf>,
    flags: HashMap<String, bool>,
}

impl FilePreferences {
    fn prefs_path() -> Option<PathBuf> {
        ProjectDirs::from("ai", "sewervision", "sewervision-tui")
            .map(|dirs| dirs.config_dir().join("prefs.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::prefs_path();
        let mut flags = HashMap::new();

        if let Some(path) = &path {
            if path.exists() {
                let content = fs::read_to_string(path)?;
                let parsed: PrefsFile = serde_json::from_str(&content)?;
                flags = parsed.flags;
            }
        }

        Ok(Self { path, flags })
    }

    fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&PrefsFile {
                flags: self.flags.clone(),
            })?;
            fs::write(path, content)?;
        }
        Ok(())
    }
}

impl PreferencesStore for FilePreferences {
    fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
        if let Err(err) = self.save() {
            tracing::warn!(error = %err, "failed to persist preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory() -> FilePreferences {
        FilePreferences {
            path: None,
            flags: HashMap::new(),
        }
    }

    #[test]
    fn test_unset_flag_defaults_false() {
        let prefs = in_memory();
        assert!(!prefs.flag(TOUR_SEEN));
    }

    #[test]
    fn test_set_and_read_flag() {
        let mut prefs = in_memory();
        prefs.set_flag(TOUR_SEEN, true);
        assert!(prefs.flag(TOUR_SEEN));
        prefs.set_flag(TOUR_SEEN, false);
        assert!(!prefs.flag(TOUR_SEEN));
    }

    #[test]
    fn test_prefs_file_round_trip() {
        let mut flags = HashMap::new();
        flags.insert(TOUR_SEEN.to_string(), true);
        let json = serde_json::to_string(&PrefsFile { flags }).unwrap();
        let parsed: PrefsFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.flags.get(TOUR_SEEN), Some(&true));
    }

    #[test]
    fn test_prefs_file_tolerates_empty_json() {
        let parsed: PrefsFile = serde_json::from_str("{}").unwrap();
        assert!(parsed.flags.is_empty());
    }

    #[test]
    fn test_mock_store_is_usable() {
        let mut mock = MockPreferencesStore::new();
        mock.expect_flag().return_const(true);
        assert!(mock.flag(TOUR_SEEN));
    }
}
