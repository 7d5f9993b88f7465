//! TOML-based preference store.
//!
//! Holds the process-wide flags:
//! - Onboarding completion
//! - Notification permission
//! - Mini-game bests (high score, fastest reaction)
//!
//! Preferences are stored at `~/.config/bizplanner/prefs.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::PrefsError;

/// Process-wide preferences.
///
/// Serialized to/from TOML at `~/.config/bizplanner/prefs.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default)]
    pub has_onboarded: bool,
    #[serde(default)]
    pub notifications_enabled: bool,
    /// Best mini-game score seen so far.
    #[serde(default)]
    pub best_game_score: u32,
    /// Fastest recorded target reaction, in milliseconds.
    #[serde(default = "default_best_reaction_ms")]
    pub best_reaction_ms: u64,
}

fn default_best_reaction_ms() -> u64 {
    999_000
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            has_onboarded: false,
            notifications_enabled: false,
            best_game_score: 0,
            best_reaction_ms: default_best_reaction_ms(),
        }
    }
}

impl Prefs {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("prefs.toml"))
    }

    /// Load from disk or write and return the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// defaults cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path (used by tests).
    ///
    /// # Errors
    /// Same contract as [`Prefs::load`].
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let prefs: Prefs = toml::from_str(&content).map_err(|e| PrefsError::ParseFailed(e.to_string()))?;
                Ok(prefs)
            }
            Err(_) => {
                let prefs = Self::default();
                prefs.save_to(path)?;
                Ok(prefs)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the preferences cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path (used by tests).
    ///
    /// # Errors
    /// Same contract as [`Prefs::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from disk, falling back to defaults on any error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("failed to load preferences, using defaults: {e}");
            Self::default()
        })
    }

    /// Get a preference value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "has_onboarded" => Some(self.has_onboarded.to_string()),
            "notifications_enabled" => Some(self.notifications_enabled.to_string()),
            "best_game_score" => Some(self.best_game_score.to_string()),
            "best_reaction_ms" => Some(self.best_reaction_ms.to_string()),
            _ => None,
        }
    }

    /// Set a preference by key from its string form.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        let invalid = |message: String| PrefsError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "has_onboarded" => {
                self.has_onboarded = value.parse().map_err(|_| invalid("expected true/false".into()))?;
            }
            "notifications_enabled" => {
                self.notifications_enabled =
                    value.parse().map_err(|_| invalid("expected true/false".into()))?;
            }
            "best_game_score" => {
                self.best_game_score = value.parse().map_err(|_| invalid("expected an integer".into()))?;
            }
            "best_reaction_ms" => {
                self.best_reaction_ms = value.parse().map_err(|_| invalid("expected an integer".into()))?;
            }
            _ => return Err(PrefsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Restore every preference to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_prefs_round_trip() {
        let prefs = Prefs::default();
        let toml_str = toml::to_string_pretty(&prefs).unwrap();
        let parsed: Prefs = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, prefs);
        assert!(!parsed.has_onboarded);
        assert_eq!(parsed.best_reaction_ms, 999_000);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        let prefs = Prefs::load_from(&path).unwrap();
        assert_eq!(prefs, Prefs::default());
        assert!(path.exists());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let mut prefs = Prefs::default();
        prefs.has_onboarded = true;
        prefs.notifications_enabled = true;
        prefs.best_game_score = 87;
        prefs.save_to(&path).unwrap();

        let reloaded = Prefs::load_from(&path).unwrap();
        assert_eq!(reloaded, prefs);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "has_onboarded = \"not a bool").unwrap();
        assert!(Prefs::load_from(&path).is_err());
    }

    #[test]
    fn get_and_set_by_key() {
        let mut prefs = Prefs::default();
        assert_eq!(prefs.get("has_onboarded").as_deref(), Some("false"));
        assert!(prefs.get("nope").is_none());

        prefs.set("notifications_enabled", "true").unwrap();
        assert!(prefs.notifications_enabled);

        prefs.set("best_game_score", "12").unwrap();
        assert_eq!(prefs.best_game_score, 12);

        assert!(prefs.set("notifications_enabled", "maybe").is_err());
        assert!(prefs.set("unknown_key", "1").is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut prefs = Prefs {
            has_onboarded: true,
            notifications_enabled: true,
            best_game_score: 5,
            best_reaction_ms: 321,
        };
        prefs.reset();
        assert_eq!(prefs, Prefs::default());
    }
}
