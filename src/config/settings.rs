//! User settings for finsight
//!
//! Holds the local profile, display preferences and the default log level.

use serde::{Deserialize, Serialize};

use super::paths::FinsightPaths;
use crate::error::FinsightError;
use crate::models::UserId;

/// User settings for finsight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// The local profile every row is scoped to; created by `init`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of smart insights shown at once
    #[serde(default = "default_insight_limit")]
    pub insight_limit: usize,

    /// Whether initial setup has been completed
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_insight_limit() -> usize {
    crate::analytics::policy::MAX_INSIGHTS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: None,
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
            insight_limit: default_insight_limit(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FinsightPaths) -> Result<Self, FinsightError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FinsightError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinsightError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinsightPaths) -> Result<(), FinsightError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FinsightError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            FinsightError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// The local profile, or a config error telling the user to run `init`
    pub fn require_user(&self) -> Result<UserId, FinsightError> {
        self.user_id.ok_or_else(|| {
            FinsightError::Config("No profile found. Run 'finsight init' first.".into())
        })
    }

    /// Get or create the local profile; returns true when a new one was made
    pub fn ensure_user(&mut self) -> (UserId, bool) {
        match self.user_id {
            Some(id) => (id, false),
            None => {
                let id = UserId::new();
                self.user_id = Some(id);
                (id, true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.insight_limit, 3);
        assert!(settings.user_id.is_none());
        assert!(settings.require_user().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinsightPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        let (user, created) = settings.ensure_user();
        assert!(created);
        settings.log_level = "debug".to_string();
        settings.save(&paths).unwrap();

        let mut loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.user_id, Some(user));
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.ensure_user(), (user, false));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{\"currency_symbol\": \"EUR \"}").unwrap();
        assert_eq!(settings.currency_symbol, "EUR ");
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.insight_limit, 3);
    }
}
