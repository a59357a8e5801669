//! User settings for the outreach records engine
//!
//! Holds the shared secret (when not supplied by the environment), display
//! preferences for timestamps and the diff equality mode.

use serde::{Deserialize, Serialize};

use super::paths::OutreachPaths;
use crate::audit::{AuditSummarizer, EqualityMode};
use crate::crypto::SharedSecret;
use crate::display::{PreviewFormatter, TimestampStyle, DEFAULT_TIMESTAMP_FORMAT};
use crate::engine::Engine;
use crate::error::OutreachError;

/// Settings for the outreach records engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Shared secret used to decode envelopes
    ///
    /// The `OUTREACH_SHARED_SECRET` environment variable takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,

    /// strftime pattern for localized timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Fixed UTC offset for timestamps; local time when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,

    /// How field values are compared when diffing updates
    #[serde(default)]
    pub diff_equality: EqualityMode,

    /// Record fields the backend encrypts individually
    #[serde(default = "default_encrypted_fields")]
    pub encrypted_fields: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_encrypted_fields() -> Vec<String> {
    [
        "first_name",
        "last_name",
        "middle_name",
        "name",
        "username",
        "email",
        "contact_number",
        "address",
    ]
    .iter()
    .map(|field| field.to_string())
    .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            shared_secret: None,
            timestamp_format: default_timestamp_format(),
            utc_offset_minutes: None,
            diff_equality: EqualityMode::default(),
            encrypted_fields: default_encrypted_fields(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &OutreachPaths) -> Result<Self, OutreachError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                OutreachError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                OutreachError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &OutreachPaths) -> Result<(), OutreachError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            OutreachError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            OutreachError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Timestamp style described by these settings
    pub fn timestamp_style(&self) -> Result<TimestampStyle, OutreachError> {
        TimestampStyle::new(self.timestamp_format.clone(), self.utc_offset_minutes)
    }

    /// Audit summarizer configured by these settings
    pub fn summarizer(&self) -> Result<AuditSummarizer, OutreachError> {
        Ok(AuditSummarizer::new(
            PreviewFormatter::new(self.timestamp_style()?),
            self.diff_equality,
        ))
    }

    /// Engine decoding with `secret` and configured by these settings
    pub fn engine(&self, secret: SharedSecret) -> Result<Engine, OutreachError> {
        Engine::new(secret, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.shared_secret.is_none());
        assert_eq!(settings.diff_equality, EqualityMode::Textual);
        assert_eq!(settings.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(settings.encrypted_fields.iter().any(|f| f == "first_name"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutreachPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.diff_equality = EqualityMode::Typed;
        settings.utc_offset_minutes = Some(480);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.diff_equality, EqualityMode::Typed);
        assert_eq!(loaded.utc_offset_minutes, Some(480));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"diff_equality": "typed"}"#).unwrap();
        assert_eq!(settings.diff_equality, EqualityMode::Typed);
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.encrypted_fields, default_encrypted_fields());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutreachPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, OutreachError::Config(_)));
    }

    #[test]
    fn test_invalid_timestamp_format_rejected() {
        let settings = Settings {
            timestamp_format: "%Q".into(),
            ..Settings::default()
        };
        assert!(settings.summarizer().is_err());
    }
}
