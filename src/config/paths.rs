//! Path management for the outreach records engine
//!
//! Provides XDG-compliant path resolution for configuration.
//!
//! ## Path Resolution Order
//!
//! 1. `OUTREACH_CONFIG_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/outreach-records` or `~/.config/outreach-records`
//! 3. Windows: `%APPDATA%\outreach-records`

use std::path::PathBuf;

use crate::error::OutreachError;

/// Manages all paths used by the engine
#[derive(Debug, Clone)]
pub struct OutreachPaths {
    /// Base directory for all configuration
    base_dir: PathBuf,
}

impl OutreachPaths {
    /// Create a new OutreachPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, OutreachError> {
        let base_dir = if let Ok(custom) = std::env::var("OUTREACH_CONFIG_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create OutreachPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/outreach-records/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), OutreachError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            OutreachError::Io(format!("Failed to create config directory: {}", e))
        })
    }

    /// Check if settings have been written (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default config directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, OutreachError> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("outreach-records"));
    }

    let home = std::env::var("HOME").map_err(|_| {
        OutreachError::Config("Could not determine HOME directory".into())
    })?;
    Ok(PathBuf::from(home).join(".config").join("outreach-records"))
}

/// Resolve the default config directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, OutreachError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| OutreachError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("outreach-records"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutreachPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var("OUTREACH_CONFIG_DIR", custom_path);

        let paths = OutreachPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var("OUTREACH_CONFIG_DIR");
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutreachPaths::with_base_dir(temp_dir.path().join("nested"));

        assert!(!paths.is_initialized());
        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
    }
}
