//! Configuration module for the outreach records engine
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence
//! - Shared secret resolution

pub mod paths;
pub mod settings;

pub use paths::OutreachPaths;
pub use settings::Settings;

use crate::crypto::SharedSecret;
use crate::error::OutreachResult;

/// Environment variable holding the shared secret
pub const SECRET_ENV_VAR: &str = "OUTREACH_SHARED_SECRET";

/// Pick the shared secret from an explicit value or the settings file
///
/// Returns `Ok(None)` when neither source provides one.
pub fn resolve_secret(
    explicit: Option<String>,
    settings: &Settings,
) -> OutreachResult<Option<SharedSecret>> {
    explicit
        .or_else(|| settings.shared_secret.clone())
        .filter(|secret| !secret.is_empty())
        .map(SharedSecret::new)
        .transpose()
}
