//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the engine.

pub mod audit;
pub mod decode;
pub mod normalize;
pub mod seal;
pub mod total;

pub use audit::{handle_audit_command, AuditArgs, AuditFormat};
pub use decode::{handle_decode_command, DecodeArgs};
pub use normalize::{handle_normalize_command, NormalizeArgs};
pub use seal::{handle_seal_command, SealArgs};
pub use total::{handle_total_command, TotalArgs};

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::{OutreachError, OutreachResult};

/// Read a command argument, or standard input when it is `-`
pub fn read_input(arg: &str) -> OutreachResult<String> {
    if arg != "-" {
        return Ok(arg.trim().to_string());
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| OutreachError::Io(format!("Failed to read standard input: {}", e)))?;
    Ok(buffer.trim().to_string())
}

/// Read and parse a JSON file
pub fn read_json_file(path: &Path) -> OutreachResult<Value> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        OutreachError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        OutreachError::Validation(format!("{} is not valid JSON: {}", path.display(), e))
    })
}

/// Prompt for the shared secret (hidden input)
pub fn prompt_secret() -> OutreachResult<String> {
    rpassword::prompt_password("Shared secret: ")
        .map_err(|e| OutreachError::Encryption(format!("Failed to read shared secret: {}", e)))
}

/// Print a JSON value, pretty-printed
pub(crate) fn print_json(value: &Value) -> OutreachResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
