//! Seal command
//!
//! Produces envelopes the backend would accept, mostly for fixtures.

use clap::Args;
use serde_json::Value;

use super::read_input;
use crate::crypto::CipherEncoding;
use crate::engine::Engine;
use crate::error::OutreachResult;

/// Arguments for `outreach seal`
#[derive(Args, Debug)]
pub struct SealArgs {
    /// JSON value or plain text to seal (`-` reads standard input)
    pub value: String,

    /// Ciphertext encoding
    #[arg(short, long, default_value = "hex")]
    pub encoding: CipherEncoding,
}

/// Handle the seal command
pub fn handle_seal_command(engine: &Engine, args: SealArgs) -> OutreachResult<()> {
    let input = read_input(&args.value)?;
    let value = serde_json::from_str(&input).unwrap_or(Value::String(input));

    println!("{}", engine.decoder().seal(&value, args.encoding)?);
    Ok(())
}
