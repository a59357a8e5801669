//! Decode command

use clap::Args;

use super::{print_json, read_input};
use crate::engine::Engine;
use crate::error::OutreachResult;

/// Arguments for `outreach decode`
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Envelope to decode (`-` reads standard input)
    pub envelope: String,

    /// Print the input unchanged instead of failing when it does not decode
    #[arg(long)]
    pub lenient: bool,
}

/// Handle the decode command
pub fn handle_decode_command(engine: &Engine, args: DecodeArgs) -> OutreachResult<()> {
    let input = read_input(&args.envelope)?;

    match engine.decoder().decode(&input) {
        Ok(value) => print_json(&value),
        Err(e) if args.lenient => {
            tracing::debug!(error = %e, "input did not decode; printing it unchanged");
            println!("{}", input);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
