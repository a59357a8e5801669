//! Normalize command

use std::path::PathBuf;

use clap::Args;

use super::{print_json, read_json_file};
use crate::engine::Engine;
use crate::error::OutreachResult;

/// Arguments for `outreach normalize`
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Saved response or record file
    pub file: PathBuf,

    /// Field to decode inside each record (repeatable; defaults to the configured list)
    #[arg(short, long = "field")]
    pub fields: Vec<String>,
}

/// Handle the normalize command
pub fn handle_normalize_command(engine: &Engine, args: NormalizeArgs) -> OutreachResult<()> {
    let page = engine.open_page(read_json_file(&args.file)?);

    let normalized = if args.fields.is_empty() {
        engine.normalize_payload(&page.payload)
    } else {
        engine
            .normalizer()
            .normalize_records(&page.payload, &args.fields)
    };

    print_json(&normalized)
}
