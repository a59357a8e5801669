//! Pagination total command
//!
//! Resolves the display total of a saved list response. A second saved
//! response stands in for the one-row verification request.

use std::path::PathBuf;

use clap::Args;

use super::read_json_file;
use crate::engine::Engine;
use crate::error::{OutreachError, OutreachResult};
use crate::services::{PageQuery, PageResponse, TotalResolver};

/// Arguments for `outreach total`
#[derive(Args, Debug)]
pub struct TotalArgs {
    /// Saved list response
    pub file: PathBuf,

    /// Saved response to the one-row probe request
    #[arg(long)]
    pub probe: Option<PathBuf>,

    /// Page the response was fetched for
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page the response was fetched with
    #[arg(long, default_value = "10")]
    pub limit: u32,

    /// Filter the request carried, as KEY=VALUE (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

/// Handle the total command
pub fn handle_total_command(engine: &Engine, args: TotalArgs) -> OutreachResult<()> {
    let page = engine.open_page(read_json_file(&args.file)?);
    let query = args
        .filters
        .into_iter()
        .fold(PageQuery::new(args.page, args.limit), |query, (key, value)| {
            query.with_filter(key, value)
        });

    let total = match &args.probe {
        Some(path) => {
            let probe = |probe_query: &PageQuery| -> OutreachResult<PageResponse> {
                tracing::debug!(page = probe_query.page, limit = probe_query.limit, "reading probe response");
                Ok(engine.open_page(read_json_file(path)?))
            };
            TotalResolver::with_probe(&probe).resolve_total(&page, &query)
        }
        None => TotalResolver::new().resolve_total(&page, &query),
    };

    println!("{}", total);
    Ok(())
}

fn parse_filter(raw: &str) -> Result<(String, String), OutreachError> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| OutreachError::Validation(format!("Filter must be KEY=VALUE, got '{}'", raw)))
}
