//! Service layer for the outreach records engine
//!
//! Services sit on top of the envelope decoder, handling per-field
//! normalization of list responses and pagination totals.

pub mod normalizer;
pub mod totals;

pub use normalizer::{Normalized, ValueNormalizer};
pub use totals::{page_rows, PageQuery, PageResponse, TotalProbe, TotalResolver};
