//! Argument records and formatting helpers shared by the GitHub tools.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::github::StateFilter;
use crate::types::RepoSlug;

/// Page size used when the caller does not pass `count`.
pub const DEFAULT_COUNT: u64 = 10;

fn default_count() -> u64 {
    DEFAULT_COUNT
}

/// Arguments for the issue and pull request listings.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListingArgs {
    /// Repository in `owner/name` form, e.g. `rust-lang/rust`.
    pub repo: RepoSlug,
    /// Filter by state (default: open).
    #[serde(default)]
    pub status: StateFilter,
    /// Number of results to return (default: 10). GitHub returns at most 100.
    #[serde(default = "default_count")]
    #[schemars(range(min = 1))]
    pub count: u64,
}

/// Arguments for tools that take only a repository.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RepoArgs {
    /// Repository in `owner/name` form, e.g. `rust-lang/rust`.
    pub repo: RepoSlug,
}

/// Calendar date in US locale order, e.g. `3/7/2024`.
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y").to_string()
}
