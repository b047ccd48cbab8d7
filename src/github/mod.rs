// src/github/mod.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// - parse: turns raw API commit objects into CommitRecords (with defaults)
// - fetch: requests one page of commits and classifies failures
// =============================================================================

mod fetch;
mod parse;

pub use fetch::{FetchError, GithubFetcher, PageSource};
pub use parse::{CommitRecord, MISSING_DATE};
