// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two ways to open a feed:
// - `feed <PATH>` takes a navigation path like "/rust-lang/rust"
// - `open <USER> <REPO>` is the form version: both values are required
//
// API settings are global flags with environment fallbacks, so a token can
// live in GITHUB_API_TOKEN instead of shell history.
// =============================================================================

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_API_BASE;

#[derive(Parser, Debug)]
#[command(
    name = "commit-feed",
    version,
    about = "Browse the commit history of a GitHub repository, one page at a time",
    long_about = "commit-feed fetches commits from the GitHub REST API page by page. \
                  Load a fixed number of pages, everything, or step through pages interactively."
)]
pub struct Cli {
    /// Base URL of the GitHub REST API
    #[arg(long, global = true, env = "COMMIT_FEED_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// API token sent as a bearer credential
    #[arg(long, global = true, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the feed for a navigation path
    ///
    /// Example: commit-feed feed /rust-lang/rust --pages 2
    Feed {
        /// Path of the form /{user}/{repo}
        path: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show the feed for a user/organization and repository
    ///
    /// Example: commit-feed open tokio-rs tokio --interactive
    Open {
        /// User or organization that owns the repository
        #[arg(value_parser = non_blank)]
        user: String,

        /// Repository name
        #[arg(value_parser = non_blank)]
        repo: String,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

// Flags shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct DisplayArgs {
    /// Print the feed state as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Number of pages to load
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "all")]
    pub pages: u32,

    /// Keep loading pages until the end of the history
    #[arg(long)]
    pub all: bool,

    /// After the first page, press Enter to load more (q to quit)
    #[arg(short, long, conflicts_with_all = ["all", "pages"])]
    pub interactive: bool,
}

// The navigation form marks both inputs as required, so blank is rejected
fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}
