// src/main.rs
// =============================================================================
// This is the entry point of the commit feed CLI.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Build the API configuration and the (user, repo) route
// 3. Create a feed controller and request the first page
// 4. Load more pages (fixed count, all, or interactively) and print the feed
// 5. Exit with proper code (0 = ok, 1 = feed ended in an error, 2 = internal error)
// =============================================================================

mod cli;        // src/cli.rs - command-line parsing
mod config;     // src/config.rs - API base URL and credential
mod feed;       // src/feed/ - feed state and controller
mod github;     // src/github/ - commit parsing and page fetching
mod logging;    // src/logging.rs - tracing setup
mod route;      // src/route.rs - /{user}/{repo} paths
mod view;       // src/view.rs - text and JSON rendering

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use cli::{Cli, Commands, DisplayArgs};
use config::FeedConfig;
use feed::{FeedController, FeedPhase};
use github::GithubFetcher;
use route::Route;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = FeedConfig::new(&cli.api_base, cli.token.clone())?;
    debug!(?config, "configuration loaded");

    let (route, display) = match cli.command {
        Commands::Feed { path, display } => (Route::parse(&path), display),
        Commands::Open { user, repo, display } => (Route::from_form(&user, &repo), display),
    };

    show_feed(&config, route, &display).await
}

// Opens a feed for one route and drives it until the user is done
//
// A fresh controller per route: navigating somewhere else means a new
// controller with an empty state, never reusing an errored one.
async fn show_feed(config: &FeedConfig, route: Route, display: &DisplayArgs) -> Result<i32> {
    info!(%route, complete = route.is_complete(), "opening feed");

    let fetcher = GithubFetcher::new(config).context("Failed to create HTTP client")?;
    let controller = FeedController::new(route.user, route.repo, Arc::new(fetcher));

    // Equivalent of the view mounting: always ask for page 1 first
    controller.request_page(1).await;

    if display.interactive {
        run_interactive(&controller, display.json).await?;
    } else {
        let target = if display.all { u32::MAX } else { display.pages };
        load_pages(&controller, target).await;
        print_feed(&controller, display.json)?;
    }

    Ok(exit_code(controller.phase()))
}

// Keeps pressing "load more" until `target` pages are in, or the feed stops
async fn load_pages(controller: &FeedController, target: u32) {
    while controller.phase() == FeedPhase::Loaded {
        let fetched = controller.pages_fetched();
        if fetched >= target {
            break;
        }
        controller.request_page(fetched + 1).await;
    }
}

// Prints the feed, then waits for Enter to load another page
async fn run_interactive(controller: &FeedController, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_feed(controller, json)?;

        if !controller.snapshot().can_load_more() {
            return Ok(());
        }

        // Prompt on stderr so stdout only ever holds the feed
        eprint!("Press Enter to load more, q to quit: ");
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            return Ok(());
        };

        match line.trim() {
            "" | "m" | "more" => {
                controller.load_more().await;
            }
            "q" | "quit" => return Ok(()),
            other => eprintln!("Unknown input '{}'", other),
        }
    }
}

fn print_feed(controller: &FeedController, json: bool) -> Result<()> {
    let state = controller.snapshot();
    if json {
        let output = view::render_json(controller.user(), controller.repo(), &state)?;
        println!("{}", output);
    } else {
        print!("{}", view::render_feed(controller.user(), controller.repo(), &state));
        std::io::stdout().flush()?;
    }
    Ok(())
}

fn exit_code(phase: FeedPhase) -> i32 {
    match phase {
        FeedPhase::Errored(_) => 1,
        FeedPhase::Empty | FeedPhase::Loaded | FeedPhase::EndReached => 0,
    }
}
