// src/logging.rs
// =============================================================================
// Sets up tracing output.
//
// Logs go to stderr so stdout only carries the feed itself (important for
// --json). RUST_LOG, when set, wins over the -v flags.
// =============================================================================

use tracing_subscriber::EnvFilter;

// Maps the number of -v flags to a log level
//   0 -> warn, 1 -> info, 2 -> debug, 3+ -> trace
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init_logging(verbosity: u8) {
    let level = level_for(verbosity);
    let default = format!("{level},commit_feed={level},reqwest=warn,hyper=warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
