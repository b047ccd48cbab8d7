// src/feed/mod.rs
// =============================================================================
// The commit feed: accumulated state plus the controller that grows it one
// page at a time.
//
// Submodules:
// - state: FeedState and the compare-and-update step applied after a fetch
// - controller: FeedController, the only thing that mutates a FeedState
// =============================================================================

mod controller;
mod state;

pub use controller::FeedController;
pub use state::{FeedError, FeedPhase, FeedState, RequestOutcome};
