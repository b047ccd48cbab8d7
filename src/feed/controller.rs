// src/feed/controller.rs
// =============================================================================
// The feed controller: owns one FeedState for a (user, repo) pair and turns
// "request page N" calls into page fetches.
//
// Guarantees:
// - requesting a page that is already fetched is a no-op
// - at most one fetch is in flight at a time, and pages are fetched in
//   strictly ascending order (1, 2, 3, ...)
// - once the feed errored or reached the end, nothing is fetched again
// - fetch failures never surface as errors to the caller; they end up in
//   the state as a classified FeedError
//
// Two locks:
// - `state` (std Mutex) is only held for short, synchronous reads/updates
// - `fetch_gate` (tokio Mutex) is held across the fetch, which serializes
//   concurrent request_page calls
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::state::{FeedPhase, FeedState, RequestOutcome};
use crate::github::PageSource;

pub struct FeedController {
    user: String,
    repo: String,
    source: Arc<dyn PageSource>,
    state: Mutex<FeedState>,
    fetch_gate: tokio::sync::Mutex<()>,
}

impl FeedController {
    /// Creates a controller with an empty feed. Nothing is fetched until
    /// the first `request_page` call.
    pub fn new(user: impl Into<String>, repo: impl Into<String>, source: Arc<dyn PageSource>) -> Self {
        Self {
            user: user.into(),
            repo: repo.into(),
            source,
            state: Mutex::new(FeedState::new()),
            fetch_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// A copy of the current state, for rendering.
    pub fn snapshot(&self) -> FeedState {
        self.lock_state().clone()
    }

    pub fn phase(&self) -> FeedPhase {
        self.lock_state().phase()
    }

    pub fn pages_fetched(&self) -> u32 {
        self.lock_state().pages_fetched()
    }

    // Requests that the feed holds at least `requested` pages
    //
    // Note that this fetches the *next* page (pages_fetched + 1), not page
    // `requested` itself. Asking for page 5 on a fresh feed fetches page 1.
    // Calling it twice for the same page, even while the first fetch is
    // still running, results in a single fetch.
    pub async fn request_page(&self, requested: u32) -> RequestOutcome {
        // Cheap early exit that doesn't wait behind an in-flight fetch
        let early = self.lock_state().next_fetch(requested);
        if early.is_none() {
            debug!(requested, "page request already satisfied or feed finished");
            return RequestOutcome::Skipped;
        }

        let _gate = self.fetch_gate.lock().await;

        // Another request may have advanced or finished the feed while we waited
        let next = self.lock_state().next_fetch(requested);
        let Some(page) = next else {
            debug!(requested, "page request satisfied while waiting");
            return RequestOutcome::Skipped;
        };

        debug!(user = %self.user, repo = %self.repo, requested, page, "fetching page");
        let result = self.source.fetch_page(&self.user, &self.repo, page).await;

        let outcome = self.lock_state().apply(requested, page, result);
        match outcome {
            RequestOutcome::Appended(count) => {
                info!(user = %self.user, repo = %self.repo, page, count, "page loaded");
            }
            RequestOutcome::EndReached => {
                info!(user = %self.user, repo = %self.repo, page, "no more commits");
            }
            RequestOutcome::Failed(error) => {
                warn!(user = %self.user, repo = %self.repo, page, ?error, "feed stopped");
            }
            RequestOutcome::Discarded => {
                debug!(page, "stale page result dropped");
            }
            RequestOutcome::Skipped => {}
        }
        outcome
    }

    /// What the "Load more" button does: ask for the page after the last one.
    pub async fn load_more(&self) -> RequestOutcome {
        let next = self.lock_state().pages_fetched() + 1;
        self.request_page(next).await
    }

    // A panic while holding the lock can't leave FeedState half-updated
    // (apply() only mutates after deciding), so a poisoned lock is still usable
    fn lock_state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
