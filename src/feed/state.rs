// src/feed/state.rs
// =============================================================================
// The feed's single state value and the one step that changes it.
//
// FeedState only grows:
// - commits are appended in fetch order
// - pages_fetched counts completed page fetches (an empty last page counts)
// - end_reached flips to true once, on the first empty page
// - error is set once, and after that nothing changes
//
// apply() is the compare-and-update step. It is evaluated against the state
// as it is when a fetch completes, not as it was when the fetch started.
// =============================================================================

use serde::Serialize;

use crate::github::{CommitRecord, FetchError};

/// Classified failure stored in the feed once a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedError {
    NotFound,
    Unknown,
}

impl From<&FetchError> for FeedError {
    fn from(error: &FetchError) -> Self {
        match error {
            FetchError::NotFound => FeedError::NotFound,
            FetchError::Unknown { .. } => FeedError::Unknown,
        }
    }
}

/// Coarse view of where the feed is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// Nothing fetched yet
    Empty,
    /// At least one page fetched, more may follow
    Loaded,
    /// The last fetch came back empty
    EndReached,
    Errored(FeedError),
}

/// What a single page request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Guard said no: page already fetched, end reached, or feed errored
    Skipped,
    /// A non-empty page was appended
    Appended(usize),
    /// An empty page arrived and the feed is now complete
    EndReached,
    /// The fetch failed and the feed is now errored
    Failed(FeedError),
    /// The fetch finished but the state had moved on, so the result was dropped
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedState {
    commits: Vec<CommitRecord>,
    pages_fetched: u32,
    end_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FeedError>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn end_reached(&self) -> bool {
        self.end_reached
    }

    pub fn error(&self) -> Option<FeedError> {
        self.error
    }

    pub fn phase(&self) -> FeedPhase {
        if let Some(error) = self.error {
            FeedPhase::Errored(error)
        } else if self.end_reached {
            FeedPhase::EndReached
        } else if self.pages_fetched == 0 {
            FeedPhase::Empty
        } else {
            FeedPhase::Loaded
        }
    }

    /// True when a "load more" action would do something useful.
    pub fn can_load_more(&self) -> bool {
        self.pages_fetched > 0 && self.error.is_none() && !self.end_reached
    }

    // The page to fetch for a request of "at least up to `requested`"
    //
    // Always the next sequential page, whatever `requested` is. None when
    // the request is already satisfied or the feed is terminal.
    pub fn next_fetch(&self, requested: u32) -> Option<u32> {
        if requested <= self.pages_fetched || self.error.is_some() || self.end_reached {
            None
        } else {
            Some(self.pages_fetched + 1)
        }
    }

    // Folds the result of fetching `fetched_page` into the state
    //
    // The guard is re-checked first: if another request already advanced or
    // terminated the feed, the result is dropped untouched.
    pub fn apply(
        &mut self,
        requested: u32,
        fetched_page: u32,
        result: Result<Vec<CommitRecord>, FetchError>,
    ) -> RequestOutcome {
        if self.next_fetch(requested) != Some(fetched_page) {
            return RequestOutcome::Discarded;
        }

        match result {
            Ok(commits) if commits.is_empty() => {
                self.pages_fetched += 1;
                self.end_reached = true;
                RequestOutcome::EndReached
            }
            Ok(commits) => {
                let count = commits.len();
                self.commits.extend(commits);
                self.pages_fetched += 1;
                RequestOutcome::Appended(count)
            }
            Err(e) => {
                let error = FeedError::from(&e);
                self.error = Some(error);
                RequestOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commit(author: &str) -> CommitRecord {
        CommitRecord {
            author: author.to_string(),
            message: "msg".to_string(),
            date: "2023-01-10T12:00:00Z".to_string(),
            user: Some("a".to_string()),
            repo: Some("b".to_string()),
            sha: Some("abc".to_string()),
            url: None,
        }
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = FeedState::new();
        assert_eq!(state.phase(), FeedPhase::Empty);
        assert!(!state.can_load_more());
        assert_eq!(state.next_fetch(1), Some(1));
        assert_eq!(state.next_fetch(0), None);
    }

    #[test]
    fn test_next_fetch_is_always_sequential() {
        let state = FeedState::new();
        // Asking for page 5 on an empty feed still fetches page 1
        assert_eq!(state.next_fetch(5), Some(1));
    }

    #[test]
    fn test_apply_non_empty_page() {
        let mut state = FeedState::new();
        let outcome = state.apply(1, 1, Ok(vec![commit("Alice"), commit("Bob")]));

        assert_eq!(outcome, RequestOutcome::Appended(2));
        assert_eq!(state.pages_fetched(), 1);
        assert_eq!(state.commits().len(), 2);
        assert_eq!(state.phase(), FeedPhase::Loaded);
        assert!(state.can_load_more());
    }

    #[test]
    fn test_apply_empty_page_reaches_end() {
        let mut state = FeedState::new();
        state.apply(1, 1, Ok(vec![commit("Alice")]));
        let outcome = state.apply(2, 2, Ok(vec![]));

        assert_eq!(outcome, RequestOutcome::EndReached);
        assert_eq!(state.pages_fetched(), 2);
        assert!(state.end_reached());
        assert_eq!(state.commits(), &[commit("Alice")]);
        assert_eq!(state.phase(), FeedPhase::EndReached);
        assert!(!state.can_load_more());
        assert_eq!(state.next_fetch(3), None);
    }

    #[test]
    fn test_apply_failure_does_not_count_page() {
        let mut state = FeedState::new();
        let outcome = state.apply(1, 1, Err(FetchError::NotFound));

        assert_eq!(outcome, RequestOutcome::Failed(FeedError::NotFound));
        assert_eq!(state.pages_fetched(), 0);
        assert_eq!(state.error(), Some(FeedError::NotFound));
        assert_eq!(state.phase(), FeedPhase::Errored(FeedError::NotFound));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut state = FeedState::new();
        state.apply(1, 1, Ok(vec![commit("Alice")]));

        // A second fetch of page 1 finishing late must not append again
        let outcome = state.apply(1, 1, Ok(vec![commit("Alice")]));
        assert_eq!(outcome, RequestOutcome::Discarded);
        assert_eq!(state.commits().len(), 1);

        // Nor may a result for a page that isn't next
        let outcome = state.apply(5, 3, Ok(vec![commit("Carol")]));
        assert_eq!(outcome, RequestOutcome::Discarded);
        assert_eq!(state.pages_fetched(), 1);
    }

    #[test]
    fn test_nothing_changes_after_error() {
        let mut state = FeedState::new();
        state.apply(1, 1, Ok(vec![commit("Alice")]));
        state.apply(2, 2, Err(FetchError::Unknown { reason: "boom".to_string() }));
        let before = state.clone();

        assert_eq!(state.next_fetch(3), None);
        assert_eq!(state.apply(3, 2, Ok(vec![commit("Bob")])), RequestOutcome::Discarded);
        assert_eq!(state.apply(3, 2, Ok(vec![])), RequestOutcome::Discarded);
        assert_eq!(state.apply(3, 2, Err(FetchError::NotFound)), RequestOutcome::Discarded);
        assert_eq!(state, before);
        assert_eq!(state.error(), Some(FeedError::Unknown));
    }

    #[test]
    fn test_serializes_error_kebab_case() {
        let mut state = FeedState::new();
        state.apply(1, 1, Err(FetchError::NotFound));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["error"], "not-found");
        assert_eq!(json["pages_fetched"], 0);
        assert_eq!(json["end_reached"], false);

        let json = serde_json::to_value(FeedState::new()).unwrap();
        assert!(json.get("error").is_none());
    }
}
