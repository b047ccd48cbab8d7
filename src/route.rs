// src/route.rs
// =============================================================================
// Turns a navigation path like "/rust-lang/rust" into the (user, repo) pair
// a feed is created for.
//
// A missing segment is an empty string, not an error: the page fetcher
// answers an empty user or repo with NotFound, which the feed then shows as
// its 404 view.
// =============================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub user: String,
    pub repo: String,
}

impl Route {
    // Parses "/{user}/{repo}"
    //
    // Leading/trailing slashes and empty segments are ignored, anything after
    // the repo segment is dropped.
    //
    // Examples:
    //   "/rust-lang/rust"  -> ("rust-lang", "rust")
    //   "rust-lang/rust/"  -> ("rust-lang", "rust")
    //   "/rust-lang"       -> ("rust-lang", "")
    pub fn parse(path: &str) -> Self {
        let mut segments = path.split('/').map(str::trim).filter(|s| !s.is_empty());
        let user = segments.next().unwrap_or_default().to_string();
        let repo = segments.next().unwrap_or_default().to_string();
        Self { user, repo }
    }

    /// Route for the user/repo typed into the navigation form.
    pub fn from_form(user: &str, repo: &str) -> Self {
        Self::parse(&format!("{}/{}", user.trim(), repo.trim()))
    }

    pub fn is_complete(&self) -> bool {
        !self.user.is_empty() && !self.repo.is_empty()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.user, self.repo)
    }
}
