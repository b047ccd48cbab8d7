// src/github/fetch.rs
// =============================================================================
// This module fetches one page of commits from the GitHub REST API.
//
// Strategy:
// - Build GET {api-base}/repos/{user}/{repo}/commits?page={n}
// - Send the configured credential as a bearer token (if there is one)
// - Map a 404 to NotFound and every other failure to Unknown
// - Run each element of the JSON array through the commit parser
//
// One call = one request. There are no retries here; the feed controller
// decides which page to ask for next and what to do when a fetch fails.
//
// The PageSource trait is the seam between the controller and the network,
// so the controller can be tested against scripted pages.
// =============================================================================

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::parse::{parse_commit, CommitRecord, RawCommit};
use crate::config::FeedConfig;

/// Why a page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Empty user/repo, or the API answered 404
    #[error("repository not found")]
    NotFound,
    /// Any other status, transport failure, or unreadable body
    #[error("failed to fetch commits: {reason}")]
    Unknown { reason: String },
}

impl FetchError {
    fn unknown(reason: impl Into<String>) -> Self {
        FetchError::Unknown {
            reason: reason.into(),
        }
    }
}

/// Something that can produce one page of commits for a repository.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// `page` starts at 1. An empty Vec means there is no more data.
    async fn fetch_page(
        &self,
        user: &str,
        repo: &str,
        page: u32,
    ) -> Result<Vec<CommitRecord>, FetchError>;
}

// The real PageSource, backed by reqwest
pub struct GithubFetcher {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GithubFetcher {
    pub fn new(config: &FeedConfig) -> Result<Self, reqwest::Error> {
        // One client for the whole feed so connections get reused
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            token: config.token.clone(),
        })
    }

    // Builds the commits endpoint for one page
    //
    // Going through path_segments_mut() percent-encodes user/repo, so a
    // name containing '/' or '?' can't escape its path segment.
    fn commits_url(&self, user: &str, repo: &str, page: u32) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::unknown(format!("API base cannot take a path: {}", self.api_base)))?
            .pop_if_empty()
            .extend(["repos", user, repo, "commits"]);
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

#[async_trait]
impl PageSource for GithubFetcher {
    async fn fetch_page(
        &self,
        user: &str,
        repo: &str,
        page: u32,
    ) -> Result<Vec<CommitRecord>, FetchError> {
        // No repository identity means there is nothing to look up
        if user.is_empty() || repo.is_empty() {
            return Err(FetchError::NotFound);
        }

        let url = self.commits_url(user, repo, page)?;
        debug!(%url, page, "fetching commits page");

        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(user, repo, page, error = %e, "commits request failed");
            FetchError::unknown(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(user, repo, page, "repository not found");
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            warn!(user, repo, page, status = status.as_u16(), "unexpected status");
            return Err(FetchError::unknown(format!("HTTP {}", status.as_u16())));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            warn!(user, repo, page, error = %e, "unreadable commits body");
            FetchError::unknown(e.to_string())
        })?;

        let serde_json::Value::Array(items) = body else {
            return Err(FetchError::unknown("response body is not a JSON array"));
        };

        let commits: Vec<CommitRecord> = items
            .into_iter()
            .map(|item| parse_commit(user, repo, RawCommit::from_value(item)))
            .collect();

        debug!(user, repo, page, count = commits.len(), "commits page fetched");
        Ok(commits)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a trait for the fetcher?
//    - The feed controller only needs "give me page N"
//    - Holding an Arc<dyn PageSource> lets tests hand it scripted pages
//    - #[async_trait] is needed because the controller stores it as a trait
//      object, and async fns in dyn traits need boxing
//
// 2. Why serde_json::Value first and RawCommit second?
//    - A single odd element (null, wrong field type) shouldn't sink the page
//    - Each element is deserialized on its own and falls back to defaults
//
// 3. Why bearer_auth?
//    - It sets "Authorization: Bearer <token>", which GitHub accepts for
//      both classic and fine-grained tokens
// -----------------------------------------------------------------------------
