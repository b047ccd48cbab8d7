// src/config.rs
// =============================================================================
// Process-wide settings for talking to the GitHub API.
//
// These are read once at startup (from CLI flags, which fall back to
// environment variables) and then handed to the page fetcher explicitly.
// Nothing deeper in the app reads the environment.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use url::Url;

/// Default REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Clone)]
pub struct FeedConfig {
    /// API root, e.g. https://api.github.com
    pub api_base: Url,
    /// Opaque bearer credential; requests go out unauthenticated without it
    pub token: Option<String>,
    /// GitHub rejects requests that carry no User-Agent
    pub user_agent: String,
}

impl FeedConfig {
    // Builds and validates the configuration
    //
    // Fails if the base is not an absolute http(s) URL that can take
    // path segments (so "mailto:x" or "api.github.com" are rejected).
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self> {
        let api_base = Url::parse(api_base)
            .with_context(|| format!("Invalid API base URL '{}'", api_base))?;

        if !matches!(api_base.scheme(), "http" | "https") || api_base.cannot_be_a_base() {
            return Err(anyhow!("API base must be an http(s) URL: {}", api_base));
        }

        // An empty token is the same as no token
        let token = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        Ok(Self {
            api_base,
            token,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        })
    }
}

// Hand-written so the credential never ends up in logs
impl std::fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedConfig")
            .field("api_base", &self.api_base.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base() {
        let config = FeedConfig::new(DEFAULT_API_BASE, None).unwrap();
        assert_eq!(config.api_base.as_str(), "https://api.github.com/");
        assert!(config.token.is_none());
        assert!(config.user_agent.starts_with("commit-feed/"));
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(FeedConfig::new("api.github.com", None).is_err());
        assert!(FeedConfig::new("mailto:someone@example.com", None).is_err());
        assert!(FeedConfig::new("ftp://example.com", None).is_err());
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = FeedConfig::new(DEFAULT_API_BASE, Some("  ".to_string())).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let config = FeedConfig::new(DEFAULT_API_BASE, Some("secret".to_string())).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
