// src/github/parse.rs
// =============================================================================
// This module turns one raw commit object from the GitHub API into the
// display-ready CommitRecord the rest of the app works with.
//
// The API shape we care about looks like:
//   { "commit": { "author": { "name": ..., "date": ... }, "message": ... },
//     "sha": ..., "login": ..., "url": ... }
// Every field may be missing or null, so every field is an Option here.
//
// Parsing never fails: a missing field becomes a default value
// ("unknown" author, "empty" message, "missing" date).
// =============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Shown when neither the commit author name nor the login is available.
pub const UNKNOWN_AUTHOR: &str = "unknown";
/// Shown when the commit message is missing or empty.
pub const EMPTY_MESSAGE: &str = "empty";
/// Sentinel stored in `CommitRecord::date` when the API gave no date.
pub const MISSING_DATE: &str = "missing";

// Raw API record, exactly as GitHub sends it (minus the fields we ignore)
//
// Every field goes through `lenient`: a value of the wrong JSON type only
// blanks that one field, the rest of the record still comes through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommit {
    #[serde(default, deserialize_with = "lenient")]
    pub commit: Option<RawCommitDetail>,
    #[serde(default, deserialize_with = "lenient")]
    pub sha: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

// The nested "commit" object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommitDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<RawAuthor>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
}

// Reads any JSON value and keeps it only if it has the expected shape
//
// null, a missing key, and a wrong-typed value all end up as None.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<T>>(value).ok().flatten())
}

impl RawCommit {
    /// Reads one element of the API response.
    ///
    /// Elements that are not objects are treated as an empty record so the
    /// defaults kick in. Inside an object, fields fail one at a time.
    pub fn from_value(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(error = %e, "malformed commit record, using defaults");
                RawCommit::default()
            }
        }
    }
}

// One parsed commit, ready for display
//
// Immutable once built; the feed state owns these in fetch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub author: String,
    pub message: String,
    /// ISO-8601 date as sent by the API, or MISSING_DATE
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CommitRecord {
    /// Link to the commit page on github.com, if we know enough to build one.
    pub fn commit_link(&self) -> Option<String> {
        let user = self.user.as_deref().filter(|s| !s.is_empty())?;
        let repo = self.repo.as_deref().filter(|s| !s.is_empty())?;
        let sha = self.sha.as_deref().filter(|s| !s.is_empty())?;
        Some(format!("https://github.com/{}/{}/commit/{}", user, repo, sha))
    }
}

// Parses one raw API record into a CommitRecord
//
// Parameters:
//   user, repo: the repository the record was fetched from
//   raw: the raw record (any field may be absent)
//
// Fallback chains:
//   author  = commit.author.name -> login -> "unknown"
//   message = commit.message -> "empty"
//   date    = commit.author.date -> "missing"
// Empty strings count as absent.
pub fn parse_commit(user: &str, repo: &str, raw: RawCommit) -> CommitRecord {
    let RawCommit {
        commit,
        sha,
        login,
        url,
    } = raw;

    let owner = non_empty(Some(user.to_string()));
    let repo = non_empty(Some(repo.to_string()));

    let Some(detail) = commit else {
        return CommitRecord {
            author: UNKNOWN_AUTHOR.to_string(),
            message: EMPTY_MESSAGE.to_string(),
            date: MISSING_DATE.to_string(),
            user: owner,
            repo,
            sha,
            url,
        };
    };

    let (name, date) = match detail.author {
        Some(author) => (author.name, author.date),
        None => (None, None),
    };

    CommitRecord {
        author: non_empty(name)
            .or_else(|| non_empty(login))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        message: non_empty(detail.message).unwrap_or_else(|| EMPTY_MESSAGE.to_string()),
        date: non_empty(date).unwrap_or_else(|| MISSING_DATE.to_string()),
        user: owner,
        repo,
        sha,
        url,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> CommitRecord {
        parse_commit("a", "b", RawCommit::from_value(value))
    }

    #[test]
    fn test_missing_commit_uses_defaults() {
        let record = parse(json!({}));
        assert_eq!(record.author, "unknown");
        assert_eq!(record.message, "empty");
        assert_eq!(record.date, "missing");
    }

    #[test]
    fn test_missing_commit_passes_identity_through() {
        let record = parse(json!({ "sha": "abc", "url": "https://api.github.com/x" }));
        assert_eq!(record.sha.as_deref(), Some("abc"));
        assert_eq!(record.url.as_deref(), Some("https://api.github.com/x"));
        assert_eq!(record.user.as_deref(), Some("a"));
        assert_eq!(record.repo.as_deref(), Some("b"));
    }

    #[test]
    fn test_author_name() {
        let record = parse(json!({ "commit": { "author": { "name": "Alice" } } }));
        assert_eq!(record.author, "Alice");
    }

    #[test]
    fn test_author_falls_back_to_login() {
        let record = parse(json!({ "commit": {}, "login": "alice123" }));
        assert_eq!(record.author, "alice123");

        let record = parse(json!({ "commit": { "author": { "name": "" } }, "login": "alice123" }));
        assert_eq!(record.author, "alice123");
    }

    #[test]
    fn test_author_unknown_when_login_empty() {
        let record = parse(json!({ "commit": { "author": { "name": "" } }, "login": "" }));
        assert_eq!(record.author, "unknown");
    }

    #[test]
    fn test_message() {
        assert_eq!(parse(json!({ "commit": { "message": "abc" } })).message, "abc");
        assert_eq!(parse(json!({ "commit": { "message": "" } })).message, "empty");
        assert_eq!(parse(json!({ "commit": { "message": null } })).message, "empty");
    }

    #[test]
    fn test_date() {
        let record = parse(json!({ "commit": { "author": { "date": "2022-03-03T12:00:00Z" } } }));
        assert_eq!(record.date, "2022-03-03T12:00:00Z");

        let record = parse(json!({ "commit": { "author": { "date": "" } } }));
        assert_eq!(record.date, "missing");
    }

    #[test]
    fn test_full_record() {
        let record = parse(json!({
            "commit": {
                "author": { "name": "Alice", "date": "2023-01-10T12:00:00Z" },
                "message": "some message"
            },
            "sha": "abc"
        }));
        assert_eq!(
            record,
            CommitRecord {
                author: "Alice".to_string(),
                message: "some message".to_string(),
                date: "2023-01-10T12:00:00Z".to_string(),
                user: Some("a".to_string()),
                repo: Some("b".to_string()),
                sha: Some("abc".to_string()),
                url: None,
            }
        );
        assert_eq!(
            record.commit_link().as_deref(),
            Some("https://github.com/a/b/commit/abc")
        );
    }

    #[test]
    fn test_non_object_element_uses_defaults() {
        for value in [json!(null), json!(42), json!("text"), json!(["a"])] {
            let record = parse(value);
            assert_eq!(record.author, "unknown");
            assert_eq!(record.message, "empty");
            assert_eq!(record.date, "missing");
        }
    }

    #[test]
    fn test_wrong_typed_field_keeps_the_rest() {
        let record = parse(json!({
            "commit": {
                "author": { "name": "Alice", "date": "2023-01-10T12:00:00Z" },
                "message": "some message"
            },
            "sha": "abc",
            "login": 42
        }));
        assert_eq!(record.author, "Alice");
        assert_eq!(record.message, "some message");
        assert_eq!(record.date, "2023-01-10T12:00:00Z");
        assert_eq!(record.sha.as_deref(), Some("abc"));
    }

    #[test]
    fn test_wrong_typed_nested_fields_fall_back_one_by_one() {
        let record = parse(json!({
            "commit": {
                "author": { "name": 7, "date": "2022-03-03T12:00:00Z" },
                "message": ["not", "text"]
            },
            "sha": false,
            "login": "alice123"
        }));
        assert_eq!(record.author, "alice123");
        assert_eq!(record.message, "empty");
        assert_eq!(record.date, "2022-03-03T12:00:00Z");
        assert_eq!(record.sha, None);

        // A "commit" that isn't an object counts as no commit detail at all
        let record = parse(json!({ "commit": "oops", "sha": "abc", "login": "alice123" }));
        assert_eq!(record.author, "unknown");
        assert_eq!(record.message, "empty");
        assert_eq!(record.date, "missing");
        assert_eq!(record.sha.as_deref(), Some("abc"));
    }

    #[test]
    fn test_commit_link_needs_sha() {
        let record = parse(json!({ "commit": { "message": "x" } }));
        assert_eq!(record.commit_link(), None);
    }
}
