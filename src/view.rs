// src/view.rs
// =============================================================================
// Renders a FeedState for the terminal.
//
// What gets shown depends only on the state:
// - error NotFound  -> "404 - Page not found."
// - error Unknown   -> "Unknown error occurred"
// - nothing fetched -> nothing at all
// - otherwise       -> heading, one row per commit, and "Load more" while
//                      more pages may exist
//
// An error replaces the whole feed; commits loaded before the error are not
// shown next to it.
// =============================================================================

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::feed::{FeedError, FeedState};
use crate::github::{CommitRecord, MISSING_DATE};

pub const NOT_FOUND_TEXT: &str = "404 - Page not found.";
pub const UNKNOWN_ERROR_TEXT: &str = "Unknown error occurred";
pub const LOAD_MORE_TEXT: &str = "Load more";

// Column widths for the commit table
const DATE_WIDTH: usize = 34;
const MESSAGE_WIDTH: usize = 60;

// Formats a commit date like "January 10th, 2023 at 12:00 PM" (UTC)
//
// The "missing" sentinel and anything that isn't RFC 3339 are returned as-is.
pub fn format_date(date: &str) -> String {
    if date == MISSING_DATE {
        return date.to_string();
    }
    match DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => {
            let utc = parsed.with_timezone(&Utc);
            format!(
                "{} {}{}, {} at {}",
                utc.format("%B"),
                utc.day(),
                ordinal_suffix(utc.day()),
                utc.year(),
                utc.format("%-I:%M %p")
            )
        }
        Err(_) => date.to_string(),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

// First line of the message, cut to fit the table column
fn message_summary(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default();
    if first_line.chars().count() > MESSAGE_WIDTH - 3 {
        let cut: String = first_line.chars().take(MESSAGE_WIDTH - 6).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

fn render_row(commit: &CommitRecord, out: &mut String) {
    out.push_str(&format!(
        "{:<dw$} {:<mw$} {}\n",
        format_date(&commit.date),
        message_summary(&commit.message),
        commit.author,
        dw = DATE_WIDTH,
        mw = MESSAGE_WIDTH
    ));
    if let Some(link) = commit.commit_link() {
        out.push_str(&format!("{:<dw$} {}\n", "", link, dw = DATE_WIDTH));
    }
}

/// Renders the feed for `user/repo` as plain text.
pub fn render_feed(user: &str, repo: &str, state: &FeedState) -> String {
    match state.error() {
        Some(FeedError::NotFound) => return format!("{}\n", NOT_FOUND_TEXT),
        Some(FeedError::Unknown) => return format!("{}\n", UNKNOWN_ERROR_TEXT),
        None => {}
    }

    // Still waiting on the first page
    if state.pages_fetched() == 0 {
        return String::new();
    }

    let mut out = format!("Showing results for {}/{}\n\n", user, repo);
    out.push_str(&format!(
        "{:<dw$} {:<mw$} {}\n",
        "DATE",
        "MESSAGE",
        "AUTHOR",
        dw = DATE_WIDTH,
        mw = MESSAGE_WIDTH
    ));
    out.push_str(&"=".repeat(DATE_WIDTH + MESSAGE_WIDTH + 20));
    out.push('\n');

    for commit in state.commits() {
        render_row(commit, &mut out);
    }

    if state.can_load_more() {
        out.push('\n');
        out.push_str(LOAD_MORE_TEXT);
        out.push('\n');
    }

    out
}

// What --json prints
#[derive(Serialize)]
struct FeedReport<'a> {
    user: &'a str,
    repo: &'a str,
    load_more: bool,
    #[serde(flatten)]
    state: &'a FeedState,
}

pub fn render_json(user: &str, repo: &str, state: &FeedState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&FeedReport {
        user,
        repo,
        load_more: state.can_load_more(),
        state,
    })
}
