use crate::error::AtatError;
use crate::github::client::IssueTracker;
use crate::github::issues::{GitHubIssue, IssueState};
use crate::todo::TodoItem;
use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::debug;

pub const ISSUES_PER_PAGE: u32 = 100;
/// Guards against a server that never returns an empty page.
pub const MAX_PAGES: u32 = 1000;

/// Builds issues from raw tracker records, silently dropping pull requests and
/// anything malformed.
pub fn parse_github_issues(issues_json: &[serde_json::Value]) -> Vec<GitHubIssue> {
    issues_json
        .iter()
        .filter_map(|issue| {
            if !issue["pull_request"].is_null() {
                return None;
            }

            let number = parse_issue_number(&issue["number"])?;
            let title = issue["title"].as_str()?;
            let state = IssueState::from_api(issue["state"].as_str()?)?;

            Some(GitHubIssue {
                number,
                title: title.to_string(),
                state,
            })
        })
        .collect()
}

/// Accepts integer-valued JSON numbers, including ones written as floats like `12.0`.
fn parse_issue_number(value: &serde_json::Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n < u64::MAX as f64)
            .map(|n| n as u64)
    })
}

/// Fetches every issue of `repo`, following pages until the tracker returns an empty one.
pub async fn fetch_github_issues<T>(tracker: &T, repo: &str) -> Result<Vec<GitHubIssue>>
where
    T: IssueTracker + ?Sized,
{
    let mut all_issues = Vec::new();

    for page in 1..=MAX_PAGES {
        let issues_json = tracker
            .list_issues_page(repo, page, ISSUES_PER_PAGE)
            .await
            .context("failed to fetch issues")?;

        if issues_json.is_empty() {
            debug!(repo, pages = page - 1, issues = all_issues.len(), "fetched issues");
            return Ok(all_issues);
        }

        all_issues.extend(parse_github_issues(&issues_json));
    }

    Err(AtatError::PageLimitExceeded.into())
}

/// Brings the local list up to date with the tracker.
///
/// Items whose issue was closed remotely get checked; open issues not yet represented
/// locally (by number or by trimmed title) are appended in tracker order. Nothing is ever
/// removed, and closed issues that are not in the list stay out of it.
pub fn synchronize_with_github_issues(
    todo_items: &[TodoItem],
    github_issues: &[GitHubIssue],
) -> Vec<TodoItem> {
    let github_issues_map: HashMap<u64, &GitHubIssue> = github_issues
        .iter()
        .map(|issue| (issue.number, issue))
        .collect();

    let updated_items: Vec<TodoItem> = todo_items
        .iter()
        .map(|todo_item| {
            let closed_remotely = todo_item
                .issue_number
                .and_then(|issue_number| github_issues_map.get(&issue_number))
                .is_some_and(|github_issue| github_issue.state == IssueState::Closed);

            TodoItem {
                is_checked: todo_item.is_checked || closed_remotely,
                ..todo_item.clone()
            }
        })
        .collect();

    let new_items: Vec<TodoItem> = github_issues
        .iter()
        .filter(|github_issue| github_issue.state == IssueState::Open)
        .filter(|github_issue| {
            !updated_items.iter().any(|todo_item| {
                todo_item.issue_number == Some(github_issue.number)
                    || trim_title(&todo_item.text) == trim_title(&github_issue.title)
            })
        })
        .map(|github_issue| TodoItem {
            text: github_issue.title.clone(),
            is_checked: false,
            issue_number: Some(github_issue.number),
        })
        .collect();

    updated_items.into_iter().chain(new_items).collect()
}

/// Strips ASCII blanks and line endings only; other Unicode whitespace is part of a title.
fn trim_title(text: &str) -> &str {
    text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r'))
}
