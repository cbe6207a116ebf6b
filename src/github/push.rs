use crate::github::client::IssueTracker;
use crate::github::issues::{GitHubIssue, IssueState};
use crate::todo::TodoItem;
use anyhow::Result;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubOperation {
    CreateIssue { title: String },
    CloseIssue { number: u64 },
}

/// An operation together with the item that asked for it.
///
/// `index` is the item's position in the list the plan was computed from and is the only
/// key used to route the outcome back, so field-identical items never get confused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub index: usize,
    pub todo: TodoItem,
    pub operation: GitHubOperation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Created { number: u64 },
    Closed { number: u64 },
}

/// Decides what a single item needs on the tracker, if anything.
pub fn classify_todo(todo: &TodoItem, github_issues: &[GitHubIssue]) -> Option<GitHubOperation> {
    match (todo.is_checked, todo.issue_number) {
        (false, None) => Some(GitHubOperation::CreateIssue {
            title: todo.text.clone(),
        }),
        (true, Some(issue_num)) => github_issues
            .iter()
            .find(|issue| issue.number == issue_num)
            .filter(|issue| issue.state == IssueState::Open)
            .map(|_| GitHubOperation::CloseIssue { number: issue_num }),
        _ => None,
    }
}

pub fn calculate_github_operations(
    todo_items: &[TodoItem],
    github_issues: &[GitHubIssue],
) -> Vec<PlannedChange> {
    todo_items
        .iter()
        .enumerate()
        .filter_map(|(index, todo)| {
            classify_todo(todo, github_issues).map(|operation| PlannedChange {
                index,
                todo: todo.clone(),
                operation,
            })
        })
        .collect()
}

/// Runs the planned changes in order and reports each result keyed by item index.
///
/// Execution stops at the first failure so that no further remote side effects happen;
/// the failing result is the last entry of the returned list.
pub async fn execute_github_operations<T>(
    tracker: &T,
    repo: &str,
    planned_changes: &[PlannedChange],
) -> Vec<(usize, Result<OperationOutcome>)>
where
    T: IssueTracker + ?Sized,
{
    let mut results: Vec<(usize, Result<OperationOutcome>)> =
        Vec::with_capacity(planned_changes.len());

    for change in planned_changes {
        let outcome = match &change.operation {
            GitHubOperation::CreateIssue { title } => tracker
                .create_issue(repo, title)
                .await
                .map(|number| OperationOutcome::Created { number }),
            GitHubOperation::CloseIssue { number } => tracker
                .close_issue(repo, *number)
                .await
                .map(|()| OperationOutcome::Closed { number: *number }),
        };

        match &outcome {
            Ok(done) => info!(repo, index = change.index, ?done, "applied change"),
            Err(err) => {
                let applied: Vec<OperationOutcome> = results
                    .iter()
                    .filter_map(|(_, result)| result.as_ref().ok().copied())
                    .collect();
                warn!(
                    repo,
                    index = change.index,
                    error = %err,
                    ?applied,
                    "push aborted, changes already applied remotely are not recorded in TODO.md"
                );
            }
        }

        let failed = outcome.is_err();
        results.push((change.index, outcome));
        if failed {
            break;
        }
    }

    results
}

/// Folds execution results into the item list.
///
/// Results may arrive in any order. A created issue number is written to the item at the
/// result's index, but only when `planned` holds a `CreateIssue` for that index; closes need
/// no change since the item is already checked. If any result is an error, that error is
/// returned and no items are.
pub fn apply_push_results<I>(
    todo_items: &[TodoItem],
    planned: &[PlannedChange],
    results: I,
) -> Result<Vec<TodoItem>>
where
    I: IntoIterator<Item = (usize, Result<OperationOutcome>)>,
{
    let mut updated_items = todo_items.to_vec();

    for (index, result) in results {
        let OperationOutcome::Created { number } = result? else {
            continue;
        };
        let planned_create = planned.iter().any(|change| {
            change.index == index
                && matches!(change.operation, GitHubOperation::CreateIssue { .. })
        });
        if !planned_create {
            warn!(index, number, "ignoring created issue with no planned create");
            continue;
        }
        if let Some(item) = updated_items.get_mut(index) {
            item.issue_number = Some(number);
        }
    }

    Ok(updated_items)
}
