use crate::cli::parser::{self, Command};
use crate::config;
use crate::error::AtatError;
use crate::github::client::{GitHubClient, IssueTracker};
use crate::github::{pull, push};
use crate::markdown_parser;
use crate::output;
use crate::storage::{ConfigStorage, LocalConfigStorage};
use crate::todo::TodoItem;
use anyhow::{Context, Result};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

const TODO_FILENAME: &str = "TODO.md";

const HELP_TEXT: &str = "\
gh-atat: Automatic TODO and Tracker

Usage:
  gh atat <command> [arguments]

Commands:
  push          Push TODO items to GitHub Issues
  pull          Pull GitHub Issues to TODO items
  remote        List configured repositories
  remote add    Add a repository
  remote remove Remove a repository
  help          Show this help message

Examples:
  gh atat push
  gh atat pull
  gh atat remote
  gh atat remote add owner/repo
  gh atat remote remove owner/repo";

/// Runs the command in `args` against the current directory and the GitHub API.
pub async fn run(args: Vec<String>, stdout_additional: Option<&mut dyn Write>) -> Result<()> {
    let project_dir =
        std::env::current_dir().context("Failed to determine the current directory")?;
    let client = GitHubClient::from_env().context("Failed to create HTTP client")?;
    run_in(&project_dir, &client, &args, stdout_additional).await
}

/// Command dispatch with the project directory and tracker supplied by the caller.
pub async fn run_in<T>(
    project_dir: &Path,
    tracker: &T,
    args: &[String],
    mut stdout_additional: Option<&mut dyn Write>,
) -> Result<()>
where
    T: IssueTracker + ?Sized,
{
    let command = parser::parse_args(args);
    debug!(?command, project_dir = %project_dir.display(), "dispatching");

    match command {
        Command::Push => run_push(project_dir, tracker, &mut stdout_additional).await,
        Command::Pull => run_pull(project_dir, tracker).await,
        Command::RemoteList => run_remote_list(project_dir, &mut stdout_additional),
        Command::RemoteAdd { repo } => run_remote_add(project_dir, tracker, &repo).await,
        Command::RemoteRemove { repo } => run_remote_remove(project_dir, &repo),
        Command::Login => Err(AtatError::UnsupportedCommand(
            "login command is not needed for gh extension. Authentication is handled by gh CLI",
        )
        .into()),
        Command::Whoami => Err(AtatError::UnsupportedCommand(
            "whoami command is not needed for gh extension. Use 'gh auth status' instead",
        )
        .into()),
        Command::Help => {
            output::println(HELP_TEXT, &mut stdout_additional)?;
            Ok(())
        }
        Command::Unknown(message) => Err(AtatError::InvalidCommand(message).into()),
    }
}

async fn run_push<T>(
    project_dir: &Path,
    tracker: &T,
    stdout_additional: &mut Option<&mut dyn Write>,
) -> Result<()>
where
    T: IssueTracker + ?Sized,
{
    let repo = configured_repository(project_dir)?;
    let todo_items = read_todo_items(project_dir)?;

    let github_issues = pull::fetch_github_issues(tracker, &repo).await?;
    let planned = push::calculate_github_operations(&todo_items, &github_issues);
    info!(repo, changes = planned.len(), "pushing TODO.md");

    let results = push::execute_github_operations(tracker, &repo, &planned).await;
    for (index, result) in &results {
        let Ok(outcome) = result else { continue };
        let message = match outcome {
            push::OperationOutcome::Created { number } => {
                format!("Created issue #{number}: {}", todo_items[*index].text)
            }
            push::OperationOutcome::Closed { number } => format!("Closed issue #{number}"),
        };
        output::println(&message, stdout_additional)?;
    }

    let updated_items = push::apply_push_results(&todo_items, &planned, results)?;
    write_todo_items(project_dir, &updated_items)
}

async fn run_pull<T>(project_dir: &Path, tracker: &T) -> Result<()>
where
    T: IssueTracker + ?Sized,
{
    let repo = configured_repository(project_dir)?;
    let todo_items = read_todo_items(project_dir)?;

    let github_issues = pull::fetch_github_issues(tracker, &repo).await?;
    info!(repo, issues = github_issues.len(), "pulling into TODO.md");

    let updated_items = pull::synchronize_with_github_issues(&todo_items, &github_issues);
    write_todo_items(project_dir, &updated_items)
}

fn run_remote_list(
    project_dir: &Path,
    stdout_additional: &mut Option<&mut dyn Write>,
) -> Result<()> {
    let config = load_config(project_dir)?;
    for repo in config::repositories(&config) {
        output::println(&repo, stdout_additional)?;
    }
    Ok(())
}

async fn run_remote_add<T>(project_dir: &Path, tracker: &T, repo: &str) -> Result<()>
where
    T: IssueTracker + ?Sized,
{
    let storage = LocalConfigStorage::new(project_dir);
    let current = storage.load().context("Error loading project config")?;
    if config::contains_repository(&current, repo) {
        debug!(repo, "repository already configured");
        return Ok(());
    }

    let exists = tracker
        .repository_exists(repo)
        .await
        .with_context(|| format!("failed to check repository {repo}"))?;
    if !exists {
        return Err(AtatError::RepositoryNotFound(repo.to_string()).into());
    }

    let updated = config::with_repository_added(&current, repo);
    storage
        .save(&updated)
        .context("Error saving project config")?;
    info!(repo, "repository added");
    Ok(())
}

fn run_remote_remove(project_dir: &Path, repo: &str) -> Result<()> {
    let storage = LocalConfigStorage::new(project_dir);
    let current = storage.load().context("Error loading project config")?;
    let updated = config::with_repository_removed(&current, repo);
    storage
        .save(&updated)
        .context("Error saving project config")?;
    info!(repo, "repository removed");
    Ok(())
}

fn load_config(project_dir: &Path) -> Result<config::Config> {
    LocalConfigStorage::new(project_dir)
        .load()
        .context("Error loading project config")
}

fn configured_repository(project_dir: &Path) -> Result<String> {
    let config = load_config(project_dir)?;
    Ok(config::first_repository(&config)?)
}

fn read_todo_items(project_dir: &Path) -> Result<Vec<TodoItem>> {
    let path = project_dir.join(TODO_FILENAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AtatError::TodoFileNotFound.into());
        }
        Err(err) => return Err(err).context("Failed to read TODO.md"),
    };
    Ok(markdown_parser::parse_todo_markdown(&content))
}

fn write_todo_items(project_dir: &Path, items: &[TodoItem]) -> Result<()> {
    let content = markdown_parser::serialize_todo_markdown(items);
    std::fs::write(project_dir.join(TODO_FILENAME), content).context("Failed to write TODO.md")
}
