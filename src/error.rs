use thiserror::Error;

/// Conditions reported to the user by name rather than as a wrapped I/O or HTTP failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtatError {
    #[error("TODO.md file not found")]
    TodoFileNotFound,

    #[error("no repository configured")]
    NoRepositoryConfigured,

    #[error("invalid repository configuration")]
    InvalidRepositoryConfiguration,

    #[error("exceeded maximum page limit")]
    PageLimitExceeded,

    #[error("repository {0} not found or not accessible")]
    RepositoryNotFound(String),

    #[error("no GitHub token found. Run `gh auth login` or set GH_TOKEN")]
    MissingToken,

    #[error("{0}")]
    UnsupportedCommand(&'static str),

    #[error("{0}")]
    InvalidCommand(String),
}
