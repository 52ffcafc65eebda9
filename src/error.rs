use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UrsError {
    /// A required environment variable was not set.
    #[error("missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    /// Reddit rejected the configured credentials.
    #[error("invalid API credentials: {0}")]
    InvalidCredentials(String),

    /// The command line passed `clap` but makes no sense for the tool.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A request to Reddit failed.
    #[error("reddit error while {context}: {message}")]
    Reddit { context: String, message: String },

    /// Reddit answered with a not-found or forbidden status: the object is
    /// missing, banned, private or quarantined.
    #[error("reddit answered {status} while {context}")]
    Unavailable { context: String, status: u16 },

    /// Every subreddit or redditor requested was rejected by Reddit.
    #[error("no valid {kind} to scrape (rejected: {})", .rejected.join(", "))]
    NothingToScrape { kind: &'static str, rejected: Vec<String> },

    #[error("no scrapes directory exists for {0}")]
    MissingDateDirectory(PathBuf),

    #[error("the user cancelled the scrape")]
    Cancelled,

    #[error("could not render {path}: {message}")]
    Render { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl UrsError {
    /// Wraps any client error with a description of the failed request.
    pub fn reddit<E: std::error::Error>(context: impl Into<String>, err: E) -> Self {
        Self::Reddit {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Whether Reddit refused to show the object, as opposed to the request failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, UrsError>;
