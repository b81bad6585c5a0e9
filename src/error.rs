//! Error types for pr-autoupdate

use thiserror::Error;

/// Status code GitHub returns when the token lacks rights on the target repo
pub const STATUS_FORBIDDEN: u16 = 403;

/// Status code GitHub's merge endpoint returns for a merge conflict
pub const STATUS_CONFLICT: u16 = 409;

/// Message GitHub attaches to a conflicting merge
const CONFLICT_MESSAGE: &str = "Merge conflict";

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// API call answered with a non-success status
    #[error("GitHub API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },

    /// GitHub API failure without a status code
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Event payload could not be interpreted
    #[error("invalid event payload: {0}")]
    Event(String),

    /// Event name is not one we handle
    #[error("Unknown event type: {0}")]
    UnknownEvent(String),

    /// Octocrab client error
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Raw HTTP client error
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status associated with this error, whichever client produced it
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Octocrab(octocrab::Error::GitHub { source, .. }) => {
                Some(source.status_code.as_u16())
            }
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the remote refused the operation for lack of rights
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(STATUS_FORBIDDEN)
    }

    /// Whether the remote reported a merge conflict
    pub fn is_conflict(&self) -> bool {
        if self.status() == Some(STATUS_CONFLICT) {
            return true;
        }
        match self {
            Self::Api { message, .. } | Self::GitHubApi(message) => message == CONFLICT_MESSAGE,
            _ => false,
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
