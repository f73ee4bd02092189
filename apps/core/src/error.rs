use std::io;
use std::time::Duration;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unusable configuration (credentials, wordlist). Fatal at startup only.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Broadcast text that does not carry a usable rack or pattern.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The chat provider asked us to back off for `wait` before sending again.
    #[error("Throttled by provider, retry after {}s", .wait.as_secs())]
    Throttled { wait: Duration },

    /// Failure reported by the chat transport (send, fetch, control activation).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(#[from] crate::actors::messages::ActorError),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a throttle error from a provider wait expressed in whole seconds.
    pub fn throttled_secs(seconds: u64) -> Self {
        AppError::Throttled {
            wait: Duration::from_secs(seconds),
        }
    }

    /// Returns the requested wait if this is a throttle condition.
    pub fn throttle_wait(&self) -> Option<Duration> {
        match self {
            AppError::Throttled { wait } => Some(*wait),
            _ => None,
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Extraction(s) => AppError::Extraction(s.clone()),
            AppError::Throttled { wait } => AppError::Throttled { wait: *wait },
            AppError::Transport(s) => AppError::Transport(s.clone()),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Actor(e) => AppError::Actor(e.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Actor(crate::actors::messages::ActorError::Timeout(err.to_string()))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Invalid settings: {}", err))
    }
}
