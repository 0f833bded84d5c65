use std::io;
use thiserror::Error;

/// Enum for orchestration errors.
///
/// Transport implementations are expected to map their protocol status
/// codes onto these variants; the core never retries, it surfaces the
/// remote's verdict as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The path does not exist remotely
    #[error("no such path: {0}")]
    NotFound(String),
    /// Create or rename target collision
    #[error("already exists: {0}")]
    AlreadyExists(String),
    /// Directory removal blocked by contents
    #[error("directory not empty: {0}")]
    NotEmpty(String),
    /// Empty name, malformed path and friends
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Link or session level failure, potentially transient
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Transport(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
