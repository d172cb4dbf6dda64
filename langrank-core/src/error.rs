//! Error types for langrank core.

use std::{error::Error, fmt, io};

/// Error type for langrank core operations.
#[derive(Debug)]
pub enum LangRankError {
    /// Malformed input such as a negative byte count or a non-finite score.
    InvalidInput(String),
    /// An underlying I/O error.
    Io(io::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl LangRankError {
    /// Build an `InvalidInput` error from any message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl fmt::Display for LangRankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for LangRankError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LangRankError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LangRankError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidInput(format!("json: {value}"))
    }
}

/// Convenience result type for langrank core.
pub type Result<T> = std::result::Result<T, LangRankError>;
