use std::io;

use kdbtree::KdbError;
use thiserror::Error;

/// Errors raised while loading records or running queries.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A malformed input line; `line` is 1-based.
    #[error("{source_name}:{line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Index error: {0}")]
    Index(#[from] KdbError),
}

impl RunnerError {
    pub(crate) fn parse(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        RunnerError::Parse {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }
}

pub type RunnerResult<T> = Result<T, RunnerError>;
