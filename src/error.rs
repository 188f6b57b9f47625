// src/error.rs

use thiserror::Error;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// Invalid sampling interval or an unusable repository source
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A persisted store line could not be decoded. `line` is 1-based, 0 when unknown.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The exclusion file could not be put back to its committed state.
    /// The recorder logs this and moves on to the next commit.
    #[error("failed to restore exclusion file: {0}")]
    ExclusionRestore(String),

    #[error("classifier failed: {0}")]
    Classifier(String),

    #[error("no records to plot")]
    EmptyStore,

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl HistoryError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line: 0,
            reason: reason.into(),
        }
    }

    /// Attach a store line number to a malformed record error; other errors pass through.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::MalformedRecord { reason, .. } => Self::MalformedRecord { line, reason },
            other => other,
        }
    }
}
