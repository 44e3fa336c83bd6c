// Error types for the task store

use thiserror::Error;

/// Reasons a task text is rejected by `add` and `commit_edit`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a task")]
    Empty,

    #[error("Task is too long ({len} characters, max {max})")]
    TooLong { len: usize, max: usize },
}

/// Failures of the persistence adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn read(key: &str, reason: impl std::fmt::Display) -> Self {
        StorageError::Read {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(key: &str, reason: impl std::fmt::Display) -> Self {
        StorageError::Write {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors surfaced by `TaskStore` operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown filter: {0} (expected all, pending or completed)")]
    UnknownFilter(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid task data: {0}")]
    Format(String),
}
