//! Structured error types for store operations.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Bad input on add
    Validation,

    // Unknown task id
    NotFound,

    // Informational no-op
    AlreadyCompleted,

    // File unreadable or unwritable
    Storage,
}

/// Errors returned by [`crate::store::TaskStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("task with ID {0} not found")]
    NotFound(u32),

    #[error("task {0} is already completed")]
    AlreadyCompleted(u32),

    #[error("failed to load tasks from {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// The in-memory change was applied but could not be written to disk.
    #[error("change kept in memory but NOT saved to {}: {reason}", .path.display())]
    Save { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn save(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::Save {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Validation { .. } => ErrorCode::Validation,
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::AlreadyCompleted(_) => ErrorCode::AlreadyCompleted,
            StoreError::Load { .. } | StoreError::Save { .. } => ErrorCode::Storage,
        }
    }

    /// True when the on-disk file is known to be behind the in-memory state.
    pub fn is_data_loss_risk(&self) -> bool {
        matches!(self, StoreError::Save { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
