//! Error types for task store operations.

use taskdeck_core::{InvalidTask, TaskId};
use thiserror::Error;

/// Errors that can occur during [`JsonStore`](crate::JsonStore) operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No document exists for the given task identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A create or update payload failed field validation.
    #[error("invalid task: {0}")]
    Validation(#[from] InvalidTask),

    /// A stored document could not be decoded.
    #[error("corrupt task document {path}: {source}")]
    Corrupt {
        /// Path of the offending document.
        path: String,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// A task could not be encoded for persistence.
    #[error("failed to encode task {0}")]
    Encode(TaskId, #[source] serde_json::Error),

    /// The underlying filesystem is unavailable or misbehaving.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the error should map to a client-facing "not found" status.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
