use thiserror::Error;

/// Defines errors surfaced by the sync client and the operations built
/// on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Network failure or non-success response from the backend.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// Request rejected before any network call was made.
    #[error("validation error: {0}")]
    Validation(String),
}

impl SyncError {
    /// Shorthand for a [`SyncError::Transport`] with the given message.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }
}
