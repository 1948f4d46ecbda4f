//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query must contain text or an attachment")]
    EmptyQuery,

    #[error("Turn count must be between {min} and {max}, got {actual}")]
    InvalidTurnCount { min: u8, max: u8, actual: u8 },

    #[error("Unknown discussion mode: {0}")]
    UnknownMode(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
