//! Unified error handling for admin.

use thiserror::Error;

use elite_cards_core::StoreError;

use crate::records::RecordsError;

/// Error type for admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Local persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The record service rejected or failed a request.
    #[error("Record service error: {0}")]
    Records(#[from] RecordsError),

    /// Login rejected. The message is shown inline to the operator.
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
