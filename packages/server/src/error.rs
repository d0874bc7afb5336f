//! Server-level errors.

use thiserror::Error;

use crate::domain::StoreError;

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The message store could not be opened or migrated
    #[error("failed to initialize message store: {0}")]
    Store(#[from] StoreError),

    /// Binding or serving the listener failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
