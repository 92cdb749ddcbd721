//! Error types for fileshare-core

use thiserror::Error;

use crate::auth::AuthError;
use crate::storage::StorageError;

/// Result type alias using fileshare-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fileshare-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Auth collaborator error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Storage collaborator error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Identity cannot be mapped to a storage folder
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Operation requires a signed-in session
    #[error("Sign in is required for this action.")]
    NotSignedIn,

    /// The backend rejected the session; local state has been cleared
    #[error("Session expired, please sign in again: {0}")]
    SessionExpired(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
