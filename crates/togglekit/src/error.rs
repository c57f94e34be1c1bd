//! Client error types using thiserror.

use togglekit_common::InvalidAppName;
use togglekit_store::StoreError;

/// Main error type for the toggle client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Invalid construction input.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid application name.
    #[error("invalid application name: {0}")]
    AppName(#[from] InvalidAppName),

    /// The store gateway failed; the underlying error is surfaced verbatim.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// `initialise` was called on a client that is already running.
    #[error("client is already initialised")]
    AlreadyInitialised,
}

/// Result type for toggle client operations.
pub type ClientResult<T> = Result<T, ClientError>;
