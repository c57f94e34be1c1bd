//! Store gateway error types using thiserror.

/// Errors returned by a store gateway.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or the connection failed mid-request.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a protocol-level error (e.g. key not found).
    #[error("store error {code}: {message}")]
    Store {
        /// Store error code (etcd `errorCode`, or the HTTP status when the
        /// body carried no store error).
        code: u64,
        /// Human-readable message from the store.
        message: String,
        /// Offending key or other context, when the store supplied one.
        cause: Option<String>,
    },

    /// A store response body could not be decoded.
    #[error("malformed store response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A configured endpoint was not a valid URL.
    #[error("invalid store endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// No store endpoints were configured.
    #[error("no store endpoints configured")]
    NoEndpoints,
}

/// Result type for store gateway operations.
pub type StoreResult<T> = Result<T, StoreError>;
