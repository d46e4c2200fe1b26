//! Store error types.

use thiserror::Error;

/// Errors returned by expiring store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or a transaction failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The key was never written or its TTL has elapsed.
    ///
    /// The two cases are deliberately indistinguishable.
    #[error("key not found or expired")]
    NotFoundOrExpired,

    /// The value could not be serialized before writing.
    #[error("failed to serialize value: {0}")]
    Serialize(String),

    /// A payload was present but could not be decoded into the requested type.
    #[error("failed to deserialize value: {0}")]
    Deserialize(String),

    /// The store configuration is invalid.
    #[error("store configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Checks if this error means "no usable value under that key".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFoundOrExpired)
    }

    /// Checks if this error came from the backend rather than the data.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Configuration(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
