//! Unified error taxonomy for the back office.
//!
//! Every core operation returns [`Result`]. Validation problems are raised before any
//! write reaches the store, and entities outside the caller's visible properties are
//! reported as [`Error::NotFound`] so their existence is never confirmed.

use thiserror::Error;

/// Application error type shared by the core and the HTTP layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is missing or a value is invalid.
    #[error("{message}")]
    BadRequest {
        /// Human readable reason
        message: String,
    },

    /// The entity does not exist or is not visible to the caller.
    #[error("{message}")]
    NotFound {
        /// Human readable reason
        message: String,
    },

    /// The caller's role may not perform this action.
    #[error("{message}")]
    Forbidden {
        /// Human readable reason
        message: String,
    },

    /// Missing, malformed or expired credentials.
    #[error("{message}")]
    Unauthorized {
        /// Human readable reason
        message: String,
    },

    /// A concurrent write changed the row between check and update.
    #[error("{message}")]
    Conflict {
        /// Human readable reason
        message: String,
    },

    /// Invalid or missing configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable reason
        message: String,
    },

    /// Unexpected state that is not the caller's fault.
    #[error("Internal error: {message}")]
    Internal {
        /// Human readable reason
        message: String,
    },

    /// Store failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (socket binding, config files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds an [`Error::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Builds an [`Error::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Builds an [`Error::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Builds an [`Error::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Builds an [`Error::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Builds an [`Error::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
