//! Error types for Tessera
//!
//! Assembling SQL never fails; these errors come from the layers around it
//! (configuration parsing and statement execution).

use thiserror::Error;

/// The main error type for Tessera operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid use of a prepared statement
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Row could not be decoded
    #[error("Could not decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

/// Convenience Result type for Tessera operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new decode error for the named column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }
}
