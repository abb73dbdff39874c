//! Error types for roster
//!
//! One error enum per component. Decode and transport errors are always fatal
//! to the session that raised them; directory errors are returned to the caller.

use crate::types::SessionId;
use thiserror::Error;

/// Failure to decode an inbound protocol frame
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Message '{message}' does not have expected prefix '{prefix}'")]
    MissingPrefix {
        message: String,
        prefix: &'static str,
    },

    #[error("Message '{0}' does not end with ']'")]
    Unterminated(String),

    #[error("Content of message '{message}' has incompatible pair '{segment}'")]
    MalformedPair { message: String, segment: String },

    #[error("Message '{message}' contains multiple key-value pairs with the same key '{key}'")]
    DuplicateKey { message: String, key: String },

    #[error("Message '{message}' does not provide '{key}'")]
    MissingKey {
        message: String,
        key: &'static str,
    },
}

/// Directory errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Agent with id {0} is already registered")]
    DuplicateId(SessionId),

    #[error("No agent with id {0} found")]
    NotFound(SessionId),
}

/// Connection-level I/O errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection is already closed")]
    Closed,
}

/// Top-level errors raised while bootstrapping the server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
