//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// The configuration file could not be decoded.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),
}
