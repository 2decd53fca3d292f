//! Error types for the HTTP parser.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while reading a request off the wire.
///
/// Every variant is fatal to the connection it was raised on.
#[derive(Debug, Error)]
pub enum Error {
    /// The peer closed the connection before sending a request line.
    #[error("Empty request")]
    EmptyRequest,

    /// The request line did not split into exactly three space-separated tokens.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The stream ended in the middle of the request line or header block.
    #[error("Connection closed before the end of the header block")]
    IncompleteHead,

    /// A request or header line ran past the line limit without a `\n`.
    #[error("Line exceeds {0} bytes")]
    LineTooLong(usize),

    /// A request or header line is not valid UTF-8.
    #[error("Line is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    /// The stream ended before the declared body length was read.
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// No body bytes arrived within the configured read deadline.
    #[error("Timed out after {0:?} waiting for the request body")]
    BodyTimeout(Duration),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
