//! HTTP parser module.
//!
//! This module turns the raw byte stream of a connection into an [`HttpRequest`]:
//! a request line, a header block terminated by an empty line, and exactly
//! `Content-Length` bytes of body.

mod request;
mod method;
mod reader;
mod error;
mod tests;

// Re-export public items
pub use request::{HttpRequest, parse_header_line};
pub use method::Method;
pub use reader::{DEFAULT_MAX_LINE, WireReader, read_request};
pub use error::Error;
