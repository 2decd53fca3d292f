//! HTTP request representation.

use std::collections::HashMap;

use crate::parser::method::Method;

/// Represents an HTTP request.
///
/// A request is built once by the parser and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request-target, exactly as received
    pub target: String,
    /// The protocol version token (e.g. `HTTP/1.1`)
    pub version: String,
    /// The HTTP headers, names in the case they were received
    pub headers: HashMap<String, String>,
    /// The request body, exactly `Content-Length` bytes long
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `target` - The request-target
    /// * `version` - The protocol version token
    /// * `headers` - The HTTP headers
    ///
    /// # Returns
    ///
    /// A new HTTP request with an empty body
    pub fn new(
        method: Method,
        target: impl Into<String>,
        version: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            target: target.into(),
            version: version.into(),
            headers,
            body: Vec::new(),
        }
    }

    /// Replace the body of the request.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value.
    ///
    /// # Arguments
    ///
    /// * `name` - The header name
    ///
    /// # Returns
    ///
    /// The header value, if it exists
    pub fn get_header(&self, name: &str) -> Option<&String> {
        // Headers are case-insensitive, so we need to do a case-insensitive lookup
        self.headers.get(name).or_else(|| {
            self.headers
                .iter()
                .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v))
        })
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// The declared body length.
    ///
    /// Returns `None` when the `Content-Length` header is absent or is not a
    /// non-negative integer. Surrounding whitespace is not tolerated.
    pub fn content_length(&self) -> Option<usize> {
        self.get_header("Content-Length")
            .and_then(|value| value.parse::<usize>().ok())
    }
}

/// Split a single header line into a name and a value.
///
/// A line with exactly one `": "` separator yields `(name, value)`. Any other
/// line is kept whole as the name with an empty value, so no input is lost.
pub fn parse_header_line(line: &str) -> (String, String) {
    let mut parts = line.split(": ");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) => (name.to_string(), value.to_string()),
        _ => (line.to_string(), String::new()),
    }
}
