//! HTTP response types and the wire serializer.

use std::collections::HashMap;
use std::fmt;
use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// HTTP status codes with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    Created = 201,
    BadRequest = 400,
    NotFound = 404,
    InternalServerError = 500,
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Get the numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// A byte source that is copied to the connection instead of buffered.
pub type BodySource = Box<dyn AsyncRead + Send + Unpin>;

/// The body of a response.
pub enum Body {
    /// Bytes held in memory, written verbatim.
    Bytes(Vec<u8>),
    /// A source of exactly `len` bytes, streamed after the header block.
    Stream { source: BodySource, len: u64 },
}

impl Body {
    /// The number of bytes the body will put on the wire.
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::Stream { len, .. } => *len,
        }
    }

    /// True when no body bytes follow the header block.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&String::from_utf8_lossy(bytes)).finish(),
            Body::Stream { len, .. } => f.debug_struct("Stream").field("len", len).finish_non_exhaustive(),
        }
    }
}

/// Represents an HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    /// The protocol version written on the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The response body
    pub body: Body,
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code and an empty body.
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), "wirehttp-rs".to_string());

        Self {
            version: "HTTP/1.1".to_string(),
            status,
            headers,
            body: Body::Bytes(Vec::new()),
        }
    }

    /// Set the response body with a string.
    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    /// Set a streamed body of `len` bytes read from `source`.
    pub fn with_body_stream(mut self, source: impl AsyncRead + Send + Unpin + 'static, len: u64) -> Self {
        self.body = Body::Stream {
            source: Box::new(source),
            len,
        };
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// A `text/plain` response carrying `body`.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_content_type("text/plain")
            .with_body_string(body)
    }

    /// Serialize the status line and header block, blank line included.
    ///
    /// `Content-Length` is always taken from the body, whatever the header map says.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        let status_line = format!(
            "{} {} {}\r\n",
            self.version,
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        bytes.extend_from_slice(status_line.as_bytes());

        let content_length = self.body.len().to_string();
        let mut headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("Content-Length"))
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        headers.push(("Content-Length", &content_length));
        headers.sort_unstable();

        bytes.extend_from_slice(&serialize_headers(headers));

        // Add the empty line that separates headers from body
        bytes.extend_from_slice(b"\r\n");

        bytes
    }

    /// Convert an in-memory response to bytes.
    ///
    /// Returns `None` for a streamed body, which can only be written with
    /// [`HttpResponse::write_to`].
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match &self.body {
            Body::Bytes(body) => {
                let mut bytes = self.head_bytes();
                bytes.extend_from_slice(body);
                Some(bytes)
            }
            Body::Stream { .. } => None,
        }
    }

    /// Write the response onto `writer` and flush it.
    ///
    /// A streamed body is copied straight from its source once the header block
    /// has been flushed. A source that runs dry before its declared length is
    /// reported as [`io::ErrorKind::UnexpectedEof`].
    pub async fn write_to<W: AsyncWrite + Unpin>(self, writer: &mut W) -> io::Result<()> {
        let head = self.head_bytes();

        match self.body {
            Body::Bytes(body) => {
                writer.write_all(&head).await?;
                writer.write_all(&body).await?;
            }
            Body::Stream { source, len } => {
                writer.write_all(&head).await?;
                writer.flush().await?;

                let mut limited = source.take(len);
                let copied = tokio::io::copy(&mut limited, writer).await?;
                if copied != len {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("body source ended after {copied} of {len} bytes"),
                    ));
                }
            }
        }

        writer.flush().await
    }
}

/// Serialize header pairs as `Name: Value\r\n` lines.
pub fn serialize_headers<'a>(headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (name, value) in headers {
        let header_line = format!("{name}: {value}\r\n");
        bytes.extend_from_slice(header_line.as_bytes());
    }
    bytes
}
