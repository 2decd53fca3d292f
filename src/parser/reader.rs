//! Line-oriented cursor over a connection and the request parser built on it.

use std::collections::HashMap;
use std::time::Duration;

use log::trace;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::request::{parse_header_line, HttpRequest};

const DEFAULT_CAPACITY: usize = 8192;

/// Longest request or header line accepted by default, terminator included.
pub const DEFAULT_MAX_LINE: usize = 8192;

/// Buffered reader that hands out CRLF-terminated lines and fixed-length bodies.
pub struct WireReader<R> {
    inner: BufReader<R>,
    max_line: usize,
}

impl<R: AsyncRead + Unpin> WireReader<R> {
    /// Wrap a byte stream with the default buffer size.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, inner)
    }

    /// Wrap a byte stream with a buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, inner),
            max_line: DEFAULT_MAX_LINE,
        }
    }

    /// Cap the length of a single line at `max_line` bytes, terminator included.
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line;
        self
    }

    /// Read the next line, without its line terminator.
    ///
    /// Returns `Ok(None)` if the stream is already at end-of-stream. A line that
    /// is cut off by end-of-stream before its `\n` is an [`Error::IncompleteHead`],
    /// one that runs past the line limit is an [`Error::LineTooLong`], and one
    /// that is not valid UTF-8 is an [`Error::InvalidEncoding`]. Line bytes are
    /// never rewritten.
    pub async fn read_line(&mut self) -> Result<Option<String>, Error> {
        let mut buf = Vec::new();
        let mut limited = (&mut self.inner).take(self.max_line as u64);
        let n = limited.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        if buf.pop() != Some(b'\n') {
            if n >= self.max_line {
                return Err(Error::LineTooLong(self.max_line));
            }
            return Err(Error::IncompleteHead);
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| Error::InvalidEncoding(String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    /// Read exactly `len` bytes of body.
    ///
    /// When `deadline` is set, the whole read must complete within it.
    pub async fn read_body(&mut self, len: usize, deadline: Option<Duration>) -> Result<Vec<u8>, Error> {
        let mut body = Vec::with_capacity(len.min(DEFAULT_CAPACITY));
        let mut limited = (&mut self.inner).take(len as u64);
        let read = limited.read_to_end(&mut body);

        let received = match deadline {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| Error::BodyTimeout(limit))??,
            None => read.await?,
        };

        if received < len {
            return Err(Error::IncompleteBody {
                expected: len,
                received,
            });
        }
        Ok(body)
    }

    /// Read one complete request: request line, header block and body.
    ///
    /// `body_deadline` bounds the body only. The head has no deadline; each of
    /// its lines is bounded in length instead.
    pub async fn read_request(&mut self, body_deadline: Option<Duration>) -> Result<HttpRequest, Error> {
        let request_line = self.read_line().await?.ok_or(Error::EmptyRequest)?;

        let parts: Vec<&str> = request_line.split(' ').collect();
        let &[method, target, version] = parts.as_slice() else {
            return Err(Error::MalformedRequestLine(request_line.clone()));
        };
        let method = Method::from(method);
        let target = target.to_string();
        let version = version.to_string();
        trace!("request line: {method} {target} {version}");

        let mut headers = HashMap::new();
        loop {
            let line = self.read_line().await?.ok_or(Error::IncompleteHead)?;
            if line.is_empty() {
                break;
            }
            let (name, value) = parse_header_line(&line);
            headers.insert(name, value);
        }

        let request = HttpRequest::new(method, target, version, headers);
        let len = request.content_length().unwrap_or(0);
        let body = self.read_body(len, body_deadline).await?;

        Ok(request.with_body(body))
    }
}

/// Read a single request off `stream`.
///
/// # Arguments
///
/// * `stream` - The connection, positioned at the start of a request
/// * `body_deadline` - Optional bound on the time spent reading the body
///
/// # Returns
///
/// The parsed request, or the reason the connection must be dropped
pub async fn read_request<R: AsyncRead + Unpin>(
    stream: R,
    body_deadline: Option<Duration>,
) -> Result<HttpRequest, Error> {
    WireReader::new(stream).read_request(body_deadline).await
}
