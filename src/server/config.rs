//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parser::DEFAULT_MAX_LINE;
use crate::server::error::Error;

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// Longest request or header line accepted, terminator included.
    pub max_line_length: usize,
    /// Directory that `/files/{name}` reads from and writes to.
    pub base_dir: PathBuf,
    /// Bound on the time spent reading a request body, in milliseconds.
    pub body_read_timeout_ms: Option<u64>,
}

impl ServerConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// The body read deadline, if one is configured.
    pub fn body_read_timeout(&self) -> Option<Duration> {
        self.body_read_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 4221)),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_line_length: DEFAULT_MAX_LINE,
            base_dir: PathBuf::from("."),
            body_read_timeout_ms: Some(5000),
        }
    }
}
