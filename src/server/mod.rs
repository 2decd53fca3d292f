//! HTTP server implementation for wirehttp-rs.
//!
//! Connections are accepted on a tokio listener and each one is handled on its
//! own task: one request is parsed, routed, answered and the connection closed.

mod response;
mod config;
mod error;
mod handler;
mod handlers;
mod http_server;
mod observer;
mod router;

// Re-export public items
pub use response::{Body, BodySource, HttpResponse, StatusCode, serialize_headers};
pub use config::ServerConfig;
pub use error::Error;
pub use handler::{Handler, HandlerFuture};
pub use handlers::{FileDownload, FileUpload, UPLOAD_CHUNK_SIZE, echo, root, user_agent};
pub use http_server::HttpServer;
pub use observer::{Event, LogObserver, NoopObserver, Observer};
pub use router::{RouteKey, RouteMatch, RoutePattern, RouteTable, RouteTableBuilder, Router, not_found};
