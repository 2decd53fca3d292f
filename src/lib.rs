//! A minimal HTTP/1.1 server built directly on TCP sockets.
//!
//! The crate carries its own wire protocol engine:
//!
//! - a request parser that reads a request line, a header block and exactly
//!   `Content-Length` bytes of body off a connection,
//! - a route table matched with an exactness-priority algorithm, where literal
//!   routes beat `/{str}` placeholder routes,
//! - a response serializer that writes in-memory bodies verbatim and streams
//!   file bodies straight from disk.
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use wirehttp_rs::{read_request, Method};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let request_bytes = b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
//!
//! let request = read_request(&request_bytes[..], None).await.unwrap();
//! assert_eq!(request.method, Method::POST);
//! assert_eq!(request.target, "/files/a.txt");
//! assert_eq!(request.body, b"hello");
//! # });
//! ```
//!
//! ## Matching routes
//!
//! ```
//! use wirehttp_rs::{HttpRequest, HttpResponse, Method, RouteTable, StatusCode};
//!
//! async fn hello(capture: String, _request: HttpRequest) -> Result<HttpResponse, wirehttp_rs::ServerError> {
//!     Ok(HttpResponse::text(StatusCode::Ok, format!("hello {capture}")))
//! }
//!
//! let table = RouteTable::builder()
//!     .route(Method::GET, "/hello/{str}", hello)
//!     .build();
//!
//! let found = table.find(&Method::GET, "/hello/world").unwrap();
//! assert_eq!(found.key.to_string(), "GET /hello/{str}");
//! assert_eq!(found.capture, "world");
//! ```
//!
//! ## Running the server
//!
//! ```no_run
//! use wirehttp_rs::{HttpServer, ServerConfig};
//!
//! # async fn run() -> Result<(), wirehttp_rs::ServerError> {
//! let config = ServerConfig {
//!     base_dir: "/tmp/files".into(),
//!     ..ServerConfig::default()
//! };
//! HttpServer::new(config).start().await
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, Method, WireReader, read_request};
pub use server::{Error as ServerError, HttpResponse, HttpServer, RouteTable, Router, ServerConfig, StatusCode};
