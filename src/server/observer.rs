//! Structured hook for what happens on each connection.
//!
//! The server reports progress through an [`Observer`] chosen once at
//! construction. [`LogObserver`] forwards everything to the `log` facade,
//! [`NoopObserver`] drops it.

use std::net::SocketAddr;

use log::{debug, info, warn};

use crate::parser::Method;
use crate::server::response::StatusCode;

/// Something worth reporting about a connection or request.
#[derive(Debug)]
pub enum Event<'a> {
    /// A connection was accepted and handed to its own task.
    ConnectionAccepted { peer: SocketAddr },
    /// The admission gate was full, the connection got a 503.
    ConnectionRejected { peer: SocketAddr },
    /// A request was read off the wire.
    RequestParsed { method: &'a Method, target: &'a str, body_len: usize },
    /// A route key matched; `capture` is the value handed to its handler.
    RouteMatched { route: &'a str, capture: &'a str },
    /// No route matched at any stripping level.
    RouteNotFound { method: &'a Method, target: &'a str },
    /// A handler returned an error and a 500 was sent instead.
    HandlerFailed { route: &'a str, error: &'a str },
    /// A response was fully written and flushed.
    ResponseSent { status: StatusCode },
    /// The exchange was abandoned without (complete) response.
    ConnectionFailed { error: &'a str },
}

/// Sink for [`Event`]s.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event<'_>);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: &Event<'_>) {
        match event {
            Event::ConnectionAccepted { peer } => debug!("accepted connection from {peer}"),
            Event::ConnectionRejected { peer } => {
                warn!("Connection limit reached, rejecting connection from {peer}")
            }
            Event::RequestParsed { method, target, body_len } => {
                debug!("parsed {method} {target} ({body_len} body bytes)")
            }
            Event::RouteMatched { route, capture } => {
                debug!("matched route {route} with value {capture:?}")
            }
            Event::RouteNotFound { method, target } => info!("no route for {method} {target}"),
            Event::HandlerFailed { route, error } => warn!("handler for {route} failed: {error}"),
            Event::ResponseSent { status } => debug!("sent {status}"),
            Event::ConnectionFailed { error } => warn!("dropping connection: {error}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_event(&self, _event: &Event<'_>) {}
}
