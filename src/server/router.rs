//! Route table and exactness-priority matching.
//!
//! A route is registered as a method plus a path pattern. A pattern is either a
//! literal path (`/user-agent`) or a literal prefix followed by a chain of
//! `/{str}` placeholders (`/files/{str}`). Matching a target first tries the
//! literal route, then strips segments off the right of the target one at a
//! time, replacing each stripped segment with a placeholder:
//!
//! ```text
//! GET /a/b/c  ->  GET /a/b/c
//!             ->  GET /a/b/{str}
//!             ->  GET /a/{str}/{str}
//!             ->  GET /{str}/{str}/{str}
//! ```
//!
//! The first key present in the table wins. Only the last segment of the
//! target is handed to the handler as the captured value.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::parser::{HttpRequest, Method};
use crate::server::handler::Handler;
use crate::server::handlers::{self, FileDownload, FileUpload};
use crate::server::observer::{Event, Observer};
use crate::server::{HttpResponse, StatusCode};

const PLACEHOLDER: &str = "/{str}";

/// The path half of a route key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutePattern {
    /// Matches the target exactly.
    Literal(String),
    /// `prefix` followed by `depth` placeholder segments.
    Placeholder { prefix: String, depth: usize },
}

impl RoutePattern {
    /// Parse a pattern string such as `/echo/{str}`.
    ///
    /// Only a trailing chain of `/{str}` is treated as placeholders; anything
    /// else, including a placeholder in the middle of the path, is literal.
    pub fn parse(pattern: &str) -> Self {
        let mut prefix = pattern;
        let mut depth = 0;
        while let Some(rest) = prefix.strip_suffix(PLACEHOLDER) {
            prefix = rest;
            depth += 1;
        }

        if depth == 0 {
            RoutePattern::Literal(pattern.to_string())
        } else {
            RoutePattern::Placeholder {
                prefix: prefix.to_string(),
                depth,
            }
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePattern::Literal(path) => f.write_str(path),
            RoutePattern::Placeholder { prefix, depth } => {
                write!(f, "{prefix}{}", PLACEHOLDER.repeat(*depth))
            }
        }
    }
}

/// A method and a pattern; displays as `"<METHOD> <pattern>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub pattern: RoutePattern,
}

impl RouteKey {
    pub fn new(method: Method, pattern: RoutePattern) -> Self {
        Self { method, pattern }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

/// The outcome of a successful lookup.
pub struct RouteMatch<'a> {
    pub key: &'a RouteKey,
    pub capture: String,
    pub handler: &'a Arc<dyn Handler>,
}

/// Immutable mapping from route keys to handlers.
pub struct RouteTable {
    routes: HashMap<RouteKey, Arc<dyn Handler>>,
}

impl RouteTable {
    /// Start building a table.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// The routes the server ships with, file routes rooted at `base_dir`.
    pub fn with_default_routes(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self::builder()
            .route(Method::GET, "/", handlers::root)
            .route(Method::GET, "/echo/{str}", handlers::echo)
            .route(Method::GET, "/user-agent", handlers::user_agent)
            .route(Method::GET, "/files/{str}", FileDownload::new(&base_dir))
            .route(Method::POST, "/files/{str}", FileUpload::new(&base_dir))
            .build()
    }

    /// Registered route keys, sorted by their display form.
    pub fn routes(&self) -> Vec<&RouteKey> {
        let mut keys: Vec<&RouteKey> = self.routes.keys().collect();
        keys.sort_by_cached_key(|key| key.to_string());
        keys
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the most specific route for `method` and `target`.
    ///
    /// The exact step compares the target with each key's pattern string, so a
    /// target that literally reads `/echo/{str}` is an exact hit with an empty
    /// capture.
    pub fn find(&self, method: &Method, target: &str) -> Option<RouteMatch<'_>> {
        let exact = RouteKey::new(method.clone(), RoutePattern::parse(target));
        if let Some((key, handler)) = self.routes.get_key_value(&exact) {
            return Some(RouteMatch {
                key,
                capture: String::new(),
                handler,
            });
        }

        let capture = target
            .rfind('/')
            .map(|idx| &target[idx + 1..])
            .unwrap_or_default();

        let mut remaining = target;
        let mut depth = 0;
        while let Some(idx) = remaining.rfind('/') {
            remaining = &remaining[..idx];
            depth += 1;

            let candidate = RouteKey::new(
                method.clone(),
                RoutePattern::Placeholder {
                    prefix: remaining.to_string(),
                    depth,
                },
            );
            if let Some((key, handler)) = self.routes.get_key_value(&candidate) {
                return Some(RouteMatch {
                    key,
                    capture: capture.to_string(),
                    handler,
                });
            }
        }

        None
    }
}

/// Collects routes before they are frozen into a [`RouteTable`].
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: HashMap<RouteKey, Arc<dyn Handler>>,
}

impl RouteTableBuilder {
    /// Register `handler` for `method` and `pattern`, replacing any previous one.
    pub fn route(mut self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        let key = RouteKey::new(method, RoutePattern::parse(pattern));
        self.routes.insert(key, Arc::new(handler));
        self
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}

/// Dispatches requests through a [`RouteTable`].
#[derive(Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    observer: Arc<dyn Observer>,
}

impl Router {
    pub fn new(table: Arc<RouteTable>, observer: Arc<dyn Observer>) -> Self {
        Self { table, observer }
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn observer(&self) -> &Arc<dyn Observer> {
        &self.observer
    }

    /// Route `request` and produce its response.
    ///
    /// An unmatched request gets [`not_found`]; a handler error becomes a 500.
    pub async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let Some(found) = self.table.find(&request.method, &request.target) else {
            self.observer.on_event(&Event::RouteNotFound {
                method: &request.method,
                target: &request.target,
            });
            return not_found();
        };

        let route = found.key.to_string();
        self.observer.on_event(&Event::RouteMatched {
            route: &route,
            capture: &found.capture,
        });

        match found.handler.call(found.capture, request).await {
            Ok(response) => response,
            Err(e) => {
                let error = e.to_string();
                self.observer.on_event(&Event::HandlerFailed {
                    route: &route,
                    error: &error,
                });
                HttpResponse::text(StatusCode::InternalServerError, format!("Internal server error: {e}"))
            }
        }
    }
}

/// The response sent when no route matches.
pub fn not_found() -> HttpResponse {
    HttpResponse::new(StatusCode::NotFound).with_content_type("text/plain")
}
