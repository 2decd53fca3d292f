//! The boundary between the router and the code that produces responses.

use std::future::Future;
use std::pin::Pin;

use crate::parser::HttpRequest;
use crate::server::{Error, HttpResponse};

/// Type alias for a boxed future that returns a Result<HttpResponse, Error>.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>;

/// Produces the response for a matched route.
///
/// `capture` is the literal value bound to the route's placeholder, or an empty
/// string for a literal route. Any `Fn(String, HttpRequest) -> impl Future` with
/// the right output is a handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, capture: String, request: HttpRequest) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(String, HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    fn call(&self, capture: String, request: HttpRequest) -> HandlerFuture {
        Box::pin(self(capture, request))
    }
}
