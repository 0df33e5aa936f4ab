//! Handler and middleware abstractions.
//!
//! [`Handler`] is the core request-processing trait; [`Middleware`] wraps a
//! handler to add behavior around it. [`MiddlewareChain`] composes several
//! middleware in front of a terminal handler.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::http::{Request, Response};

/// Processes a request into a response
///
/// # Examples
///
/// ```
/// use polyglot::http::{Handler, Request, Response};
/// use async_trait::async_trait;
///
/// struct Hello;
///
/// #[async_trait]
/// impl Handler for Hello {
///     async fn handle(&self, _request: Request) -> polyglot::Result<Response> {
///         Ok(Response::ok().with_body("hello"))
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handle a request
	///
	/// # Errors
	///
	/// Returns an error when the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Wraps a handler with request/response processing
///
/// A middleware may inspect or modify the request before handing it to
/// `next`, short-circuit by returning a response without calling `next`, or
/// rewrite the response afterwards.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Process a request through this middleware
	///
	/// # Errors
	///
	/// Returns an error when this middleware or the next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;
}

/// Composes middleware in front of a terminal handler
///
/// Middleware run in the order they were added; the first added middleware
/// sees the request first.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Create a chain around a terminal handler
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Add a middleware to the end of the chain
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self.middlewares.iter().rev() {
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}
		current.handle(request).await
	}
}
