//! Minimal HTTP surface the language pipeline is built on.
//!
//! The resolution core is meant to embed in any request pipeline, so it
//! carries its own request/response types and middleware traits instead of
//! binding to a specific server framework.

pub mod extensions;
pub mod middleware;
pub mod request;
pub mod response;

pub use extensions::Extensions;
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;
