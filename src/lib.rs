//! # polyglot
//!
//! Multilingual content tooling for Rust web applications: per-language
//! URL routing, request language resolution, and canonical-URL redirects.
//!
//! The crate is built around one rule: canonical URLs never carry a prefix
//! for the default language, while every other language is addressed under
//! `/{code}`. Per request it resolves the active language (URL prefix, then
//! session, then cookie, then the configured default — never the
//! `Accept-Language` header), activates it for the duration of handling,
//! and permanently redirects URLs that still carry the default language's
//! prefix. Because the default language is data, not configuration, it can
//! change at runtime; old canonical URLs then 301 to their new form.
//!
//! ## Overview
//!
//! - [`store`]: language persistence interface with change notifications
//!   and the single-default invariant
//! - [`registry`]: process-wide cached `(default, supported)` snapshot
//! - [`resolver`]: per-request language resolution
//! - [`policy`]: canonical-URL decisions
//! - [`middleware`]: the request pipeline glue
//! - [`urls`]: routing table with the dynamic language-prefix node
//! - [`translatable`], [`switcher`]: content translations and per-language
//!   URL lists for templates
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use polyglot::config::TranslationConfig;
//! use polyglot::http::{Handler, Request, Response};
//! use polyglot::language::Language;
//! use polyglot::middleware::TranslationMiddleware;
//! use polyglot::registry::LanguageRegistry;
//! use polyglot::store::{InMemoryLanguageStore, LanguageStore};
//! use polyglot::urls::{Route, Router, RouterHandler};
//! use async_trait::async_trait;
//!
//! struct AboutPage;
//!
//! #[async_trait]
//! impl Handler for AboutPage {
//!     async fn handle(&self, _request: Request) -> polyglot::Result<Response> {
//!         Ok(Response::ok().with_body("about"))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(InMemoryLanguageStore::new());
//! store.save(Language::new("en").as_default()).unwrap();
//! store.save(Language::new("fr")).unwrap();
//!
//! let registry = LanguageRegistry::new(store, "en");
//! let router = Arc::new(
//!     Router::new().language_prefixed(vec![Route::new("/about/", Arc::new(AboutPage))]),
//! );
//! let middleware =
//!     TranslationMiddleware::new(TranslationConfig::default(), registry.clone(), router.clone())
//!         .unwrap();
//!
//! use polyglot::http::Middleware;
//! let handler = Arc::new(RouterHandler::new(router, registry));
//!
//! // "/about/" is canonical for the default language
//! let request = Request::builder().uri("/about/").build().unwrap();
//! let response = middleware.process(request, handler.clone()).await.unwrap();
//! assert_eq!(response.status, hyper::StatusCode::OK);
//!
//! // "/en/about/" is not, and permanently redirects
//! let request = Request::builder().uri("/en/about/").build().unwrap();
//! let response = middleware.process(request, handler).await.unwrap();
//! assert_eq!(response.status, hyper::StatusCode::MOVED_PERMANENTLY);
//! # });
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod http;
pub mod language;
pub mod middleware;
pub mod policy;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod store;
pub mod switcher;
pub mod translatable;
pub mod urls;

pub use activation::{current_language, with_active_language};
pub use config::TranslationConfig;
pub use error::{Error, Result};
pub use http::{Extensions, Handler, Middleware, MiddlewareChain, Request, Response};
pub use language::Language;
pub use middleware::{ResolvedLanguage, TranslationMiddleware};
pub use policy::{CanonicalUrlPolicy, RedirectDecision};
pub use registry::{LanguageRegistry, LanguageSnapshot};
pub use resolver::LanguageResolver;
pub use session::SessionData;
pub use store::{InMemoryLanguageStore, LanguageChange, LanguageChangeCallback, LanguageStore};
pub use switcher::{LanguageUrl, clean_path, language_urls};
pub use translatable::{DisplayNameCache, Translatable, Translation};
pub use urls::{
	LanguagePrefix, PathPattern, Route, RouteGroup, RoutePrefix, Router, RouterHandler,
	StaticPrefix,
};
