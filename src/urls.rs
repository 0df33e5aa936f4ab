//! Routing table with language-aware prefixes.
//!
//! A [`Router`] holds groups of routes behind a prefix node. The prefix is
//! usually static, but a [`LanguagePrefix`] node resolves dynamically: it
//! contributes nothing when the active language is the default and
//! `/{code}` otherwise. That single rule is what makes default-language
//! URLs live at the root while every other language is prefixed.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::activation::current_language;
use crate::error::Result;
use crate::http::{Handler, Request, Response};
use crate::registry::LanguageRegistry;

/// Path pattern with literal and `{param}` segments
///
/// # Examples
///
/// ```
/// use polyglot::urls::PathPattern;
///
/// let pattern = PathPattern::new("/articles/{slug}/");
/// assert!(pattern.is_match("/articles/hello-world/"));
/// assert!(!pattern.is_match("/articles/"));
///
/// let params = pattern.captures("/articles/hello-world/").unwrap();
/// assert_eq!(params["slug"], "hello-world");
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
}

impl PathPattern {
	/// Create a pattern from its string form
	pub fn new(pattern: impl Into<String>) -> Self {
		Self {
			pattern: pattern.into(),
		}
	}

	/// Whether `path` matches this pattern
	pub fn is_match(&self, path: &str) -> bool {
		self.captures(path).is_some()
	}

	/// Match `path` and extract `{param}` segment values
	pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
		let pattern_segments: Vec<&str> = self.pattern.split('/').collect();
		let path_segments: Vec<&str> = path.split('/').collect();

		if pattern_segments.len() != path_segments.len() {
			return None;
		}

		let mut params = HashMap::new();
		for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
			if let Some(name) = pattern_segment
				.strip_prefix('{')
				.and_then(|s| s.strip_suffix('}'))
			{
				if path_segment.is_empty() {
					return None;
				}
				params.insert(name.to_string(), (*path_segment).to_string());
			} else if pattern_segment != path_segment {
				return None;
			}
		}
		Some(params)
	}
}

/// A single routable endpoint
#[derive(Clone)]
pub struct Route {
	pub pattern: PathPattern,
	pub name: Option<String>,
	pub handler: Arc<dyn Handler>,
}

impl Route {
	/// Create a route for `pattern`
	pub fn new(pattern: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		Self {
			pattern: PathPattern::new(pattern),
			name: None,
			handler,
		}
	}

	/// Name the route
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
}

/// A prefix node in the routing table
///
/// Selected polymorphically by the router; the language-prefix variant is
/// the only dynamic one and identifies itself through the marker method.
pub trait RoutePrefix: Send + Sync {
	/// The prefix contributed for the given active and default languages
	fn resolve_prefix(&self, active_language: &str, default_language: &str) -> String;

	/// Marker: true for the dynamic language-prefix node
	fn is_language_prefix(&self) -> bool {
		false
	}
}

/// Fixed prefix node, e.g. `/api`
pub struct StaticPrefix(String);

impl StaticPrefix {
	/// Create a static prefix; the empty string mounts routes at the root
	pub fn new(prefix: impl Into<String>) -> Self {
		Self(prefix.into())
	}
}

impl RoutePrefix for StaticPrefix {
	fn resolve_prefix(&self, _active_language: &str, _default_language: &str) -> String {
		self.0.clone()
	}
}

/// Dynamic language prefix node
///
/// Matches the empty string when the active language is the default and
/// `/{code}` otherwise.
///
/// # Examples
///
/// ```
/// use polyglot::urls::{LanguagePrefix, RoutePrefix};
///
/// let prefix = LanguagePrefix;
/// assert_eq!(prefix.resolve_prefix("en", "en"), "");
/// assert_eq!(prefix.resolve_prefix("fr", "en"), "/fr");
/// assert!(prefix.is_language_prefix());
/// ```
pub struct LanguagePrefix;

impl RoutePrefix for LanguagePrefix {
	fn resolve_prefix(&self, active_language: &str, default_language: &str) -> String {
		if active_language == default_language {
			String::new()
		} else {
			format!("/{}", active_language)
		}
	}

	fn is_language_prefix(&self) -> bool {
		true
	}
}

/// Routes mounted behind one prefix node
pub struct RouteGroup {
	prefix: Arc<dyn RoutePrefix>,
	routes: Vec<Route>,
}

impl RouteGroup {
	/// Create a group behind an explicit prefix node
	pub fn new(prefix: Arc<dyn RoutePrefix>, routes: Vec<Route>) -> Self {
		Self { prefix, routes }
	}
}

/// Routing table
///
/// Immutable after construction; the language pipeline queries it for path
/// validity and for whether language-prefix routing is enabled at all.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use polyglot::http::{Handler, Request, Response};
/// use polyglot::urls::{Route, Router};
/// use async_trait::async_trait;
///
/// struct Page;
///
/// #[async_trait]
/// impl Handler for Page {
///     async fn handle(&self, _request: Request) -> polyglot::Result<Response> {
///         Ok(Response::ok())
///     }
/// }
///
/// let router = Router::new()
///     .language_prefixed(vec![Route::new("/about/", Arc::new(Page))]);
///
/// assert!(router.has_language_prefix());
/// assert!(router.is_valid_path("/about/", "en", "en"));
/// assert!(router.is_valid_path("/fr/about/", "fr", "en"));
/// assert!(!router.is_valid_path("/fr/about/", "en", "en"));
/// ```
#[derive(Default)]
pub struct Router {
	groups: Vec<RouteGroup>,
}

impl Router {
	/// Create an empty router
	pub fn new() -> Self {
		Self::default()
	}

	/// Mount routes at the root, unprefixed
	pub fn unprefixed(mut self, routes: Vec<Route>) -> Self {
		self.groups
			.push(RouteGroup::new(Arc::new(StaticPrefix::new("")), routes));
		self
	}

	/// Mount routes behind a fixed prefix
	pub fn prefixed(mut self, prefix: impl Into<String>, routes: Vec<Route>) -> Self {
		self.groups
			.push(RouteGroup::new(Arc::new(StaticPrefix::new(prefix)), routes));
		self
	}

	/// Mount routes behind the dynamic language prefix
	pub fn language_prefixed(mut self, routes: Vec<Route>) -> Self {
		self.groups
			.push(RouteGroup::new(Arc::new(LanguagePrefix), routes));
		self
	}

	/// Mount a pre-built group
	pub fn with_group(mut self, group: RouteGroup) -> Self {
		self.groups.push(group);
		self
	}

	/// Whether any top-level node is a language-prefix node
	///
	/// Scanned per call; the table is immutable after startup, so there is
	/// nothing to cache.
	pub fn has_language_prefix(&self) -> bool {
		self.groups.iter().any(|g| g.prefix.is_language_prefix())
	}

	/// Find the route matching `path` under the given language context
	pub fn resolve(&self, path: &str, active_language: &str, default_language: &str) -> Option<&Route> {
		for group in &self.groups {
			let prefix = group.prefix.resolve_prefix(active_language, default_language);
			let Some(rest) = path.strip_prefix(prefix.as_str()) else {
				continue;
			};
			if !rest.starts_with('/') {
				continue;
			}
			if let Some(route) = group.routes.iter().find(|r| r.pattern.is_match(rest)) {
				return Some(route);
			}
		}
		None
	}

	/// Whether `path` resolves to any route under the given language context
	pub fn is_valid_path(&self, path: &str, active_language: &str, default_language: &str) -> bool {
		self.resolve(path, active_language, default_language).is_some()
	}
}

/// Handler dispatching requests through a [`Router`]
///
/// The active language comes from the task-local activation scope the
/// middleware installs, falling back to the registry default. Unmatched
/// paths produce an ordinary 404.
pub struct RouterHandler {
	router: Arc<Router>,
	registry: Arc<LanguageRegistry>,
}

impl RouterHandler {
	/// Create a dispatching handler
	pub fn new(router: Arc<Router>, registry: Arc<LanguageRegistry>) -> Self {
		Self { router, registry }
	}
}

#[async_trait]
impl Handler for RouterHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let default_language = self.registry.default_language();
		let active_language = current_language().unwrap_or_else(|| default_language.clone());

		match self
			.router
			.resolve(request.path(), &active_language, &default_language)
		{
			Some(route) => route.handler.clone().handle(request).await,
			None => Ok(Response::not_found()),
		}
	}
}
