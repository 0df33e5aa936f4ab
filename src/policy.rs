//! Canonical URL policy.
//!
//! Canonical URLs never carry a prefix for the default language; every
//! other language requires one. The policy only ever strips a prefix that
//! matches the current default, never adds one, which makes redirect loops
//! structurally impossible. When the default language changes at runtime,
//! URLs carrying the old default's prefix stop being canonical and are
//! permanently redirected to keep their SEO value.

use crate::config::TranslationConfig;
use crate::urls::Router;

/// Outcome of a canonicalization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
	/// The URL is already canonical for the resolved language
	NoRedirect,
	/// The URL must redirect to its canonical form
	Redirect {
		/// Target path (scheme, host, and query are the caller's concern)
		location: String,
		/// 301 when true, 302 otherwise
		permanent: bool,
	},
}

/// Decides whether a request URL is canonical for its resolved language
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use polyglot::config::TranslationConfig;
/// use polyglot::http::{Handler, Request, Response};
/// use polyglot::policy::{CanonicalUrlPolicy, RedirectDecision};
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
/// let policy = CanonicalUrlPolicy::new(&TranslationConfig::default());
///
/// let decision = policy.canonicalize("/en/about/", "en", "en", true, &router);
/// assert_eq!(decision, RedirectDecision::Redirect {
///     location: "/about/".to_string(),
///     permanent: true,
/// });
/// ```
pub struct CanonicalUrlPolicy {
	append_slash: bool,
	permanent: bool,
}

impl CanonicalUrlPolicy {
	/// Create a policy from the pipeline configuration
	pub fn new(config: &TranslationConfig) -> Self {
		Self {
			append_slash: config.append_slash,
			permanent: config.permanent_redirects,
		}
	}

	/// Decide whether `path` must redirect for the resolved language
	///
	/// Evaluated once per request, before dispatch, independent of what the
	/// handler would respond. Only the strip case redirects: the resolved
	/// language equals the default and the path still carries the default's
	/// prefix. The stripped path must resolve to a real route (the bare
	/// root always qualifies), otherwise the request proceeds unchanged and
	/// will 404 like any bad URL.
	pub fn canonicalize(
		&self,
		path: &str,
		resolved_language: &str,
		default_language: &str,
		prefix_routing_enabled: bool,
		router: &Router,
	) -> RedirectDecision {
		if !prefix_routing_enabled {
			return RedirectDecision::NoRedirect;
		}
		if resolved_language != default_language {
			return RedirectDecision::NoRedirect;
		}

		let prefix = format!("/{}/", default_language);
		let Some(rest) = path.strip_prefix(prefix.as_str()) else {
			return RedirectDecision::NoRedirect;
		};

		let mut stripped = format!("/{}", rest);
		if self.append_slash && !stripped.ends_with('/') {
			stripped.push('/');
		}

		// "/en/en/" strips to "/en/"; leave that one alone
		if stripped == prefix {
			return RedirectDecision::NoRedirect;
		}

		let is_root = stripped == "/";
		if is_root || router.is_valid_path(&stripped, default_language, default_language) {
			return RedirectDecision::Redirect {
				location: stripped,
				permanent: self.permanent,
			};
		}

		RedirectDecision::NoRedirect
	}
}
