//! Per-request language resolution.
//!
//! The precedence order is fixed: URL path prefix (when prefix routing is
//! on), then session, then cookie, then the registry default. A path
//! prefix, once found, is authoritative and skips the session and cookie
//! checks entirely. The `Accept-Language` header is deliberately never
//! consulted; the configured languages and their default drive resolution,
//! not browser negotiation.

use std::sync::Arc;

use crate::config::TranslationConfig;
use crate::http::Request;
use crate::language::{Language, primary_subtag};
use crate::registry::LanguageRegistry;
use crate::session::SessionData;

/// Resolves the effective language for a request
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use polyglot::config::TranslationConfig;
/// use polyglot::http::Request;
/// use polyglot::language::Language;
/// use polyglot::registry::LanguageRegistry;
/// use polyglot::resolver::LanguageResolver;
/// use polyglot::store::{InMemoryLanguageStore, LanguageStore};
///
/// let store = Arc::new(InMemoryLanguageStore::new());
/// store.save(Language::new("en").as_default()).unwrap();
/// store.save(Language::new("fr")).unwrap();
///
/// let registry = LanguageRegistry::new(store, "en");
/// let resolver = LanguageResolver::new(registry, TranslationConfig::default());
///
/// let request = Request::builder().uri("/fr/articles/").build().unwrap();
/// assert_eq!(resolver.resolve(&request, true), "fr");
/// ```
pub struct LanguageResolver {
	registry: Arc<LanguageRegistry>,
	config: TranslationConfig,
}

impl LanguageResolver {
	/// Create a resolver over a registry
	pub fn new(registry: Arc<LanguageRegistry>, config: TranslationConfig) -> Self {
		Self { registry, config }
	}

	/// Resolve the language for `request`
	///
	/// `check_path` enables the URL-prefix check; the middleware passes
	/// true only when the routing table actually carries a language-prefix
	/// node. Never fails: malformed session or cookie values are treated
	/// as absent and the registry default always applies last.
	pub fn resolve(&self, request: &Request, check_path: bool) -> String {
		if check_path
			&& let Some(code) = self.language_from_path(request.path())
		{
			return code;
		}

		if let Some(code) = self.language_from_session(request) {
			return code;
		}

		if let Some(code) = self.language_from_cookie(request) {
			return code;
		}

		self.registry.default_language()
	}

	/// Extract a supported language from a path prefix
	///
	/// The first path segment is matched against the supported codes:
	/// an exact (case-insensitive) match wins; failing that, a segment
	/// whose primary subtag names a supported code resolves to that code
	/// (a sublanguage is served as its main language).
	pub fn language_from_path(&self, path: &str) -> Option<String> {
		let segment = path.strip_prefix('/')?.split('/').next()?;
		if segment.is_empty() {
			return None;
		}

		let supported = self.registry.supported_languages();
		if let Some(code) = supported.iter().find(|c| c.eq_ignore_ascii_case(segment)) {
			return Some(code.clone());
		}

		let subtag = primary_subtag(segment);
		if subtag != segment
			&& let Some(code) = supported.iter().find(|c| c.eq_ignore_ascii_case(subtag))
		{
			return Some(code.clone());
		}

		None
	}

	fn language_from_session(&self, request: &Request) -> Option<String> {
		let session = request.extensions.get::<SessionData>()?;
		let code: String = session.get(&self.config.session_key)?;
		if !code.is_empty() && self.registry.is_supported(&code) && Language::is_valid_code(&code) {
			return Some(code);
		}
		None
	}

	fn language_from_cookie(&self, request: &Request) -> Option<String> {
		let mut code = request.cookie(&self.config.cookie_name)?;
		if !self.registry.is_supported(&code) {
			// e.g. fr-ca falls back to fr when only fr is configured
			code = primary_subtag(&code).to_string();
		}
		if !code.is_empty() && self.registry.is_supported(&code) && Language::is_valid_code(&code) {
			return Some(code);
		}
		None
	}
}
