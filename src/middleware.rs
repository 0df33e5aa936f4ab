//! Request pipeline middleware tying resolution, activation, and
//! canonical redirects together.
//!
//! Per request: resolve the language, stamp it on the request, activate it
//! for the duration of handling, short-circuit with a redirect when the URL
//! is not canonical, and finalize response headers. The activation scope is
//! released on every exit path, handler errors included.

use async_trait::async_trait;
use std::sync::Arc;

use hyper::header::CONTENT_LANGUAGE;
use tracing::debug;

use crate::activation::with_active_language;
use crate::config::TranslationConfig;
use crate::error::Result;
use crate::http::{Handler, Middleware, Request, Response};
use crate::policy::{CanonicalUrlPolicy, RedirectDecision};
use crate::registry::LanguageRegistry;
use crate::resolver::LanguageResolver;
use crate::urls::Router;

/// Request extension carrying the resolved language code
///
/// Stamped by [`TranslationMiddleware`] before the handler runs, so views
/// and downstream middleware can read the effective request language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage(pub String);

/// Language resolution and canonical redirect middleware
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use polyglot::config::TranslationConfig;
/// use polyglot::language::Language;
/// use polyglot::middleware::TranslationMiddleware;
/// use polyglot::registry::LanguageRegistry;
/// use polyglot::store::{InMemoryLanguageStore, LanguageStore};
/// use polyglot::urls::Router;
///
/// let store = Arc::new(InMemoryLanguageStore::new());
/// store.save(Language::new("en").as_default()).unwrap();
///
/// let registry = LanguageRegistry::new(store, "en");
/// let router = Arc::new(Router::new());
/// let middleware =
///     TranslationMiddleware::new(TranslationConfig::default(), registry, router).unwrap();
/// # let _ = middleware;
/// ```
pub struct TranslationMiddleware {
	registry: Arc<LanguageRegistry>,
	resolver: LanguageResolver,
	policy: CanonicalUrlPolicy,
	router: Arc<Router>,
}

impl TranslationMiddleware {
	/// Create the middleware
	///
	/// # Errors
	///
	/// Returns [`crate::Error::Configuration`] when the configuration is
	/// invalid; this is the startup-fatal case, nothing here fails per
	/// request.
	pub fn new(
		config: TranslationConfig,
		registry: Arc<LanguageRegistry>,
		router: Arc<Router>,
	) -> Result<Self> {
		config.validate()?;
		let policy = CanonicalUrlPolicy::new(&config);
		let resolver = LanguageResolver::new(registry.clone(), config);
		Ok(Self {
			registry,
			resolver,
			policy,
			router,
		})
	}

	/// Resolve the effective language for `request`
	///
	/// Standalone utility for hosts that only need resolution.
	pub fn resolve_language(&self, request: &Request) -> String {
		self.resolver
			.resolve(request, self.router.has_language_prefix())
	}

	/// Pre-dispatch hook for foreign pipelines
	///
	/// Resolves the language, stamps [`ResolvedLanguage`] on the request,
	/// and returns the canonicalization decision. The caller is expected to
	/// turn a [`RedirectDecision::Redirect`] into its own redirect response
	/// instead of dispatching.
	pub fn on_request_start(&self, request: &Request) -> RedirectDecision {
		self.resolve_and_decide(request).1
	}

	/// Post-dispatch hook for foreign pipelines
	///
	/// Adds the `Vary: Accept-Language` and `Content-Language` headers the
	/// pipeline guarantees on every response.
	pub fn on_request_end(&self, request: &Request, response: Response) -> Response {
		let language = request
			.extensions
			.get::<ResolvedLanguage>()
			.map(|r| r.0)
			.unwrap_or_else(|| self.registry.default_language());
		finalize(response, &language)
	}

	fn resolve_and_decide(&self, request: &Request) -> (String, RedirectDecision) {
		let check_path = self.router.has_language_prefix();
		let language = self.resolver.resolve(request, check_path);
		request
			.extensions
			.insert(ResolvedLanguage(language.clone()));

		let decision = self.policy.canonicalize(
			request.path(),
			&language,
			&self.registry.default_language(),
			check_path,
			&self.router,
		);
		(language, decision)
	}

	fn redirect_response(&self, request: &Request, location: &str, permanent: bool) -> Response {
		// Re-attach the query string and preserve scheme and host
		let target = match request.query() {
			Some(query) => format!("{}?{}", location, query),
			None => location.to_string(),
		};
		let target = request.absolute_uri(Some(&target));

		debug!(from = %request.path(), to = %target, permanent, "canonical redirect");
		if permanent {
			Response::permanent_redirect(target)
		} else {
			Response::temporary_redirect(target)
		}
	}
}

#[async_trait]
impl Middleware for TranslationMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let (language, decision) = self.resolve_and_decide(&request);

		if let RedirectDecision::Redirect {
			location,
			permanent,
		} = decision
		{
			let response = self.redirect_response(&request, &location, permanent);
			return Ok(finalize(response, &language));
		}

		let response = with_active_language(language.clone(), next.handle(request)).await?;
		Ok(finalize(response, &language))
	}
}

fn finalize(mut response: Response, language: &str) -> Response {
	response.merge_vary("Accept-Language");
	if !response.headers.contains_key(CONTENT_LANGUAGE) {
		response = response.with_header(CONTENT_LANGUAGE, language);
	}
	response
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::activation::current_language;
	use crate::language::Language;
	use crate::store::{InMemoryLanguageStore, LanguageStore};
	use crate::urls::{Route, RouterHandler};
	use hyper::{HeaderMap, StatusCode};

	struct Page(&'static str);

	#[async_trait]
	impl Handler for Page {
		async fn handle(&self, _request: Request) -> Result<Response> {
			let body = match current_language() {
				Some(language) => format!("{}:{}", self.0, language),
				None => self.0.to_string(),
			};
			Ok(Response::ok().with_body(body))
		}
	}

	struct Fixture {
		store: Arc<InMemoryLanguageStore>,
		middleware: Arc<TranslationMiddleware>,
		handler: Arc<dyn Handler>,
	}

	fn fixture() -> Fixture {
		let store = Arc::new(InMemoryLanguageStore::new());
		store.save(Language::new("en").as_default()).unwrap();
		store.save(Language::new("fr")).unwrap();

		let registry = LanguageRegistry::new(store.clone(), "en");
		let router = Arc::new(Router::new().language_prefixed(vec![
			Route::new("/", Arc::new(Page("home"))),
			Route::new("/about/", Arc::new(Page("about"))),
		]));
		let handler: Arc<dyn Handler> =
			Arc::new(RouterHandler::new(router.clone(), registry.clone()));
		let middleware = Arc::new(
			TranslationMiddleware::new(TranslationConfig::default(), registry, router).unwrap(),
		);

		Fixture {
			store,
			middleware,
			handler,
		}
	}

	fn get(uri: &str) -> Request {
		let mut headers = HeaderMap::new();
		headers.insert(hyper::header::HOST, "example.com".parse().unwrap());
		Request::builder().uri(uri).headers(headers).build().unwrap()
	}

	#[tokio::test]
	async fn unprefixed_default_request_dispatches() {
		let f = fixture();
		let response = f
			.middleware
			.process(get("/about/"), f.handler.clone())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(&response.body[..], b"about:en");
		assert_eq!(response.headers.get("content-language").unwrap(), "en");
		assert_eq!(response.headers.get("vary").unwrap(), "Accept-Language");
	}

	#[tokio::test]
	async fn prefixed_default_request_redirects_permanently() {
		let f = fixture();
		let response = f
			.middleware
			.process(get("/en/about/"), f.handler.clone())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
		assert_eq!(
			response.headers.get("location").unwrap(),
			"http://example.com/about/"
		);
	}

	#[tokio::test]
	async fn prefixed_root_redirects_to_root() {
		let f = fixture();
		let response = f
			.middleware
			.process(get("/en/"), f.handler.clone())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
		assert_eq!(
			response.headers.get("location").unwrap(),
			"http://example.com/"
		);
	}

	#[tokio::test]
	async fn non_default_language_dispatches_under_its_prefix() {
		let f = fixture();
		let response = f
			.middleware
			.process(get("/fr/about/"), f.handler.clone())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(&response.body[..], b"about:fr");
		assert_eq!(response.headers.get("content-language").unwrap(), "fr");
	}

	#[tokio::test]
	async fn query_string_survives_the_redirect() {
		let f = fixture();
		let response = f
			.middleware
			.process(get("/en/about/?page=2"), f.handler.clone())
			.await
			.unwrap();

		assert_eq!(
			response.headers.get("location").unwrap(),
			"http://example.com/about/?page=2"
		);
	}

	#[tokio::test]
	async fn unknown_path_is_an_ordinary_404() {
		let f = fixture();
		let response = f
			.middleware
			.process(get("/nowhere/"), f.handler.clone())
			.await
			.unwrap();

		assert_eq!(response.status, StatusCode::NOT_FOUND);
		assert_eq!(response.headers.get("content-language").unwrap(), "en");
	}

	#[tokio::test]
	async fn runtime_default_change_redirects_old_canonical_urls() {
		let f = fixture();

		// warm the cache, then flip the default at runtime
		assert_eq!(f.middleware.registry.default_language(), "en");
		f.store.save(Language::new("fr").as_default()).unwrap();

		// the old canonical form now 301s to the stripped path
		let response = f
			.middleware
			.process(get("/fr/about/"), f.handler.clone())
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
		assert_eq!(
			response.headers.get("location").unwrap(),
			"http://example.com/about/"
		);

		// and the previously-default language now needs its prefix
		let response = f
			.middleware
			.process(get("/en/about/"), f.handler.clone())
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(&response.body[..], b"about:en");
	}

	#[tokio::test]
	async fn activation_is_released_after_handler_errors() {
		struct Failing;

		#[async_trait]
		impl Handler for Failing {
			async fn handle(&self, _request: Request) -> Result<Response> {
				Err(crate::Error::Internal("boom".to_string()))
			}
		}

		let f = fixture();
		let result = f
			.middleware
			.process(get("/about/"), Arc::new(Failing))
			.await;

		assert!(result.is_err());
		assert_eq!(current_language(), None);
	}

	#[tokio::test]
	async fn hook_pair_supports_foreign_pipelines() {
		let f = fixture();

		let request = get("/en/about/");
		let decision = f.middleware.on_request_start(&request);
		assert!(matches!(decision, RedirectDecision::Redirect { .. }));
		assert_eq!(
			request.extensions.get::<ResolvedLanguage>(),
			Some(ResolvedLanguage("en".to_string()))
		);

		let request = get("/fr/about/");
		assert_eq!(
			f.middleware.on_request_start(&request),
			RedirectDecision::NoRedirect
		);
		let response = f.middleware.on_request_end(&request, Response::ok());
		assert_eq!(response.headers.get("content-language").unwrap(), "fr");
		assert_eq!(response.headers.get("vary").unwrap(), "Accept-Language");
	}

	#[tokio::test]
	async fn temporary_redirects_when_configured() {
		let store = Arc::new(InMemoryLanguageStore::new());
		store.save(Language::new("en").as_default()).unwrap();
		let registry = LanguageRegistry::new(store, "en");
		let router = Arc::new(
			Router::new().language_prefixed(vec![Route::new("/about/", Arc::new(Page("about")))]),
		);
		let middleware = TranslationMiddleware::new(
			TranslationConfig::default().with_temporary_redirects(),
			registry.clone(),
			router.clone(),
		)
		.unwrap();
		let handler: Arc<dyn Handler> = Arc::new(RouterHandler::new(router, registry));

		let response = middleware.process(get("/en/about/"), handler).await.unwrap();

		assert_eq!(response.status, StatusCode::FOUND);
	}

	#[tokio::test]
	async fn no_language_prefix_routing_disables_path_checks() {
		let store = Arc::new(InMemoryLanguageStore::new());
		store.save(Language::new("en").as_default()).unwrap();
		store.save(Language::new("fr")).unwrap();
		let registry = LanguageRegistry::new(store, "en");
		let router = Arc::new(
			Router::new().unprefixed(vec![Route::new("/about/", Arc::new(Page("about")))]),
		);
		let middleware = TranslationMiddleware::new(
			TranslationConfig::default(),
			registry.clone(),
			router.clone(),
		)
		.unwrap();
		let handler: Arc<dyn Handler> = Arc::new(RouterHandler::new(router, registry));

		// "/fr/..." is not a language prefix here; it is just a missing page
		let response = middleware
			.process(get("/fr/about/"), handler.clone())
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::NOT_FOUND);
		assert_eq!(response.headers.get("content-language").unwrap(), "en");
	}
}
