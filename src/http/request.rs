//! HTTP request representation used by the resolution pipeline.

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};

use crate::error::{Error, Result};
use crate::http::Extensions;

/// HTTP request
///
/// Carries the parts of an inbound request the language pipeline needs:
/// method, URI, headers, body, a secure-transport flag, and a type-keyed
/// [`Extensions`] map for request-scoped state.
///
/// # Examples
///
/// ```
/// use polyglot::http::Request;
/// use hyper::Method;
///
/// let request = Request::builder()
///     .method(Method::GET)
///     .uri("/fr/articles/")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path(), "/fr/articles/");
/// ```
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub extensions: Extensions,
	is_secure: bool,
}

impl Request {
	/// Create a request from its parts
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			extensions: Extensions::new(),
			is_secure: false,
		}
	}

	/// Start building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// The request path, without the query string
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// The raw query string, if any
	pub fn query(&self) -> Option<&str> {
		self.uri.query()
	}

	/// Path plus query string, as sent by the client
	///
	/// # Examples
	///
	/// ```
	/// use polyglot::http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/articles/?page=2")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.full_path(), "/articles/?page=2");
	/// ```
	pub fn full_path(&self) -> String {
		match self.uri.query() {
			Some(query) => format!("{}?{}", self.uri.path(), query),
			None => self.uri.path().to_string(),
		}
	}

	/// Whether the request arrived over a secure transport
	pub fn is_secure(&self) -> bool {
		self.is_secure
	}

	/// The URI scheme implied by the transport
	pub fn scheme(&self) -> &str {
		if self.is_secure { "https" } else { "http" }
	}

	/// The host from the `Host` header, without any port
	pub fn host(&self) -> Option<String> {
		self.headers
			.get(hyper::header::HOST)
			.and_then(|h| h.to_str().ok())
			.map(|h| h.split(':').next().unwrap_or(h).to_string())
	}

	/// Build an absolute URI for `path` (or this request's own path),
	/// preserving the request's scheme and host
	///
	/// # Examples
	///
	/// ```
	/// use polyglot::http::Request;
	/// use hyper::Method;
	///
	/// let mut headers = hyper::HeaderMap::new();
	/// headers.insert(hyper::header::HOST, "example.com".parse().unwrap());
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/en/about/")
	///     .headers(headers)
	///     .secure(true)
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.absolute_uri(Some("/about/")), "https://example.com/about/");
	/// ```
	pub fn absolute_uri(&self, path: Option<&str>) -> String {
		let host = self.host().unwrap_or_else(|| "localhost".to_string());
		let path = path.unwrap_or_else(|| self.path());
		format!("{}://{}{}", self.scheme(), host, path)
	}

	/// Read a cookie value by name from the `Cookie` header
	///
	/// Returns `None` when the header is absent, unreadable, or the cookie
	/// is not present. Malformed pairs are skipped, not errors.
	pub fn cookie(&self, name: &str) -> Option<String> {
		let header = self.headers.get(hyper::header::COOKIE)?.to_str().ok()?;
		for pair in header.split(';') {
			let mut parts = pair.trim().splitn(2, '=');
			if parts.next() == Some(name) {
				return parts.next().map(str::to_string);
			}
		}
		None
	}
}

/// Builder for [`Request`]
#[derive(Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	version: Option<Version>,
	headers: Option<HeaderMap>,
	body: Option<Bytes>,
	secure: bool,
}

impl RequestBuilder {
	/// Set the HTTP method (defaults to GET)
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	/// Set the request URI
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// Set the HTTP version (defaults to HTTP/1.1)
	pub fn version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	/// Set the request headers
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = Some(headers);
		self
	}

	/// Set the request body
	pub fn body(mut self, body: Bytes) -> Self {
		self.body = Some(body);
		self
	}

	/// Mark the request as having arrived over a secure transport
	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	/// Build the request
	///
	/// # Errors
	///
	/// Fails when the URI does not parse.
	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.unwrap_or_else(|| "/".to_string())
			.parse()
			.map_err(|e| Error::Internal(format!("invalid request uri: {}", e)))?;

		let mut request = Request::new(
			self.method.unwrap_or(Method::GET),
			uri,
			self.version.unwrap_or(Version::HTTP_11),
			self.headers.unwrap_or_default(),
			self.body.unwrap_or_default(),
		);
		request.is_secure = self.secure;
		Ok(request)
	}
}
