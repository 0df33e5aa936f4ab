//! HTTP response representation.

use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};

/// HTTP response
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create an empty response with the given status
	///
	/// # Examples
	///
	/// ```
	/// use polyglot::http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// 200 OK
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// 404 Not Found
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// 301 Moved Permanently, pointing at `location`
	///
	/// # Examples
	///
	/// ```
	/// use polyglot::http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::permanent_redirect("/about/");
	/// assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
	/// assert_eq!(response.headers.get("location").unwrap(), "/about/");
	/// ```
	pub fn permanent_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::MOVED_PERMANENTLY).with_location(location.as_ref())
	}

	/// 302 Found, pointing at `location`
	pub fn temporary_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	/// Set the response body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set the `Location` header
	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(hyper::header::LOCATION, value);
		}
		self
	}

	/// Set a header, replacing any existing value
	pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(value) {
			self.headers.insert(name, value);
		}
		self
	}

	/// True when the response carries a redirect status
	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}

	/// Merge a value into the `Vary` header, idempotently
	///
	/// Existing entries are preserved; the value is appended only when it is
	/// not already listed (comparison is case-insensitive).
	///
	/// # Examples
	///
	/// ```
	/// use polyglot::http::Response;
	///
	/// let mut response = Response::ok();
	/// response.merge_vary("Accept-Language");
	/// response.merge_vary("accept-language");
	/// assert_eq!(response.headers.get("vary").unwrap(), "Accept-Language");
	///
	/// response.merge_vary("Cookie");
	/// assert_eq!(response.headers.get("vary").unwrap(), "Accept-Language, Cookie");
	/// ```
	pub fn merge_vary(&mut self, value: &str) {
		let existing = self
			.headers
			.get(hyper::header::VARY)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);

		let merged = match existing {
			Some(current) => {
				let already_listed = current
					.split(',')
					.any(|entry| entry.trim().eq_ignore_ascii_case(value));
				if already_listed {
					return;
				}
				format!("{}, {}", current, value)
			}
			None => value.to_string(),
		};

		if let Ok(header) = HeaderValue::from_str(&merged) {
			self.headers.insert(hyper::header::VARY, header);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn redirect_constructors() {
		let permanent = Response::permanent_redirect("/about/");
		assert_eq!(permanent.status, StatusCode::MOVED_PERMANENTLY);
		assert!(permanent.is_redirect());

		let temporary = Response::temporary_redirect("/about/");
		assert_eq!(temporary.status, StatusCode::FOUND);
		assert_eq!(temporary.headers.get("location").unwrap(), "/about/");
	}

	#[test]
	fn merge_vary_is_idempotent() {
		let mut response = Response::ok();
		response.merge_vary("Accept-Language");
		response.merge_vary("Accept-Language");

		assert_eq!(response.headers.get("vary").unwrap(), "Accept-Language");
	}

	#[test]
	fn merge_vary_appends_new_entries() {
		let mut response = Response::ok().with_header(hyper::header::VARY, "Cookie");
		response.merge_vary("Accept-Language");

		assert_eq!(response.headers.get("vary").unwrap(), "Cookie, Accept-Language");
	}
}
