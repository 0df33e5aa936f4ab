//! Configuration for the language pipeline.

use crate::error::{Error, Result};
use crate::language::Language;

/// Default cookie carrying the visitor's language preference
pub const LANGUAGE_COOKIE_NAME: &str = "polyglot_language";

/// Default session key carrying the visitor's language preference
pub const LANGUAGE_SESSION_KEY: &str = "polyglot_language";

/// Configuration for language resolution and canonical redirects
///
/// # Examples
///
/// ```
/// use polyglot::config::TranslationConfig;
///
/// let config = TranslationConfig::new("en")
///     .with_cookie_name("lang")
///     .with_temporary_redirects();
///
/// assert_eq!(config.fallback_language, "en");
/// assert_eq!(config.cookie_name, "lang");
/// assert!(!config.permanent_redirects);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct TranslationConfig {
	/// Language code used when the store has no languages at all
	pub fallback_language: String,
	/// Cookie read for the visitor's language preference
	pub cookie_name: String,
	/// Session key read for the visitor's language preference
	pub session_key: String,
	/// Append a trailing slash to redirect targets that lack one
	pub append_slash: bool,
	/// Issue 301 redirects (302 when false, for non-SEO-sensitive deployments)
	pub permanent_redirects: bool,
}

impl TranslationConfig {
	/// Create a configuration with the given fallback language
	pub fn new(fallback_language: impl Into<String>) -> Self {
		Self {
			fallback_language: fallback_language.into(),
			cookie_name: LANGUAGE_COOKIE_NAME.to_string(),
			session_key: LANGUAGE_SESSION_KEY.to_string(),
			append_slash: true,
			permanent_redirects: true,
		}
	}

	/// Set the language preference cookie name
	pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.cookie_name = name.into();
		self
	}

	/// Set the session key for the language preference
	pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
		self.session_key = key.into();
		self
	}

	/// Disable appending trailing slashes to redirect targets
	pub fn without_append_slash(mut self) -> Self {
		self.append_slash = false;
		self
	}

	/// Use 302 redirects instead of 301
	pub fn with_temporary_redirects(mut self) -> Self {
		self.permanent_redirects = false;
		self
	}

	/// Validate the configuration
	///
	/// Meant to run at startup; a bad configuration is fatal, never a
	/// per-request condition.
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] when the fallback language is empty
	/// or not a well-formed locale identifier.
	pub fn validate(&self) -> Result<()> {
		if self.fallback_language.is_empty() {
			return Err(Error::Configuration(
				"no fallback language configured".to_string(),
			));
		}
		if !Language::is_valid_code(&self.fallback_language) {
			return Err(Error::Configuration(format!(
				"fallback language {:?} is not a valid language code",
				self.fallback_language
			)));
		}
		Ok(())
	}
}

impl Default for TranslationConfig {
	fn default() -> Self {
		Self::new("en")
	}
}
