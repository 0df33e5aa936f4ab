//! The language entity.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unic_langid::LanguageIdentifier;

/// A supported language
///
/// The code acts as the primary key; at most one language is flagged as the
/// default at any time (the store enforces this).
///
/// # Examples
///
/// ```
/// use polyglot::language::Language;
///
/// let english = Language::new("en").as_default();
/// let canadian_french = Language::new("fr-ca");
///
/// assert!(english.default);
/// assert_eq!(canadian_french.primary_subtag(), "fr");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
	/// Short language identifier, e.g. "en" or "fr-ca"
	pub code: String,
	/// Whether this language is the site default
	pub default: bool,
}

impl Language {
	/// Create a non-default language with the given code
	pub fn new(code: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			default: false,
		}
	}

	/// Mark this language as the default
	pub fn as_default(mut self) -> Self {
		self.default = true;
		self
	}

	/// The text before the first `-`, e.g. "fr" for "fr-ca"
	pub fn primary_subtag(&self) -> &str {
		primary_subtag(&self.code)
	}

	/// Whether `code` is a well-formed language code
	///
	/// Accepts BCP 47-style codes with `-` separators; rejects empty
	/// strings, underscores, leading/trailing separators, and anything
	/// `unic-langid` cannot parse.
	///
	/// # Examples
	///
	/// ```
	/// use polyglot::language::Language;
	///
	/// assert!(Language::is_valid_code("en"));
	/// assert!(Language::is_valid_code("fr-ca"));
	/// assert!(Language::is_valid_code("sr-Latn-RS"));
	/// assert!(!Language::is_valid_code("en_US"));
	/// assert!(!Language::is_valid_code("-en"));
	/// assert!(!Language::is_valid_code(""));
	/// ```
	pub fn is_valid_code(code: &str) -> bool {
		if code.is_empty() || code.len() > 64 {
			return false;
		}
		if !code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
			return false;
		}
		if code.starts_with('-') || code.ends_with('-') {
			return false;
		}
		code.parse::<LanguageIdentifier>().is_ok()
	}
}

// Languages sort lexicographically by code wherever enumerated
impl Ord for Language {
	fn cmp(&self, other: &Self) -> Ordering {
		self.code.cmp(&other.code)
	}
}

impl PartialOrd for Language {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for Language {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.code)
	}
}

/// The text before the first `-` of a language code
pub fn primary_subtag(code: &str) -> &str {
	code.split('-').next().unwrap_or(code)
}
