//! Per-language URL lists for language switchers.
//!
//! Template-level helpers that map the current page to its address in every
//! configured language: the default language lives at the unprefixed path,
//! every other language at `/{code}` plus the path.

use crate::registry::LanguageRegistry;

/// One entry in a language switcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageUrl {
	/// Language code
	pub code: String,
	/// Address of the page in that language
	pub url: String,
	/// Whether this is the default language
	pub default: bool,
}

/// Strip a supported-language prefix from `path`, if one is present
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use polyglot::language::Language;
/// use polyglot::registry::LanguageRegistry;
/// use polyglot::store::{InMemoryLanguageStore, LanguageStore};
/// use polyglot::switcher::clean_path;
///
/// let store = Arc::new(InMemoryLanguageStore::new());
/// store.save(Language::new("en").as_default()).unwrap();
/// store.save(Language::new("fr")).unwrap();
/// let registry = LanguageRegistry::new(store, "en");
///
/// assert_eq!(clean_path("/fr/about/", &registry), "/about/");
/// assert_eq!(clean_path("/about/", &registry), "/about/");
/// assert_eq!(clean_path("/fr/", &registry), "/");
/// ```
pub fn clean_path(path: &str, registry: &LanguageRegistry) -> String {
	let Some(first_segment) = path.strip_prefix('/').and_then(|p| p.split('/').next()) else {
		return path.to_string();
	};
	if first_segment.is_empty() {
		return path.to_string();
	}

	for code in registry.supported_languages() {
		if code.eq_ignore_ascii_case(first_segment) {
			let rest = &path[1 + first_segment.len()..];
			return if rest.is_empty() {
				"/".to_string()
			} else {
				rest.to_string()
			};
		}
	}
	path.to_string()
}

/// The address of the current page in every supported language
///
/// `path` may carry a language prefix or not; it is cleaned first. Entries
/// come back in the registry's language order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use polyglot::language::Language;
/// use polyglot::registry::LanguageRegistry;
/// use polyglot::store::{InMemoryLanguageStore, LanguageStore};
/// use polyglot::switcher::language_urls;
///
/// let store = Arc::new(InMemoryLanguageStore::new());
/// store.save(Language::new("en").as_default()).unwrap();
/// store.save(Language::new("fr")).unwrap();
/// let registry = LanguageRegistry::new(store, "en");
///
/// let urls = language_urls("/fr/about/", &registry);
/// assert_eq!(urls[0].url, "/about/");  // en, the default
/// assert_eq!(urls[1].url, "/fr/about/");
/// ```
pub fn language_urls(path: &str, registry: &LanguageRegistry) -> Vec<LanguageUrl> {
	let snapshot = registry.snapshot();
	let clean = clean_path(path, registry);

	snapshot
		.supported
		.iter()
		.map(|code| {
			let default = *code == snapshot.default;
			let url = if default {
				clean.clone()
			} else {
				format!("/{}{}", code, clean)
			};
			LanguageUrl {
				code: code.clone(),
				url,
				default,
			}
		})
		.collect()
}
