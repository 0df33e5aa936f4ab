//! Per-language content translations for host entities.
//!
//! An entity that carries translations implements [`Translatable`]; its
//! translations are owned records keyed by language code. Display names are
//! memoized in a process-wide [`DisplayNameCache`] keyed by
//! `(entity type, entity id, language)` so listing views do not re-run
//! lookups for every row.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::activation::current_language;

/// A single translation record owned by a translatable entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
	/// Language code this translation is written in
	pub language: String,
	/// Translated display content
	pub content: String,
}

impl Translation {
	/// Create a translation record
	pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			language: language.into(),
			content: content.into(),
		}
	}
}

/// An entity with per-language translations
pub trait Translatable {
	/// Stable entity type label, e.g. "category"
	fn entity_type(&self) -> &str;

	/// Entity identifier, unique within its type
	fn entity_id(&self) -> u64;

	/// The entity's translated content for `language`, if one exists
	fn translation(&self, language: &str) -> Option<String>;
}

/// Memoized display names for translatable entities
///
/// The lookup chain mirrors what listing views need: the requested
/// language's translation, else the default language's translation marked
/// as untranslated, else a type/id placeholder.
///
/// # Examples
///
/// ```
/// use polyglot::translatable::{DisplayNameCache, Translatable, Translation};
///
/// struct Category {
///     id: u64,
///     translations: Vec<Translation>,
/// }
///
/// impl Translatable for Category {
///     fn entity_type(&self) -> &str {
///         "category"
///     }
///     fn entity_id(&self) -> u64 {
///         self.id
///     }
///     fn translation(&self, language: &str) -> Option<String> {
///         self.translations
///             .iter()
///             .find(|t| t.language == language)
///             .map(|t| t.content.clone())
///     }
/// }
///
/// let category = Category {
///     id: 1,
///     translations: vec![Translation::new("en", "Books")],
/// };
/// let cache = DisplayNameCache::new();
///
/// assert_eq!(cache.display_name(&category, Some("en"), "en"), "Books");
/// assert_eq!(
///     cache.display_name(&category, Some("fr"), "en"),
///     "Books (not translated in fr)"
/// );
/// ```
#[derive(Default)]
pub struct DisplayNameCache {
	names: RwLock<HashMap<(String, u64, String), String>>,
}

impl DisplayNameCache {
	/// Create an empty cache
	pub fn new() -> Self {
		Self::default()
	}

	/// The display name of `object` in `language`
	///
	/// When `language` is `None`, the task's active language is used,
	/// falling back to `default_language`.
	pub fn display_name(
		&self,
		object: &dyn Translatable,
		language: Option<&str>,
		default_language: &str,
	) -> String {
		let language = language
			.map(str::to_string)
			.or_else(current_language)
			.unwrap_or_else(|| default_language.to_string());
		let key = (
			object.entity_type().to_string(),
			object.entity_id(),
			language.clone(),
		);

		if let Some(name) = self
			.names
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.get(&key)
		{
			return name.clone();
		}

		let name = object
			.translation(&language)
			.or_else(|| {
				object
					.translation(default_language)
					.map(|n| format!("{} (not translated in {})", n, language))
			})
			.unwrap_or_else(|| {
				format!(
					"{} #{} (not translated in {})",
					object.entity_type(),
					object.entity_id(),
					language
				)
			});

		self.names
			.write()
			.unwrap_or_else(|e| e.into_inner())
			.insert(key, name.clone());
		name
	}

	/// Refresh the cached name after a translation write
	pub fn update_name(&self, object: &dyn Translatable, language: &str, name: impl Into<String>) {
		let key = (
			object.entity_type().to_string(),
			object.entity_id(),
			language.to_string(),
		);
		self.names
			.write()
			.unwrap_or_else(|e| e.into_inner())
			.insert(key, name.into());
	}

	/// Drop every cached name for `object`
	pub fn invalidate(&self, object: &dyn Translatable) {
		let entity_type = object.entity_type();
		let entity_id = object.entity_id();
		self.names
			.write()
			.unwrap_or_else(|e| e.into_inner())
			.retain(|(t, id, _), _| !(t == entity_type && *id == entity_id));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::activation::with_active_language;

	struct Category {
		id: u64,
		translations: Vec<Translation>,
	}

	impl Translatable for Category {
		fn entity_type(&self) -> &str {
			"category"
		}

		fn entity_id(&self) -> u64 {
			self.id
		}

		fn translation(&self, language: &str) -> Option<String> {
			self.translations
				.iter()
				.find(|t| t.language == language)
				.map(|t| t.content.clone())
		}
	}

	fn books() -> Category {
		Category {
			id: 7,
			translations: vec![
				Translation::new("en", "Books"),
				Translation::new("fr", "Livres"),
			],
		}
	}

	#[test]
	fn exact_translation_wins() {
		let cache = DisplayNameCache::new();
		assert_eq!(cache.display_name(&books(), Some("fr"), "en"), "Livres");
	}

	#[test]
	fn missing_translation_falls_back_to_the_default() {
		let cache = DisplayNameCache::new();
		assert_eq!(
			cache.display_name(&books(), Some("de"), "en"),
			"Books (not translated in de)"
		);
	}

	#[test]
	fn untranslated_entity_gets_a_placeholder() {
		let empty = Category {
			id: 9,
			translations: vec![],
		};
		let cache = DisplayNameCache::new();
		assert_eq!(
			cache.display_name(&empty, Some("fr"), "en"),
			"category #9 (not translated in fr)"
		);
	}

	#[tokio::test]
	async fn active_language_is_used_when_none_is_given() {
		let cache = DisplayNameCache::new();
		let name = with_active_language("fr".to_string(), async {
			cache.display_name(&books(), None, "en")
		})
		.await;

		assert_eq!(name, "Livres");
	}

	#[test]
	fn update_name_overrides_the_cached_value() {
		let cache = DisplayNameCache::new();
		let category = books();

		assert_eq!(cache.display_name(&category, Some("fr"), "en"), "Livres");
		cache.update_name(&category, "fr", "Bouquins");
		assert_eq!(cache.display_name(&category, Some("fr"), "en"), "Bouquins");
	}

	#[test]
	fn invalidate_clears_all_languages_for_the_entity() {
		let cache = DisplayNameCache::new();
		let category = books();

		cache.update_name(&category, "fr", "stale");
		cache.update_name(&category, "en", "stale");
		cache.invalidate(&category);

		assert_eq!(cache.display_name(&category, Some("fr"), "en"), "Livres");
		assert_eq!(cache.display_name(&category, Some("en"), "en"), "Books");
	}
}
