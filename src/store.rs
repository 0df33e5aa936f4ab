//! Language persistence interface and the in-memory reference store.
//!
//! The store is an external collaborator from the pipeline's point of view:
//! the registry only needs the lookup methods and a change subscription.
//! [`InMemoryLanguageStore`] is the reference implementation and the one the
//! test suite runs against; a database-backed store implements the same
//! trait.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{Error, Result};
use crate::language::Language;

/// A committed change to the language set
#[derive(Debug, Clone)]
pub enum LanguageChange {
	/// A language was created or updated
	Saved(Language),
	/// A language was deleted
	Deleted(String),
}

/// Callback invoked synchronously after a change commits
pub type LanguageChangeCallback = Box<dyn Fn(&LanguageChange) + Send + Sync>;

/// Persistence interface for languages
///
/// Implementations must uphold the single-default invariant: once any
/// language exists, exactly one is flagged default. Writes that would break
/// it are rejected with [`Error::InvariantViolation`] and leave the store
/// unchanged. Change callbacks fire after a successful commit, before the
/// write call returns.
pub trait LanguageStore: Send + Sync {
	/// The language currently flagged as default, if any
	fn find_default(&self) -> Option<Language>;

	/// All language codes, lexicographically ordered
	fn list_codes_ordered(&self) -> Vec<String>;

	/// Look up a language by code
	fn get(&self, code: &str) -> Option<Language>;

	/// Create or update a language
	///
	/// Saving a language with `default = true` atomically demotes the
	/// previous default.
	///
	/// # Errors
	///
	/// [`Error::InvariantViolation`] when the write would leave zero
	/// defaults while languages exist, or the code is malformed.
	fn save(&self, language: Language) -> Result<()>;

	/// Delete a language by code
	///
	/// # Errors
	///
	/// [`Error::InvariantViolation`] when `code` is the current default;
	/// [`Error::NotFound`] when it does not exist.
	fn delete(&self, code: &str) -> Result<()>;

	/// Register a change callback
	fn subscribe(&self, callback: LanguageChangeCallback);
}

/// In-memory language store
///
/// # Examples
///
/// ```
/// use polyglot::language::Language;
/// use polyglot::store::{InMemoryLanguageStore, LanguageStore};
///
/// let store = InMemoryLanguageStore::new();
/// store.save(Language::new("en").as_default()).unwrap();
/// store.save(Language::new("fr")).unwrap();
///
/// assert_eq!(store.find_default().unwrap().code, "en");
/// assert_eq!(store.list_codes_ordered(), vec!["en", "fr"]);
/// ```
#[derive(Default)]
pub struct InMemoryLanguageStore {
	languages: RwLock<BTreeMap<String, Language>>,
	callbacks: RwLock<Vec<LanguageChangeCallback>>,
}

impl InMemoryLanguageStore {
	/// Create an empty store
	pub fn new() -> Self {
		Self::default()
	}

	/// All languages, ordered by code
	pub fn all(&self) -> Vec<Language> {
		self.languages
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.values()
			.cloned()
			.collect()
	}

	/// Number of stored languages
	pub fn len(&self) -> usize {
		self.languages
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.len()
	}

	/// Whether the store holds no languages
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn notify(&self, change: &LanguageChange) {
		let callbacks = self.callbacks.read().unwrap_or_else(|e| e.into_inner());
		for callback in callbacks.iter() {
			callback(change);
		}
	}
}

impl LanguageStore for InMemoryLanguageStore {
	fn find_default(&self) -> Option<Language> {
		self.languages
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.values()
			.find(|l| l.default)
			.cloned()
	}

	fn list_codes_ordered(&self) -> Vec<String> {
		// BTreeMap keys are already in lexicographic order
		self.languages
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.keys()
			.cloned()
			.collect()
	}

	fn get(&self, code: &str) -> Option<Language> {
		self.languages
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.get(code)
			.cloned()
	}

	fn save(&self, language: Language) -> Result<()> {
		if !Language::is_valid_code(&language.code) {
			return Err(Error::InvariantViolation(format!(
				"{:?} is not a well-formed language code",
				language.code
			)));
		}

		{
			let mut languages = self.languages.write().unwrap_or_else(|e| e.into_inner());
			let current_default = languages.values().find(|l| l.default).cloned();

			if language.default {
				if let Some(previous) = &current_default
					&& previous.code != language.code
				{
					debug!(previous = %previous.code, new = %language.code, "demoting previous default language");
					if let Some(entry) = languages.get_mut(&previous.code) {
						entry.default = false;
					}
				}
			} else {
				let demotes_only_default = current_default
					.as_ref()
					.is_some_and(|d| d.code == language.code);
				if demotes_only_default {
					return Err(Error::InvariantViolation(format!(
						"saving {:?} as non-default would leave no default language",
						language.code
					)));
				}
				if languages.is_empty() {
					return Err(Error::InvariantViolation(
						"the first language must be saved as the default".to_string(),
					));
				}
			}

			languages.insert(language.code.clone(), language.clone());
		}

		debug!(language = %language, default = language.default, "language saved");
		self.notify(&LanguageChange::Saved(language));
		Ok(())
	}

	fn delete(&self, code: &str) -> Result<()> {
		{
			let mut languages = self.languages.write().unwrap_or_else(|e| e.into_inner());
			match languages.get(code) {
				None => return Err(Error::NotFound(format!("language {:?}", code))),
				Some(language) if language.default => {
					return Err(Error::InvariantViolation(
						"cannot delete the default language".to_string(),
					));
				}
				Some(_) => {
					languages.remove(code);
				}
			}
		}

		debug!(code, "language deleted");
		self.notify(&LanguageChange::Deleted(code.to_string()));
		Ok(())
	}

	fn subscribe(&self, callback: LanguageChangeCallback) {
		self.callbacks
			.write()
			.unwrap_or_else(|e| e.into_inner())
			.push(callback);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[test]
	fn first_language_must_be_default() {
		let store = InMemoryLanguageStore::new();

		let err = store.save(Language::new("en")).unwrap_err();
		assert!(err.is_invariant_violation());
		assert!(store.is_empty());
	}

	#[test]
	fn saving_a_new_default_demotes_the_previous_one() {
		let store = InMemoryLanguageStore::new();
		store.save(Language::new("en").as_default()).unwrap();
		store.save(Language::new("fr").as_default()).unwrap();

		assert_eq!(store.find_default().unwrap().code, "fr");
		assert!(!store.get("en").unwrap().default);

		let defaults = store.all().iter().filter(|l| l.default).count();
		assert_eq!(defaults, 1);
	}

	#[test]
	fn cannot_unset_the_only_default() {
		let store = InMemoryLanguageStore::new();
		store.save(Language::new("en").as_default()).unwrap();

		let err = store.save(Language::new("en")).unwrap_err();
		assert!(err.is_invariant_violation());
		assert!(store.get("en").unwrap().default);
	}

	#[test]
	fn deleting_the_default_is_rejected_and_store_unchanged() {
		let store = InMemoryLanguageStore::new();
		store.save(Language::new("en").as_default()).unwrap();
		store.save(Language::new("fr")).unwrap();

		let err = store.delete("en").unwrap_err();
		assert!(err.is_invariant_violation());
		assert_eq!(store.list_codes_ordered(), vec!["en", "fr"]);
	}

	#[test]
	fn deleting_a_missing_language_is_not_found() {
		let store = InMemoryLanguageStore::new();
		store.save(Language::new("en").as_default()).unwrap();

		assert!(matches!(store.delete("de"), Err(Error::NotFound(_))));
	}

	#[test]
	fn malformed_codes_are_rejected() {
		let store = InMemoryLanguageStore::new();

		let err = store.save(Language::new("en_US").as_default()).unwrap_err();
		assert!(err.is_invariant_violation());
	}

	#[test]
	fn codes_list_in_lexicographic_order() {
		let store = InMemoryLanguageStore::new();
		store.save(Language::new("fr").as_default()).unwrap();
		store.save(Language::new("de")).unwrap();
		store.save(Language::new("en")).unwrap();

		assert_eq!(store.list_codes_ordered(), vec!["de", "en", "fr"]);
	}

	#[test]
	fn callbacks_fire_after_commit() {
		let store = InMemoryLanguageStore::new();
		let seen = Arc::new(AtomicUsize::new(0));
		let counter = seen.clone();
		store.subscribe(Box::new(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		}));

		store.save(Language::new("en").as_default()).unwrap();
		store.save(Language::new("fr")).unwrap();
		store.delete("fr").unwrap();

		assert_eq!(seen.load(Ordering::SeqCst), 3);
	}

	#[test]
	fn rejected_writes_do_not_notify() {
		let store = InMemoryLanguageStore::new();
		let seen = Arc::new(AtomicUsize::new(0));
		let counter = seen.clone();
		store.subscribe(Box::new(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		}));

		let _ = store.save(Language::new("en"));
		assert_eq!(seen.load(Ordering::SeqCst), 0);
	}
}
