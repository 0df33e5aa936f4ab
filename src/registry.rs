//! Process-wide cached view of the configured languages.
//!
//! The registry caches the `(default, supported)` pair so per-request
//! resolution never touches the store. The cache is lazily populated on
//! first access and invalidated by store change callbacks; a snapshot is
//! swapped whole, so concurrent readers observe either the fully-old or the
//! fully-new state, never a partial one.

use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::store::{LanguageChange, LanguageStore};

/// Immutable view of the configured languages at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSnapshot {
	/// Code of the default language
	pub default: String,
	/// All supported codes, lexicographically ordered
	pub supported: Vec<String>,
}

/// Cached language configuration
///
/// Reads are lock-cheap snapshot clones; only the first cold read per
/// process queries the store, guarded so concurrent cold reads collapse
/// into a single query. Store writes invalidate the cache through the
/// change subscription wired up by [`LanguageRegistry::new`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use polyglot::language::Language;
/// use polyglot::registry::LanguageRegistry;
/// use polyglot::store::{InMemoryLanguageStore, LanguageStore};
///
/// let store = Arc::new(InMemoryLanguageStore::new());
/// store.save(Language::new("en").as_default()).unwrap();
/// store.save(Language::new("fr")).unwrap();
///
/// let registry = LanguageRegistry::new(store, "en");
/// assert_eq!(registry.default_language(), "en");
/// assert_eq!(registry.supported_languages(), vec!["en", "fr"]);
/// ```
pub struct LanguageRegistry {
	store: Arc<dyn LanguageStore>,
	fallback: String,
	snapshot: RwLock<Option<Arc<LanguageSnapshot>>>,
	// Collapses concurrent cold reads into one store query
	cold_load: Mutex<()>,
}

impl LanguageRegistry {
	/// Create a registry over `store` and subscribe to its changes
	///
	/// `fallback` is the statically configured code used when the store
	/// holds no languages at all.
	pub fn new(store: Arc<dyn LanguageStore>, fallback: impl Into<String>) -> Arc<Self> {
		let registry = Arc::new(Self {
			store: store.clone(),
			fallback: fallback.into(),
			snapshot: RwLock::new(None),
			cold_load: Mutex::new(()),
		});

		let weak = Arc::downgrade(&registry);
		store.subscribe(Box::new(move |change| {
			let Some(registry) = weak.upgrade() else {
				return;
			};
			match change {
				LanguageChange::Saved(_) => registry.invalidate(),
				LanguageChange::Deleted(code) => registry.on_language_deleted(code),
			}
		}));

		registry
	}

	/// The current snapshot, loading it from the store when cold
	pub fn snapshot(&self) -> Arc<LanguageSnapshot> {
		if let Some(snapshot) = self
			.snapshot
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.clone()
		{
			return snapshot;
		}

		let _guard = self.cold_load.lock().unwrap_or_else(|e| e.into_inner());
		// Another thread may have loaded while we waited for the guard
		if let Some(snapshot) = self
			.snapshot
			.read()
			.unwrap_or_else(|e| e.into_inner())
			.clone()
		{
			return snapshot;
		}

		let snapshot = Arc::new(self.load());
		*self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.clone());
		snapshot
	}

	/// Code of the default language
	pub fn default_language(&self) -> String {
		self.snapshot().default.clone()
	}

	/// All supported codes, lexicographically ordered
	pub fn supported_languages(&self) -> Vec<String> {
		self.snapshot().supported.clone()
	}

	/// Whether `code` is a supported language
	pub fn is_supported(&self, code: &str) -> bool {
		self.snapshot().supported.iter().any(|c| c == code)
	}

	/// Drop the cached snapshot; the next read reloads from the store
	pub fn invalidate(&self) {
		debug!("language registry invalidated");
		*self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = None;
	}

	/// Remove `code` from the cached supported set without a full requery
	///
	/// A cold registry falls open to the full requery on next access. The
	/// default language cannot be deleted (the store rejects it), so the
	/// cached default never needs repair here.
	pub fn on_language_deleted(&self, code: &str) {
		let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
		if let Some(current) = guard.clone() {
			let supported: Vec<String> = current
				.supported
				.iter()
				.filter(|c| c.as_str() != code)
				.cloned()
				.collect();
			let supported = if supported.is_empty() {
				vec![self.fallback.clone()]
			} else {
				supported
			};
			*guard = Some(Arc::new(LanguageSnapshot {
				default: current.default.clone(),
				supported,
			}));
		}
	}

	fn load(&self) -> LanguageSnapshot {
		let default = self
			.store
			.find_default()
			.map(|l| l.code)
			.unwrap_or_else(|| self.fallback.clone());

		let mut supported = self.store.list_codes_ordered();
		if supported.is_empty() {
			supported = vec![self.fallback.clone()];
		}

		debug!(%default, supported = supported.len(), "language registry loaded");
		LanguageSnapshot { default, supported }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::Result;
	use crate::language::Language;
	use crate::store::{InMemoryLanguageStore, LanguageChangeCallback};
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Store decorator counting how often the backing queries run
	struct CountingStore {
		inner: InMemoryLanguageStore,
		queries: AtomicUsize,
	}

	impl CountingStore {
		fn new() -> Self {
			Self {
				inner: InMemoryLanguageStore::new(),
				queries: AtomicUsize::new(0),
			}
		}

		fn query_count(&self) -> usize {
			self.queries.load(Ordering::SeqCst)
		}
	}

	impl LanguageStore for CountingStore {
		fn find_default(&self) -> Option<Language> {
			self.queries.fetch_add(1, Ordering::SeqCst);
			self.inner.find_default()
		}

		fn list_codes_ordered(&self) -> Vec<String> {
			self.inner.list_codes_ordered()
		}

		fn get(&self, code: &str) -> Option<Language> {
			self.inner.get(code)
		}

		fn save(&self, language: Language) -> Result<()> {
			self.inner.save(language)
		}

		fn delete(&self, code: &str) -> Result<()> {
			self.inner.delete(code)
		}

		fn subscribe(&self, callback: LanguageChangeCallback) {
			self.inner.subscribe(callback)
		}
	}

	fn seeded_store() -> Arc<InMemoryLanguageStore> {
		let store = Arc::new(InMemoryLanguageStore::new());
		store.save(Language::new("en").as_default()).unwrap();
		store.save(Language::new("fr")).unwrap();
		store
	}

	#[test]
	fn empty_store_falls_back_to_configured_code() {
		let store = Arc::new(InMemoryLanguageStore::new());
		let registry = LanguageRegistry::new(store, "en");

		assert_eq!(registry.default_language(), "en");
		assert_eq!(registry.supported_languages(), vec!["en"]);
	}

	#[test]
	fn warm_reads_do_not_requery_the_store() {
		let store = Arc::new(CountingStore::new());
		store.save(Language::new("en").as_default()).unwrap();
		let registry = LanguageRegistry::new(store.clone(), "en");

		for _ in 0..5 {
			assert_eq!(registry.default_language(), "en");
		}
		assert_eq!(store.query_count(), 1);
	}

	#[test]
	fn concurrent_cold_reads_collapse_into_one_query() {
		let store = Arc::new(CountingStore::new());
		store.save(Language::new("en").as_default()).unwrap();
		let registry = LanguageRegistry::new(store.clone(), "en");

		std::thread::scope(|scope| {
			for _ in 0..8 {
				scope.spawn(|| registry.default_language());
			}
		});

		assert_eq!(store.query_count(), 1);
	}

	#[test]
	fn store_writes_invalidate_through_the_subscription() {
		let store = seeded_store();
		let registry = LanguageRegistry::new(store.clone(), "en");
		assert_eq!(registry.default_language(), "en");

		store.save(Language::new("fr").as_default()).unwrap();

		assert_eq!(registry.default_language(), "fr");
		assert!(registry.is_supported("en"));
	}

	#[test]
	fn deletion_trims_the_cached_supported_set() {
		let store = seeded_store();
		let registry = LanguageRegistry::new(store.clone(), "en");
		assert!(registry.is_supported("fr"));

		store.delete("fr").unwrap();

		assert!(!registry.is_supported("fr"));
		assert_eq!(registry.default_language(), "en");
	}

	#[test]
	fn deletion_on_a_cold_registry_is_a_no_op() {
		let store = seeded_store();
		let registry = LanguageRegistry::new(store.clone(), "en");

		// Never read: the snapshot is still cold when the delete lands
		store.delete("fr").unwrap();

		assert_eq!(registry.supported_languages(), vec!["en"]);
	}

	#[test]
	fn changing_default_atomically_swaps_the_snapshot() {
		let store = seeded_store();
		let registry = LanguageRegistry::new(store.clone(), "en");

		let before = registry.snapshot();
		store.save(Language::new("fr").as_default()).unwrap();
		let after = registry.snapshot();

		assert_eq!(before.default, "en");
		assert_eq!(after.default, "fr");
		// Both views are internally consistent pairs
		assert_eq!(before.supported, vec!["en", "fr"]);
		assert_eq!(after.supported, vec!["en", "fr"]);
	}
}
