//! Type-keyed storage attached to a request.
//!
//! Middleware stamps request-scoped values here (the resolved language,
//! session data) without the request type having to know about them.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Type-safe extension storage
///
/// Values are keyed by their type; storing a second value of the same type
/// replaces the first. Reads return clones, so stored types should be cheap
/// to clone (or wrapped in `Arc`).
///
/// # Examples
///
/// ```
/// use polyglot::http::Extensions;
///
/// let extensions = Extensions::new();
/// extensions.insert("fr".to_string());
///
/// assert_eq!(extensions.get::<String>(), Some("fr".to_string()));
/// assert_eq!(extensions.get::<u32>(), None);
/// ```
#[derive(Clone, Default)]
pub struct Extensions {
	map: Arc<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl Extensions {
	/// Create an empty extension map
	pub fn new() -> Self {
		Self::default()
	}

	/// Store a value, replacing any previous value of the same type
	pub fn insert<T: Send + Sync + 'static>(&self, value: T) {
		self.map
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.insert(TypeId::of::<T>(), Box::new(value));
	}

	/// Get a clone of the stored value of type `T`, if any
	pub fn get<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.map
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	}

	/// Remove and return the stored value of type `T`, if any
	pub fn remove<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		self.map
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.remove(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>().cloned())
	}

	/// Check whether a value of type `T` is present
	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		self.map
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.contains_key(&TypeId::of::<T>())
	}
}
