//! Request-scoped session data.
//!
//! The pipeline does not own session transport (cookies, backends, TTLs);
//! the host installs a [`SessionData`] on the request's extensions and the
//! resolver reads the language preference out of it.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Typed key/value session map
///
/// # Examples
///
/// ```
/// use polyglot::session::SessionData;
///
/// let mut session = SessionData::new();
/// session.set("polyglot_language", "fr").unwrap();
///
/// assert_eq!(session.get::<String>("polyglot_language"), Some("fr".to_string()));
/// assert_eq!(session.get::<String>("missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionData {
	values: HashMap<String, Value>,
}

impl SessionData {
	/// Create an empty session
	pub fn new() -> Self {
		Self::default()
	}

	/// Get a value, deserialized as `T`
	///
	/// A missing key or a value of the wrong shape both yield `None`.
	pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		self.values
			.get(key)
			.and_then(|v| serde_json::from_value(v.clone()).ok())
	}

	/// Store a value under `key`
	///
	/// # Errors
	///
	/// Fails when the value cannot be serialized.
	pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> serde_json::Result<()> {
		self.values.insert(key.into(), serde_json::to_value(value)?);
		Ok(())
	}

	/// Remove a value
	pub fn delete(&mut self, key: &str) {
		self.values.remove(key);
	}

	/// Whether a key is present
	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}
}
