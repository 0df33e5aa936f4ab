//! Error types shared across the crate.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the language store, registry, and middleware
#[derive(Debug, Error)]
pub enum Error {
	/// Fatal configuration problem, detected at construction time.
	/// Never raised per-request.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// A write would break the language invariants (deleting the default
	/// language, or leaving zero defaults while languages exist).
	#[error("invariant violation: {0}")]
	InvariantViolation(String),

	/// A looked-up entity does not exist
	#[error("not found: {0}")]
	NotFound(String),

	/// Unexpected internal failure (malformed header values and the like)
	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// Returns true for errors that reject a store write
	pub fn is_invariant_violation(&self) -> bool {
		matches!(self, Error::InvariantViolation(_))
	}
}
