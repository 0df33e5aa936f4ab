//! Task-scoped active language.
//!
//! The middleware scopes the resolved language around handler execution;
//! anything running inside that scope (views, the switcher, display-name
//! lookups) can read it without threading it through call signatures. The
//! scope is released when the wrapped future completes, errors, or panics,
//! and never leaks between concurrently handled requests.

use std::future::Future;

tokio::task_local! {
	static ACTIVE_LANGUAGE: String;
}

/// Run `fut` with `language` active
///
/// # Examples
///
/// ```
/// use polyglot::activation::{current_language, with_active_language};
///
/// # tokio_test::block_on(async {
/// assert_eq!(current_language(), None);
///
/// let seen = with_active_language("fr".to_string(), async {
///     current_language()
/// }).await;
///
/// assert_eq!(seen, Some("fr".to_string()));
/// assert_eq!(current_language(), None);
/// # });
/// ```
pub async fn with_active_language<F>(language: String, fut: F) -> F::Output
where
	F: Future,
{
	ACTIVE_LANGUAGE.scope(language, fut).await
}

/// The language active for the current task, if any
pub fn current_language() -> Option<String> {
	ACTIVE_LANGUAGE.try_with(|language| language.clone()).ok()
}
