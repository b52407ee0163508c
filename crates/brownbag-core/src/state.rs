//! Load-Content-Error lifecycle state.
//!
//! `ContentState<T>` is the only value an observer ever receives. Within one
//! load attempt the observed sequence is `[Loading, terminal]`, or just
//! `[Loading]` when the attempt was cancelled before its terminal delivery.

use crate::identifiers::ContentId;
use serde::{Deserialize, Serialize};

/// Cause carried by [`ContentState::Error`].
///
/// Carries no retry policy; retrying is the caller re-invoking the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LoadError {
    /// The repository had no value for the requested identifier
    #[error("content not found: {}", display_id(.id))]
    NotFound {
        /// Requested identifier (`None` for a collection fetch)
        id: Option<ContentId>,
    },

    /// The loader's failure schedule forced this attempt to fail
    #[error("injected failure on delivered attempt {attempt}")]
    Injected {
        /// 1-based ordinal of the delivered attempt
        attempt: u64,
    },

    /// The time capability failed while applying the artificial delay
    #[error("clock failure: {reason}")]
    Clock {
        /// Description from the time handler
        reason: String,
    },
}

fn display_id(id: &Option<ContentId>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "<collection>".to_string(),
    }
}

impl LoadError {
    /// Create a not-found error for the given identifier
    pub fn not_found(id: Option<ContentId>) -> Self {
        Self::NotFound { id }
    }
}

/// Lifecycle phase of a requested resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentState<T> {
    /// Attempt started, nothing resolved yet
    Loading,
    /// Resource resolved
    Content(T),
    /// Attempt failed
    Error(LoadError),
}

impl<T> ContentState<T> {
    /// Check if the attempt is still loading.
    pub fn is_loading(&self) -> bool {
        matches!(self, ContentState::Loading)
    }

    /// Check if the state carries content.
    pub fn is_content(&self) -> bool {
        matches!(self, ContentState::Content(_))
    }

    /// Check if the state is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ContentState::Error(_))
    }

    /// `Content` and `Error` end an attempt.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Get the content if present.
    pub fn content(&self) -> Option<&T> {
        match self {
            ContentState::Content(value) => Some(value),
            _ => None,
        }
    }

    /// Get the error cause if present.
    pub fn error(&self) -> Option<&LoadError> {
        match self {
            ContentState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Consume the state, returning the content if present.
    pub fn into_content(self) -> Option<T> {
        match self {
            ContentState::Content(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the payload.
    pub fn as_ref(&self) -> ContentState<&T> {
        match self {
            ContentState::Loading => ContentState::Loading,
            ContentState::Content(value) => ContentState::Content(value),
            ContentState::Error(err) => ContentState::Error(err.clone()),
        }
    }

    /// Map the content if present.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ContentState<U> {
        match self {
            ContentState::Loading => ContentState::Loading,
            ContentState::Content(value) => ContentState::Content(f(value)),
            ContentState::Error(err) => ContentState::Error(err),
        }
    }
}

impl<T> Default for ContentState<T> {
    fn default() -> Self {
        ContentState::Loading
    }
}

impl<T> From<Result<T, LoadError>> for ContentState<T> {
    fn from(result: Result<T, LoadError>) -> Self {
        match result {
            Ok(value) => ContentState::Content(value),
            Err(err) => ContentState::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(ContentState::<u32>::Loading, ContentState::Loading);
        assert_eq!(ContentState::Content(7), ContentState::Content(7));
        assert_ne!(ContentState::Content(7), ContentState::Content(8));

        let a: ContentState<u32> = ContentState::Error(LoadError::not_found(Some("x".into())));
        let b: ContentState<u32> = ContentState::Error(LoadError::not_found(Some("x".into())));
        let c: ContentState<u32> = ContentState::Error(LoadError::Injected { attempt: 1 });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_predicates() {
        let loading: ContentState<&str> = ContentState::Loading;
        assert!(loading.is_loading());
        assert!(!loading.is_terminal());

        let content = ContentState::Content("post");
        assert!(content.is_content());
        assert!(content.is_terminal());
        assert_eq!(content.content(), Some(&"post"));

        let error: ContentState<&str> = ContentState::Error(LoadError::Injected { attempt: 3 });
        assert!(error.is_error());
        assert!(error.is_terminal());
        assert_eq!(error.error(), Some(&LoadError::Injected { attempt: 3 }));
        assert_eq!(error.content(), None);
    }

    #[test]
    fn test_map_keeps_variant() {
        assert_eq!(ContentState::Content(2).map(|v| v * 10), ContentState::Content(20));
        assert_eq!(
            ContentState::<i32>::Loading.map(|v| v * 10),
            ContentState::Loading
        );
        let err = LoadError::not_found(None);
        assert_eq!(
            ContentState::<i32>::Error(err.clone()).map(|v| v * 10),
            ContentState::Error(err)
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LoadError::not_found(Some("p9".into())).to_string(),
            "content not found: p9"
        );
        assert_eq!(
            LoadError::not_found(None).to_string(),
            "content not found: <collection>"
        );
    }

    #[test]
    fn test_from_result() {
        let ok: ContentState<u8> = Ok(1).into();
        assert_eq!(ok, ContentState::Content(1));
        let err: ContentState<u8> = Err(LoadError::Injected { attempt: 1 }).into();
        assert!(err.is_error());
    }
}
