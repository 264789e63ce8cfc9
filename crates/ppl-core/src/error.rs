//! Error types for search backends.
//!
//! A [`SearchError`] never leaves the controller: a failed search is logged
//! and treated as "no results this round".

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The backend reported a failure.
    #[error("search backend failed: {0}")]
    Backend(String),
    /// The search task panicked or was cancelled before it reported back.
    #[error("search task aborted: {0}")]
    Aborted(String),
    /// There is no async runtime to run the search on.
    #[error("no async runtime available to run the search")]
    Unavailable,
}

impl SearchError {
    pub fn backend(msg: impl Into<String>) -> Self {
        SearchError::Backend(msg.into())
    }
}
