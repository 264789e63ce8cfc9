//! ppl-directory: people directory backends for ppl.
//!
//! Each backend implements [`ppl_core::PeopleSearch`] so it can be handed
//! straight to the picker controller.

pub mod json;
pub mod memory;
pub mod roster;

pub use memory::InMemoryDirectory;
pub use roster::demo_roster;

use ppl_core::SearchError;
use thiserror::Error;

/// Errors raised while loading a directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read directory file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid directory file {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<DirectoryError> for SearchError {
    fn from(e: DirectoryError) -> Self {
        SearchError::Backend(e.to_string())
    }
}
