//! JSON directory files: a top-level array of people.
//!
//! ```json
//! [
//!   { "id": "1", "name": "Ann Lee", "email": "ann@example.com", "alias": "annie" }
//! ]
//! ```

use crate::{memory::InMemoryDirectory, DirectoryError};
use ppl_core::Person;
use std::path::Path;

/// Parse a directory file into people.
pub fn load_people(path: &Path) -> Result<Vec<Person>, DirectoryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let people: Vec<Person> = serde_json::from_str(&raw).map_err(|source| DirectoryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), people = people.len(), "directory: loaded");
    Ok(people)
}

impl InMemoryDirectory {
    /// Load an in-memory directory from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryError> {
        load_people(path).map(InMemoryDirectory::new)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
