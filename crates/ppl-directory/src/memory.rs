//! In-memory directory with optional simulated latency.
//!
//! Matching is a case-insensitive substring test against name, email and
//! alias. Results keep directory order.

use ppl_core::{PeopleSearch, Person, SearchFuture};
use std::{sync::Arc, time::Duration};

#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    people: Arc<Vec<Person>>,
    latency: Duration,
}

impl InMemoryDirectory {
    pub fn new(people: Vec<Person>) -> Self {
        Self {
            people: Arc::new(people),
            latency: Duration::ZERO,
        }
    }

    /// Delay every search by `latency`, like a remote directory would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Look a person up by exact email.
    pub fn find_by_email(&self, email: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.email.eq_ignore_ascii_case(email))
    }

    /// Synchronous match, shared by the async search path.
    pub fn matching(&self, query: &str) -> Vec<Person> {
        matching(&self.people, query)
    }
}

fn matching(people: &[Person], query: &str) -> Vec<Person> {
    let needle = query.to_lowercase();
    people
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.email.to_lowercase().contains(&needle)
                || p
                    .alias
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

impl PeopleSearch for InMemoryDirectory {
    fn search(&self, query: String) -> SearchFuture {
        let people = Arc::clone(&self.people);
        let latency = self.latency;
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let found = matching(&people, &query);
            tracing::debug!(query = %query, found = found.len(), "directory: search");
            Ok(found)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
