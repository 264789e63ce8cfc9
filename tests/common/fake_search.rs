//! Fake people search for controller harnesses.
//!
//! [`FakeSearch`] answers from a fixed roster with a case-insensitive name
//! match, records every query it receives, and can be told to delay, fail or
//! panic for specific queries. Clones share the call log so a test can keep
//! one handle while the controller owns another.

use ppl_core::{PeopleSearch, Person, SearchError, SearchFuture};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

#[derive(Clone, Default)]
pub struct FakeSearch {
    roster: Arc<Vec<Person>>,
    latency: Duration,
    per_query_latency: HashMap<String, Duration>,
    failing: HashMap<String, String>,
    panicking: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSearch {
    pub fn new(roster: Vec<Person>) -> Self {
        Self {
            roster: Arc::new(roster),
            ..Self::default()
        }
    }

    /// Delay every search by `latency`.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay searches for exactly `query` by `latency` instead.
    pub fn latency_for(mut self, query: &str, latency: Duration) -> Self {
        self.per_query_latency.insert(query.to_string(), latency);
        self
    }

    /// Reject `query` with a backend error.
    pub fn fail_on(mut self, query: &str, message: &str) -> Self {
        self.failing.insert(query.to_string(), message.to_string());
        self
    }

    /// Panic inside the search future for `query`.
    pub fn panic_on(mut self, query: &str) -> Self {
        self.panicking.push(query.to_string());
        self
    }

    /// Every query received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl PeopleSearch for FakeSearch {
    fn search(&self, query: String) -> SearchFuture {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.clone());
        }
        let latency = self
            .per_query_latency
            .get(&query)
            .copied()
            .unwrap_or(self.latency);
        let failure = self.failing.get(&query).cloned();
        let panics = self.panicking.contains(&query);
        let roster = Arc::clone(&self.roster);

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if panics {
                panic!("fake search exploded on {query:?}");
            }
            if let Some(message) = failure {
                return Err(SearchError::backend(message));
            }
            let needle = query.trim().to_lowercase();
            Ok(roster
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        })
    }
}
