//! Search backend seam.
//!
//! The controller talks to whatever directory it was given through
//! [`PeopleSearch`]. Any `Fn(String) -> impl Future<Output = Result<..>>`
//! closure implements the trait, so callers can pass an `async move` block
//! without writing a type.

use crate::{error::SearchError, types::Person};
use futures::future::BoxFuture;
use std::future::Future;

/// The future returned by [`PeopleSearch::search`].
pub type SearchFuture = BoxFuture<'static, Result<Vec<Person>, SearchError>>;

/// An asynchronous people search.
///
/// The returned future is spawned onto a tokio task, so it must own its data.
/// It is never cancelled by the controller: a superseded search keeps running
/// and its completion is resolved by the controller's stale policy.
pub trait PeopleSearch: Send + Sync {
    fn search(&self, query: String) -> SearchFuture;
}

impl<F, Fut> PeopleSearch for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Person>, SearchError>> + Send + 'static,
{
    fn search(&self, query: String) -> SearchFuture {
        Box::pin(self(query))
    }
}
