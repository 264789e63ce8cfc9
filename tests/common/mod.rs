//! Shared test utilities for ppl integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timing-sensitive helpers assume the test runs with
//! `#[tokio::test(start_paused = true)]`.

pub mod assertions;
pub mod builders;
pub mod fake_search;

pub use assertions::*;
pub use builders::*;
pub use fake_search::*;
