//! ppl-core: people picker core library.
//!
//! This crate holds everything beneath the presentation layer: the shared
//! [`Person`] / [`Selection`] types, the [`PeopleSearch`] backend seam, the
//! [`Debounce`] primitive and the [`PickerController`] state machine.
//!
//! # Architecture
//!
//! ```text
//! keystroke ──► raw query ──► Debounce ──► settled query ──► PeopleSearch
//!                                                               │
//!      owner ◄── selection change ◄── pick / remove   results ◄─┘
//! ```
//!
//! Search futures run on tokio tasks and report back over a channel that
//! only the controller reads. Everything else happens on the caller's thread.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod search;
pub mod types;

pub use controller::{PickerBuilder, PickerController, PickerOptions, SearchPhase, StalePolicy};
pub use debounce::Debounce;
pub use error::SearchError;
pub use search::{PeopleSearch, SearchFuture};
pub use types::{filter_unselected, Person, Selection};
