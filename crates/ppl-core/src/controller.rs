//! Selection controller: the state machine behind the picker.
//!
//! The controller owns the selection, the raw and settled query text, the
//! current result list and the loading / validation state. The presentation
//! layer reads it through accessors and talks to it through a handful of
//! intent operations:
//!
//! | Intent | Operation |
//! |--------|-----------|
//! | user typed | [`PickerController::set_query`] |
//! | user picked an option | [`PickerController::pick`] / [`PickerController::select`] |
//! | user deleted a chip | [`PickerController::remove`] |
//! | owner attempted submit | [`PickerController::set_submit_attempted`] |
//!
//! # Search lifecycle
//!
//! ```text
//!            settled query not searchable
//!   ┌──────────────────────────────────────────► Idle
//!   │
//! settled ──► Searching ──► Settled   (results filtered against live selection)
//!                  │
//!                  └──────► Failed    (logged, results cleared)
//! ```
//!
//! Search futures run on tokio tasks and report back as completions on an
//! internal channel. Nothing is applied until the owner drives the
//! controller with [`PickerController::poll`] (non-blocking, for render
//! loops) or [`PickerController::step`] (async). Each search carries a
//! sequence number; what happens to completions from superseded searches is
//! decided by [`StalePolicy`].

use crate::{
    debounce::{Debounce, DEFAULT_DELAY},
    error::SearchError,
    search::PeopleSearch,
    types::{filter_unselected, Person, Selection},
};
use std::{sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

/// Message shown under the search box when the required check fails and the
/// caller did not configure one.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Required field";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with a search completion that belongs to a superseded search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Only the most recently started search may write results. Going idle
    /// also invalidates every search still in flight.
    #[default]
    LatestWins,
    /// Every completion writes results in the order it arrives, so a slow
    /// search for an older query can overwrite a newer one.
    CompletionOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOptions {
    /// Minimum trimmed length (in characters) a settled query needs before a
    /// search is started.
    pub min_search_length: usize,
    /// Quiet period between the last keystroke and the settled query.
    pub debounce_delay: Duration,
    /// Enables the required-field check.
    pub is_required: bool,
    /// Message surfaced while the required check fails.
    pub required_error_message: String,
    pub stale_policy: StalePolicy,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            min_search_length: 0,
            debounce_delay: DEFAULT_DELAY,
            is_required: false,
            required_error_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
            stale_policy: StalePolicy::default(),
        }
    }
}

/// Explicit search state of the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// No search for the current settled query; results are empty.
    #[default]
    Idle,
    /// A search for the current settled query is in flight.
    Searching,
    /// The latest applied search succeeded.
    Settled,
    /// The latest applied search failed; results are empty.
    Failed,
}

type SelectionListener = Box<dyn FnMut(&[Person])>;

struct SearchCompletion {
    seq: u64,
    query: String,
    outcome: Result<Vec<Person>, SearchError>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and creates a [`PickerController`].
///
/// ```rust,no_run
/// use ppl_core::{PickerController, Person, SearchError};
///
/// let picker = PickerController::builder()
///     .min_search_length(3)
///     .search(|query: String| async move {
///         Ok::<_, SearchError>(vec![Person::new("1", query.clone(), format!("{query}@x.com"))])
///     })
///     .on_selection_change(|people| println!("{} selected", people.len()))
///     .build();
/// ```
#[derive(Default)]
pub struct PickerBuilder {
    options: PickerOptions,
    search: Option<Arc<dyn PeopleSearch>>,
    listener: Option<SelectionListener>,
    initial: Vec<Person>,
}

impl PickerBuilder {
    pub fn options(mut self, options: PickerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn min_search_length(mut self, len: usize) -> Self {
        self.options.min_search_length = len;
        self
    }

    pub fn debounce_delay(mut self, delay: Duration) -> Self {
        self.options.debounce_delay = delay;
        self
    }

    /// Enable the required-field check with the given message.
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.options.is_required = true;
        self.options.required_error_message = message.into();
        self
    }

    pub fn stale_policy(mut self, policy: StalePolicy) -> Self {
        self.options.stale_policy = policy;
        self
    }

    /// Search backend. Without one the picker never searches.
    pub fn search(self, search: impl PeopleSearch + 'static) -> Self {
        self.shared_search(Arc::new(search))
    }

    pub fn shared_search(mut self, search: Arc<dyn PeopleSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Called synchronously with the full selection after every mutation.
    pub fn on_selection_change(mut self, listener: impl FnMut(&[Person]) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn initial_selection(mut self, people: Vec<Person>) -> Self {
        self.initial = people;
        self
    }

    pub fn build(self) -> PickerController {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        PickerController {
            query: Debounce::new(String::new(), self.options.debounce_delay),
            options: self.options,
            search: self.search,
            listener: self.listener,
            selection: Selection::from_people(self.initial),
            raw_query: String::new(),
            results: Vec::new(),
            phase: SearchPhase::Idle,
            loading: false,
            submit_attempted: false,
            latest_seq: 0,
            in_flight: 0,
            completions_tx,
            completions_rx,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct PickerController {
    options: PickerOptions,
    search: Option<Arc<dyn PeopleSearch>>,
    listener: Option<SelectionListener>,
    selection: Selection,
    raw_query: String,
    query: Debounce<String>,
    results: Vec<Person>,
    phase: SearchPhase,
    loading: bool,
    submit_attempted: bool,
    latest_seq: u64,
    in_flight: usize,
    completions_tx: mpsc::UnboundedSender<SearchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<SearchCompletion>,
}

enum Wake {
    Completion(SearchCompletion),
    Deadline,
    Idle,
}

impl PickerController {
    pub fn builder() -> PickerBuilder {
        PickerBuilder::default()
    }

    // -- read side ----------------------------------------------------------

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn settled_query(&self) -> String {
        self.query.settled()
    }

    /// Observe settled query changes.
    pub fn subscribe_settled(&self) -> watch::Receiver<String> {
        self.query.subscribe()
    }

    /// Current results, never containing a selected email.
    pub fn results(&self) -> &[Person] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    /// Sequence number of the most recently started search (0 before any).
    pub fn latest_sequence(&self) -> u64 {
        self.latest_seq
    }

    /// Required, submit attempted and nothing selected.
    pub fn validation_error(&self) -> bool {
        self.options.is_required && self.submit_attempted && self.selection.is_empty()
    }

    /// The required message while [`validation_error`](Self::validation_error) holds.
    pub fn error_message(&self) -> Option<&str> {
        self.validation_error()
            .then_some(self.options.required_error_message.as_str())
    }

    /// Nothing pending: no unsettled keystrokes and no search in flight.
    pub fn is_idle(&self) -> bool {
        !self.query.is_pending() && self.in_flight == 0
    }

    /// When the pending keystrokes settle, if any. Render loops use this to
    /// bound how long they block on input.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.query.deadline()
    }

    // -- intents ------------------------------------------------------------

    /// Update the raw query text. The settled query follows after the
    /// debounce delay.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.raw_query = text.into();
        tracing::trace!(raw = %self.raw_query, "picker: raw query");
        if let Some(settled) = self.query.push(self.raw_query.clone()) {
            self.on_settled(settled);
        }
    }

    /// Replace the selection wholesale, clear the typed text and notify.
    pub fn select(&mut self, people: Vec<Person>) {
        self.selection.replace(people);
        tracing::debug!(selected = self.selection.len(), "picker: selection replaced");
        self.set_query(String::new());
        self.refresh_derived();
        self.notify();
    }

    /// Append one person to the selection via [`select`](Self::select).
    ///
    /// Returns `false` without touching anything when the email is already
    /// selected.
    pub fn pick(&mut self, person: Person) -> bool {
        if self.selection.contains_email(&person.email) {
            return false;
        }
        let mut next = self.selection.to_vec();
        next.push(person);
        self.select(next);
        true
    }

    /// Remove the selected person with this email, then notify.
    ///
    /// An absent email is a no-op and does not notify.
    pub fn remove(&mut self, email: &str) -> bool {
        if !self.selection.remove(email) {
            tracing::debug!(email, "picker: remove ignored, not selected");
            return false;
        }
        tracing::debug!(email, selected = self.selection.len(), "picker: removed");
        self.refresh_derived();
        self.notify();
        true
    }

    /// Feed the owner's "submit attempted" flag into validation.
    pub fn set_submit_attempted(&mut self, attempted: bool) {
        self.submit_attempted = attempted;
    }

    // -- driving ------------------------------------------------------------

    /// Settle due keystrokes and apply finished searches without blocking.
    ///
    /// Returns `true` when observable state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        if let Some(settled) = self.query.poll() {
            self.on_settled(settled);
            changed = true;
        }
        while let Ok(completion) = self.completions_rx.try_recv() {
            changed |= self.apply_completion(completion);
        }
        changed
    }

    /// Wait for the next debounce deadline or search completion and apply it.
    ///
    /// Returns `false` immediately when the controller is idle.
    pub async fn step(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        let deadline = self.query.deadline();
        let in_flight = self.in_flight > 0;
        let wake = tokio::select! {
            biased;
            Some(c) = self.completions_rx.recv(), if in_flight => Wake::Completion(c),
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => Wake::Deadline,
            else => Wake::Idle,
        };
        match wake {
            Wake::Completion(c) => {
                self.apply_completion(c);
            }
            Wake::Deadline => {
                if let Some(settled) = self.query.poll() {
                    self.on_settled(settled);
                }
            }
            Wake::Idle => return false,
        }
        true
    }

    /// Drive the controller until nothing is pending.
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }

    // -- internals ----------------------------------------------------------

    fn is_searchable(&self, query: &str) -> bool {
        let trimmed = query.trim();
        self.search.is_some()
            && !trimmed.is_empty()
            && trimmed.chars().count() >= self.options.min_search_length
    }

    fn on_settled(&mut self, query: String) {
        if !self.is_searchable(&query) {
            tracing::debug!(query = %query, "picker: idle");
            self.results.clear();
            self.loading = false;
            self.phase = SearchPhase::Idle;
            if self.options.stale_policy == StalePolicy::LatestWins {
                self.latest_seq += 1;
            }
            return;
        }
        let Some(search) = self.search.clone() else {
            return;
        };

        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.phase = SearchPhase::Searching;
        self.loading = true;
        self.in_flight += 1;
        tracing::debug!(query = %query, seq, "picker: searching");

        let tx = self.completions_tx.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let fut = search.search(query.clone());
                handle.spawn(async move {
                    // A panicking backend surfaces as a join error instead of
                    // leaving the search in flight forever.
                    let outcome = match tokio::spawn(fut).await {
                        Ok(outcome) => outcome,
                        Err(e) => Err(SearchError::Aborted(e.to_string())),
                    };
                    let _ = tx.send(SearchCompletion { seq, query, outcome });
                });
            }
            Err(_) => {
                let _ = tx.send(SearchCompletion {
                    seq,
                    query,
                    outcome: Err(SearchError::Unavailable),
                });
            }
        }
    }

    fn apply_completion(&mut self, completion: SearchCompletion) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let SearchCompletion { seq, query, outcome } = completion;

        if seq != self.latest_seq && self.options.stale_policy == StalePolicy::LatestWins {
            tracing::debug!(query = %query, seq, latest = self.latest_seq, "picker: stale search discarded");
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(people) => {
                let found = people.len();
                self.results = filter_unselected(people, &self.selection);
                self.phase = SearchPhase::Settled;
                tracing::debug!(
                    query = %query,
                    seq,
                    found,
                    shown = self.results.len(),
                    "picker: search settled"
                );
            }
            Err(e) => {
                tracing::error!(query = %query, seq, error = %e, "picker: search failed");
                self.results.clear();
                self.phase = SearchPhase::Failed;
            }
        }
        true
    }

    /// Re-derive state that depends on the selection.
    fn refresh_derived(&mut self) {
        let selection = &self.selection;
        self.results.retain(|p| !selection.contains_email(&p.email));
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(self.selection.as_slice());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ann() -> Person {
        Person::new("1", "Ann", "ann@x.com")
    }

    #[rstest]
    #[case(true, true, false, true)]
    #[case(true, true, true, false)]
    #[case(true, false, false, false)]
    #[case(false, true, false, false)]
    fn validation_truth_table(
        #[case] required: bool,
        #[case] attempted: bool,
        #[case] has_selection: bool,
        #[case] expected: bool,
    ) {
        let mut builder = PickerController::builder();
        if required {
            builder = builder.required("pick someone");
        }
        if has_selection {
            builder = builder.initial_selection(vec![ann()]);
        }
        let mut picker = builder.build();
        picker.set_submit_attempted(attempted);
        assert_eq!(picker.validation_error(), expected);
        assert_eq!(picker.error_message().is_some(), expected);
    }

    #[test]
    fn validation_clears_on_pick() {
        let mut picker = PickerController::builder().required("pick someone").build();
        picker.set_submit_attempted(true);
        assert_eq!(picker.error_message(), Some("pick someone"));
        picker.pick(ann());
        assert!(!picker.validation_error());
    }

    #[test]
    fn defaults_match_documented_values() {
        let opts = PickerOptions::default();
        assert_eq!(opts.debounce_delay, Duration::from_millis(300));
        assert_eq!(opts.min_search_length, 0);
        assert_eq!(opts.required_error_message, "Required field");
        assert_eq!(opts.stale_policy, StalePolicy::LatestWins);
    }

    #[test]
    fn initial_selection_is_deduplicated() {
        let picker = PickerController::builder()
            .initial_selection(vec![ann(), ann()])
            .build();
        assert_eq!(picker.selection().len(), 1);
    }

    #[test]
    fn pick_duplicate_is_noop() {
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let seen = calls.clone();
        let mut picker = PickerController::builder()
            .initial_selection(vec![ann()])
            .on_selection_change(move |_| seen.set(seen.get() + 1))
            .build();
        assert!(!picker.pick(ann()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn without_search_the_picker_stays_idle() {
        let mut picker = PickerController::builder()
            .debounce_delay(Duration::ZERO)
            .build();
        picker.set_query("john");
        assert_eq!(picker.phase(), SearchPhase::Idle);
        assert!(!picker.is_loading());
        assert!(picker.results().is_empty());
        assert!(picker.is_idle());
    }

    #[test]
    fn search_without_runtime_fails_open() {
        let mut picker = PickerController::builder()
            .debounce_delay(Duration::ZERO)
            .search(|_q: String| async { Ok::<Vec<Person>, SearchError>(Vec::new()) })
            .build();
        picker.set_query("john");
        assert!(picker.is_loading());
        assert!(picker.poll());
        assert_eq!(picker.phase(), SearchPhase::Failed);
        assert!(!picker.is_loading());
        assert!(picker.is_idle());
    }
}
