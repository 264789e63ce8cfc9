//! Debounce primitive: turns a rapidly changing value into a settled one.
//!
//! Every [`Debounce::push`] replaces the single pending slot and restarts the
//! quiet period from zero, so only the last value pushed before a quiet
//! period of `delay` ever settles. There is never more than one pending
//! update.
//!
//! The primitive does not own a timer task. Callers either poll it from
//! their own loop ([`Debounce::poll`], bounded by [`Debounce::deadline`]) or
//! await [`Debounce::wait`]. Deadlines use [`tokio::time::Instant`] so tests
//! can drive them with `tokio::time::pause()`.
//!
//! Settled changes are also published on a [`watch`] channel for consumers
//! that want to observe them reactively ([`Debounce::subscribe`]).

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Quiet period used when the caller does not configure one.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    settled: watch::Sender<T>,
}

impl<T: Clone + PartialEq> Debounce<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        let (settled, _) = watch::channel(initial);
        Self {
            delay,
            pending: None,
            settled,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The current settled value.
    pub fn settled(&self) -> T {
        self.settled.borrow().clone()
    }

    /// Observe settled changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.settled.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will settle, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Feed a new input value, cancelling any pending one.
    ///
    /// With a zero delay the value settles immediately and the new settled
    /// value is returned when it differs from the previous one.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.delay.is_zero() {
            self.pending = None;
            return self.settle(value);
        }
        let deadline = Instant::now() + self.delay;
        if self.pending.replace(Pending { value, deadline }).is_some() {
            tracing::trace!("debounce: pending update superseded");
        }
        None
    }

    /// Settle the pending value if its quiet period has elapsed.
    ///
    /// Returns the new settled value only when it changed.
    pub fn poll(&mut self) -> Option<T> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some(ref p) if p.deadline <= now => {}
            _ => return None,
        }
        let pending = self.pending.take()?;
        self.settle(pending.value)
    }

    /// Sleep until the pending deadline, then settle.
    ///
    /// Returns immediately with `None` when nothing is pending.
    pub async fn wait(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.poll_at(deadline)
    }

    fn settle(&mut self, value: T) -> Option<T> {
        let changed = self.settled.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value.clone();
                true
            }
        });
        changed.then_some(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
