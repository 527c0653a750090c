//! Search input debouncing

use std::time::Duration;

use tokio::time::Instant;

/// Quiet period before a typed search is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Deadline timer holding the latest pushed value.
///
/// Every [`push`](Self::push) replaces the pending value and restarts the
/// deadline; [`next`](Self::next) resolves once the deadline passes without a new
/// push. `next` is cancel-safe, so it can sit in a `tokio::select!` loop next to
/// the input source: dropping it leaves the pending value in place.
#[derive(Debug)]
pub struct SearchDebouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for SearchDebouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl<T> SearchDebouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the timer.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    /// Drop the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending value to settle and take it.
    ///
    /// Never resolves while nothing is pending.
    pub async fn next(&mut self) -> T {
        loop {
            match self.pending.as_ref().map(|(_, deadline)| *deadline) {
                Some(deadline) => {
                    tokio::time::sleep_until(deadline).await;
                    if let Some((value, _)) = self.pending.take() {
                        return value;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}
