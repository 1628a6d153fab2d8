//! Per-key debouncing of commits.

use std::cell::Cell;
use std::hash::Hash;
use std::time::{Duration, Instant};

use indexmap::IndexMap;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    elapsed: Cell<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    /// Move to `elapsed` since creation. Never moves backwards.
    pub fn set_elapsed(&self, elapsed: Duration) {
        if elapsed > self.elapsed.get() {
            self.elapsed.set(elapsed);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }
}

#[derive(Debug, Clone)]
struct Pending<V> {
    due: Instant,
    value: V,
}

/// Holds at most one pending value per key until its quiet window passes.
///
/// Scheduling a key again replaces its value and restarts its window.
#[derive(Debug, Clone)]
pub struct Debouncer<K, V> {
    window: Duration,
    pending: IndexMap<K, Pending<V>>,
}

impl<K: Hash + Eq, V> Debouncer<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: IndexMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `value` for `key`, superseding any pending value.
    /// Returns the superseded value.
    pub fn schedule(&mut self, key: K, value: V, now: Instant) -> Option<V> {
        let previous = self.pending.shift_remove(&key);
        self.pending.insert(
            key,
            Pending {
                due: now + self.window,
                value,
            },
        );
        previous.map(|pending| pending.value)
    }

    /// Remove and return every entry due at `now`, oldest first.
    pub fn poll(&mut self, now: Instant) -> Vec<(K, V)> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(_, pending)| pending.due <= now);
        self.pending = waiting.into_iter().collect();
        due.into_iter()
            .map(|(key, pending)| (key, pending.value))
            .collect()
    }

    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending
            .shift_remove(key)
            .map(|pending| pending.value)
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time among pending entries.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|pending| pending.due).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn test_burst_coalesces() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(WINDOW);
        for value in ["#100000", "#200000", "#300000"] {
            debouncer.schedule("primary", value, clock.now());
            clock.advance(Duration::from_millis(20));
        }
        assert!(debouncer.poll(clock.now()).is_empty());

        clock.advance(Duration::from_millis(30));
        assert_eq!(debouncer.poll(clock.now()), [("primary", "#300000")]);
        assert!(debouncer.is_empty());
    }

    #[test]
    fn test_keys_are_independent() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("primary", 1, clock.now());
        clock.advance(Duration::from_millis(30));
        debouncer.schedule("accent", 2, clock.now());
        clock.advance(Duration::from_millis(20));

        assert_eq!(debouncer.poll(clock.now()), [("primary", 1)]);
        assert!(debouncer.is_pending(&"accent"));
        assert_eq!(debouncer.next_due(), Some(clock.now() + Duration::from_millis(30)));
    }

    #[test]
    fn test_cancel() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("primary", 1, clock.now());
        debouncer.schedule("accent", 2, clock.now());
        assert_eq!(debouncer.cancel(&"primary"), Some(1));
        debouncer.cancel_all();
        clock.advance(WINDOW);
        assert!(debouncer.poll(clock.now()).is_empty());
    }

    #[test]
    fn test_manual_clock_never_goes_back() {
        let clock = ManualClock::new();
        clock.set_elapsed(Duration::from_millis(100));
        clock.set_elapsed(Duration::from_millis(10));
        assert_eq!(clock.elapsed(), Duration::from_millis(100));
    }
}
