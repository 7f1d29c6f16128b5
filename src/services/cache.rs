use std::time::{Duration, Instant};

/// Local copy of a remote list with a time-to-live.
///
/// The list is not authoritative: it is fresh for `ttl` after the last full
/// fetch, and local patches made after a successful mutation do not extend
/// that window.
#[derive(Debug)]
pub struct CachedList<T> {
    items: Vec<T>,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl<T> CachedList<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            fetched_at: None,
            ttl,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Instant::now())
    }

    pub fn is_fresh_at(&self, now: Instant) -> bool {
        match self.fetched_at {
            Some(at) => now.saturating_duration_since(at) < self.ttl,
            None => false,
        }
    }

    /// Replace the contents with a full fetch and restart the TTL window.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.fetched_at = Some(Instant::now());
    }

    /// Mark stale; the next read goes to the backend.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    /// Drop everything, e.g. when the owning user changes.
    pub fn clear(&mut self) {
        self.items.clear();
        self.fetched_at = None;
    }

    pub fn patch(&mut self, f: impl FnOnce(&mut Vec<T>)) {
        f(&mut self.items);
    }
}
