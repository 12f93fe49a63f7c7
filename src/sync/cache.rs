//! Explicit fetch cache with a per-key load state.
//!
//! One cache instance exists per resource type; keys identify the owner
//! (for entries, the project id). Controllers call
//! [`ResourceCache::invalidate`] after a successful mutation and refetch
//! explicitly.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Load state of one cached key, stripped of the data for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Never fetched, or dropped by an invalidation.
    NotLoaded,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch failed; the message is kept for display.
    Failed(String),
}

#[derive(Debug, Clone)]
enum CacheSlot<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

/// Fetch cache keyed by resource owner.
#[derive(Debug, Clone)]
pub struct ResourceCache<K, T> {
    slots: HashMap<K, CacheSlot<T>>,
}

impl<K, T> Default for ResourceCache<K, T> {
    fn default() -> Self {
        Self { slots: HashMap::new() }
    }
}

impl<K: Eq + Hash, T> ResourceCache<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as having a fetch in flight. Any previously loaded
    /// data for the key is dropped.
    pub fn mark_loading(&mut self, key: K) {
        self.slots.insert(key, CacheSlot::Loading);
    }

    /// Record the outcome of a fetch for `key`.
    ///
    /// Applied unconditionally: a response arriving after the slot was
    /// invalidated still refreshes it.
    pub fn resolve(&mut self, key: K, outcome: Result<T, String>) {
        let slot = match outcome {
            Ok(data) => CacheSlot::Loaded(data),
            Err(message) => CacheSlot::Failed(message),
        };
        self.slots.insert(key, slot);
    }

    /// Drop the cached value for `key`, returning the slot to
    /// [`LoadState::NotLoaded`]. Callers refetch explicitly afterwards.
    pub fn invalidate<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.slots.remove(key);
    }

    /// Loaded data for `key`, if any.
    #[must_use]
    pub fn data<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        match self.slots.get(key) {
            Some(CacheSlot::Loaded(data)) => Some(data),
            _ => None,
        }
    }

    /// Display state of `key`'s slot.
    #[must_use]
    pub fn state<Q>(&self, key: &Q) -> LoadState
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        match self.slots.get(key) {
            None => LoadState::NotLoaded,
            Some(CacheSlot::Loading) => LoadState::Loading,
            Some(CacheSlot::Loaded(_)) => LoadState::Loaded,
            Some(CacheSlot::Failed(message)) => LoadState::Failed(message.clone()),
        }
    }
}
