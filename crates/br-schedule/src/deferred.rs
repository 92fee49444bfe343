//! `DeferredQueue` — items keyed by the time they become due.
//!
//! `BTreeMap` gives O(log K) insert and ordered range scans, where K is the
//! number of distinct due times.  Timelines hold a handful of entries, so the
//! constant is tiny.

use std::collections::BTreeMap;

/// Multimap from a time position to the items due at it.
pub struct DeferredQueue<T> {
    inner: BTreeMap<u64, Vec<T>>,
    /// Cached total item count for O(1) `len()`.
    total: usize,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `item` at time `at`.  Items sharing a time keep insertion order.
    pub fn push(&mut self, at: u64, item: T) {
        self.inner.entry(at).or_default().push(item);
        self.total += 1;
    }

    /// Remove and return every item due at or before `at`, earliest first.
    pub fn drain_through(&mut self, at: u64) -> Vec<T> {
        let later = match at.checked_add(1) {
            Some(next) => self.inner.split_off(&next),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, later);
        let items: Vec<T> = due.into_values().flatten().collect();
        self.total -= items.len();
        items
    }

    /// Every item with its due time, earliest first, left in place.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut T)> + '_ {
        self.inner.iter_mut().flat_map(|(&at, items)| items.iter_mut().map(move |item| (at, item)))
    }

    /// The earliest due time, or `None` if empty.
    pub fn next_due(&self) -> Option<u64> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}

impl<T> std::fmt::Debug for DeferredQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.inner.iter().map(|(at, items)| (at, items.len())))
            .finish()
    }
}
