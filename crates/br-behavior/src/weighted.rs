//! `WeightedList` — ordered entries with a weighted random shuffle.
//!
//! # Shuffle
//!
//! Each entry with weight `w` draws `r` uniformly from `(0, 1)` and is keyed
//! by `-r^(1/w)`; entries are then stably sorted by ascending key.  This is
//! the Efraimidis–Spirakis weighted sampling transform: heavier entries tend
//! towards the front without cumulative-weight bucketing.  For two entries
//! of weights `a` and `b`, the first lands in front with probability
//! `a / (a + b)`.

use br_core::AgentRng;

#[derive(Clone, Debug)]
struct Entry<T> {
    item:   T,
    weight: u32,
}

/// Ordered list of weighted entries.
#[derive(Clone, Debug)]
pub struct WeightedList<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> WeightedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Panics
    ///
    /// Panics if `weight` is zero.
    pub fn push(&mut self, item: T, weight: u32) {
        assert!(weight > 0, "weighted list entries need a positive weight");
        self.entries.push(Entry { item, weight });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.item)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).map(|e| &mut e.item)
    }

    pub fn weight(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|e| e.weight)
    }

    /// Entries in current list order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries.iter_mut().map(|e| &mut e.item)
    }

    /// Reorder the list in place by the weighted shuffle.
    pub fn shuffle(&mut self, rng: &mut AgentRng) {
        if self.entries.len() < 2 {
            return;
        }
        let mut keyed: Vec<(f64, Entry<T>)> = self
            .entries
            .drain(..)
            .map(|e| (-rng.unit_open().powf(1.0 / f64::from(e.weight)), e))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.entries.extend(keyed.into_iter().map(|(_, e)| e));
    }
}

impl<T> FromIterator<(T, u32)> for WeightedList<T> {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(iter: I) -> Self {
        let mut list = WeightedList::new();
        for (item, weight) in iter {
            list.push(item, weight);
        }
        list
    }
}
