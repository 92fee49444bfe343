//! `ActivityGroup` — the behaviors that may start under one activity label.

use std::collections::BTreeMap;

use br_behavior::Behavior;
use br_core::ActivityId;
use br_memory::{MemoryId, MemoryRequirement, MemoryStore};
use br_world::Host;

/// A gated bucket of prioritized behaviors sharing one activity label.
///
/// Priorities are ranks: **lower runs first**.  Behaviors at the same rank
/// keep insertion order.  Buckets live in a `BTreeMap`, so adding a behavior
/// at a new rank needs no explicit re-sort.
pub struct ActivityGroup<H: Host> {
    activity:      ActivityId,
    buckets:       BTreeMap<u32, Vec<Behavior<H>>>,
    gate:          Vec<MemoryRequirement>,
    erase_on_stop: Vec<MemoryId>,
}

impl<H: Host> ActivityGroup<H> {
    pub fn new(activity: ActivityId) -> Self {
        Self { activity, buckets: BTreeMap::new(), gate: Vec::new(), erase_on_stop: Vec::new() }
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, priority: u32, behavior: Behavior<H>) -> Self {
        self.add(priority, behavior);
        self
    }

    /// Require `requirement` for the group to be eligible.
    pub fn gated_on(mut self, requirement: MemoryRequirement) -> Self {
        self.gate.push(requirement);
        self
    }

    /// Clear `id` whenever the group stops being eligible.
    pub fn erase_on_stop(mut self, id: impl Into<MemoryId>) -> Self {
        self.erase_on_stop.push(id.into());
        self
    }

    pub fn add(&mut self, priority: u32, behavior: Behavior<H>) {
        self.buckets.entry(priority).or_default().push(behavior);
    }

    /// Detach the behavior called `name`.  The caller is responsible for
    /// stopping it first if it is running.
    pub fn remove(&mut self, name: &str) -> Option<Behavior<H>> {
        let (&priority, bucket) = self
            .buckets
            .iter_mut()
            .find(|(_, bucket)| bucket.iter().any(|b| b.name() == name))?;
        let index = bucket.iter().position(|b| b.name() == name)?;
        let behavior = bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&priority);
        }
        Some(behavior)
    }

    pub fn activity(&self) -> ActivityId {
        self.activity
    }

    pub fn gate(&self) -> &[MemoryRequirement] {
        &self.gate
    }

    pub fn erase_list(&self) -> &[MemoryId] {
        &self.erase_on_stop
    }

    /// `true` if every gating condition holds.  An empty gate always holds.
    pub fn is_eligible(&self, memory: &MemoryStore) -> bool {
        memory.satisfies(&self.gate)
    }

    /// Behaviors in scheduling order: ascending rank, then insertion order.
    pub fn behaviors(&self) -> impl Iterator<Item = &Behavior<H>> + '_ {
        self.buckets.values().flatten()
    }

    pub fn behaviors_mut(&mut self) -> impl Iterator<Item = &mut Behavior<H>> + '_ {
        self.buckets.values_mut().flatten()
    }

    /// `(rank, behavior)` pairs in scheduling order.
    pub fn ranked(&self) -> impl Iterator<Item = (u32, &Behavior<H>)> + '_ {
        self.buckets
            .iter()
            .flat_map(|(&rank, bucket)| bucket.iter().map(move |b| (rank, b)))
    }

    pub fn find(&self, name: &str) -> Option<&Behavior<H>> {
        self.behaviors().find(|b| b.name() == name)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Memory slots this group or its behaviors refer to.
    pub fn memory_ids(&self) -> Vec<MemoryId> {
        let mut ids: Vec<MemoryId> = self.gate.iter().map(|r| r.id).collect();
        ids.extend(self.erase_on_stop.iter().copied());
        for behavior in self.behaviors() {
            ids.extend(behavior.memory_ids());
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl<H: Host> std::fmt::Debug for ActivityGroup<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityGroup")
            .field("activity", &self.activity)
            .field("behaviors", &self.ranked().map(|(r, b)| (r, b.name())).collect::<Vec<_>>())
            .field("gate", &self.gate)
            .field("erase_on_stop", &self.erase_on_stop)
            .finish()
    }
}
