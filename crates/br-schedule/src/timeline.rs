//! `Timeline` — forced activities and callbacks keyed by time.
//!
//! # Lazy ordering
//!
//! Entries may be added in any order.  Insertion only marks the table dirty;
//! the next query sorts it once (stable, so entries sharing a time keep their
//! insertion order and the later one wins).
//!
//! # Callbacks
//!
//! [`Timeline::fire_due`] runs every callback whose time was reached since
//! the previous call.  On a cyclical base callbacks stay queued and fire
//! once for every cycle in which their position was crossed, so a call made
//! several periods after the previous one catches up.  On a since-spawn base
//! each callback fires once and is removed.

use br_core::{ActivityId, DayCycle, Tick};
use br_memory::MemoryStore;

use crate::DeferredQueue;

/// A deferred timeline action.  Receives the current tick and the agent's
/// memory.
pub type TimelineCallback = Box<dyn FnMut(Tick, &mut MemoryStore) + Send>;

/// How a tick maps to a timeline position.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeBase {
    /// `pos = now % period`; entries persist and recur.
    Cyclical { period: u64 },
    /// `pos = now - spawned_at`; entries run once.
    SinceSpawn { spawned_at: Tick },
}

/// Time-keyed table of forced activities plus deferred callbacks.
pub struct Timeline {
    base:       TimeBase,
    baseline:   ActivityId,
    entries:    Vec<(u64, ActivityId)>,
    dirty:      bool,
    callbacks:  DeferredQueue<TimelineCallback>,
    /// Tick of the previous `fire_due` (cyclical base only).
    last_fired: Option<Tick>,
}

impl Timeline {
    pub fn new(base: TimeBase, baseline: ActivityId) -> Self {
        if let TimeBase::Cyclical { period } = base {
            assert!(period > 0, "cyclical timeline needs a positive period");
        }
        Self {
            base,
            baseline,
            entries: Vec::new(),
            dirty: false,
            callbacks: DeferredQueue::new(),
            last_fired: None,
        }
    }

    /// Cyclical timeline over `period` ticks.
    pub fn cyclical(period: u64, baseline: ActivityId) -> Self {
        Self::new(TimeBase::Cyclical { period }, baseline)
    }

    /// Cyclical timeline over one day.
    pub fn daily(cycle: DayCycle, baseline: ActivityId) -> Self {
        Self::cyclical(cycle.ticks_per_day, baseline)
    }

    /// Run-once timeline measured from `spawned_at`.
    pub fn since_spawn(spawned_at: Tick, baseline: ActivityId) -> Self {
        Self::new(TimeBase::SinceSpawn { spawned_at }, baseline)
    }

    // ── Building ──────────────────────────────────────────────────────────

    /// Force `activity` from position `at` onwards.
    pub fn add(&mut self, at: u64, activity: ActivityId) {
        self.entries.push((at, activity));
        self.dirty = true;
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, at: u64, activity: ActivityId) -> Self {
        self.add(at, activity);
        self
    }

    /// Queue `callback` at position `at`.
    pub fn on<F>(&mut self, at: u64, callback: F)
    where
        F: FnMut(Tick, &mut MemoryStore) + Send + 'static,
    {
        self.callbacks.push(at, Box::new(callback));
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn base(&self) -> TimeBase {
        self.base
    }

    pub fn baseline(&self) -> ActivityId {
        self.baseline
    }

    pub fn set_baseline(&mut self, activity: ActivityId) {
        self.baseline = activity;
    }

    /// Timeline position of tick `now`.
    pub fn position(&self, now: Tick) -> u64 {
        match self.base {
            TimeBase::Cyclical { period } => now.0 % period,
            TimeBase::SinceSpawn { spawned_at } => now.since(spawned_at),
        }
    }

    /// Sorted activity entries.
    pub fn entries(&mut self) -> &[(u64, ActivityId)] {
        self.ensure_sorted();
        &self.entries
    }

    /// Number of activity entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no activity entries and no pending callbacks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.callbacks.is_empty()
    }

    pub fn pending_callbacks(&self) -> usize {
        self.callbacks.len()
    }

    /// The forced activity at tick `now`.
    ///
    /// On a since-spawn base, reaching the final entry clears every activity
    /// entry: this call still returns the final activity, later calls return
    /// the baseline.  Pending callbacks are not affected.
    pub fn activity_at(&mut self, now: Tick) -> ActivityId {
        self.ensure_sorted();
        let pos = self.position(now);
        let idx = self.entries.partition_point(|&(at, _)| at <= pos);
        let activity = match idx {
            0 => self.baseline,
            i => self.entries[i - 1].1,
        };

        if matches!(self.base, TimeBase::SinceSpawn { .. })
            && !self.entries.is_empty()
            && idx == self.entries.len()
        {
            tracing::debug!(tick = %now, final_activity = %activity, "run-once timeline finished");
            self.entries.clear();
        }
        activity
    }

    /// Run callbacks reached since the previous call.  Returns how many ran.
    pub fn fire_due(&mut self, now: Tick, memory: &mut MemoryStore) -> usize {
        let pos = self.position(now);
        match self.base {
            TimeBase::SinceSpawn { .. } => {
                let due = self.callbacks.drain_through(pos);
                let fired = due.len();
                for mut callback in due {
                    callback(now, &mut *memory);
                }
                fired
            }
            TimeBase::Cyclical { period } => {
                let last = self.last_fired.replace(now);
                let mut fired = 0;
                for (at, callback) in self.callbacks.iter_mut() {
                    let times = match last {
                        // First call: only what is due exactly now.
                        None => u64::from(at == pos),
                        Some(last) => crossings(at, now.0, period).saturating_sub(crossings(at, last.0, period)),
                    };
                    for _ in 0..times {
                        callback(now, &mut *memory);
                    }
                    fired += times as usize;
                }
                fired
            }
        }
    }

    /// Mark `now` as handled without running anything.  Cyclical callbacks
    /// crossed up to `now` will not run later; run-once callbacks stay queued.
    pub fn skip_due(&mut self, now: Tick) {
        if matches!(self.base, TimeBase::Cyclical { .. }) {
            self.last_fired = Some(now);
        }
    }

    fn ensure_sorted(&mut self) {
        if self.dirty {
            self.entries.sort_by_key(|&(at, _)| at);
            self.dirty = false;
        }
    }
}

/// Ticks in `0..=through` whose cyclical position is `at`.
fn crossings(at: u64, through: u64, period: u64) -> u64 {
    if at >= period || through < at {
        return 0;
    }
    (through - at) / period + 1
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("base", &self.base)
            .field("baseline", &self.baseline)
            .field("entries", &self.entries)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}
