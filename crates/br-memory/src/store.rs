//! `MemoryStore` — one agent's blackboard.
//!
//! # Slot states
//!
//! ```text
//!   unregistered ──register/set──▶ registered, empty ◀──clear/expire── registered, holding value
//!                                         └───────────────set───────────────▶┘
//! ```
//!
//! # Expiry
//!
//! A value written with a TTL is appended to the `expirable` side-list.  Each
//! [`MemoryStore::expire_tick`] walks only that list:
//!
//! - slot empty → drop from the list;
//! - value no longer carries a TTL → drop from the list, keep the value;
//! - TTL elapsed → clear the value (exactly like [`MemoryStore::clear`]) and
//!   drop from the list;
//! - otherwise → count the remaining ticks down.
//!
//! A value written at tick `T` with TTL `N` is therefore readable on ticks
//! `T..T+N` and gone from the expiry pass of tick `T+N` onwards.

use std::fmt;

use br_core::Tick;

use crate::key::ErasedValue;
use crate::{MemoryId, MemoryKey, MemoryRequirement, MemoryStatus, MemoryValue};

#[cfg(feature = "fx-hash")]
type SlotMap = rustc_hash::FxHashMap<MemoryId, Slot>;
#[cfg(not(feature = "fx-hash"))]
type SlotMap = std::collections::HashMap<MemoryId, Slot>;

// ── Slot ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct Slot {
    pub(crate) value: Option<Box<dyn ErasedValue>>,
    /// Remaining ticks before the value expires.  `None` = no expiry.
    pub(crate) ttl:   Option<u64>,
    /// Whether the slot currently sits on the expirable side-list.
    listed:           bool,
}

impl Slot {
    fn clear(&mut self) {
        self.value = None;
        self.ttl = None;
    }
}

// ── ExpiryPass ────────────────────────────────────────────────────────────────

/// Bookkeeping returned by [`MemoryStore::expire_tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpiryPass {
    /// Side-list entries inspected this pass.
    pub visited: usize,
    /// Values cleared because their TTL ran out.
    pub expired: usize,
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// Per-agent typed key/value store with optional per-entry expiry.
///
/// Exclusively owned by one brain and only mutated from that brain's tick
/// (sensors and behavior hooks receive `&mut MemoryStore`).
#[derive(Default)]
pub struct MemoryStore {
    slots:     SlotMap,
    expirable: Vec<MemoryId>,
    last_pass: Option<Tick>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register a slot without a value.  No-op if already registered.
    pub fn register(&mut self, id: impl Into<MemoryId>) {
        self.slots.entry(id.into()).or_default();
    }

    pub fn is_registered(&self, id: impl Into<MemoryId>) -> bool {
        self.slots.contains_key(&id.into())
    }

    /// Registered slot ids, sorted by name.
    pub fn registered(&self) -> Vec<MemoryId> {
        let mut ids: Vec<MemoryId> = self.slots.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// The value stored under `key`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a value of a different type than `T`.
    pub fn get<T: MemoryValue>(&self, key: MemoryKey<T>) -> Option<&T> {
        let value = self.slots.get(&key.id())?.value.as_deref()?;
        Some(value.as_any().downcast_ref::<T>().unwrap_or_else(|| type_mismatch(key.id())))
    }

    /// Mutable access to the value stored under `key`.
    ///
    /// Mutating a collection down to empty does not clear the slot; write it
    /// back through [`set`](Self::set) when emptiness matters.
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a value of a different type than `T`.
    pub fn get_mut<T: MemoryValue>(&mut self, key: MemoryKey<T>) -> Option<&mut T> {
        let value = self.slots.get_mut(&key.id())?.value.as_deref_mut()?;
        Some(
            value
                .as_any_mut()
                .downcast_mut::<T>()
                .unwrap_or_else(|| type_mismatch(key.id())),
        )
    }

    /// `true` if the slot holds a value.
    pub fn has(&self, id: impl Into<MemoryId>) -> bool {
        self.slots
            .get(&id.into())
            .is_some_and(|slot| slot.value.is_some())
    }

    /// Remaining ticks before the value under `id` expires, `None` if there
    /// is no value or it never expires.
    pub fn ttl_remaining(&self, id: impl Into<MemoryId>) -> Option<u64> {
        let slot = self.slots.get(&id.into())?;
        slot.value.as_ref()?;
        slot.ttl
    }

    /// Number of slots currently holding a value.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|s| s.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the expirable side-list (entries the next expiry pass visits).
    pub fn expirable_len(&self) -> usize {
        self.expirable.len()
    }

    // ── Conditions ────────────────────────────────────────────────────────

    /// Test one memory condition.
    ///
    /// An unregistered slot satisfies only [`MemoryStatus::Absent`].
    pub fn check(&self, id: impl Into<MemoryId>, status: MemoryStatus) -> bool {
        let slot = self.slots.get(&id.into());
        match status {
            MemoryStatus::Registered => slot.is_some(),
            MemoryStatus::Present => slot.is_some_and(|s| s.value.is_some()),
            MemoryStatus::Absent => slot.is_none_or(|s| s.value.is_none()),
        }
    }

    /// `true` if every requirement holds.  An empty list always holds.
    pub fn satisfies(&self, requirements: &[MemoryRequirement]) -> bool {
        requirements.iter().all(|r| self.check(r.id, r.status))
    }

    // ── Write access ──────────────────────────────────────────────────────

    /// Store a value with no expiry.
    pub fn set<T: MemoryValue>(&mut self, key: MemoryKey<T>, value: T) {
        self.set_with(key, value, None);
    }

    /// Store a value that expires after `ttl` ticks.  A `ttl` of 0 clears
    /// the slot.
    pub fn set_expiring<T: MemoryValue>(&mut self, key: MemoryKey<T>, value: T, ttl: u64) {
        self.set_with(key, value, Some(ttl));
    }

    /// Store `Some(value)` or clear on `None`.
    pub fn set_opt<T: MemoryValue>(&mut self, key: MemoryKey<T>, value: Option<T>) {
        match value {
            Some(v) => self.set(key, v),
            None => self.clear(key),
        }
    }

    /// Store a value with an optional TTL.
    ///
    /// Empty collections and zero TTLs are never stored: the slot is cleared
    /// instead.
    pub fn set_with<T: MemoryValue>(&mut self, key: MemoryKey<T>, value: T, ttl: Option<u64>) {
        if value.is_empty_value() || ttl == Some(0) {
            self.clear(key);
            return;
        }
        self.insert_erased(key.id(), Box::new(value), ttl);
    }

    pub(crate) fn insert_erased(
        &mut self,
        id:    MemoryId,
        value: Box<dyn ErasedValue>,
        ttl:   Option<u64>,
    ) {
        let slot = self.slots.entry(id).or_default();
        slot.value = Some(value);
        slot.ttl = ttl;
        if ttl.is_some() && !slot.listed {
            slot.listed = true;
            self.expirable.push(id);
        }
    }

    /// Remove the value under `id`.  The slot stays registered.
    pub fn clear(&mut self, id: impl Into<MemoryId>) {
        if let Some(slot) = self.slots.get_mut(&id.into()) {
            slot.clear();
        }
    }

    /// Remove and return the value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a value of a different type than `T`.
    pub fn take<T: MemoryValue>(&mut self, key: MemoryKey<T>) -> Option<T> {
        let slot = self.slots.get_mut(&key.id())?;
        let value = slot.value.take()?;
        slot.ttl = None;
        let value = value
            .into_any()
            .downcast::<T>()
            .unwrap_or_else(|_| type_mismatch(key.id()));
        Some(*value)
    }

    // ── Expiry ────────────────────────────────────────────────────────────

    /// Run the expiry pass for tick `now`.
    ///
    /// Counts remaining TTLs down by the ticks elapsed since the previous pass
    /// (one tick for the very first pass), so hosts that tick a brain less
    /// often than every simulation tick still expire on time.  Calling twice
    /// for the same tick is a no-op.
    pub fn expire_tick(&mut self, now: Tick) -> ExpiryPass {
        let elapsed = self.last_pass.map_or(1, |prev| now.since(prev));
        self.last_pass = Some(now);

        let mut pass = ExpiryPass::default();
        let slots = &mut self.slots;
        self.expirable.retain(|id| {
            pass.visited += 1;
            let Some(slot) = slots.get_mut(id) else {
                return false;
            };
            let remaining = match slot.ttl {
                Some(remaining) if slot.value.is_some() => remaining,
                _ => {
                    slot.listed = false;
                    return false;
                }
            };
            let remaining = remaining.saturating_sub(elapsed);
            if remaining == 0 {
                tracing::trace!(memory = %id, tick = %now, "memory expired");
                slot.clear();
                slot.listed = false;
                pass.expired += 1;
                false
            } else {
                slot.ttl = Some(remaining);
                true
            }
        });
        pass
    }

    /// Iterate `(id, value, remaining_ttl)` for every slot holding a value, in
    /// no particular order.
    pub(crate) fn iter_values(
        &self,
    ) -> impl Iterator<Item = (MemoryId, &dyn ErasedValue, Option<u64>)> + '_ {
        self.slots
            .iter()
            .filter_map(|(id, slot)| slot.value.as_deref().map(|v| (*id, v, slot.ttl)))
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter_values().collect();
        entries.sort_unstable_by_key(|(id, _, _)| *id);
        let mut map = f.debug_map();
        for (id, value, ttl) in entries {
            match ttl {
                Some(ttl) => map.entry(&id.name(), &format_args!("{value:?} (ttl {ttl})")),
                None => map.entry(&id.name(), value),
            };
        }
        map.finish()
    }
}

#[cold]
fn type_mismatch(id: MemoryId) -> ! {
    panic!("memory type mismatch for key {id:?} (stored type differs from requested)")
}
