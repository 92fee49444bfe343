//! Memory identifiers and the value-type contract.
//!
//! # Design
//!
//! A memory slot is identified by a `&'static str` name wrapped in
//! [`MemoryId`].  Typed access goes through [`MemoryKey<T>`], a zero-sized
//! pairing of that name with the value type, usually declared as a constant:
//!
//! ```rust
//! use br_core::EntityId;
//! use br_memory::MemoryKey;
//!
//! pub const ATTACK_TARGET: MemoryKey<EntityId> = MemoryKey::new("attack_target");
//! pub const THREAT_PRESENT: MemoryKey<bool> = MemoryKey::new("threat_present");
//! ```
//!
//! Names are the whole key space: there is no process-wide registry.  Two
//! keys with the same name but different types address the same slot, and
//! reading through the wrong one panics.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::marker::PhantomData;

use br_core::{ActivityId, AgentId, EntityId, Pos, Tick};

// ── MemoryId ──────────────────────────────────────────────────────────────────

/// Untyped memory slot name.  Used where heterogeneous keys are listed
/// together (requirements, sensor declarations, erase lists).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct MemoryId(&'static str);

impl MemoryId {
    pub const fn new(name: &'static str) -> Self {
        MemoryId(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ── MemoryKey<T> ──────────────────────────────────────────────────────────────

/// Typed handle to a memory slot holding values of type `T`.
pub struct MemoryKey<T: 'static> {
    id:       MemoryId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> MemoryKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self { id: MemoryId::new(name), _phantom: PhantomData }
    }

    pub const fn id(self) -> MemoryId {
        self.id
    }

    pub const fn name(self) -> &'static str {
        self.id.name()
    }
}

impl<T: 'static> Copy for MemoryKey<T> {}

impl<T: 'static> Clone for MemoryKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> PartialEq for MemoryKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: 'static> Eq for MemoryKey<T> {}

impl<T: 'static> fmt::Debug for MemoryKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryKey<{}>({})", std::any::type_name::<T>(), self.id)
    }
}

impl<T: 'static> From<MemoryKey<T>> for MemoryId {
    fn from(key: MemoryKey<T>) -> MemoryId {
        key.id
    }
}

// ── MemoryValue ───────────────────────────────────────────────────────────────

/// A type that can be stored in a memory slot.
///
/// Implemented for the common scalar, id and collection types.  Application
/// types implement it with an empty body:
///
/// ```rust
/// #[derive(Debug)]
/// struct Grudge { hits: u32 }
/// impl br_memory::MemoryValue for Grudge {}
/// ```
pub trait MemoryValue: Any + Send + Sync + fmt::Debug {
    /// `true` if storing this value should clear the slot instead.
    ///
    /// Collections return `true` when empty so that presence checks never
    /// see an "occupied but empty" slot.
    fn is_empty_value(&self) -> bool {
        false
    }
}

macro_rules! scalar_memory_value {
    ($($t:ty),* $(,)?) => {
        $(impl MemoryValue for $t {})*
    };
}

scalar_memory_value!(
    bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64,
    String, &'static str, Tick, AgentId, EntityId, ActivityId, Pos,
);

impl<A, B> MemoryValue for (A, B)
where
    A: Any + Send + Sync + fmt::Debug,
    B: Any + Send + Sync + fmt::Debug,
{
}

impl<T: Any + Send + Sync + fmt::Debug> MemoryValue for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Any + Send + Sync + fmt::Debug> MemoryValue for VecDeque<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Any + Send + Sync + fmt::Debug> MemoryValue for BTreeSet<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Any + Send + Sync + fmt::Debug> MemoryValue for HashSet<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> MemoryValue for BTreeMap<K, V>
where
    K: Any + Send + Sync + fmt::Debug,
    V: Any + Send + Sync + fmt::Debug,
{
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> MemoryValue for HashMap<K, V>
where
    K: Any + Send + Sync + fmt::Debug,
    V: Any + Send + Sync + fmt::Debug,
{
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

// ── Type erasure ──────────────────────────────────────────────────────────────

/// Object-safe view of a stored value.
///
/// Sealed: only reachable through the blanket impl for `MemoryValue`, so the
/// store controls every way a value gets in and out.
pub(crate) trait ErasedValue: Send + Sync + fmt::Debug + sealed::Sealed {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

mod sealed {
    pub trait Sealed {}
}

impl<T: MemoryValue> sealed::Sealed for T {}

impl<T: MemoryValue> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
