//! Memory conditions used to gate behaviors and activity groups.

use crate::MemoryId;

/// The state a memory slot must be in for a condition to hold.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MemoryStatus {
    /// The slot holds a value.
    Present,
    /// The slot holds no value (registered or not).
    Absent,
    /// The slot is registered with the store, value or not.
    Registered,
}

/// One `(memory, status)` condition.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MemoryRequirement {
    pub id:     MemoryId,
    pub status: MemoryStatus,
}

impl MemoryRequirement {
    pub fn new(id: impl Into<MemoryId>, status: MemoryStatus) -> Self {
        Self { id: id.into(), status }
    }

    pub fn present(id: impl Into<MemoryId>) -> Self {
        Self::new(id, MemoryStatus::Present)
    }

    pub fn absent(id: impl Into<MemoryId>) -> Self {
        Self::new(id, MemoryStatus::Absent)
    }

    pub fn registered(id: impl Into<MemoryId>) -> Self {
        Self::new(id, MemoryStatus::Registered)
    }
}
