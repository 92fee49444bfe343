//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub`; prefer
//! the `.index()` helper when indexing into per-agent `Vec`s.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent (one brain per agent) in a population.
    pub struct AgentId(u32);
}

typed_id! {
    /// Handle of an entity in the host world (agents, hostiles, points of
    /// interest).  Opaque to the scheduler.
    pub struct EntityId(u32);
}

typed_id! {
    /// Activity label of an activity group.
    ///
    /// A small set of well-known labels is predefined below; applications
    /// define their own starting at [`ActivityId::FIRST_CUSTOM`].
    pub struct ActivityId(u16);
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

// ── Well-known activities ─────────────────────────────────────────────────────

const BUILTIN_ACTIVITIES: [(ActivityId, &str); 12] = [
    (ActivityId::CORE, "core"),
    (ActivityId::IDLE, "idle"),
    (ActivityId::WORK, "work"),
    (ActivityId::REST, "rest"),
    (ActivityId::MEET, "meet"),
    (ActivityId::PLAY, "play"),
    (ActivityId::FIGHT, "fight"),
    (ActivityId::PANIC, "panic"),
    (ActivityId::AVOID, "avoid"),
    (ActivityId::HIDE, "hide"),
    (ActivityId::RAID, "raid"),
    (ActivityId::PRE_RAID, "pre_raid"),
];

impl ActivityId {
    /// Housekeeping behaviors that run regardless of the selected activity.
    pub const CORE: ActivityId = ActivityId(0);
    pub const IDLE: ActivityId = ActivityId(1);
    pub const WORK: ActivityId = ActivityId(2);
    pub const REST: ActivityId = ActivityId(3);
    pub const MEET: ActivityId = ActivityId(4);
    pub const PLAY: ActivityId = ActivityId(5);
    pub const FIGHT: ActivityId = ActivityId(6);
    pub const PANIC: ActivityId = ActivityId(7);
    pub const AVOID: ActivityId = ActivityId(8);
    pub const HIDE: ActivityId = ActivityId(9);
    pub const RAID: ActivityId = ActivityId(10);
    pub const PRE_RAID: ActivityId = ActivityId(11);

    /// First id free for application-defined activities.
    pub const FIRST_CUSTOM: ActivityId = ActivityId(64);

    /// Name of a predefined activity, `None` for application-defined ids.
    pub fn builtin_name(self) -> Option<&'static str> {
        BUILTIN_ACTIVITIES
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, name)| *name)
    }

    /// Parse either a predefined activity name (case-insensitive) or a raw
    /// integer id.
    pub fn parse(s: &str) -> CoreResult<ActivityId> {
        let s = s.trim();
        if let Some((id, _)) = BUILTIN_ACTIVITIES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*id);
        }
        s.parse::<u16>().map(ActivityId).map_err(|_| {
            CoreError::Parse(format!(
                "invalid activity {s:?}: expected a known activity name or an integer id"
            ))
        })
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.builtin_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "activity#{}", self.0),
        }
    }
}
