use thiserror::Error;

use br_core::{ActivityId, CoreError};
use br_memory::MemoryError;

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("brain configuration error: {0}")]
    Config(String),

    #[error("{role} names activity {activity}, which has no activity group")]
    UnknownActivity {
        activity: ActivityId,
        role:     &'static str,
    },

    #[error("activity {activity} already has a behavior named {name:?}")]
    DuplicateBehavior {
        activity: ActivityId,
        name:     &'static str,
    },

    #[error("{what}: expected {expected} entries (one per agent), got {got}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

pub type BrainResult<T> = Result<T, BrainError>;
