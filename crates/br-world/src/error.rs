//! World error type.

use thiserror::Error;

use br_core::EntityId;

/// Errors produced by `br-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("entity {0} not found in world")]
    EntityNotFound(EntityId),

    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),
}

pub type WorldResult<T> = Result<T, WorldError>;
