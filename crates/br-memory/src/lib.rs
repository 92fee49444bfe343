//! `br-memory` — the per-agent memory store (blackboard).
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`key`]      | `MemoryId`, `MemoryKey<T>`, `MemoryValue`                    |
//! | [`status`]   | `MemoryStatus`, `MemoryRequirement`                          |
//! | [`store`]    | `MemoryStore`, `ExpiryPass`                                  |
//! | [`persist`]  | `MemoryCodecs`, `MemorySnapshot`, `SavedMemory`              |
//! | [`error`]    | `MemoryError`, `MemoryResult<T>`                             |
//!
//! # Model
//!
//! Every memory slot is addressed by a static name and carries a statically
//! known value type through [`MemoryKey<T>`].  A slot can be *registered*
//! without holding a value; behaviors and activity gates test slots with
//! [`MemoryStatus`] (value present, value absent, or merely registered).
//!
//! Values may carry a time-to-live in ticks.  Expiry is driven by
//! [`MemoryStore::expire_tick`], which only walks a side-list of expirable
//! slots rather than the whole store.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | Use `rustc-hash` for the slot table.                     |

pub mod error;
pub mod key;
pub mod persist;
pub mod status;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{MemoryError, MemoryResult};
pub use key::{MemoryId, MemoryKey, MemoryValue};
pub use persist::{MemoryCodecs, MemorySnapshot, SavedMemory};
pub use status::{MemoryRequirement, MemoryStatus};
pub use store::{ExpiryPass, MemoryStore};
