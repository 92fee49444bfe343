//! `br-world` — what the scheduler needs to know about the host.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                        |
//! |-----------|-----------------------------------------------------------------|
//! | [`query`] | `WorldQuery`, `AgentBody`, `Host`, `EntityKind`                 |
//! | [`point`] | `PointWorld` (R-tree), `Body`, `PointHost`                      |
//! | [`error`] | `WorldError`, `WorldResult<T>`                                  |
//!
//! The scheduler is generic over a [`Host`]: one type naming the read-only
//! world view sensors and behaviors query, and the agent type behaviors may
//! mutate.  [`PointWorld`] is a small reference implementation for tests,
//! demos and hosts without a spatial engine of their own.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod point;
pub mod query;

#[cfg(test)]
mod tests;

pub use error::{WorldError, WorldResult};
pub use point::{Body, PointHost, PointWorld};
pub use query::{AgentBody, EntityKind, Host, WorldQuery};
