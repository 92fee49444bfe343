//! `br-core` — foundational types for the `rust_brain` agent scheduler.
//!
//! This crate is a dependency of every other `br-*` crate.  It has no `br-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `EntityId`, `ActivityId`                   |
//! | [`geo`]         | `Pos`, euclidean distance helpers                     |
//! | [`time`]        | `Tick`, `DayCycle`, `RunConfig`                       |
//! | [`rng`]         | `AgentRng` (per-agent, seedable)                      |
//! | [`span`]        | `Span` — fixed / ranged / dynamic tick counts         |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod span;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Pos;
pub use ids::{ActivityId, AgentId, EntityId};
pub use rng::AgentRng;
pub use span::Span;
pub use time::{DayCycle, RunConfig, Tick};
