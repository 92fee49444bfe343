//! `br-behavior` — behavior nodes and composite selection.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`task`]     | `Task` trait (leaf hooks), `TaskCtx<'a, H>`                   |
//! | [`node`]     | `Behavior` state machine, `BehaviorKind`, `Status`            |
//! | [`composite`]| `Composite`, `Policy` — child selection                       |
//! | [`weighted`] | `WeightedList` — stable iteration plus weighted shuffle       |
//! | [`noop`]     | `NoopTask`, `FnTask`                                          |
//!
//! # Design notes
//!
//! A behavior tree is a plain owned tree: every [`Behavior`] is either a
//! leaf wrapping a boxed [`Task`] or a [`Composite`] owning its children in a
//! [`WeightedList`].  The composite tracks its running child by index, so the
//! tree has a single owner (the brain) and no shared references.
//!
//! All timing goes through the [`Behavior`] wrapper:
//!
//! ```text
//!   Stopped ──try_start──▶ Running ──update (timeout / !keep_running)──▶ Stopped
//!      ▲  cooldown, requirements,         tick hook every update            │
//!      │  start_if, extra start check                                       │
//!      └──────────────────────── cooldown_ready_at = now + cooldown ◀───────┘
//! ```

pub mod composite;
pub mod node;
pub mod noop;
pub mod task;
pub mod weighted;


pub use composite::{Composite, Policy};
pub use node::{Behavior, BehaviorKind, Status, DEFAULT_DURATION};
pub use noop::{FnTask, NoopTask};
pub use task::{Task, TaskCtx};
pub use weighted::WeightedList;
