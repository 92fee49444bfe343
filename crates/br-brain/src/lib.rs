//! `br-brain` — per-agent tick orchestrator for the rust_brain scheduler.
//!
//! # Per-brain tick
//!
//! ```text
//! Brain::tick(now, world, agent):
//!   ① Expiry     — memory TTLs count down; expired values are cleared.
//!   ② Sensors    — every due sensor scans the world into memory.
//!   ③ Activities — timeline callbacks fire; the active set becomes
//!                  core ∪ (timeline activity | first eligible priorities | fallback).
//!   ④ Start      — stopped behaviors of active groups try to start,
//!                  lowest rank first.
//!   ⑤ Update     — every running behavior is updated, active group or not.
//!   ⑥ Erase      — groups that left the active set clear their
//!                  erase-on-stop memories.
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`activity`]   | `ActivityGroup` — gated, ranked behavior buckets         |
//! | [`brain`]      | `Brain` and its tick, `TickStats`                        |
//! | [`builder`]    | `BrainBuilder`, `PopulationBuilder`                      |
//! | [`event`]      | `BrainEvent`                                             |
//! | [`observer`]   | `PopulationObserver`, `NoopObserver`, `AgentStatus`      |
//! | [`population`] | `Population` — many brains over one shared world         |
//! | [`error`]      | `BrainError`, `BrainResult`                              |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Ticks a population's brains on Rayon's thread pool.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use br_brain::{BrainBuilder, NoopObserver, PopulationBuilder};
//! use br_core::{AgentId, AgentRng, RunConfig};
//! use br_world::{Body, PointHost};
//!
//! let brain = BrainBuilder::<PointHost>::new(AgentRng::new(config.seed, AgentId(0)))
//!     .behavior(ActivityId::IDLE, 0, wander)
//!     .priorities([ActivityId::IDLE])
//!     .build()?;
//! let mut population = PopulationBuilder::new(config)
//!     .agent(brain, Body::new(AgentId(0), Pos::ORIGIN))
//!     .build()?;
//! population.run(&world, &mut NoopObserver);
//! ```

pub mod activity;
pub mod brain;
pub mod builder;
pub mod error;
pub mod event;
pub mod observer;
pub mod population;


pub use activity::ActivityGroup;
pub use brain::{Brain, TickStats};
pub use builder::{BrainBuilder, PopulationBuilder};
pub use error::{BrainError, BrainResult};
pub use event::BrainEvent;
pub use observer::{AgentStatus, NoopObserver, PopulationObserver};
pub use population::Population;
