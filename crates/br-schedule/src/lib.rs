//! `br-schedule` — time-keyed activity overrides.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`timeline`] | `Timeline`, `TimeBase`, `TimelineCallback`                   |
//! | [`deferred`] | `DeferredQueue<T>` (`BTreeMap<u64, Vec<T>>`)                 |
//! | [`loader`]   | `load_timeline_csv`, `load_timeline_reader`                  |
//! | [`error`]    | `ScheduleError`, `ScheduleResult<T>`                         |
//!
//! # Time bases (summary)
//!
//! ```text
//! Cyclical { period }    pos = now % period          entries recur every cycle
//! SinceSpawn { spawned } pos = now - spawned         entries run once, then the
//!                                                    timeline clears itself
//! ```
//!
//! At any position the forced activity is the last entry at or before `pos`,
//! or the baseline activity if no entry has been reached yet.

pub mod deferred;
pub mod error;
pub mod loader;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use deferred::DeferredQueue;
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_timeline_csv, load_timeline_reader};
pub use timeline::{TimeBase, Timeline, TimelineCallback};
