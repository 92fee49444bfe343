//! Population observer trait for tracing and progress reporting.

use br_core::{ActivityId, AgentId, Pos, Tick};

use crate::{BrainEvent, TickStats};

/// What one agent is doing at a snapshot tick.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentStatus {
    pub agent:      AgentId,
    pub position:   Pos,
    pub activities: Vec<ActivityId>,
    /// Running leaf paths, as from [`Brain::running_behaviors`](crate::Brain::running_behaviors).
    pub running:    Vec<String>,
}

/// Callbacks invoked by [`Population::run`][crate::Population::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — stop counter
///
/// ```rust,ignore
/// struct Stops(usize);
///
/// impl PopulationObserver for Stops {
///     fn on_event(&mut self, _tick: Tick, _agent: AgentId, event: &BrainEvent) {
///         if matches!(event, BrainEvent::BehaviorStopped { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait PopulationObserver {
    /// Called at the very start of each tick, before any brain runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per brain event, after every brain has ticked, in
    /// ascending agent order.
    fn on_event(&mut self, _tick: Tick, _agent: AgentId, _event: &BrainEvent) {}

    /// Called at the end of each tick with counters summed over all brains.
    fn on_tick_end(&mut self, _tick: Tick, _stats: TickStats) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`).
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[AgentStatus]) {}

    /// Called once after the final tick completes.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`PopulationObserver`] that does nothing.
pub struct NoopObserver;

impl PopulationObserver for NoopObserver {}
