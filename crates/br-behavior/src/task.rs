//! The `Task` trait — the extension point for leaf behaviors.

use br_core::{AgentRng, Tick};
use br_memory::MemoryStore;
use br_world::Host;

/// Everything a behavior hook may touch during one call.
///
/// Unlike sensors, behaviors act: the agent is mutable.  The world stays
/// read-only; hosts apply world-side effects from agent state afterwards.
pub struct TaskCtx<'a, H: Host> {
    pub tick:   Tick,
    pub world:  &'a H::World,
    pub agent:  &'a mut H::Agent,
    pub memory: &'a mut MemoryStore,
    pub rng:    &'a mut AgentRng,
}

/// Leaf behavior hooks.
///
/// Every method has a default, so a task only overrides what it needs.  The
/// wrapping [`Behavior`](crate::Behavior) guarantees the call order:
///
/// - `check_extra_start` then `start`, only while stopped and after cooldown,
///   memory requirements and the custom start predicate all passed;
/// - `tick`, `should_keep_running`, `extend_past_timeout` and `stop` only
///   while running.
///
/// Hooks cannot fail.  A task that cannot proceed says so through
/// `check_extra_start` (don't start) or `should_keep_running` (stop).
///
/// # Example
///
/// ```rust,ignore
/// struct Attack;
///
/// impl Task<MyHost> for Attack {
///     fn tick(&mut self, ctx: &mut TaskCtx<'_, MyHost>) {
///         if let Some(&target) = ctx.memory.get(ATTACK_TARGET) {
///             ctx.agent.swing_at(target);
///         }
///     }
///
///     fn should_keep_running(&mut self, ctx: &TaskCtx<'_, MyHost>) -> bool {
///         ctx.memory.has(THREAT_PRESENT)
///     }
/// }
/// ```
pub trait Task<H: Host>: Send {
    /// Last, task-specific start check.  May cache transient state (e.g.
    /// pick a target) for `start` to use.
    fn check_extra_start(&mut self, _ctx: &mut TaskCtx<'_, H>) -> bool {
        true
    }

    fn start(&mut self, _ctx: &mut TaskCtx<'_, H>) {}

    fn tick(&mut self, _ctx: &mut TaskCtx<'_, H>) {}

    fn stop(&mut self, _ctx: &mut TaskCtx<'_, H>) {}

    /// Checked after every `tick`.  The default runs the task for a single
    /// update.
    fn should_keep_running(&mut self, _ctx: &TaskCtx<'_, H>) -> bool {
        false
    }

    /// Checked once the duration has elapsed; `true` keeps the task running
    /// past its timeout for another update.
    fn extend_past_timeout(&mut self, _ctx: &TaskCtx<'_, H>) -> bool {
        false
    }
}
