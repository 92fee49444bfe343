//! The `Sensor` trait.

use br_core::{AgentRng, Tick};
use br_memory::{MemoryId, MemoryStore};
use br_world::Host;

/// Everything a sensor sees during one scan.
///
/// The agent is read-only here: sensors perceive, they never act.
pub struct SenseCtx<'a, H: Host> {
    pub tick:   Tick,
    pub world:  &'a H::World,
    pub agent:  &'a H::Agent,
    pub memory: &'a mut MemoryStore,
    pub rng:    &'a mut AgentRng,
}

/// A poll function that writes perception results into memory.
///
/// `Send` so that brains can be ticked on worker threads.
pub trait Sensor<H: Host>: Send {
    /// Short name for logs and diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Memory slots this sensor may write or clear.
    ///
    /// Declarative only: brains register these slots up front and tooling can
    /// cross-check them against behavior requirements, but writes to other
    /// slots are not prevented.
    fn memories_used(&self) -> Vec<MemoryId>;

    /// Perform one scan.
    fn sense(&mut self, ctx: &mut SenseCtx<'_, H>);
}
