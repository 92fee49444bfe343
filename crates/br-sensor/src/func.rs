//! `FnSensor` — a sensor from a closure.

use br_memory::MemoryId;
use br_world::Host;

use crate::{SenseCtx, Sensor};

/// Closure-backed [`Sensor`].
///
/// ```rust,ignore
/// const HUNGRY: MemoryKey<bool> = MemoryKey::new("hungry");
///
/// let sensor = FnSensor::new("hunger", [HUNGRY.id()], |ctx: &mut SenseCtx<'_, MyHost>| {
///     let hungry = ctx.agent.food < 10;
///     ctx.memory.set_opt(HUNGRY, hungry.then_some(true));
/// });
/// ```
pub struct FnSensor<F> {
    name:     &'static str,
    memories: Vec<MemoryId>,
    f:        F,
}

impl<F> FnSensor<F> {
    pub fn new(name: &'static str, memories: impl IntoIterator<Item = MemoryId>, f: F) -> Self {
        Self { name, memories: memories.into_iter().collect(), f }
    }
}

impl<H, F> Sensor<H> for FnSensor<F>
where
    H: Host,
    F: FnMut(&mut SenseCtx<'_, H>) + Send,
{
    fn name(&self) -> &str {
        self.name
    }

    fn memories_used(&self) -> Vec<MemoryId> {
        self.memories.clone()
    }

    fn sense(&mut self, ctx: &mut SenseCtx<'_, H>) {
        (self.f)(ctx)
    }
}
