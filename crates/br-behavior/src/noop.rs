//! Trivial tasks.

use br_world::Host;

use crate::{Task, TaskCtx};

/// A [`Task`] that does nothing and runs for a single update.
///
/// Useful as a placeholder in tests and as a filler leaf in composites.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopTask;

impl<H: Host> Task<H> for NoopTask {}

/// A [`Task`] from a tick closure.
///
/// The closure runs on every update and returns whether the task wants to
/// keep running.
pub struct FnTask<F> {
    f:    F,
    keep: bool,
}

impl<F> FnTask<F> {
    pub fn new(f: F) -> Self {
        Self { f, keep: false }
    }
}

impl<H, F> Task<H> for FnTask<F>
where
    H: Host,
    F: FnMut(&mut TaskCtx<'_, H>) -> bool + Send,
{
    fn start(&mut self, _ctx: &mut TaskCtx<'_, H>) {
        self.keep = true;
    }

    fn tick(&mut self, ctx: &mut TaskCtx<'_, H>) {
        self.keep = (self.f)(ctx);
    }

    fn should_keep_running(&mut self, _ctx: &TaskCtx<'_, H>) -> bool {
        self.keep
    }
}
