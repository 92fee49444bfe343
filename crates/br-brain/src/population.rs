//! `Population` — many brains ticked against one shared world.

use std::fmt;

use br_core::{RunConfig, Tick};
use br_world::{AgentBody, Host};

use crate::{AgentStatus, Brain, BrainError, BrainResult, PopulationObserver, TickStats};

/// The population runner.
///
/// Each tick, every brain runs [`Brain::tick`] against the same read-only
/// world.  Brains share nothing, so with the `parallel` feature they tick on
/// Rayon's thread pool; events are still reported in ascending agent order,
/// which keeps observer output identical to a sequential run.
///
/// The world is borrowed per call, so hosts that move entities between ticks
/// drive the loop with [`step`](Self::step) and mutate the world in between.
///
/// Create via [`PopulationBuilder`][crate::PopulationBuilder].
pub struct Population<H: Host> {
    config: RunConfig,
    now:    Tick,
    brains: Vec<Brain<H>>,
    agents: Vec<H::Agent>,
    #[cfg(feature = "parallel")]
    pool:   Option<rayon::ThreadPool>,
}

impl<H: Host> Population<H> {
    pub(crate) fn assemble(
        config: RunConfig,
        brains: Vec<Brain<H>>,
        agents: Vec<H::Agent>,
    ) -> BrainResult<Self> {
        if let Some(pair) = agents.windows(2).find(|w| w[0].agent_id() >= w[1].agent_id()) {
            return Err(BrainError::Config(format!(
                "agents must be in ascending id order: {} precedes {}",
                pair[0].agent_id(),
                pair[1].agent_id()
            )));
        }

        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| BrainError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            config,
            now: Tick::ZERO,
            brains,
            agents,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The next tick to be processed.
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn len(&self) -> usize {
        self.brains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brains.is_empty()
    }

    pub fn brains(&self) -> &[Brain<H>] {
        &self.brains
    }

    pub fn brain_mut(&mut self, index: usize) -> Option<&mut Brain<H>> {
        self.brains.get_mut(index)
    }

    pub fn agents(&self) -> &[H::Agent] {
        &self.agents
    }

    /// Agent bodies, for hosts that sync world state from agent state
    /// between ticks.
    pub fn agents_mut(&mut self) -> &mut [H::Agent] {
        &mut self.agents
    }

    /// Status of every agent, as reported to
    /// [`PopulationObserver::on_snapshot`].
    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.brains
            .iter()
            .zip(&self.agents)
            .map(|(brain, agent)| AgentStatus {
                agent:      agent.agent_id(),
                position:   agent.position(),
                activities: brain.active_activities().to_vec(),
                running:    brain.running_behaviors(),
            })
            .collect()
    }
}

impl<H: Host> Population<H>
where
    H::World: Sync,
    H::Agent: Send,
{
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: PopulationObserver>(&mut self, world: &H::World, observer: &mut O) {
        while self.now < self.config.end_tick() {
            self.step(world, observer);
        }
        observer.on_run_end(self.now);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: PopulationObserver>(&mut self, n: u64, world: &H::World, observer: &mut O) {
        for _ in 0..n {
            self.step(world, observer);
        }
    }

    /// Process the current tick and advance.  Returns the processed tick.
    pub fn step<O: PopulationObserver>(&mut self, world: &H::World, observer: &mut O) -> Tick {
        let now = self.now;
        observer.on_tick_start(now);

        let stats = self.tick_brains(now, world);

        // Ascending agent order, regardless of how the brains were scheduled.
        for (brain, agent) in self.brains.iter().zip(&self.agents) {
            for event in brain.events() {
                observer.on_event(now, agent.agent_id(), event);
            }
        }
        observer.on_tick_end(now, stats);

        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.statuses());
        }

        self.now = now.offset(1);
        now
    }

    /// Stop every running behavior of every brain.  Returns how many stopped.
    pub fn stop_all(&mut self, world: &H::World) -> usize {
        let now = self.now;
        self.brains
            .iter_mut()
            .zip(self.agents.iter_mut())
            .map(|(brain, agent)| brain.stop_all(now, world, agent))
            .sum()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Tick every brain.  With the `parallel` Cargo feature, brains run on
    /// Rayon's thread pool (or the configured one).
    fn tick_brains(&mut self, now: Tick, world: &H::World) -> TickStats {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let brains = &mut self.brains;
        let agents = &mut self.agents;

        #[cfg(not(feature = "parallel"))]
        {
            let mut total = TickStats::default();
            for (brain, agent) in brains.iter_mut().zip(agents.iter_mut()) {
                total += brain.tick(now, world, agent);
            }
            total
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut work = || {
                brains
                    .par_iter_mut()
                    .zip(agents.par_iter_mut())
                    .map(|(brain, agent)| brain.tick(now, world, agent))
                    .reduce(TickStats::default, |mut a, b| {
                        a += b;
                        a
                    })
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            }
        }
    }
}

impl<H: Host> fmt::Debug for Population<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("config", &self.config)
            .field("now", &self.now)
            .field("agents", &self.agents.len())
            .field("brains", &self.brains)
            .finish()
    }
}
