//! Fluent builders for [`Brain`] and [`Population`].

use std::collections::{BTreeMap, BTreeSet};

use br_behavior::Behavior;
use br_core::{ActivityId, AgentRng, RunConfig, Span};
use br_memory::{MemoryId, MemoryStore};
use br_schedule::Timeline;
use br_sensor::{Sensor, SensorSlot};
use br_world::Host;

use crate::{ActivityGroup, Brain, BrainError, BrainResult, Population};

// ── BrainBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Brain<H>`].
///
/// # Required inputs
///
/// - [`AgentRng`]: the brain's private random stream, usually
///   `AgentRng::new(config.seed, agent_id)`.
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                           |
/// |------------------------|-----------------------------------|
/// | `.memory(store)`       | Empty `MemoryStore`               |
/// | `.sensor(s, interval)` | No sensors                        |
/// | `.group(g)`            | No groups                         |
/// | `.core(a)`             | No core activities                |
/// | `.priorities(list)`    | Empty priority list               |
/// | `.fallback(a)`         | None                              |
/// | `.choices(n)`          | 1                                 |
/// | `.timeline(t)`         | None                              |
/// | `.urgent(list)`        | Empty                             |
///
/// Every memory slot named by a sensor, a gate, an erase list or a behavior
/// requirement is registered on build.
///
/// # Example
///
/// ```rust,ignore
/// let brain = BrainBuilder::<PointHost>::new(AgentRng::new(seed, id))
///     .sensor(NearestEntitySensor::new(HOSTILE, 16.0, NEAREST_HOSTILE), 1)
///     .group(ActivityGroup::new(ActivityId::FIGHT)
///         .gated_on(MemoryRequirement::present(NEAREST_HOSTILE))
///         .with(0, attack))
///     .behavior(ActivityId::IDLE, 0, wander)
///     .priorities([ActivityId::FIGHT, ActivityId::IDLE])
///     .build()?;
/// ```
pub struct BrainBuilder<H: Host> {
    rng:              AgentRng,
    memory:           MemoryStore,
    sensors:          Vec<SensorSlot<H>>,
    groups:           Vec<ActivityGroup<H>>,
    loose:            Vec<(ActivityId, u32, Behavior<H>)>,
    core:             Vec<ActivityId>,
    priorities:       Vec<ActivityId>,
    fallback:         Option<ActivityId>,
    choices:          usize,
    timeline:         Option<Timeline>,
    urgent:           BTreeSet<ActivityId>,
    schedule_enabled: bool,
    extra_memories:   Vec<MemoryId>,
}

impl<H: Host> BrainBuilder<H> {
    pub fn new(rng: AgentRng) -> Self {
        Self {
            rng,
            memory:           MemoryStore::new(),
            sensors:          Vec::new(),
            groups:           Vec::new(),
            loose:            Vec::new(),
            core:             Vec::new(),
            priorities:       Vec::new(),
            fallback:         None,
            choices:          1,
            timeline:         None,
            urgent:           BTreeSet::new(),
            schedule_enabled: true,
            extra_memories:   Vec::new(),
        }
    }

    /// Start from an existing store, e.g. one restored from a snapshot.
    pub fn memory(mut self, store: MemoryStore) -> Self {
        self.memory = store;
        self
    }

    /// Register a slot nothing else names.
    pub fn remember(mut self, id: impl Into<MemoryId>) -> Self {
        self.extra_memories.push(id.into());
        self
    }

    /// Scan `sensor` every `interval` ticks, starting on the first tick.
    pub fn sensor(mut self, sensor: impl Sensor<H> + 'static, interval: impl Into<Span<H::Agent>>) -> Self {
        self.sensors.push(SensorSlot::new(sensor, interval.into()));
        self
    }

    pub fn sensor_slot(mut self, slot: SensorSlot<H>) -> Self {
        self.sensors.push(slot);
        self
    }

    pub fn group(mut self, group: ActivityGroup<H>) -> Self {
        self.groups.push(group);
        self
    }

    /// Add one behavior to `activity`, creating an ungated group if no
    /// [`group`](Self::group) call supplies one.
    pub fn behavior(mut self, activity: ActivityId, priority: u32, behavior: Behavior<H>) -> Self {
        self.loose.push((activity, priority, behavior));
        self
    }

    /// Mark `activity` always active.
    pub fn core(mut self, activity: ActivityId) -> Self {
        self.core.push(activity);
        self
    }

    /// Activities to choose from, most preferred first.
    pub fn priorities(mut self, list: impl IntoIterator<Item = ActivityId>) -> Self {
        self.priorities = list.into_iter().collect();
        self
    }

    /// Activity used when no priority-list entry is eligible.  Its group's
    /// gate still applies: a gated-off fallback leaves only the core
    /// activities active.
    pub fn fallback(mut self, activity: ActivityId) -> Self {
        self.fallback = Some(activity);
        self
    }

    /// How many eligible priority-list entries may be active at once.
    pub fn choices(mut self, n: usize) -> Self {
        self.choices = n;
        self
    }

    pub fn timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Choices the timeline may not override.
    pub fn urgent(mut self, list: impl IntoIterator<Item = ActivityId>) -> Self {
        self.urgent.extend(list);
        self
    }

    pub fn schedule_enabled(mut self, enabled: bool) -> Self {
        self.schedule_enabled = enabled;
        self
    }

    /// Validate the activity wiring, register memories, and return a brain
    /// that has not ticked yet.
    pub fn build(self) -> BrainResult<Brain<H>> {
        if self.choices == 0 {
            return Err(BrainError::Config("choices must be at least 1".into()));
        }

        // ── Assemble groups ───────────────────────────────────────────────
        let mut groups: BTreeMap<ActivityId, ActivityGroup<H>> = BTreeMap::new();
        for group in self.groups {
            let activity = group.activity();
            if groups.insert(activity, group).is_some() {
                return Err(BrainError::Config(format!("activity {activity} has two groups")));
            }
        }
        for (activity, priority, behavior) in self.loose {
            let group = groups.entry(activity).or_insert_with(|| ActivityGroup::new(activity));
            group.add(priority, behavior);
        }
        for (&activity, group) in &groups {
            let mut names: Vec<&'static str> = group.behaviors().map(|b| b.name()).collect();
            names.sort_unstable();
            if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
                return Err(BrainError::DuplicateBehavior { activity, name: pair[0] });
            }
        }

        // ── Every named activity needs a group ────────────────────────────
        let require = |activity: ActivityId, role: &'static str| {
            if groups.contains_key(&activity) {
                Ok(())
            } else {
                Err(BrainError::UnknownActivity { activity, role })
            }
        };
        for &a in &self.core {
            require(a, "core list")?;
        }
        for &a in &self.priorities {
            require(a, "priority list")?;
        }
        for &a in &self.urgent {
            require(a, "urgent set")?;
        }
        if let Some(a) = self.fallback {
            require(a, "fallback")?;
        }
        let mut timeline = self.timeline;
        if let Some(tl) = timeline.as_mut() {
            require(tl.baseline(), "timeline baseline")?;
            for &(_, a) in tl.entries() {
                require(a, "timeline")?;
            }
        }

        // ── Register memories ─────────────────────────────────────────────
        let mut memory = self.memory;
        for id in self.extra_memories {
            memory.register(id);
        }
        for slot in &self.sensors {
            for id in slot.sensor().memories_used() {
                memory.register(id);
            }
        }
        for group in groups.values() {
            for id in group.memory_ids() {
                memory.register(id);
            }
        }

        Ok(Brain {
            memory,
            sensors:          self.sensors,
            groups,
            core:             self.core,
            priorities:       self.priorities,
            fallback:         self.fallback,
            choices:          self.choices,
            timeline,
            urgent:           self.urgent,
            schedule_enabled: self.schedule_enabled,
            rng:              self.rng,
            active:           Vec::new(),
            events:           Vec::new(),
            last_tick:        None,
        })
    }
}

// ── PopulationBuilder ─────────────────────────────────────────────────────────

/// Fluent builder for [`Population<H>`].
///
/// Brains and agent bodies are paired by index; agent `i` gets
/// `AgentId(i)`.
///
/// ```rust,ignore
/// let mut population = PopulationBuilder::new(config)
///     .agents(brains, bodies)
///     .build()?;
/// population.run(&world, &mut NoopObserver);
/// ```
pub struct PopulationBuilder<H: Host> {
    config: RunConfig,
    brains: Vec<Brain<H>>,
    agents: Vec<H::Agent>,
}

impl<H: Host> PopulationBuilder<H> {
    pub fn new(config: RunConfig) -> Self {
        Self { config, brains: Vec::new(), agents: Vec::new() }
    }

    /// Append one agent.
    pub fn agent(mut self, brain: Brain<H>, agent: H::Agent) -> Self {
        self.brains.push(brain);
        self.agents.push(agent);
        self
    }

    /// Append many agents.  Both lists must have the same length.
    pub fn agents(mut self, brains: Vec<Brain<H>>, agents: Vec<H::Agent>) -> Self {
        self.brains.extend(brains);
        self.agents.extend(agents);
        self
    }

    pub fn build(self) -> BrainResult<Population<H>> {
        self.config.validate()?;
        if self.agents.len() != self.brains.len() {
            return Err(BrainError::AgentCountMismatch {
                expected: self.brains.len(),
                got:      self.agents.len(),
                what:     "agent bodies",
            });
        }
        Population::assemble(self.config, self.brains, self.agents)
    }
}
