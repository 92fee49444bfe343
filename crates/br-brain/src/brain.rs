//! `Brain` — one agent's memory, sensors, activity groups and timeline.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use br_behavior::{Behavior, TaskCtx};
use br_core::{ActivityId, AgentRng, Tick};
use br_memory::MemoryStore;
use br_schedule::Timeline;
use br_sensor::{SenseCtx, SensorSlot};
use br_world::Host;
use tracing::{debug, trace, warn};

use crate::{ActivityGroup, BrainError, BrainEvent, BrainResult};

// ── TickStats ─────────────────────────────────────────────────────────────────

/// Counters for one [`Brain::tick`].  Sums over a population are reported to
/// [`PopulationObserver::on_tick_end`](crate::PopulationObserver::on_tick_end).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub expired: usize,
    pub scans:   usize,
    pub started: usize,
    pub stopped: usize,
}

impl std::ops::AddAssign for TickStats {
    fn add_assign(&mut self, rhs: TickStats) {
        self.expired += rhs.expired;
        self.scans += rhs.scans;
        self.started += rhs.started;
        self.stopped += rhs.stopped;
    }
}

// ── Brain ─────────────────────────────────────────────────────────────────────

/// The per-agent orchestrator.
///
/// One [`tick`](Self::tick) runs six phases, always in this order:
///
/// 1. **Expiry**: memory TTLs count down; expired values are cleared.
/// 2. **Sensors**: every due sensor scans and writes memory.
/// 3. **Activities**: timeline callbacks fire, then the active set is
///    resolved: the core activities, plus the first eligible activities of the
///    priority list (or the fallback, when its own gate holds), unless the
///    timeline forces its current activity.  The timeline wins over every
///    choice except one listed in the urgent set, which is empty by default.
/// 4. **Start**: stopped behaviors of active groups try to start, in group
///    priority order.
/// 5. **Update**: every running behavior is updated, whether or not its group
///    is still active.
/// 6. **Erase**: groups that left the active set clear their erase-on-stop
///    memories.
///
/// Build with [`BrainBuilder`](crate::BrainBuilder).
pub struct Brain<H: Host> {
    pub(crate) memory:           MemoryStore,
    pub(crate) sensors:          Vec<SensorSlot<H>>,
    pub(crate) groups:           BTreeMap<ActivityId, ActivityGroup<H>>,
    pub(crate) core:             Vec<ActivityId>,
    pub(crate) priorities:       Vec<ActivityId>,
    pub(crate) fallback:         Option<ActivityId>,
    pub(crate) choices:          usize,
    pub(crate) timeline:         Option<Timeline>,
    pub(crate) urgent:           BTreeSet<ActivityId>,
    pub(crate) schedule_enabled: bool,
    pub(crate) rng:              AgentRng,
    pub(crate) active:           Vec<ActivityId>,
    pub(crate) events:           Vec<BrainEvent>,
    pub(crate) last_tick:        Option<Tick>,
}

impl<H: Host> Brain<H> {
    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance this brain by one tick.
    ///
    /// `now` must never decrease between calls.  Events produced during the
    /// tick are available from [`events`](Self::events) until the next call.
    pub fn tick(&mut self, now: Tick, world: &H::World, agent: &mut H::Agent) -> TickStats {
        debug_assert!(
            self.last_tick.is_none_or(|prev| prev <= now),
            "brain ticked backwards to {now}"
        );
        self.last_tick = Some(now);
        self.events.clear();
        let mut stats = TickStats::default();

        // ── ① Expiry ──────────────────────────────────────────────────────
        stats.expired = self.memory.expire_tick(now).expired;

        // ── ② Sensors ─────────────────────────────────────────────────────
        {
            let Self { sensors, memory, rng, .. } = self;
            for slot in sensors.iter_mut() {
                let mut ctx = SenseCtx { tick: now, world, agent: &*agent, memory: &mut *memory, rng: &mut *rng };
                if slot.scan(&mut ctx) {
                    stats.scans += 1;
                }
            }
        }

        // ── ③ Activities ──────────────────────────────────────────────────
        if let Some(timeline) = self.timeline.as_mut() {
            if self.schedule_enabled {
                timeline.fire_due(now, &mut self.memory);
            } else {
                timeline.skip_due(now);
            }
        }
        let resolved = self.resolve_activities(now);
        let previous = std::mem::replace(&mut self.active, resolved);
        for &activity in &self.active {
            if !previous.contains(&activity) {
                debug!(activity = %activity, tick = %now, "activity entered");
                self.events.push(BrainEvent::ActivityEntered { activity });
            }
        }
        let left: Vec<ActivityId> =
            previous.into_iter().filter(|a| !self.active.contains(a)).collect();
        for &activity in &left {
            debug!(activity = %activity, tick = %now, "activity left");
            self.events.push(BrainEvent::ActivityLeft { activity });
        }

        // ── ④ Start / ⑤ Update ────────────────────────────────────────────
        {
            // Explicit field borrows so the borrow checker sees disjoint access.
            let Self { groups, active, memory, rng, events, .. } = self;

            for &activity in active.iter() {
                let Some(group) = groups.get_mut(&activity) else { continue };
                for behavior in group.behaviors_mut() {
                    if behavior.is_running() {
                        continue;
                    }
                    let mut ctx = TaskCtx { tick: now, world, agent: &mut *agent, memory: &mut *memory, rng: &mut *rng };
                    if behavior.try_start(&mut ctx) {
                        events.push(BrainEvent::BehaviorStarted { activity, behavior: behavior.name() });
                        stats.started += 1;
                    }
                }
            }

            for (&activity, group) in groups.iter_mut() {
                for behavior in group.behaviors_mut().filter(|b| b.is_running()) {
                    let mut ctx = TaskCtx { tick: now, world, agent: &mut *agent, memory: &mut *memory, rng: &mut *rng };
                    behavior.update(&mut ctx);
                    if !behavior.is_running() {
                        events.push(BrainEvent::BehaviorStopped { activity, behavior: behavior.name() });
                        stats.stopped += 1;
                    }
                }
            }
        }

        // ── ⑥ Erase ───────────────────────────────────────────────────────
        for activity in left {
            if let Some(group) = self.groups.get(&activity) {
                for &id in group.erase_list() {
                    self.memory.clear(id);
                }
            }
        }

        stats
    }

    fn resolve_activities(&mut self, now: Tick) -> Vec<ActivityId> {
        let groups = &self.groups;
        let memory = &self.memory;
        let eligible = |a: &ActivityId| groups.get(a).is_some_and(|g| g.is_eligible(memory));

        let mut chosen: Vec<ActivityId> =
            self.priorities.iter().copied().filter(|a| eligible(a)).take(self.choices).collect();
        if chosen.is_empty() {
            chosen.extend(self.fallback.filter(|a| eligible(a)));
        }

        if self.schedule_enabled && !chosen.iter().any(|a| self.urgent.contains(a)) {
            if let Some(timeline) = self.timeline.as_mut() {
                let forced = timeline.activity_at(now);
                match groups.get(&forced) {
                    Some(group) if group.is_eligible(memory) => chosen = vec![forced],
                    Some(_) => trace!(activity = %forced, tick = %now, "timeline activity gated off"),
                    None => warn!(activity = %forced, tick = %now, "timeline activity has no group"),
                }
            }
        }

        let mut active: Vec<ActivityId> =
            self.core.iter().copied().filter(|a| groups.contains_key(a)).collect();
        for activity in chosen {
            if !active.contains(&activity) {
                active.push(activity);
            }
        }
        active
    }

    // ── Stopping ──────────────────────────────────────────────────────────

    /// Stop every running behavior of `activity`.  Returns how many stopped.
    ///
    /// Stop events are appended to [`events`](Self::events).
    pub fn stop_activity(
        &mut self,
        activity: ActivityId,
        now:      Tick,
        world:    &H::World,
        agent:    &mut H::Agent,
    ) -> usize {
        let Self { groups, memory, rng, events, .. } = self;
        let Some(group) = groups.get_mut(&activity) else { return 0 };
        stop_group(activity, group, now, world, agent, memory, rng, events)
    }

    /// Stop every running behavior of every group.  Returns how many stopped.
    pub fn stop_all(&mut self, now: Tick, world: &H::World, agent: &mut H::Agent) -> usize {
        let Self { groups, memory, rng, events, .. } = self;
        let mut stopped = 0;
        for (&activity, group) in groups.iter_mut() {
            stopped += stop_group(activity, group, now, world, agent, memory, rng, events);
        }
        stopped
    }

    // ── Dynamic registration ──────────────────────────────────────────────

    /// Add `behavior` to `activity` at rank `priority`, creating an ungated
    /// group if the activity has none.  The behavior's memories are
    /// registered.
    pub fn add_behavior(
        &mut self,
        activity: ActivityId,
        priority: u32,
        behavior: Behavior<H>,
    ) -> BrainResult<()> {
        let group = self.groups.entry(activity).or_insert_with(|| ActivityGroup::new(activity));
        if group.find(behavior.name()).is_some() {
            return Err(BrainError::DuplicateBehavior { activity, name: behavior.name() });
        }
        for id in behavior.memory_ids() {
            self.memory.register(id);
        }
        group.add(priority, behavior);
        Ok(())
    }

    /// Detach the behavior `name` from `activity`, stopping it first if it is
    /// running.
    pub fn remove_behavior(
        &mut self,
        activity: ActivityId,
        name:     &str,
        now:      Tick,
        world:    &H::World,
        agent:    &mut H::Agent,
    ) -> Option<Behavior<H>> {
        let mut behavior = self.groups.get_mut(&activity)?.remove(name)?;
        if behavior.is_running() {
            let mut ctx = TaskCtx { tick: now, world, agent, memory: &mut self.memory, rng: &mut self.rng };
            behavior.stop(&mut ctx);
            self.events.push(BrainEvent::BehaviorStopped { activity, behavior: behavior.name() });
        }
        Some(behavior)
    }

    /// Add a sensor and register the memories it declares.
    pub fn add_sensor(&mut self, slot: SensorSlot<H>) {
        for id in slot.sensor().memories_used() {
            self.memory.register(id);
        }
        self.sensors.push(slot);
    }

    // ── Timeline ──────────────────────────────────────────────────────────

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn timeline_mut(&mut self) -> Option<&mut Timeline> {
        self.timeline.as_mut()
    }

    /// Replace the timeline.  `None` removes it.
    pub fn set_timeline(&mut self, timeline: Option<Timeline>) {
        self.timeline = timeline;
    }

    /// While disabled, the timeline neither forces activities nor fires
    /// callbacks.
    pub fn set_schedule_enabled(&mut self, enabled: bool) {
        self.schedule_enabled = enabled;
    }

    pub fn schedule_enabled(&self) -> bool {
        self.schedule_enabled
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryStore {
        &mut self.memory
    }

    /// Activities resolved by the last tick, core activities first.
    pub fn active_activities(&self) -> &[ActivityId] {
        &self.active
    }

    pub fn is_active(&self, activity: ActivityId) -> bool {
        self.active.contains(&activity)
    }

    /// Events of the last tick, plus any from stop calls since.
    pub fn events(&self) -> &[BrainEvent] {
        &self.events
    }

    pub fn group(&self, activity: ActivityId) -> Option<&ActivityGroup<H>> {
        self.groups.get(&activity)
    }

    pub fn groups(&self) -> impl Iterator<Item = &ActivityGroup<H>> + '_ {
        self.groups.values()
    }

    pub fn behavior(&self, activity: ActivityId, name: &str) -> Option<&Behavior<H>> {
        self.groups.get(&activity)?.find(name)
    }

    /// `true` if a behavior called `name` is running in any group.
    pub fn is_running(&self, name: &str) -> bool {
        self.groups
            .values()
            .flat_map(ActivityGroup::behaviors)
            .any(|b| b.is_running() && b.name() == name)
    }

    /// Paths of every running leaf, prefixed with its activity:
    /// `"fight/melee/strike"`.
    pub fn running_behaviors(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (activity, group) in &self.groups {
            for behavior in group.behaviors() {
                out.extend(behavior.running_paths().into_iter().map(|p| format!("{activity}/{p}")));
            }
        }
        out
    }

    pub fn sensors(&self) -> &[SensorSlot<H>] {
        &self.sensors
    }

    pub fn priorities(&self) -> &[ActivityId] {
        &self.priorities
    }

    pub fn rng_mut(&mut self) -> &mut AgentRng {
        &mut self.rng
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }
}

#[allow(clippy::too_many_arguments)]
fn stop_group<H: Host>(
    activity: ActivityId,
    group:    &mut ActivityGroup<H>,
    now:      Tick,
    world:    &H::World,
    agent:    &mut H::Agent,
    memory:   &mut MemoryStore,
    rng:      &mut AgentRng,
    events:   &mut Vec<BrainEvent>,
) -> usize {
    let mut stopped = 0;
    for behavior in group.behaviors_mut().filter(|b| b.is_running()) {
        let mut ctx = TaskCtx { tick: now, world, agent: &mut *agent, memory: &mut *memory, rng: &mut *rng };
        behavior.stop(&mut ctx);
        events.push(BrainEvent::BehaviorStopped { activity, behavior: behavior.name() });
        stopped += 1;
    }
    stopped
}

impl<H: Host> fmt::Debug for Brain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Brain")
            .field("active", &self.active)
            .field("running", &self.running_behaviors())
            .field("sensors", &self.sensors.len())
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("memory", &self.memory)
            .field("last_tick", &self.last_tick)
            .finish()
    }
}
