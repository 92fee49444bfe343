//! The guard brain: wander by day, rest at night, engage hostiles on sight.

use br_behavior::{Behavior, NoopTask, Policy, Task, TaskCtx};
use br_brain::{ActivityGroup, Brain, BrainBuilder, BrainResult};
use br_core::{ActivityId, AgentRng, DayCycle, EntityId, Pos, Span};
use br_memory::{MemoryKey, MemoryRequirement};
use br_schedule::Timeline;
use br_sensor::NearestEntitySensor;
use br_world::{EntityKind, PointHost, WorldQuery};

pub const GUARD: EntityKind = EntityKind(1);
pub const HOSTILE: EntityKind = EntityKind(2);

pub const NEAREST_HOSTILE: MemoryKey<EntityId> = MemoryKey::new("nearest_hostile");
pub const THREATENED: MemoryKey<bool> = MemoryKey::new("threatened");
/// Written by the strike behavior; the host resolves it against the world.
pub const STRUCK: MemoryKey<EntityId> = MemoryKey::new("struck");

const SIGHT_RADIUS: f64 = 12.0;
const REACH: f64 = 1.0;
const RUN_SPEED: f64 = 0.5;
const WALK_SPEED: f64 = 0.15;
const STROLL_RADIUS: f64 = 4.0;

type Ctx<'a> = TaskCtx<'a, PointHost>;

fn target_pos(ctx: &Ctx<'_>) -> Option<Pos> {
    let id = *ctx.memory.get(NEAREST_HOSTILE)?;
    ctx.world.position_of(id)
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

/// Close in on the remembered hostile.
struct Approach;

impl Task<PointHost> for Approach {
    fn check_extra_start(&mut self, ctx: &mut Ctx<'_>) -> bool {
        target_pos(ctx).is_some()
    }

    fn tick(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(target) = target_pos(ctx) {
            ctx.agent.step_towards(target, RUN_SPEED);
        }
    }

    fn should_keep_running(&mut self, ctx: &Ctx<'_>) -> bool {
        target_pos(ctx).is_some_and(|target| !ctx.agent.pos.within(target, REACH))
    }
}

/// One blow at the hostile in reach.
struct Strike;

impl Task<PointHost> for Strike {
    fn check_extra_start(&mut self, ctx: &mut Ctx<'_>) -> bool {
        target_pos(ctx).is_some_and(|target| ctx.agent.pos.within(target, REACH))
    }

    fn start(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(&target) = ctx.memory.get(NEAREST_HOSTILE) {
            ctx.memory.set(STRUCK, target);
        }
    }
}

/// Walk to a random spot around the post.
struct Stroll {
    post:    Pos,
    dest:    Pos,
    arrived: bool,
}

impl Task<PointHost> for Stroll {
    fn start(&mut self, ctx: &mut Ctx<'_>) {
        let dx = ctx.rng.gen_range(-STROLL_RADIUS..STROLL_RADIUS);
        let dy = ctx.rng.gen_range(-STROLL_RADIUS..STROLL_RADIUS);
        self.dest = Pos::new(self.post.x + dx, self.post.y + dy, self.post.z);
        self.arrived = false;
    }

    fn tick(&mut self, ctx: &mut Ctx<'_>) {
        self.arrived = ctx.agent.step_towards(self.dest, WALK_SPEED);
    }

    fn should_keep_running(&mut self, _ctx: &Ctx<'_>) -> bool {
        !self.arrived
    }
}

/// Head back to the post and stay there.
struct ReturnToPost(Pos);

impl Task<PointHost> for ReturnToPost {
    fn tick(&mut self, ctx: &mut Ctx<'_>) {
        ctx.agent.step_towards(self.0, WALK_SPEED);
    }

    fn should_keep_running(&mut self, _ctx: &Ctx<'_>) -> bool {
        true
    }
}

// ── Brain ─────────────────────────────────────────────────────────────────────

/// A guard posted at `post`.  Nights (the last quarter of each day) are spent
/// resting at the post unless a hostile is in sight.
pub fn guard_brain(rng: AgentRng, post: Pos, day: DayCycle) -> BrainResult<Brain<PointHost>> {
    let engage = Behavior::composite(
        "engage",
        Policy::Sequential,
        [
            Behavior::leaf("approach", Approach).duration(200),
            Behavior::leaf("strike", Strike).duration(1).cooldown(5),
        ],
    );

    let patrol = Behavior::weighted(
        "patrol",
        Policy::OneRandom,
        [
            (Behavior::leaf("stroll", Stroll { post, dest: post, arrived: false }).duration(Span::between(40, 120)), 3),
            (Behavior::leaf("stand", NoopTask).duration(Span::between(10, 30)), 1),
        ],
    )
    .cooldown(Span::between(0, 10));

    let rest = Behavior::leaf("rest", ReturnToPost(post)).duration(Span::Unbounded);

    let night = day.ticks_per_day - day.ticks_per_day / 4;
    let timeline = Timeline::daily(day, ActivityId::IDLE).with(night, ActivityId::REST);

    BrainBuilder::new(rng)
        .sensor(
            NearestEntitySensor::new(HOSTILE, SIGHT_RADIUS, NEAREST_HOSTILE)
                .flag_present(THREATENED)
                .expire_after(3),
            Span::between(1, 3),
        )
        .group(
            ActivityGroup::new(ActivityId::FIGHT)
                .gated_on(MemoryRequirement::present(THREATENED))
                .erase_on_stop(NEAREST_HOSTILE)
                .with(0, engage),
        )
        .behavior(ActivityId::IDLE, 0, patrol)
        .behavior(ActivityId::REST, 0, rest)
        .priorities([ActivityId::FIGHT, ActivityId::IDLE])
        .urgent([ActivityId::FIGHT])
        .timeline(timeline)
        .remember(STRUCK)
        .build()
}
