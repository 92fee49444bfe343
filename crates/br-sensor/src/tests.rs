//! Unit tests for br-sensor.

use br_core::{AgentId, AgentRng, EntityId, Pos, Tick};
use br_memory::{MemoryKey, MemoryStore};
use br_world::{Body, EntityKind, PointHost, PointWorld};

use crate::{SenseCtx, Sensor};

const HOSTILE: EntityKind = EntityKind(1);
const FOOD: EntityKind = EntityKind(2);

const TARGET: MemoryKey<EntityId> = MemoryKey::new("target");
const THREAT: MemoryKey<bool> = MemoryKey::new("threat");
const SEEN: MemoryKey<Vec<EntityId>> = MemoryKey::new("seen");

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Rig {
    world:  PointWorld,
    body:   Body,
    memory: MemoryStore,
    rng:    AgentRng,
}

impl Rig {
    fn new() -> Self {
        let mut world = PointWorld::new();
        let me = world.spawn(Pos::ORIGIN, EntityKind(0));
        Rig {
            world,
            body: Body::new(AgentId(0), Pos::ORIGIN).with_entity(me),
            memory: MemoryStore::new(),
            rng: AgentRng::from_seed(7),
        }
    }

    fn sense(&mut self, sensor: &mut dyn Sensor<PointHost>, tick: u64) {
        let mut ctx = SenseCtx::<PointHost> {
            tick:   Tick(tick),
            world:  &self.world,
            agent:  &self.body,
            memory: &mut self.memory,
            rng:    &mut self.rng,
        };
        sensor.sense(&mut ctx);
    }
}

// ── SensorSlot ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod slot {
    use br_core::{Pos, Span, Tick};
    use br_memory::MemoryKey;
    use br_world::PointHost;

    use super::*;
    use crate::{FnSensor, SensorSlot};

    const COUNT: MemoryKey<u32> = MemoryKey::new("count");

    fn counter() -> FnSensor<impl FnMut(&mut SenseCtx<'_, PointHost>) + Send> {
        FnSensor::new("counter", [COUNT.id()], |ctx: &mut SenseCtx<'_, PointHost>| {
            let n = ctx.memory.get(COUNT).copied().unwrap_or(0);
            ctx.memory.set(COUNT, n + 1);
        })
    }

    fn poll(rig: &mut Rig, slot: &mut SensorSlot<PointHost>, ticks: std::ops::RangeInclusive<u64>) -> Vec<u64> {
        let mut fired = Vec::new();
        for t in ticks {
            let mut ctx = SenseCtx::<PointHost> {
                tick:   Tick(t),
                world:  &rig.world,
                agent:  &rig.body,
                memory: &mut rig.memory,
                rng:    &mut rig.rng,
            };
            if slot.scan(&mut ctx) {
                fired.push(t);
            }
        }
        fired
    }

    #[test]
    fn fixed_interval_cadence() {
        let mut rig = Rig::new();
        let mut slot = SensorSlot::new(counter(), Span::ticks(5));
        assert_eq!(poll(&mut rig, &mut slot, 0..=12), vec![0, 5, 10]);
        assert_eq!(slot.scans(), 3);
        assert_eq!(slot.next_scan(), Tick(15));
        assert_eq!(rig.memory.get(COUNT), Some(&3));
    }

    #[test]
    fn zero_interval_scans_every_tick() {
        let mut rig = Rig::new();
        let mut slot = SensorSlot::new(counter(), Span::ticks(0));
        assert_eq!(poll(&mut rig, &mut slot, 3..=6), vec![3, 4, 5, 6]);
    }

    #[test]
    fn first_scan_can_be_delayed() {
        let mut rig = Rig::new();
        let mut slot = SensorSlot::new(counter(), Span::ticks(2)).first_scan_at(Tick(3));
        assert_eq!(poll(&mut rig, &mut slot, 0..=7), vec![3, 5, 7]);
    }

    #[test]
    fn dynamic_interval_is_resampled_each_scan() {
        let mut rig = Rig::new();
        let span = Span::dynamic(|body: &br_world::Body, _: &mut br_core::AgentRng| {
            if body.pos.x > 0.0 { 1 } else { 10 }
        });
        let mut slot = SensorSlot::new(counter(), span);
        assert_eq!(poll(&mut rig, &mut slot, 0..=4), vec![0]);
        // Agent moved: the pending wait is kept, later scans speed up.
        rig.body.pos = Pos::new(1.0, 0.0, 0.0);
        assert_eq!(poll(&mut rig, &mut slot, 5..=12), vec![10, 11, 12]);
    }

    #[test]
    fn ranged_interval_stays_in_bounds() {
        let mut rig = Rig::new();
        let mut slot = SensorSlot::new(counter(), Span::between(2, 4));
        let fired = poll(&mut rig, &mut slot, 0..=200);
        for pair in fired.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((2..=4).contains(&gap), "gap {gap}");
        }
    }
}

// ── NearestEntitySensor ───────────────────────────────────────────────────────

#[cfg(test)]
mod nearest {
    use br_core::Pos;
    use br_memory::MemoryStatus;

    use super::*;
    use crate::NearestEntitySensor;

    fn threat_sensor() -> NearestEntitySensor {
        NearestEntitySensor::new(HOSTILE, 10.0, TARGET)
            .flag_present(THREAT)
            .list_visible(SEEN)
    }

    #[test]
    fn declares_its_memories() {
        let s = threat_sensor();
        let ids = <NearestEntitySensor as Sensor<PointHost>>::memories_used(&s);
        assert_eq!(ids, vec![TARGET.id(), THREAT.id(), SEEN.id()]);
    }

    #[test]
    fn writes_nearest_flag_and_sorted_list() {
        let mut rig = Rig::new();
        let far = rig.world.spawn(Pos::new(8.0, 0.0, 0.0), HOSTILE);
        let near = rig.world.spawn(Pos::new(0.0, 3.0, 0.0), HOSTILE);
        rig.world.spawn(Pos::new(1.0, 0.0, 0.0), FOOD);
        rig.world.spawn(Pos::new(30.0, 0.0, 0.0), HOSTILE);

        let mut s = threat_sensor();
        rig.sense(&mut s, 0);
        assert_eq!(rig.memory.get(TARGET), Some(&near));
        assert_eq!(rig.memory.get(THREAT), Some(&true));
        assert_eq!(rig.memory.get(SEEN), Some(&vec![near, far]));
    }

    #[test]
    fn miss_clears_everything() {
        let mut rig = Rig::new();
        let h = rig.world.spawn(Pos::new(2.0, 0.0, 0.0), HOSTILE);
        let mut s = threat_sensor();
        rig.sense(&mut s, 0);
        rig.world.despawn(h).unwrap();
        rig.sense(&mut s, 1);
        assert!(rig.memory.check(TARGET, MemoryStatus::Absent));
        assert!(rig.memory.check(THREAT, MemoryStatus::Absent));
        assert!(rig.memory.check(SEEN, MemoryStatus::Absent));
    }

    #[test]
    fn never_sees_itself() {
        let mut rig = Rig::new();
        let me = rig.body.entity.unwrap();
        let mut s = NearestEntitySensor::new(EntityKind(0), 10.0, TARGET);
        rig.sense(&mut s, 0);
        assert_eq!(rig.memory.get(TARGET), None);
        let other = rig.world.spawn(Pos::new(1.0, 1.0, 0.0), EntityKind(0));
        rig.sense(&mut s, 1);
        assert_eq!(rig.memory.get(TARGET), Some(&other));
        assert_ne!(other, me);
    }

    #[test]
    fn ttl_keeps_last_sighting_until_expiry() {
        let mut rig = Rig::new();
        let h = rig.world.spawn(Pos::new(2.0, 0.0, 0.0), HOSTILE);
        let mut s = threat_sensor().expire_after(3);
        rig.memory.expire_tick(Tick(0));
        rig.sense(&mut s, 0);
        rig.world.despawn(h).unwrap();
        for t in 1..=2 {
            rig.memory.expire_tick(Tick(t));
            rig.sense(&mut s, t);
            assert_eq!(rig.memory.get(TARGET), Some(&h), "tick {t}");
        }
        rig.memory.expire_tick(Tick(3));
        assert_eq!(rig.memory.get(TARGET), None);
        assert_eq!(rig.memory.get(SEEN), None);
    }

    #[test]
    fn memoized_miss_is_trusted_until_uses_run_out() {
        let mut rig = Rig::new();
        let mut s = NearestEntitySensor::new(HOSTILE, 10.0, TARGET).memoize(2);
        rig.sense(&mut s, 0);
        let h = rig.world.spawn(Pos::new(2.0, 0.0, 0.0), HOSTILE);
        rig.sense(&mut s, 1);
        rig.sense(&mut s, 2);
        assert_eq!(rig.memory.get(TARGET), None);
        rig.sense(&mut s, 3);
        assert_eq!(rig.memory.get(TARGET), Some(&h));
    }

    #[test]
    fn memoized_hit_is_dropped_when_it_leaves() {
        let mut rig = Rig::new();
        let a = rig.world.spawn(Pos::new(2.0, 0.0, 0.0), HOSTILE);
        let b = rig.world.spawn(Pos::new(5.0, 0.0, 0.0), HOSTILE);
        let mut s = NearestEntitySensor::new(HOSTILE, 10.0, TARGET).memoize(100);
        rig.sense(&mut s, 0);
        assert_eq!(rig.memory.get(TARGET), Some(&a));
        // A closer entity does not displace the remembered one...
        let c = rig.world.spawn(Pos::new(1.0, 0.0, 0.0), HOSTILE);
        rig.sense(&mut s, 1);
        assert_eq!(rig.memory.get(TARGET), Some(&a));
        // ...until the remembered one is gone.
        rig.world.despawn(a).unwrap();
        rig.sense(&mut s, 2);
        assert_eq!(rig.memory.get(TARGET), Some(&c));
        assert_ne!(b, c);
    }
}

// ── FnSensor ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod func {
    use super::*;
    use crate::FnSensor;

    #[test]
    fn closure_reads_agent_and_writes_memory() {
        let mut rig = Rig::new();
        rig.body.pos = br_core::Pos::new(0.0, 0.0, -5.0);
        let mut s = FnSensor::new("underwater", [THREAT.id()], |ctx: &mut SenseCtx<'_, PointHost>| {
            let wet = ctx.agent.pos.z < 0.0;
            ctx.memory.set_opt(THREAT, wet.then_some(true));
        });
        rig.sense(&mut s, 0);
        assert_eq!(rig.memory.get(THREAT), Some(&true));
        assert_eq!(Sensor::<PointHost>::name(&s), "underwater");
        assert_eq!(Sensor::<PointHost>::memories_used(&s), vec![THREAT.id()]);
    }
}
