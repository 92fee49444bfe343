//! Unit tests for br-schedule.

use br_core::{ActivityId, Tick};
use br_memory::{MemoryKey, MemoryStore};

use crate::Timeline;

const RANG: MemoryKey<u32> = MemoryKey::new("rang");

/// Callback that counts its firings in [`RANG`].
fn bell(_now: Tick, memory: &mut MemoryStore) {
    let n = memory.get(RANG).copied().unwrap_or(0);
    memory.set(RANG, n + 1);
}

/// Rest at 0, work at 10, meet at 20 on a 30-tick day.
fn workday() -> Timeline {
    Timeline::cyclical(30, ActivityId::IDLE)
        .with(20, ActivityId::MEET)
        .with(0, ActivityId::REST)
        .with(10, ActivityId::WORK)
}

// ── DeferredQueue ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod deferred {
    use crate::DeferredQueue;

    #[test]
    fn drain_through_takes_due_items_in_order() {
        let mut q = DeferredQueue::new();
        q.push(5, 'b');
        q.push(1, 'a');
        q.push(9, 'c');
        q.push(5, 'B');
        assert_eq!(q.len(), 4);
        assert_eq!(q.drain_through(5), vec!['a', 'b', 'B']);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(9));
        assert!(q.drain_through(8).is_empty());
    }

    #[test]
    fn drain_through_max_takes_everything() {
        let mut q = DeferredQueue::new();
        q.push(u64::MAX, 1);
        q.push(0, 2);
        assert_eq!(q.drain_through(u64::MAX), vec![2, 1]);
        assert!(q.is_empty());
    }

    #[test]
    fn iter_mut_yields_due_times_in_order() {
        let mut q = DeferredQueue::new();
        q.push(7, 'b');
        q.push(2, 'a');
        q.push(7, 'c');
        let seen: Vec<(u64, char)> = q.iter_mut().map(|(at, v)| (at, *v)).collect();
        assert_eq!(seen, vec![(2, 'a'), (7, 'b'), (7, 'c')]);
        assert_eq!(q.len(), 3);
    }
}

// ── Cyclical timeline ─────────────────────────────────────────────────────────

#[cfg(test)]
mod cyclical {
    use super::*;

    #[test]
    fn entries_are_sorted_lazily() {
        let mut tl = workday();
        let times: Vec<u64> = tl.entries().iter().map(|&(t, _)| t).collect();
        assert_eq!(times, vec![0, 10, 20]);
    }

    #[test]
    fn last_passed_entry_wins_and_wraps() {
        let mut tl = workday();
        assert_eq!(tl.activity_at(Tick(0)), ActivityId::REST);
        assert_eq!(tl.activity_at(Tick(9)), ActivityId::REST);
        assert_eq!(tl.activity_at(Tick(10)), ActivityId::WORK);
        assert_eq!(tl.activity_at(Tick(29)), ActivityId::MEET);
        assert_eq!(tl.activity_at(Tick(31)), ActivityId::REST);
        assert_eq!(tl.activity_at(Tick(3 * 30 + 15)), ActivityId::WORK);
        assert_eq!(tl.len(), 3);
    }

    #[test]
    fn baseline_before_first_entry() {
        let mut tl = Timeline::cyclical(100, ActivityId::IDLE).with(40, ActivityId::WORK);
        assert_eq!(tl.activity_at(Tick(39)), ActivityId::IDLE);
        assert_eq!(tl.activity_at(Tick(40)), ActivityId::WORK);
        assert_eq!(tl.activity_at(Tick(140)), ActivityId::WORK);
        assert_eq!(tl.activity_at(Tick(201)), ActivityId::IDLE);
    }

    #[test]
    fn insertion_after_query_is_picked_up() {
        let mut tl = workday();
        assert_eq!(tl.activity_at(Tick(25)), ActivityId::MEET);
        tl.add(25, ActivityId::PLAY);
        assert_eq!(tl.activity_at(Tick(25)), ActivityId::PLAY);
    }

    #[test]
    fn daily_uses_day_length() {
        let cycle = br_core::DayCycle::new(1_000);
        let mut tl = Timeline::daily(cycle, ActivityId::IDLE).with(500, ActivityId::REST);
        assert_eq!(tl.activity_at(Tick(2_499)), ActivityId::IDLE);
        assert_eq!(tl.activity_at(Tick(2_500)), ActivityId::REST);
    }

    #[test]
    fn callbacks_recur_every_cycle() {
        let mut tl = workday();
        tl.on(12, bell);
        let mut memory = MemoryStore::new();
        let mut fired_at = Vec::new();
        for t in 0..100 {
            if tl.fire_due(Tick(t), &mut memory) > 0 {
                fired_at.push(t);
            }
        }
        assert_eq!(fired_at, vec![12, 42, 72]);
        assert_eq!(memory.get(RANG), Some(&3));
        assert_eq!(tl.pending_callbacks(), 1);
    }

    #[test]
    fn callbacks_fire_across_wrap_with_sparse_calls() {
        let mut tl = workday();
        tl.on(29, bell);
        tl.on(1, bell);
        let mut memory = MemoryStore::new();
        tl.fire_due(Tick(25), &mut memory);
        // 25 -> 33 wraps: 29 and 1 were both crossed.
        assert_eq!(tl.fire_due(Tick(33), &mut memory), 2);
        assert_eq!(tl.fire_due(Tick(33), &mut memory), 0);
    }

    #[test]
    fn callbacks_catch_up_when_a_whole_period_passes() {
        let mut tl = Timeline::cyclical(10, ActivityId::IDLE);
        tl.on(3, bell);
        let mut memory = MemoryStore::new();
        assert_eq!(tl.fire_due(Tick(3), &mut memory), 1);
        // Same position one period later.
        assert_eq!(tl.fire_due(Tick(13), &mut memory), 1);
        // More than a period later, landing past the position.
        assert_eq!(tl.fire_due(Tick(27), &mut memory), 1);
        // 27 -> 55 crosses 33, 43 and 53.
        assert_eq!(tl.fire_due(Tick(55), &mut memory), 3);
        assert_eq!(memory.get(RANG), Some(&6));
    }

    #[test]
    fn skipped_ticks_do_not_fire_later() {
        let mut tl = workday();
        tl.on(12, bell);
        let mut memory = MemoryStore::new();
        tl.fire_due(Tick(0), &mut memory);
        tl.skip_due(Tick(50));
        assert_eq!(tl.fire_due(Tick(60), &mut memory), 0);
        assert_eq!(tl.fire_due(Tick(72), &mut memory), 1);
        assert_eq!(memory.get(RANG), Some(&1));
    }

    #[test]
    fn first_fire_only_runs_exact_position() {
        let mut tl = workday();
        tl.on(0, bell);
        tl.on(5, bell);
        let mut memory = MemoryStore::new();
        assert_eq!(tl.fire_due(Tick(5), &mut memory), 1);

        let mut tl = workday();
        tl.on(0, bell);
        assert_eq!(tl.fire_due(Tick(60), &mut memory), 1);
    }
}

// ── Since-spawn timeline ──────────────────────────────────────────────────────

#[cfg(test)]
mod since_spawn {
    use super::*;

    #[test]
    fn runs_once_then_clears() {
        let mut tl = Timeline::since_spawn(Tick(0), ActivityId::IDLE)
            .with(20, ActivityId::RAID)
            .with(10, ActivityId::PRE_RAID);
        assert_eq!(tl.activity_at(Tick(5)), ActivityId::IDLE);
        assert_eq!(tl.activity_at(Tick(15)), ActivityId::PRE_RAID);
        assert_eq!(tl.activity_at(Tick(25)), ActivityId::RAID);
        assert_eq!(tl.len(), 0);
        assert_eq!(tl.activity_at(Tick(30)), ActivityId::IDLE);
    }

    #[test]
    fn measured_from_spawn_tick() {
        let mut tl = Timeline::since_spawn(Tick(1_000), ActivityId::IDLE).with(10, ActivityId::PANIC);
        assert_eq!(tl.position(Tick(1_004)), 4);
        assert_eq!(tl.activity_at(Tick(1_009)), ActivityId::IDLE);
        assert_eq!(tl.activity_at(Tick(1_010)), ActivityId::PANIC);
        assert!(tl.is_empty());
    }

    #[test]
    fn callbacks_fire_once_and_are_removed() {
        let mut tl = Timeline::since_spawn(Tick(100), ActivityId::IDLE);
        tl.on(3, bell);
        tl.on(3, bell);
        tl.on(7, bell);
        let mut memory = MemoryStore::new();
        let fired: Vec<usize> = (100..110).map(|t| tl.fire_due(Tick(t), &mut memory)).collect();
        assert_eq!(fired, vec![0, 0, 0, 2, 0, 0, 0, 1, 0, 0]);
        assert_eq!(memory.get(RANG), Some(&3));
        assert!(tl.is_empty());
    }

    #[test]
    fn late_first_fire_catches_up() {
        let mut tl = Timeline::since_spawn(Tick(0), ActivityId::IDLE);
        tl.on(2, bell);
        tl.on(4, bell);
        let mut memory = MemoryStore::new();
        assert_eq!(tl.fire_due(Tick(50), &mut memory), 2);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use br_core::{ActivityId, Tick};

    use crate::{load_timeline_reader, ScheduleError, TimeBase};

    const DAY: TimeBase = TimeBase::Cyclical { period: 24_000 };

    const CSV: &str = "\
time,activity
12000,Rest
0, rest
2000,work
9000,meet
11000,70
";

    #[test]
    fn loads_names_and_ids_in_any_order() {
        let mut tl = load_timeline_reader(Cursor::new(CSV), DAY, ActivityId::IDLE).unwrap();
        assert_eq!(tl.len(), 5);
        assert_eq!(tl.activity_at(Tick(2_500)), ActivityId::WORK);
        assert_eq!(tl.activity_at(Tick(11_500)), ActivityId(70));
        assert_eq!(tl.activity_at(Tick(23_999)), ActivityId::REST);
    }

    #[test]
    fn unknown_activity_errors() {
        let csv = "time,activity\n0,juggle\n";
        let err = load_timeline_reader(Cursor::new(csv), DAY, ActivityId::IDLE).unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(ref m) if m.contains("juggle")));
    }

    #[test]
    fn time_outside_cycle_errors() {
        let csv = "time,activity\n24000,rest\n";
        let err = load_timeline_reader(Cursor::new(csv), DAY, ActivityId::IDLE).unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(ref m) if m.contains("outside the cycle")));
    }

    #[test]
    fn since_spawn_accepts_any_time() {
        let csv = "time,activity\n1000000,raid\n";
        let base = TimeBase::SinceSpawn { spawned_at: Tick(0) };
        let tl = load_timeline_reader(Cursor::new(csv), base, ActivityId::IDLE).unwrap();
        assert_eq!(tl.len(), 1);
    }

    #[test]
    fn bad_number_errors() {
        let csv = "time,activity\nsoon,rest\n";
        assert!(load_timeline_reader(Cursor::new(csv), DAY, ActivityId::IDLE).is_err());
    }
}
