//! Unit tests for br-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActivityId, AgentId, EntityId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(EntityId::INVALID.0, u32::MAX);
        assert_eq!(ActivityId::INVALID.0, u16::MAX);
        assert!(!EntityId::default().is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ActivityId::FIGHT.to_string(), "fight");
        assert_eq!(ActivityId(70).to_string(), "activity#70");
    }

    #[test]
    fn parse_builtin_names_and_numbers() {
        assert_eq!(ActivityId::parse("fight").unwrap(), ActivityId::FIGHT);
        assert_eq!(ActivityId::parse(" Pre_Raid ").unwrap(), ActivityId::PRE_RAID);
        assert_eq!(ActivityId::parse("99").unwrap(), ActivityId(99));
        assert!(ActivityId::parse("dance").is_err());
    }
}

#[cfg(test)]
mod time {
    use crate::{DayCycle, RunConfig, Tick};

    #[test]
    fn tick_arithmetic_saturates() {
        assert_eq!(Tick(5) + 3, Tick(8));
        assert_eq!(Tick(5) - Tick(3), 2);
        assert_eq!(Tick(3) - Tick(5), 0);
        assert_eq!(Tick(10) + u64::MAX, Tick::MAX);
    }

    #[test]
    fn day_cycle_wraps() {
        let day = DayCycle::new(100);
        assert_eq!(day.time_of_day(Tick(0)), 0);
        assert_eq!(day.time_of_day(Tick(250)), 50);
        assert_eq!(day.day(Tick(250)), 2);
    }

    #[test]
    fn run_config_validation() {
        let mut cfg = RunConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.ticks_per_day = 0;
        assert!(cfg.validate().is_err());
        cfg.ticks_per_day = 10;
        cfg.num_threads = Some(0);
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(7, AgentId(3));
        let mut b = AgentRng::new(7, AgentId(3));
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1_000u32), b.gen_range(0..1_000u32));
        }
    }

    #[test]
    fn agents_get_distinct_streams() {
        let mut a = AgentRng::new(7, AgentId(0));
        let mut b = AgentRng::new(7, AgentId(1));
        let xs: Vec<u64> = (0..8).map(|_| a.gen_range(0..u64::MAX)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.gen_range(0..u64::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn unit_open_never_hits_bounds() {
        let mut rng = AgentRng::from_seed(1);
        for _ in 0..10_000 {
            let r = rng.unit_open();
            assert!(r > 0.0 && r < 1.0, "got {r}");
        }
    }
}

#[cfg(test)]
mod span {
    use crate::{AgentRng, Span};

    struct Agent {
        alarmed: bool,
    }

    #[test]
    fn fixed_and_unbounded() {
        let mut rng = AgentRng::from_seed(0);
        let agent = Agent { alarmed: false };
        assert_eq!(Span::<Agent>::ticks(20).sample(&agent, &mut rng), 20);
        assert_eq!(Span::<Agent>::Unbounded.sample(&agent, &mut rng), u64::MAX);
    }

    #[test]
    fn between_stays_in_range() {
        let mut rng = AgentRng::from_seed(0);
        let agent = Agent { alarmed: false };
        let span = Span::<Agent>::between(5, 9);
        for _ in 0..200 {
            let n = span.sample(&agent, &mut rng);
            assert!((5..=9).contains(&n));
        }
    }

    #[test]
    fn dynamic_reads_agent_state() {
        let mut rng = AgentRng::from_seed(0);
        let span = Span::<Agent>::dynamic(|a, _| if a.alarmed { 2 } else { 20 });
        assert_eq!(span.sample(&Agent { alarmed: true }, &mut rng), 2);
        assert_eq!(span.sample(&Agent { alarmed: false }, &mut rng), 20);
    }

    #[test]
    #[should_panic(expected = "is empty")]
    fn inverted_range_panics() {
        let _ = Span::<Agent>::between(9, 5);
    }
}

#[cfg(test)]
mod geo {
    use crate::Pos;

    #[test]
    fn distances() {
        let a = Pos::new(0.0, 0.0, 0.0);
        let b = Pos::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(b), 5.0);
        assert!(a.within(b, 5.0));
        assert!(!a.within(b, 4.99));
    }
}
