//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter supplied by the host on
//! every `Brain::tick` call.  All timing in the scheduler (memory expiry,
//! sensor cadence, behavior timeouts and cooldowns, timelines) is integer tick
//! arithmetic, so comparisons are exact and boundary behavior is well defined.
//!
//! `DayCycle` maps ticks onto a repeating day for cyclical timelines:
//!
//!   time_of_day = tick % ticks_per_day

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Arithmetic saturates at `Tick::MAX`, which doubles as "never" for
/// unbounded timeouts.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
    pub const MAX: Tick = Tick(u64::MAX);

    /// Return the tick `n` steps after `self`, saturating at `Tick::MAX`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self` (zero if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── DayCycle ──────────────────────────────────────────────────────────────────

/// Converts absolute ticks to (day, time-of-day) for cyclical schedules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayCycle {
    /// Length of one full day-night cycle in ticks.  Must be > 0.
    pub ticks_per_day: u64,
}

impl DayCycle {
    /// Twenty ticks per second for twenty minutes.
    pub const DEFAULT_TICKS_PER_DAY: u64 = 24_000;

    pub fn new(ticks_per_day: u64) -> Self {
        debug_assert!(ticks_per_day > 0, "ticks_per_day must be > 0");
        Self { ticks_per_day }
    }

    /// Position of `tick` within its day, in `[0, ticks_per_day)`.
    #[inline]
    pub fn time_of_day(&self, tick: Tick) -> u64 {
        tick.0 % self.ticks_per_day
    }

    /// Zero-based day number of `tick`.
    #[inline]
    pub fn day(&self, tick: Tick) -> u64 {
        tick.0 / self.ticks_per_day
    }
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TICKS_PER_DAY)
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration for a population run.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the population builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Length of a day for cyclical timelines.
    pub ticks_per_day: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Report a trace snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl RunConfig {
    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn day_cycle(&self) -> DayCycle {
        DayCycle::new(self.ticks_per_day)
    }

    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> crate::CoreResult<()> {
        if self.ticks_per_day == 0 {
            return Err(crate::CoreError::Config("ticks_per_day must be > 0".into()));
        }
        if self.num_threads == Some(0) {
            return Err(crate::CoreError::Config("num_threads must be > 0 when set".into()));
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed:                    0,
            total_ticks:             DayCycle::DEFAULT_TICKS_PER_DAY,
            ticks_per_day:           DayCycle::DEFAULT_TICKS_PER_DAY,
            num_threads:             None,
            snapshot_interval_ticks: 0,
        }
    }
}
