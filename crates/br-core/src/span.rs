//! `Span` — how many ticks something lasts.
//!
//! Used for sensor scan intervals, behavior run durations and cooldowns.  A
//! span is resampled every time it is consulted, so ranged and dynamic spans
//! let designers vary cadence per activation (e.g. scan faster under threat).

use std::fmt;

use crate::AgentRng;

/// Agent-dependent tick count provider.
///
/// `A` is the host's agent type; only [`Span::Dynamic`] looks at it.
pub enum Span<A: ?Sized> {
    /// Always the same number of ticks.
    Fixed(u64),
    /// Uniformly sampled from `min..=max` on every use.
    Between { min: u64, max: u64 },
    /// Never elapses.
    Unbounded,
    /// Computed from the agent's current state.
    Dynamic(Box<dyn Fn(&A, &mut AgentRng) -> u64 + Send + Sync>),
}

impl<A: ?Sized> Span<A> {
    pub fn ticks(n: u64) -> Self {
        Span::Fixed(n)
    }

    /// Inclusive uniform range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn between(min: u64, max: u64) -> Self {
        assert!(min <= max, "span range {min}..={max} is empty");
        Span::Between { min, max }
    }

    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&A, &mut AgentRng) -> u64 + Send + Sync + 'static,
    {
        Span::Dynamic(Box::new(f))
    }

    /// Draw a tick count.  `Unbounded` yields `u64::MAX`.
    pub fn sample(&self, agent: &A, rng: &mut AgentRng) -> u64 {
        match self {
            Span::Fixed(n) => *n,
            Span::Between { min, max } if min == max => *min,
            Span::Between { min, max } => rng.gen_range(*min..=*max),
            Span::Unbounded => u64::MAX,
            Span::Dynamic(f) => f(agent, rng),
        }
    }
}

impl<A: ?Sized> From<u64> for Span<A> {
    fn from(n: u64) -> Self {
        Span::Fixed(n)
    }
}

impl<A: ?Sized> fmt::Debug for Span<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Span::Fixed(n) => write!(f, "Fixed({n})"),
            Span::Between { min, max } => write!(f, "Between({min}..={max})"),
            Span::Unbounded => f.write_str("Unbounded"),
            Span::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
