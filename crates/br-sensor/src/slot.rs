//! `SensorSlot` — one sensor plus its scan schedule.

use br_core::{Span, Tick};
use br_world::Host;

use crate::{SenseCtx, Sensor};

/// A registered sensor with its interval provider and next scan time.
pub struct SensorSlot<H: Host> {
    sensor:    Box<dyn Sensor<H>>,
    interval:  Span<H::Agent>,
    next_scan: Tick,
    scans:     u64,
}

impl<H: Host> SensorSlot<H> {
    /// A slot whose first scan happens on the first tick it is polled.
    pub fn new(sensor: impl Sensor<H> + 'static, interval: Span<H::Agent>) -> Self {
        Self::boxed(Box::new(sensor), interval)
    }

    pub fn boxed(sensor: Box<dyn Sensor<H>>, interval: Span<H::Agent>) -> Self {
        Self { sensor, interval, next_scan: Tick::ZERO, scans: 0 }
    }

    /// Delay the first scan until `tick`.
    pub fn first_scan_at(mut self, tick: Tick) -> Self {
        self.next_scan = tick;
        self
    }

    /// Run the sensor if it is due.  Returns `true` if a scan happened.
    ///
    /// The interval is resampled after every scan, so ranged and dynamic
    /// spans vary the cadence scan by scan.
    pub fn scan(&mut self, ctx: &mut SenseCtx<'_, H>) -> bool {
        if ctx.tick < self.next_scan {
            return false;
        }
        self.sensor.sense(ctx);
        self.scans += 1;
        let wait = self.interval.sample(ctx.agent, ctx.rng);
        self.next_scan = ctx.tick.offset(wait);
        tracing::trace!(
            sensor = self.sensor.name(),
            tick = %ctx.tick,
            next = %self.next_scan,
            "sensor scan"
        );
        true
    }

    pub fn next_scan(&self) -> Tick {
        self.next_scan
    }

    /// Number of scans performed so far.
    pub fn scans(&self) -> u64 {
        self.scans
    }

    pub fn sensor(&self) -> &dyn Sensor<H> {
        self.sensor.as_ref()
    }
}

impl<H: Host> std::fmt::Debug for SensorSlot<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorSlot")
            .field("sensor", &self.sensor.name())
            .field("interval", &self.interval)
            .field("next_scan", &self.next_scan)
            .finish()
    }
}
