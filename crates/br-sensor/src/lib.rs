//! `br-sensor` — perception for agent brains.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`sensor`]  | `Sensor` trait, `SenseCtx<'a, H>`                              |
//! | [`slot`]    | `SensorSlot` — interval scheduling around one sensor           |
//! | [`nearest`] | `NearestEntitySensor` — nearest entity of a kind in range      |
//! | [`func`]    | `FnSensor` — closure-backed sensor                             |
//!
//! # Scan cadence
//!
//! A brain calls [`SensorSlot::scan`] every tick.  The slot only runs its
//! sensor once `now >= next_scan`, then resamples its interval [`Span`] and
//! pushes `next_scan` forward.  Sensors write to memory only; they never
//! start or stop behaviors.
//!
//! [`Span`]: br_core::Span

pub mod func;
pub mod nearest;
pub mod sensor;
pub mod slot;

#[cfg(test)]
mod tests;

pub use func::FnSensor;
pub use nearest::NearestEntitySensor;
pub use sensor::{SenseCtx, Sensor};
pub use slot::SensorSlot;
