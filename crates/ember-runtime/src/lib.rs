//! Ember Runtime - Frame-driven animation infrastructure
//!
//! Provides the driver side of the per-frame loop:
//! - `Animatable` - trait for anything advanced once per frame by elapsed time
//! - `Juggler` - owns animatables, advances them and drops finished ones
//! - `FrameClock` - produces clamped per-frame deltas from wall-clock or simulated time

mod animatable;
mod clock;
mod juggler;

pub use animatable::Animatable;
pub use clock::FrameClock;
pub use juggler::Juggler;
