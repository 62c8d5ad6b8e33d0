//! Time sources.
//!
//! All timing in the network core is expressed as milliseconds since boot,
//! read from an injected clock. Nothing counts loop iterations.

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since boot. Never goes backwards.
    fn now_ms(&self) -> u64;
}

/// Bounded blocking delay.
///
/// Only used for short settle times and backoff between boot attempts. A
/// delay implementation must advance the clock it is paired with.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// A clock and delay driven by the same timer peripheral.
pub trait Timer: Clock + Delay {}

impl<T: Clock + Delay> Timer for T {}
