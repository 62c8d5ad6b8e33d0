//! Millisecond timestamp helpers.
//!
//! Timestamps are `u64` milliseconds from [`picogpio_hwinit::Clock`]. All
//! comparisons saturate so a clock that appears to step backwards reads as
//! "no time passed" rather than wrapping.

/// Milliseconds from `since` to `now`.
#[inline]
pub fn elapsed_ms(since: u64, now: u64) -> u64 {
    now.saturating_sub(since)
}

/// True once at least `period_ms` has passed since `since`.
#[inline]
pub fn period_elapsed(since: u64, now: u64, period_ms: u32) -> bool {
    elapsed_ms(since, now) >= u64::from(period_ms)
}

/// True once strictly more than `limit_ms` has passed since `since`.
#[inline]
pub fn exceeded(since: u64, now: u64, limit_ms: u32) -> bool {
    elapsed_ms(since, now) > u64::from(limit_ms)
}
