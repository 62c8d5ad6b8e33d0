//! Interrupt masking.
//!
//! The core runs on a single cooperative thread, so the only thing that can
//! race a flash write is an interrupt handler (or XIP fetch) touching the die
//! being programmed. Masking interrupts for the erase+program window is the
//! whole synchronization story.

// ═══════════════════════════════════════════════════════════════════════════
// INTERRUPT CONTROL
// ═══════════════════════════════════════════════════════════════════════════

/// Board-level interrupt mask.
pub trait InterruptControl {
    /// Mask interrupts. Returns whether they were enabled before.
    fn disable(&mut self) -> bool;

    /// Restore the state returned by a matching [`disable`](Self::disable).
    fn restore(&mut self, was_enabled: bool);
}

// ═══════════════════════════════════════════════════════════════════════════
// INTERRUPT GUARD
// ═══════════════════════════════════════════════════════════════════════════

/// RAII guard that disables interrupts and restores on drop.
///
/// Restoration happens on every exit path, including `?` early returns.
pub struct InterruptGuard<'a, I: InterruptControl + ?Sized> {
    ctl: &'a mut I,
    was_enabled: bool,
}

impl<'a, I: InterruptControl + ?Sized> InterruptGuard<'a, I> {
    /// Disable interrupts, returning a guard that restores them on drop.
    pub fn new(ctl: &'a mut I) -> Self {
        let was_enabled = ctl.disable();
        Self { ctl, was_enabled }
    }
}

impl<I: InterruptControl + ?Sized> Drop for InterruptGuard<'_, I> {
    fn drop(&mut self) {
        self.ctl.restore(self.was_enabled);
    }
}

/// Execute a closure with interrupts disabled.
pub fn without_interrupts<I, F, R>(ctl: &mut I, f: F) -> R
where
    I: InterruptControl + ?Sized,
    F: FnOnce() -> R,
{
    let _guard = InterruptGuard::new(ctl);
    f()
}
