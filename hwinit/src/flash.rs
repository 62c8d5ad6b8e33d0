//! On-board flash primitives.
//!
//! Offsets are relative to the start of flash (not the XIP window).

use thiserror::Error;

/// Erase granularity.
pub const FLASH_SECTOR_SIZE: u32 = 4096;

/// Program granularity.
pub const FLASH_PAGE_SIZE: u32 = 256;

/// Flash operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlashError {
    /// Offset or length falls outside the device
    #[error("flash access out of range (offset {offset:#x}, len {len})")]
    OutOfRange { offset: u32, len: u32 },
    /// Erase not sector aligned, or program not page aligned
    #[error("flash access not aligned (offset {offset:#x})")]
    Unaligned { offset: u32 },
    /// The device reported a failure
    #[error("flash device error")]
    Device,
}

/// Raw flash access.
///
/// `erase` and `program` must only be called with interrupts masked (see
/// [`crate::InterruptGuard`]), since code may be executing from the same die.
pub trait Flash {
    /// Total device size in bytes.
    fn capacity(&self) -> u32;

    /// Erase `len` bytes at `offset`. Both must be sector aligned.
    fn erase(&mut self, offset: u32, len: u32) -> Result<(), FlashError>;

    /// Program `data` at `offset`. Offset and length must be page aligned.
    fn program(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError>;

    /// Read `buf.len()` bytes at `offset`.
    fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError>;
}

/// Check that `offset..offset + len` lies inside a device of `capacity` bytes.
pub fn check_range(capacity: u32, offset: u32, len: u32) -> Result<(), FlashError> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(FlashError::OutOfRange { offset, len }),
    }
}
