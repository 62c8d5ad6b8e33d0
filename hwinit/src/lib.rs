//! Platform Capability Layer
//!
//! The network core never touches a peripheral directly. Everything it needs
//! from the board is expressed here as a small trait, implemented once by the
//! firmware binary and by in-memory mocks in the test suites.
//!
//! # What This Crate Provides
//!
//! - Monotonic millisecond clock and bounded blocking delay
//! - Flash erase/program/read primitives and geometry
//! - Scoped interrupt masking (`InterruptGuard`)
//! - Board-unique identity bytes
//!
//! # What This Crate Does NOT Do
//!
//! - Offload chip register access (see `picogpio-network`)
//! - Record formats (see `picogpio-persistent`)

#![no_std]

pub mod board;
pub mod flash;
pub mod sync;
pub mod time;

// ═══════════════════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use board::{BoardIdentity, UNIQUE_ID_LEN};
pub use flash::{Flash, FlashError, FLASH_PAGE_SIZE, FLASH_SECTOR_SIZE};
pub use sync::{without_interrupts, InterruptControl, InterruptGuard};
pub use time::{Clock, Delay, Timer};
