//! Persistent Configuration Records
//!
//! Settings survive power cycles as small self-describing blobs, one per
//! flash sector:
//!
//! ```text
//! ┌───────────┬─────────────┬───────────────┬───────────┐
//! │ magic u32 │ version u16 │ payload (N B) │ crc32 u32 │
//! └───────────┴─────────────┴───────────────┴───────────┘
//!   all little-endian; crc covers magic..payload
//! ```
//!
//! A blob is trusted only if magic, version and checksum all match. Anything
//! else (erased flash, older schema, torn write) reads as "no record" and the
//! caller falls back to compiled-in defaults. There is no migration path.
//!
//! # Layout
//!
//! Each record kind owns one 4 KiB sector counted back from the end of
//! flash, so rewriting one setting never disturbs another.

#![no_std]

pub mod layout;
pub mod record;
pub mod records;
pub mod storage;

pub use layout::{Block, FlashRegion, Layout};
pub use record::{decode, encode, Record, RecordError, CHECKSUM_LEN, HEADER_LEN};
pub use records::{CommMode, DebugFlagsRecord, GpioSettingsRecord, TcpPortRecord, UartBaudRecord};
pub use storage::{RecordStore, StoreError, MAX_RECORD_LEN};
