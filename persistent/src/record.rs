//! Record framing: magic, version, payload, checksum.

use crc_any::CRCu32;
use thiserror::Error;

use crate::layout::Block;

/// Magic (4) + version (2).
pub const HEADER_LEN: usize = 6;

/// Trailing CRC-32.
pub const CHECKSUM_LEN: usize = 4;

// ═══════════════════════════════════════════════════════════════════════════
// RECORD ERROR
// ═══════════════════════════════════════════════════════════════════════════

/// Why a blob was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Fewer bytes than the record needs
    #[error("record truncated: need {needed} bytes, have {found}")]
    Truncated { needed: usize, found: usize },
    /// Wrong magic (erased flash reads as 0xFFFFFFFF)
    #[error("bad magic {found:#010x}")]
    BadMagic { found: u32 },
    /// Written by a different schema
    #[error("unsupported version {found}")]
    BadVersion { found: u16 },
    /// Torn or corrupted write
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
    /// Framing is intact but a field holds an impossible value
    #[error("invalid payload")]
    InvalidPayload,
}

// ═══════════════════════════════════════════════════════════════════════════
// RECORD TRAIT
// ═══════════════════════════════════════════════════════════════════════════

/// A fixed-size setting blob stored in its own flash block.
pub trait Record: Sized {
    /// Identifies the record kind.
    const MAGIC: u32;
    /// Schema version. Any other version is rejected, never migrated.
    const VERSION: u16;
    /// Exact payload size in bytes.
    const PAYLOAD_LEN: usize;
    /// Flash block this record lives in.
    const BLOCK: Block;

    /// Write the payload into `out` (exactly `PAYLOAD_LEN` bytes).
    fn encode_payload(&self, out: &mut [u8]);

    /// Parse a payload of exactly `PAYLOAD_LEN` bytes.
    fn decode_payload(payload: &[u8]) -> Result<Self, RecordError>;

    /// Total framed size.
    fn encoded_len() -> usize {
        HEADER_LEN + Self::PAYLOAD_LEN + CHECKSUM_LEN
    }
}

fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = CRCu32::crc32();
    crc.digest(bytes);
    crc.get_crc()
}

/// Frame `record` into `out`. Returns the number of bytes written.
pub fn encode<R: Record>(record: &R, out: &mut [u8]) -> Result<usize, RecordError> {
    let len = R::encoded_len();
    if out.len() < len {
        return Err(RecordError::Truncated { needed: len, found: out.len() });
    }

    let body_end = HEADER_LEN + R::PAYLOAD_LEN;
    out[0..4].copy_from_slice(&R::MAGIC.to_le_bytes());
    out[4..6].copy_from_slice(&R::VERSION.to_le_bytes());
    record.encode_payload(&mut out[HEADER_LEN..body_end]);

    let crc = checksum(&out[..body_end]);
    out[body_end..len].copy_from_slice(&crc.to_le_bytes());
    Ok(len)
}

/// Validate and parse a framed record from the start of `bytes`.
///
/// Checks run in order: length, magic, version, checksum, payload.
pub fn decode<R: Record>(bytes: &[u8]) -> Result<R, RecordError> {
    let len = R::encoded_len();
    if bytes.len() < len {
        return Err(RecordError::Truncated { needed: len, found: bytes.len() });
    }

    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if magic != R::MAGIC {
        return Err(RecordError::BadMagic { found: magic });
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != R::VERSION {
        return Err(RecordError::BadVersion { found: version });
    }

    let body_end = HEADER_LEN + R::PAYLOAD_LEN;
    let stored = u32::from_le_bytes([
        bytes[body_end],
        bytes[body_end + 1],
        bytes[body_end + 2],
        bytes[body_end + 3],
    ]);
    let computed = checksum(&bytes[..body_end]);
    if stored != computed {
        return Err(RecordError::ChecksumMismatch { stored, computed });
    }

    R::decode_payload(&bytes[HEADER_LEN..body_end])
}
