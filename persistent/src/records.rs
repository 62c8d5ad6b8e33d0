//! Single-setting records that sit beside the network block.
//!
//! Each has its own magic so a blob copied into the wrong sector is rejected.

use crate::layout::Block;
use crate::record::{Record, RecordError};

// ═══════════════════════════════════════════════════════════════════════════
// TCP PORT
// ═══════════════════════════════════════════════════════════════════════════

/// Port of the line-oriented command server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpPortRecord {
    pub port: u16,
}

impl Default for TcpPortRecord {
    fn default() -> Self {
        Self { port: 5050 }
    }
}

impl Record for TcpPortRecord {
    const MAGIC: u32 = 0x5443_5050; // "TCPP"
    const VERSION: u16 = 1;
    const PAYLOAD_LEN: usize = 2;
    const BLOCK: Block = Block::TcpPort;

    fn encode_payload(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.port.to_le_bytes());
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, RecordError> {
        let port = u16::from_le_bytes([payload[0], payload[1]]);
        if port == 0 {
            return Err(RecordError::InvalidPayload);
        }
        Ok(Self { port })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// UART BAUD
// ═══════════════════════════════════════════════════════════════════════════

/// RS-232 bridge baud rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartBaudRecord {
    pub baud: u32,
}

impl Default for UartBaudRecord {
    fn default() -> Self {
        Self { baud: 115_200 }
    }
}

impl Record for UartBaudRecord {
    const MAGIC: u32 = 0x5541_5254; // "UART"
    const VERSION: u16 = 1;
    const PAYLOAD_LEN: usize = 4;
    const BLOCK: Block = Block::UartBaud;

    fn encode_payload(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.baud.to_le_bytes());
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, RecordError> {
        let baud = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
        if baud == 0 {
            return Err(RecordError::InvalidPayload);
        }
        Ok(Self { baud })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DEBUG FLAGS
// ═══════════════════════════════════════════════════════════════════════════

/// Bitmask of enabled debug categories. Every pattern is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugFlagsRecord {
    pub flags: u32,
}

impl DebugFlagsRecord {
    pub fn is_enabled(&self, category: u8) -> bool {
        category < 32 && self.flags & (1 << category) != 0
    }
}

impl Default for DebugFlagsRecord {
    fn default() -> Self {
        Self { flags: u32::MAX }
    }
}

impl Record for DebugFlagsRecord {
    const MAGIC: u32 = 0x4442_4746; // "DBGF"
    const VERSION: u16 = 1;
    const PAYLOAD_LEN: usize = 4;
    const BLOCK: Block = Block::DebugFlags;

    fn encode_payload(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.flags.to_le_bytes());
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, RecordError> {
        Ok(Self {
            flags: u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GPIO SETTINGS
// ═══════════════════════════════════════════════════════════════════════════

/// Protocol the command server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommMode {
    Text = 0,
    Json = 1,
}

impl CommMode {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CommMode::Text),
            1 => Some(CommMode::Json),
            _ => None,
        }
    }
}

/// GPIO board identity and reporting behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioSettingsRecord {
    pub device_id: u8,
    pub comm_mode: CommMode,
    pub auto_response: bool,
}

impl Default for GpioSettingsRecord {
    fn default() -> Self {
        Self {
            device_id: 1,
            comm_mode: CommMode::Text,
            auto_response: true,
        }
    }
}

impl Record for GpioSettingsRecord {
    const MAGIC: u32 = 0x4750_4943; // "GPIC"
    const VERSION: u16 = 1;
    const PAYLOAD_LEN: usize = 3;
    const BLOCK: Block = Block::Gpio;

    fn encode_payload(&self, out: &mut [u8]) {
        out[0] = self.device_id;
        out[1] = self.comm_mode as u8;
        out[2] = self.auto_response as u8;
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, RecordError> {
        let comm_mode = CommMode::from_u8(payload[1]).ok_or(RecordError::InvalidPayload)?;
        let auto_response = match payload[2] {
            0 => false,
            1 => true,
            _ => return Err(RecordError::InvalidPayload),
        };
        Ok(Self {
            device_id: payload[0],
            comm_mode,
            auto_response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{decode, encode};

    #[test]
    fn test_defaults() {
        assert_eq!(TcpPortRecord::default().port, 5050);
        assert_eq!(UartBaudRecord::default().baud, 115_200);
        assert!(DebugFlagsRecord::default().is_enabled(31));
        assert_eq!(GpioSettingsRecord::default().comm_mode, CommMode::Text);
    }

    #[test]
    fn test_debug_flag_bits() {
        let flags = DebugFlagsRecord { flags: 0b100 };
        assert!(flags.is_enabled(2));
        assert!(!flags.is_enabled(1));
        assert!(!flags.is_enabled(40));
    }

    #[test]
    fn test_record_in_wrong_block_rejected() {
        let mut buf = [0u8; 16];
        encode(&UartBaudRecord { baud: 9600 }, &mut buf).unwrap();
        // Same payload size, different magic
        assert!(decode::<DebugFlagsRecord>(&buf).is_err());
    }

    #[test]
    fn test_gpio_invalid_fields() {
        assert_eq!(GpioSettingsRecord::PAYLOAD_LEN + 10, GpioSettingsRecord::encoded_len());
        assert_eq!(
            GpioSettingsRecord::decode_payload(&[1, 5, 1]),
            Err(RecordError::InvalidPayload)
        );
        assert_eq!(
            GpioSettingsRecord::decode_payload(&[1, 1, 2]),
            Err(RecordError::InvalidPayload)
        );
        assert_eq!(
            GpioSettingsRecord::decode_payload(&[9, 1, 0]),
            Ok(GpioSettingsRecord { device_id: 9, comm_mode: CommMode::Json, auto_response: false })
        );
    }

    #[test]
    fn test_zero_port_is_invalid() {
        assert_eq!(TcpPortRecord::decode_payload(&[0, 0]), Err(RecordError::InvalidPayload));
    }
}
