//! Persisted network configuration block.

use picogpio_persistent::{Block, Record, RecordError};
use smoltcp::wire::Ipv4Address;

use crate::types::{AddressMode, NetworkInfo, ETH_ALEN};

/// Address configuration plus its sibling multicast setting.
///
/// The stored MAC round-trips but is never adopted at boot; the live MAC is
/// always derived from the board id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkRecord {
    pub info: NetworkInfo,
    pub multicast_enabled: bool,
}

impl NetworkRecord {
    /// The address a factory reset writes: 192.168.1.100/24 via .1, static.
    pub const fn factory_default() -> Self {
        Self {
            info: NetworkInfo {
                ip: Ipv4Address::new(192, 168, 1, 100),
                netmask: Ipv4Address::new(255, 255, 255, 0),
                gateway: Ipv4Address::new(192, 168, 1, 1),
                dns: Ipv4Address::UNSPECIFIED,
                mode: AddressMode::Static,
                ..NetworkInfo::UNCONFIGURED
            },
            multicast_enabled: true,
        }
    }
}

/// Blank or invalid flash: wait for a DHCP lease.
impl Default for NetworkRecord {
    fn default() -> Self {
        Self { info: NetworkInfo::UNCONFIGURED, multicast_enabled: true }
    }
}

const IP_LEN: usize = 4;
const OFF_IP: usize = ETH_ALEN;
const OFF_MASK: usize = OFF_IP + IP_LEN;
const OFF_GW: usize = OFF_MASK + IP_LEN;
const OFF_DNS: usize = OFF_GW + IP_LEN;
const OFF_MODE: usize = OFF_DNS + IP_LEN;
const OFF_MULTICAST: usize = OFF_MODE + 1;

fn read_ip(payload: &[u8], offset: usize) -> Ipv4Address {
    Ipv4Address::from_bytes(&payload[offset..offset + IP_LEN])
}

impl Record for NetworkRecord {
    const MAGIC: u32 = 0x434F_4E46; // "CONF"
    const VERSION: u16 = 1;
    const PAYLOAD_LEN: usize = OFF_MULTICAST + 1;
    const BLOCK: Block = Block::Network;

    fn encode_payload(&self, out: &mut [u8]) {
        let info = &self.info;
        out[..ETH_ALEN].copy_from_slice(&info.mac);
        out[OFF_IP..OFF_MASK].copy_from_slice(info.ip.as_bytes());
        out[OFF_MASK..OFF_GW].copy_from_slice(info.netmask.as_bytes());
        out[OFF_GW..OFF_DNS].copy_from_slice(info.gateway.as_bytes());
        out[OFF_DNS..OFF_MODE].copy_from_slice(info.dns.as_bytes());
        out[OFF_MODE] = info.mode as u8;
        out[OFF_MULTICAST] = u8::from(self.multicast_enabled);
    }

    fn decode_payload(payload: &[u8]) -> Result<Self, RecordError> {
        let mode = AddressMode::try_from(payload[OFF_MODE]).map_err(|_| RecordError::InvalidPayload)?;
        let multicast_enabled = match payload[OFF_MULTICAST] {
            0 => false,
            1 => true,
            _ => return Err(RecordError::InvalidPayload),
        };

        let mut mac = [0u8; ETH_ALEN];
        mac.copy_from_slice(&payload[..ETH_ALEN]);

        Ok(Self {
            info: NetworkInfo {
                mac,
                ip: read_ip(payload, OFF_IP),
                netmask: read_ip(payload, OFF_MASK),
                gateway: read_ip(payload, OFF_GW),
                dns: read_ip(payload, OFF_DNS),
                mode,
            },
            multicast_enabled,
        })
    }
}
