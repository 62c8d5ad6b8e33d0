//! Network addressing data model.

use core::fmt;

use picogpio_hwinit::UNIQUE_ID_LEN;
use smoltcp::wire::Ipv4Address;

use crate::error::NetworkError;

// ═══════════════════════════════════════════════════════════════════════════
// MAC ADDRESS
// ═══════════════════════════════════════════════════════════════════════════

pub const ETH_ALEN: usize = 6;

/// MAC address type.
pub type MacAddress = [u8; ETH_ALEN];

/// WIZnet OUI.
pub const VENDOR_OUI: [u8; 3] = [0x00, 0x08, 0xDC];

/// Build the device MAC from the vendor OUI and the tail of the board id.
///
/// This is the only source of the MAC. Stored or user-supplied MAC bytes are
/// never adopted.
pub fn derive_mac(board_id: &[u8; UNIQUE_ID_LEN]) -> MacAddress {
    let tail = &board_id[UNIQUE_ID_LEN - 3..];
    [VENDOR_OUI[0], VENDOR_OUI[1], VENDOR_OUI[2], tail[0], tail[1], tail[2]]
}

/// Colon-separated upper-case hex, as shown on the HTTP info page.
pub struct MacDisplay<'a>(pub &'a MacAddress);

impl fmt::Display for MacDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, byte) in self.0.iter().enumerate() {
            if idx != 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ADDRESS MODE
// ═══════════════════════════════════════════════════════════════════════════

/// How the interface gets its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Static = 0,
    Dhcp = 1,
}

impl AddressMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressMode::Static => "static",
            AddressMode::Dhcp => "dhcp",
        }
    }
}

impl TryFrom<u8> for AddressMode {
    type Error = NetworkError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(AddressMode::Static),
            1 => Ok(AddressMode::Dhcp),
            other => Err(NetworkError::InvalidMode(other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// NETWORK INFO
// ═══════════════════════════════════════════════════════════════════════════

/// Address configuration of the offload chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    pub mac: MacAddress,
    pub ip: Ipv4Address,
    pub netmask: Ipv4Address,
    pub gateway: Ipv4Address,
    pub dns: Ipv4Address,
    pub mode: AddressMode,
}

impl NetworkInfo {
    /// No address yet; waiting for DHCP.
    pub const UNCONFIGURED: NetworkInfo = NetworkInfo {
        mac: [VENDOR_OUI[0], VENDOR_OUI[1], VENDOR_OUI[2], 0, 0, 0],
        ip: Ipv4Address([0, 0, 0, 0]),
        netmask: Ipv4Address([255, 255, 0, 0]),
        gateway: Ipv4Address([0, 0, 0, 0]),
        dns: Ipv4Address([0, 0, 0, 0]),
        mode: AddressMode::Dhcp,
    };

    /// True if a non-zero IP is configured.
    pub fn has_address(&self) -> bool {
        !self.ip.is_unspecified()
    }

    /// Prefix length of `netmask`, or `None` for a non-contiguous mask.
    pub fn prefix_len(&self) -> Option<u8> {
        netmask_to_prefix(self.netmask)
    }
}

impl Default for NetworkInfo {
    fn default() -> Self {
        Self::UNCONFIGURED
    }
}

impl fmt::Display for NetworkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ip={} mask={} gw={} dns={} mode={} mac={}",
            self.ip,
            self.netmask,
            self.gateway,
            self.dns,
            self.mode.as_str(),
            MacDisplay(&self.mac)
        )
    }
}

/// Convert a dotted netmask to a prefix length.
pub fn netmask_to_prefix(mask: Ipv4Address) -> Option<u8> {
    let value = u32::from_be_bytes(mask.0);
    let prefix = value.count_ones();
    let reconstructed = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
    if reconstructed == value {
        Some(prefix as u8)
    } else {
        None
    }
}
