//! Offload chip capability.

use smoltcp::wire::Ipv4Address;
use thiserror::Error;

use crate::types::{MacAddress, NetworkInfo};

/// UDP port a DHCP client binds.
pub const DHCP_CLIENT_PORT: u16 = 68;

/// Hardware socket slot on the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketId(pub u8);

/// Chip operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChipError {
    /// Socket slot busy or port already bound
    #[error("socket unavailable")]
    SocketUnavailable,
    /// Bus transaction failed
    #[error("SPI transfer failed")]
    Spi,
}

/// Register-level interface to the Ethernet offload chip.
///
/// All calls are short SPI transactions and return immediately.
pub trait NetworkChip {
    /// Silicon version register.
    fn version(&mut self) -> u8;

    /// Raw PHY configuration register (see [`crate::driver::link`]).
    fn phy_config(&mut self) -> u8;

    /// Software reset. Clears address registers and closes all sockets.
    fn soft_reset(&mut self);

    /// Program the source hardware address.
    fn set_mac(&mut self, mac: &MacAddress);

    /// Program MAC, IP, netmask, gateway and DNS in one go.
    fn set_network(&mut self, info: &NetworkInfo);

    /// Source IP register as currently programmed.
    fn local_ip(&mut self) -> Ipv4Address;

    /// Open a UDP socket bound to `port`.
    fn open_udp(&mut self, port: u16) -> Result<SocketId, ChipError>;

    /// Close a socket opened by [`open_udp`](Self::open_udp).
    fn close_socket(&mut self, socket: SocketId);
}
