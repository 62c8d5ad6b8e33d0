//! smoltcp integration layer.
//!
//! With the offload chip's socket 0 in MACRAW mode, frames go through a
//! smoltcp [`Device`](smoltcp::phy::Device) and the DHCP exchange runs in
//! smoltcp instead of the chip vendor's client.
//!
//! - [`SmoltcpDhcp`] - [`DhcpProtocol`](crate::state::dhcp::DhcpProtocol) over a smoltcp interface

#[cfg(feature = "smoltcp-dhcp")]
mod dhcp;

#[cfg(feature = "smoltcp-dhcp")]
pub use dhcp::SmoltcpDhcp;
