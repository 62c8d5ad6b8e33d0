//! Offload chip abstraction.
//!
//! The chip (a WIZnet W5500 on the shipping board) holds the live address
//! configuration in its own registers. Everything here is a thin, synchronous
//! layer over the [`NetworkChip`] capability.

pub mod init;
pub mod link;
pub mod static_ip;
pub mod traits;

// Re-exports
pub use init::{initialize_chip, W5500_VERSION};
pub use link::{Duplex, LinkProbe, LinkSpeed, PhyStatus};
pub use static_ip::apply_static;
pub use traits::{ChipError, NetworkChip, SocketId, DHCP_CLIENT_PORT};
