//! picogpio network lifecycle
//!
//! Brings the Ethernet offload chip up with a static or DHCP-leased address,
//! watches link and lease, and recovers without operator intervention.
//!
//! # Modules
//!
//! - `types` - `NetworkInfo`, MAC derivation
//! - `driver` - offload chip capability, link probe, static configurator
//! - `state` - DHCP lease engine, connectivity monitor
//! - `mainloop` - lifecycle manager and shared status handle
//! - `record` - persisted network block
//! - `stack` - smoltcp-backed DHCP (feature `smoltcp-dhcp`)
//!
//! Everything is polled from one cooperative main loop. No call blocks
//! without a millisecond bound.

#![no_std]

#[cfg(feature = "smoltcp-dhcp")]
extern crate alloc;

pub mod driver;
pub mod error;
pub mod mainloop;
pub mod record;
pub mod stack;
pub mod state;
pub mod time;
pub mod types;

pub use driver::{apply_static, initialize_chip, LinkProbe, NetworkChip, PhyStatus, SocketId};
pub use error::{NetworkError, Result};
pub use mainloop::{BootReport, DependentServices, LifecycleConfig, NetworkManager, NetworkStatus};
pub use record::NetworkRecord;
pub use state::{ConnectivityMonitor, ConnectivityState, DhcpEngine, DhcpLease, DhcpPoll, DhcpProtocol, DhcpState, DhcpStatus, Supervised};
pub use types::{derive_mac, AddressMode, MacAddress, NetworkInfo};

#[cfg(feature = "smoltcp-dhcp")]
pub use stack::SmoltcpDhcp;
