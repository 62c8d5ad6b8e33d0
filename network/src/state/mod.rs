//! State machine module.
//!
//! Non-blocking state machines for the connectivity lifecycle. Each is
//! advanced by a call that returns immediately; time comes in as a `now_ms`
//! argument so the machines never read a clock themselves.

pub mod dhcp;
pub mod monitor;

pub use dhcp::{DhcpEngine, DhcpLease, DhcpPoll, DhcpProtocol, DhcpState, DhcpStatus};
pub use monitor::{ConnectivityMonitor, ConnectivityState, Supervised};
