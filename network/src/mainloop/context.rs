//! Lifecycle tunables.
//!
//! Every wait in the subsystem is bounded by one of these values.

use crate::driver::init::W5500_VERSION;
use crate::driver::traits::DHCP_CLIENT_PORT;

/// Timeout and retry configuration for network bring-up and supervision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Configuration attempts at boot and on restart
    pub boot_attempts: u8,
    /// Pause between failed boot attempts
    pub boot_backoff_ms: u32,
    /// Hard ceiling on one DHCP negotiation
    pub dhcp_timeout_ms: u32,
    /// Period of the DHCP protocol's internal timer
    pub dhcp_tick_ms: u32,
    /// Sleep between `process()` calls while negotiating synchronously
    pub dhcp_poll_interval_ms: u32,
    /// DHCP client UDP port
    pub dhcp_client_port: u16,
    /// Connectivity monitor poll period
    pub monitor_period_ms: u32,
    /// Unreachable polls tolerated in Connecting before a reinitialize
    pub connecting_attempt_limit: u32,
    /// Failed reinitializations tolerated before backing off
    pub reconnect_attempt_limit: u32,
    /// Back-off after exhausting reconnect attempts
    pub reconnect_cooldown_ms: u32,
    /// Settle time after a chip soft reset
    pub chip_reset_settle_ms: u32,
    /// Link polls during chip bring-up
    pub link_wait_polls: u32,
    /// Pause between link polls during bring-up
    pub link_wait_interval_ms: u32,
    /// Expected silicon version register
    pub chip_version: u8,
}

impl LifecycleConfig {
    pub const fn new() -> Self {
        Self {
            boot_attempts: 3,
            boot_backoff_ms: 1_000,
            dhcp_timeout_ms: 20_000,
            dhcp_tick_ms: 1_000,
            dhcp_poll_interval_ms: 100,
            dhcp_client_port: DHCP_CLIENT_PORT,
            monitor_period_ms: 1_000,
            connecting_attempt_limit: 10,
            reconnect_attempt_limit: 5,
            reconnect_cooldown_ms: 5_000,
            chip_reset_settle_ms: 100,
            link_wait_polls: 20,
            link_wait_interval_ms: 500,
            chip_version: W5500_VERSION,
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new()
    }
}
