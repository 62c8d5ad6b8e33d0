//! Read-only status view for collaborators.
//!
//! The HTTP info page, CLI and status LED read through a `&'static
//! NetworkStatus`; only the [`NetworkManager`](super::NetworkManager)
//! publishes into it.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use spin::Mutex;

use crate::state::monitor::ConnectivityState;
use crate::types::NetworkInfo;

pub struct NetworkStatus {
    info: Mutex<NetworkInfo>,
    state: AtomicU8,
    restart: AtomicBool,
}

impl NetworkStatus {
    pub const fn new() -> Self {
        Self {
            info: Mutex::new(NetworkInfo::UNCONFIGURED),
            state: AtomicU8::new(ConnectivityState::Disconnected as u8),
            restart: AtomicBool::new(false),
        }
    }

    /// Snapshot of the live address configuration.
    pub fn network_info(&self) -> NetworkInfo {
        *self.info.lock()
    }

    pub fn connectivity_state(&self) -> ConnectivityState {
        ConnectivityState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Ask the manager to tear down and reapply on its next service step.
    pub fn request_restart(&self) {
        self.restart.store(true, Ordering::Release);
    }

    pub fn restart_pending(&self) -> bool {
        self.restart.load(Ordering::Acquire)
    }

    /// Consume a pending restart request.
    pub(crate) fn take_restart_request(&self) -> bool {
        self.restart.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn publish(&self, info: &NetworkInfo, state: ConnectivityState) {
        *self.info.lock() = *info;
        self.state.store(state.to_u8(), Ordering::Release);
    }
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static STATUS: NetworkStatus = NetworkStatus::new();

    #[test]
    fn test_restart_flag_is_consumed_once() {
        let status = NetworkStatus::new();
        assert!(!status.take_restart_request());
        status.request_restart();
        status.request_restart();
        assert!(status.restart_pending());
        assert!(status.take_restart_request());
        assert!(!status.take_restart_request());
    }

    #[test]
    fn test_static_publish() {
        assert_eq!(STATUS.connectivity_state(), ConnectivityState::Disconnected);
        let mut info = NetworkInfo::UNCONFIGURED;
        info.ip = smoltcp::wire::Ipv4Address::new(10, 1, 2, 3);
        STATUS.publish(&info, ConnectivityState::Connected);
        assert_eq!(STATUS.network_info(), info);
        assert_eq!(STATUS.connectivity_state(), ConnectivityState::Connected);
    }
}
