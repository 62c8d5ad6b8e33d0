//! Network lifecycle manager.
//!
//! Owns the chip, the DHCP engine, the config store and the monitor. The
//! firmware main loop calls [`NetworkManager::boot_sequence`] once and then
//! [`NetworkManager::service`] every iteration.
//!
//! Flow: load record → derive MAC → configure (≤3 attempts) → start
//! services → supervise.

use log::{debug, error, info, warn};

use picogpio_hwinit::{BoardIdentity, Flash, InterruptControl, Timer};
use picogpio_persistent::RecordStore;

use crate::driver::init::initialize_chip;
use crate::driver::link::LinkProbe;
use crate::driver::static_ip::apply_static;
use crate::driver::traits::NetworkChip;
use crate::error::Result;
use crate::mainloop::context::LifecycleConfig;
use crate::mainloop::status::NetworkStatus;
use crate::record::NetworkRecord;
use crate::state::dhcp::{DhcpEngine, DhcpPoll, DhcpProtocol, DhcpState};
use crate::state::monitor::{ConnectivityMonitor, ConnectivityState, Supervised};
use crate::types::{derive_mac, AddressMode, MacAddress, NetworkInfo, MacDisplay};

// ═══════════════════════════════════════════════════════════════════════════
// COLLABORATORS
// ═══════════════════════════════════════════════════════════════════════════

/// Services that sit on top of the network (command server, HTTP).
pub trait DependentServices {
    fn start(&mut self, info: &NetworkInfo);
    fn stop(&mut self);
}

/// No dependent services.
impl DependentServices for () {
    fn start(&mut self, _info: &NetworkInfo) {}
    fn stop(&mut self) {}
}

/// Outcome of a boot or restart configuration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// An address was applied (static) or leased (DHCP)
    pub configured: bool,
    /// Attempts used, 1-based
    pub attempts: u8,
    pub mode: AddressMode,
}

// ═══════════════════════════════════════════════════════════════════════════
// HARDWARE SIDE
// ═══════════════════════════════════════════════════════════════════════════

/// Everything that touches chip registers. Only one configurator runs at a
/// time because all of them go through `&mut self` here.
struct Hardware<C, P: DhcpProtocol, T> {
    chip: C,
    dhcp: DhcpEngine<P>,
    timer: T,
    config: LifecycleConfig,
    mac: MacAddress,
    info: NetworkInfo,
}

impl<C: NetworkChip, P: DhcpProtocol, T: Timer> Hardware<C, P, T> {
    /// Reset the chip, check it answers, program the MAC.
    fn bring_up(&mut self) -> bool {
        self.dhcp.stop(&mut self.chip);
        match initialize_chip(&mut self.chip, &mut self.timer, &self.config) {
            Ok(link) => {
                if !link {
                    debug!("[BOOT] No link yet");
                }
                self.chip.set_mac(&self.mac);
                true
            }
            Err(e) => {
                warn!("[BOOT] Chip bring-up failed: {}", e);
                false
            }
        }
    }

    /// Drop stale addresses and open a DHCP negotiation.
    fn start_dhcp(&mut self) -> bool {
        self.info = NetworkInfo { mac: self.mac, mode: AddressMode::Dhcp, ..NetworkInfo::UNCONFIGURED };
        let now = self.timer.now_ms();
        self.dhcp.start(&mut self.chip, &self.info, now);
        self.dhcp.is_negotiating()
    }

    /// Drive DHCP to a lease or failure. Boot and restart only.
    fn negotiate_blocking(&mut self) -> bool {
        if !self.start_dhcp() {
            self.dhcp.stop(&mut self.chip);
            return false;
        }

        // Bounded even if the clock stalls.
        let interval = self.config.dhcp_poll_interval_ms.max(1);
        let budget = self.config.dhcp_timeout_ms / interval + 2;

        for _ in 0..budget {
            match self.dhcp.process(&mut self.chip, self.timer.now_ms()) {
                DhcpPoll::Leased(info) => {
                    self.info = info;
                    return true;
                }
                DhcpPoll::Failed => break,
                DhcpPoll::Pending => self.timer.delay_ms(interval),
            }
        }

        self.dhcp.stop(&mut self.chip);
        false
    }

    /// One full configuration attempt in the live mode.
    fn configure_once(&mut self) -> bool {
        if !self.bring_up() {
            return false;
        }
        match self.info.mode {
            AddressMode::Static => apply_static(&mut self.chip, &mut self.info),
            AddressMode::Dhcp => self.negotiate_blocking(),
        }
    }

    /// Bounded retry policy shared by boot and restart.
    fn configure_with_retry(&mut self) -> BootReport {
        let attempts = self.config.boot_attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 {
                self.timer.delay_ms(self.config.boot_backoff_ms);
            }
            info!("[BOOT] Configuring ({}) attempt {}/{}", self.info.mode.as_str(), attempt, attempts);
            if self.configure_once() {
                info!("[BOOT] Network up: {}", self.info);
                return BootReport { configured: true, attempts: attempt, mode: self.info.mode };
            }
        }

        error!("[BOOT] No network after {} attempts, continuing degraded", attempts);
        BootReport { configured: false, attempts, mode: self.info.mode }
    }
}

impl<C: NetworkChip, P: DhcpProtocol, T: Timer> Supervised for Hardware<C, P, T> {
    fn link_up(&mut self) -> bool {
        LinkProbe::is_link_up(&mut self.chip)
    }

    fn has_address(&mut self) -> bool {
        !self.chip.local_ip().is_unspecified()
    }

    fn negotiating(&self) -> bool {
        self.dhcp.is_negotiating()
    }

    /// Soft reset, then renegotiate over DHCP whatever mode the board booted
    /// in. Non-blocking: DHCP is only started here and finished by `service`.
    fn reinitialize(&mut self) -> bool {
        if !self.bring_up() {
            return false;
        }
        self.start_dhcp()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MANAGER
// ═══════════════════════════════════════════════════════════════════════════

/// Sole owner and mutator of the live network configuration.
pub struct NetworkManager<'s, C, P, F, I, T>
where
    C: NetworkChip,
    P: DhcpProtocol,
    F: Flash,
    I: InterruptControl,
    T: Timer,
{
    hw: Hardware<C, P, T>,
    store: RecordStore<F, I>,
    monitor: ConnectivityMonitor,
    status: &'s NetworkStatus,
    multicast_enabled: bool,
    /// Saved but not yet live; taken by the next restart
    pending: Option<NetworkRecord>,
}

impl<'s, C, P, F, I, T> NetworkManager<'s, C, P, F, I, T>
where
    C: NetworkChip,
    P: DhcpProtocol,
    F: Flash,
    I: InterruptControl,
    T: Timer,
{
    pub fn new(
        chip: C,
        protocol: P,
        store: RecordStore<F, I>,
        timer: T,
        status: &'s NetworkStatus,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            hw: Hardware {
                chip,
                dhcp: DhcpEngine::new(protocol, &config),
                timer,
                config,
                mac: NetworkInfo::UNCONFIGURED.mac,
                info: NetworkInfo::UNCONFIGURED,
            },
            store,
            monitor: ConnectivityMonitor::new(&config),
            status,
            multicast_enabled: true,
            pending: None,
        }
    }

    /// Load config, configure with retries, start services.
    ///
    /// Never fails: a board without network still boots and the monitor
    /// keeps trying in the background.
    pub fn boot_sequence<B, S>(&mut self, board: &B, services: &mut S) -> BootReport
    where
        B: BoardIdentity + ?Sized,
        S: DependentServices + ?Sized,
    {
        let record = self.store.load::<NetworkRecord>().unwrap_or_else(|| {
            info!("[CONFIG] No valid network record, using defaults");
            NetworkRecord::default()
        });

        self.hw.mac = derive_mac(&board.unique_id());
        self.hw.info = NetworkInfo { mac: self.hw.mac, ..record.info };
        self.multicast_enabled = record.multicast_enabled;
        self.pending = None;
        info!("[BOOT] MAC {} mode {}", MacDisplay(&self.hw.mac), self.hw.info.mode.as_str());

        self.monitor.reset();
        let report = self.hw.configure_with_retry();
        services.start(&self.hw.info);
        self.publish();
        report
    }

    /// Tear down services, reconfigure with the boot retry policy, restart
    /// services. Stops short of a device reboot.
    pub fn restart_sequence<S: DependentServices + ?Sized>(&mut self, services: &mut S) -> BootReport {
        info!("[BOOT] Restarting network");
        services.stop();
        if let Some(record) = self.pending.take() {
            self.hw.info = NetworkInfo { mac: self.hw.mac, ..record.info };
            self.multicast_enabled = record.multicast_enabled;
        }
        self.monitor.reset();
        let report = self.hw.configure_with_retry();
        services.start(&self.hw.info);
        self.publish();
        report
    }

    /// One bounded main-loop step.
    pub fn service<S: DependentServices + ?Sized>(&mut self, services: &mut S) {
        if self.status.take_restart_request() {
            self.restart_sequence(services);
        }

        let now = self.hw.timer.now_ms();
        match self.hw.dhcp.process(&mut self.hw.chip, now) {
            DhcpPoll::Leased(info) => self.hw.info = info,
            DhcpPoll::Failed => {
                warn!("[DHCP] Negotiation failed, leaving recovery to the monitor");
                self.hw.dhcp.stop(&mut self.hw.chip);
            }
            DhcpPoll::Pending => {}
        }

        self.monitor.poll(now, &mut self.hw);
        self.publish();
    }

    /// Apply a new address configuration and persist it.
    ///
    /// Static takes effect immediately. DHCP is saved as pending and picked
    /// up by the restart on the next `service` step; until then the live
    /// info keeps describing the hardware. The MAC in `new_info` is ignored.
    pub fn apply_and_persist(&mut self, new_info: NetworkInfo) -> Result<()> {
        let info = NetworkInfo { mac: self.hw.mac, ..new_info };
        let record = NetworkRecord { info, multicast_enabled: self.multicast_enabled };
        self.store.save(&record)?;

        match info.mode {
            AddressMode::Static => {
                self.pending = None;
                self.hw.dhcp.stop(&mut self.hw.chip);
                self.hw.info = info;
                apply_static(&mut self.hw.chip, &mut self.hw.info);
                self.publish();
            }
            AddressMode::Dhcp => {
                self.pending = Some(record);
                self.status.request_restart();
            }
        }
        Ok(())
    }

    /// Persist the factory network record and schedule a restart that
    /// applies it.
    pub fn factory_reset(&mut self) -> Result<()> {
        let mut record = NetworkRecord::factory_default();
        record.info.mac = self.hw.mac;
        self.store.save(&record)?;
        self.pending = Some(record);
        self.status.request_restart();
        warn!("[CONFIG] Factory reset, restart pending");
        Ok(())
    }

    pub fn current_network_info(&self) -> NetworkInfo {
        self.hw.info
    }

    pub fn current_connectivity_state(&self) -> ConnectivityState {
        self.monitor.state()
    }

    pub fn request_restart(&self) {
        self.status.request_restart();
    }

    pub fn multicast_enabled(&self) -> bool {
        self.multicast_enabled
    }

    pub fn dhcp_state(&self) -> DhcpState {
        self.hw.dhcp.state()
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn chip(&self) -> &C {
        &self.hw.chip
    }

    pub fn store(&self) -> &RecordStore<F, I> {
        &self.store
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.hw.config
    }

    fn publish(&self) {
        self.status.publish(&self.hw.info, self.monitor.state());
    }
}
