//! DHCP lease engine.
//!
//! Non-blocking: `process()` is called from the main loop on a fixed poll
//! interval and returns immediately.
//!
//! # States
//! Idle → Negotiating → Leased | Failed
//!
//! `stop()` returns to Idle from anywhere. Failed is sticky until then.

use log::{debug, info, warn};
use smoltcp::wire::Ipv4Address;

use crate::driver::link::LinkProbe;
use crate::driver::traits::{NetworkChip, SocketId};
use crate::mainloop::context::LifecycleConfig;
use crate::time::{exceeded, period_elapsed};
use crate::types::{AddressMode, MacAddress, NetworkInfo};

// ═══════════════════════════════════════════════════════════════════════════
// PROTOCOL CAPABILITY
// ═══════════════════════════════════════════════════════════════════════════

/// Result of one protocol step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhcpStatus {
    /// Still exchanging messages
    Running,
    /// A lease is held; see [`DhcpProtocol::lease`]
    Leased,
    /// The protocol gave up
    Failed,
}

/// Addresses handed out by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpLease {
    pub ip: Ipv4Address,
    pub netmask: Ipv4Address,
    pub gateway: Ipv4Address,
    pub dns: Ipv4Address,
}

/// DHCP client protocol primitives.
///
/// Message exchange lives behind this trait; the engine only owns the
/// socket lifetime, the timer tick and the timeout policy.
pub trait DhcpProtocol {
    /// Reset protocol state and bind to `socket`.
    fn init(&mut self, socket: SocketId, mac: &MacAddress);

    /// Advance the exchange. Must not block.
    fn run_once(&mut self, now_ms: u64) -> DhcpStatus;

    /// One-second protocol timer.
    fn tick(&mut self);

    /// The held lease after `run_once` reported [`DhcpStatus::Leased`].
    fn lease(&self) -> Option<DhcpLease>;
}

// ═══════════════════════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhcpState {
    Idle,
    Negotiating,
    Leased,
    Failed,
}

impl DhcpState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DhcpState::Idle => "idle",
            DhcpState::Negotiating => "negotiating",
            DhcpState::Leased => "leased",
            DhcpState::Failed => "failed",
        }
    }
}

/// Outcome of one `process()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhcpPoll {
    Pending,
    /// Lease applied to the chip; MAC carried over from the starting info
    Leased(NetworkInfo),
    Failed,
}

/// Per-negotiation bookkeeping. Dropped when the socket is released.
#[derive(Debug)]
struct DhcpSession {
    socket: Option<SocketId>,
    started_ms: u64,
    last_tick_ms: u64,
    retried: bool,
    base: NetworkInfo,
}

pub struct DhcpEngine<P: DhcpProtocol> {
    protocol: P,
    state: DhcpState,
    session: Option<DhcpSession>,
    port: u16,
    timeout_ms: u32,
    tick_ms: u32,
}

impl<P: DhcpProtocol> DhcpEngine<P> {
    pub fn new(protocol: P, config: &LifecycleConfig) -> Self {
        Self {
            protocol,
            state: DhcpState::Idle,
            session: None,
            port: config.dhcp_client_port,
            timeout_ms: config.dhcp_timeout_ms,
            tick_ms: config.dhcp_tick_ms,
        }
    }

    pub fn state(&self) -> DhcpState {
        self.state
    }

    pub fn is_negotiating(&self) -> bool {
        self.state == DhcpState::Negotiating
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    pub fn protocol_mut(&mut self) -> &mut P {
        &mut self.protocol
    }

    /// Begin negotiating. No-op unless Idle.
    ///
    /// `base` supplies the MAC (kept through the lease) and the fields that
    /// the lease does not overwrite.
    pub fn start<C: NetworkChip + ?Sized>(&mut self, chip: &mut C, base: &NetworkInfo, now_ms: u64) {
        if self.state != DhcpState::Idle {
            return;
        }

        let socket = match chip.open_udp(self.port) {
            Ok(socket) => socket,
            Err(e) => {
                warn!("[DHCP] ERROR: socket open on port {}: {}", self.port, e);
                self.state = DhcpState::Failed;
                return;
            }
        };

        self.protocol.init(socket, &base.mac);
        self.session = Some(DhcpSession {
            socket: Some(socket),
            started_ms: now_ms,
            last_tick_ms: now_ms,
            retried: false,
            base: *base,
        });
        self.state = DhcpState::Negotiating;
        info!("[DHCP] Starting discovery on socket {}", socket.0);
    }

    /// Advance negotiation by one step. Safe to call in any state.
    pub fn process<C: NetworkChip + ?Sized>(&mut self, chip: &mut C, now_ms: u64) -> DhcpPoll {
        match self.state {
            DhcpState::Idle | DhcpState::Leased => return DhcpPoll::Pending,
            DhcpState::Failed => return DhcpPoll::Failed,
            DhcpState::Negotiating => {}
        }

        // A dropped cable voids the attempt outright.
        if !LinkProbe::is_link_up(chip) {
            warn!("[DHCP] Link down, aborting");
            self.release(chip);
            self.state = DhcpState::Idle;
            return DhcpPoll::Failed;
        }

        let Some(session) = self.session.as_mut() else {
            self.state = DhcpState::Idle;
            return DhcpPoll::Pending;
        };

        if period_elapsed(session.last_tick_ms, now_ms, self.tick_ms) {
            self.protocol.tick();
            session.last_tick_ms = now_ms;
        }

        let status = self.protocol.run_once(now_ms);
        debug!("[DHCP] run_once -> {:?}", status);

        match status {
            DhcpStatus::Leased => match self.protocol.lease() {
                Some(lease) => {
                    let info = NetworkInfo {
                        mac: session.base.mac,
                        ip: lease.ip,
                        netmask: lease.netmask,
                        gateway: lease.gateway,
                        dns: lease.dns,
                        mode: AddressMode::Dhcp,
                    };
                    chip.set_network(&info);
                    info!("[DHCP] Leased {}", info);
                    self.release(chip);
                    self.state = DhcpState::Leased;
                    return DhcpPoll::Leased(info);
                }
                None => warn!("[DHCP] Leased without addresses, waiting"),
            },
            DhcpStatus::Failed if !session.retried => {
                session.retried = true;
                if let Some(socket) = session.socket.take() {
                    chip.close_socket(socket);
                }
                match chip.open_udp(self.port) {
                    Ok(socket) => {
                        session.socket = Some(socket);
                        self.protocol.init(socket, &session.base.mac);
                        info!("[DHCP] Protocol failure, restarting negotiation");
                    }
                    Err(e) => {
                        warn!("[DHCP] ERROR: socket reopen: {}", e);
                        self.release(chip);
                        self.state = DhcpState::Failed;
                        return DhcpPoll::Failed;
                    }
                }
            }
            DhcpStatus::Failed => {
                warn!("[DHCP] ERROR: Protocol failed after retry");
                self.release(chip);
                self.state = DhcpState::Failed;
                return DhcpPoll::Failed;
            }
            DhcpStatus::Running => {}
        }

        let started_ms = self.session.as_ref().map_or(now_ms, |s| s.started_ms);
        if exceeded(started_ms, now_ms, self.timeout_ms) {
            warn!("[DHCP] ERROR: Timeout ({} ms)", self.timeout_ms);
            self.release(chip);
            self.state = DhcpState::Failed;
            return DhcpPoll::Failed;
        }

        DhcpPoll::Pending
    }

    /// Release the socket and return to Idle. Callable in any state.
    pub fn stop<C: NetworkChip + ?Sized>(&mut self, chip: &mut C) {
        self.release(chip);
        self.state = DhcpState::Idle;
    }

    fn release<C: NetworkChip + ?Sized>(&mut self, chip: &mut C) {
        if let Some(socket) = self.session.take().and_then(|s| s.socket) {
            chip.close_socket(socket);
            debug!("[DHCP] Socket {} closed", socket.0);
        }
    }
}
