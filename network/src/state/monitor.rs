//! Connectivity monitor.
//!
//! Supervises cable presence and address reachability on a fixed period and
//! drives recovery through [`Supervised::reinitialize`].
//!
//! # States
//! ```text
//!                link up              reachable
//! Disconnected ─────────→ Connecting ───────────→ Connected
//!      ↑                   ↑      │ >10 polls         │ not reachable
//!      │ >5 failures       │ ok   ↓ unreachable       ↓
//!      └──────────────── Reconnecting ←───────────────┘
//! ```
//! A link edge (up or down) overrides the table. Link down from any state
//! lands in Disconnected.

use log::{debug, info, warn};

use crate::mainloop::context::LifecycleConfig;
use crate::time::period_elapsed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityState::Disconnected => "disconnected",
            ConnectivityState::Connecting => "connecting",
            ConnectivityState::Connected => "connected",
            ConnectivityState::Reconnecting => "reconnecting",
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectivityState::Connecting,
            2 => ConnectivityState::Connected,
            3 => ConnectivityState::Reconnecting,
            _ => ConnectivityState::Disconnected,
        }
    }
}

/// What the monitor samples and acts on.
pub trait Supervised {
    /// Cable present.
    fn link_up(&mut self) -> bool;

    /// The live configuration holds a non-zero IP.
    fn has_address(&mut self) -> bool;

    /// Another configurator is reprogramming the chip right now.
    fn negotiating(&self) -> bool;

    /// Soft-reset the chip and start a DHCP negotiation.
    fn reinitialize(&mut self) -> bool;
}

pub struct ConnectivityMonitor {
    state: ConnectivityState,
    attempts: u32,
    last_link: bool,
    last_poll_ms: Option<u64>,
    cooldown_until_ms: Option<u64>,
    period_ms: u32,
    connecting_limit: u32,
    reconnect_limit: u32,
    cooldown_ms: u32,
}

impl ConnectivityMonitor {
    pub fn new(config: &LifecycleConfig) -> Self {
        Self {
            state: ConnectivityState::Disconnected,
            attempts: 0,
            last_link: false,
            last_poll_ms: None,
            cooldown_until_ms: None,
            period_ms: config.monitor_period_ms,
            connecting_limit: config.connecting_attempt_limit,
            reconnect_limit: config.reconnect_attempt_limit,
            cooldown_ms: config.reconnect_cooldown_ms,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// True while polls are suppressed after exhausting reconnect attempts.
    pub fn in_cooldown(&self, now_ms: u64) -> bool {
        self.cooldown_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Forget history. Next poll evaluates immediately.
    pub fn reset(&mut self) {
        self.state = ConnectivityState::Disconnected;
        self.attempts = 0;
        self.last_link = false;
        self.last_poll_ms = None;
        self.cooldown_until_ms = None;
    }

    /// Run one supervision step if the period has elapsed.
    ///
    /// Returns the state after the step, or `None` when the poll was
    /// skipped (period not yet elapsed, or cooling down).
    pub fn poll<S: Supervised + ?Sized>(&mut self, now_ms: u64, target: &mut S) -> Option<ConnectivityState> {
        if let Some(last) = self.last_poll_ms {
            if !period_elapsed(last, now_ms, self.period_ms) {
                return None;
            }
        }
        if self.in_cooldown(now_ms) {
            return None;
        }
        self.cooldown_until_ms = None;
        self.last_poll_ms = Some(now_ms);

        let link = target.link_up();
        let before = self.state;

        if link != self.last_link {
            // Edge wins over the table for this poll. The table first runs
            // on the next poll, so Connecting samples reachability
            // `connecting_limit + 1` times after an up-edge before giving up.
            self.last_link = link;
            self.attempts = 0;
            self.state = if link { ConnectivityState::Connecting } else { ConnectivityState::Disconnected };
        } else {
            self.step(link, now_ms, target);
        }

        if self.state != before {
            info!("[MONITOR] {} -> {}", before.as_str(), self.state.as_str());
        }
        Some(self.state)
    }

    fn step<S: Supervised + ?Sized>(&mut self, link: bool, now_ms: u64, target: &mut S) {
        use ConnectivityState::*;

        if !link {
            self.state = Disconnected;
            return;
        }

        match self.state {
            Disconnected => {
                self.state = Connecting;
                self.attempts = 0;
            }
            Connecting => {
                if target.has_address() {
                    self.state = Connected;
                    self.attempts = 0;
                } else {
                    self.attempts += 1;
                    if self.attempts > self.connecting_limit {
                        self.state = Reconnecting;
                        self.attempts = 0;
                    }
                }
            }
            Connected => {
                if !target.has_address() {
                    self.state = Reconnecting;
                    self.attempts = 0;
                }
            }
            Reconnecting => {
                if target.negotiating() {
                    debug!("[MONITOR] Negotiation in flight, holding off reinitialize");
                    return;
                }
                if target.reinitialize() {
                    self.state = Connecting;
                    self.attempts = 0;
                    return;
                }
                self.attempts += 1;
                warn!("[MONITOR] Reinitialize failed ({}/{})", self.attempts, self.reconnect_limit + 1);
                if self.attempts > self.reconnect_limit {
                    self.state = Disconnected;
                    self.attempts = 0;
                    self.cooldown_until_ms = Some(now_ms.saturating_add(u64::from(self.cooldown_ms)));
                    warn!("[MONITOR] Giving up for {} ms", self.cooldown_ms);
                }
            }
        }
    }
}
