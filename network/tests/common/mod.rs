//! Common test utilities: in-memory chip, flash, clock and DHCP server

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use picogpio_hwinit::{
    BoardIdentity, Clock, Delay, Flash, FlashError, InterruptControl, FLASH_SECTOR_SIZE, UNIQUE_ID_LEN,
};
use picogpio_network::driver::link::PHYCFGR_LNK_ON;
use picogpio_network::driver::{ChipError, SocketId};
use picogpio_network::{
    DhcpLease, DhcpProtocol, DhcpStatus, DependentServices, LifecycleConfig, MacAddress, NetworkChip,
    NetworkInfo, NetworkManager, NetworkStatus,
};
use picogpio_persistent::RecordStore;
use smoltcp::wire::Ipv4Address;

pub const BOARD_ID: [u8; UNIQUE_ID_LEN] = [0xE6, 0x61, 0x38, 0x52, 0x0B, 0x4A, 0x2F, 0x27];
pub const BOARD_MAC: MacAddress = [0x00, 0x08, 0xDC, 0x4A, 0x2F, 0x27];

// ═══════════════════════════════════════════════════════════════════════════
// CHIP
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct ChipState {
    pub version: u8,
    pub link: bool,
    pub refuse_open: bool,
    pub mac: Option<MacAddress>,
    pub ip: Ipv4Address,
    /// Every `set_network` call in order
    pub programmed: Vec<NetworkInfo>,
    pub resets: u32,
    pub open_socket: Option<u8>,
    pub opens: u32,
    pub closes: u32,
}

impl Default for ChipState {
    fn default() -> Self {
        Self {
            version: 0x04,
            link: true,
            refuse_open: false,
            mac: None,
            ip: Ipv4Address::UNSPECIFIED,
            programmed: Vec::new(),
            resets: 0,
            open_socket: None,
            opens: 0,
            closes: 0,
        }
    }
}

/// Scripted offload chip. Clones share state so a test keeps a handle after
/// moving one into the manager.
#[derive(Debug, Clone, Default)]
pub struct MockChip(pub Rc<RefCell<ChipState>>);

impl MockChip {
    pub fn state(&self) -> std::cell::Ref<'_, ChipState> {
        self.0.borrow()
    }

    pub fn set_link(&self, up: bool) {
        self.0.borrow_mut().link = up;
    }

    pub fn set_version(&self, version: u8) {
        self.0.borrow_mut().version = version;
    }

    /// Simulate an address vanishing from the chip (e.g. external reset).
    pub fn clear_ip(&self) {
        self.0.borrow_mut().ip = Ipv4Address::UNSPECIFIED;
    }
}

impl NetworkChip for MockChip {
    fn version(&mut self) -> u8 {
        self.0.borrow().version
    }

    fn phy_config(&mut self) -> u8 {
        if self.0.borrow().link {
            PHYCFGR_LNK_ON | 0b110
        } else {
            0
        }
    }

    fn soft_reset(&mut self) {
        let mut s = self.0.borrow_mut();
        s.resets += 1;
        s.ip = Ipv4Address::UNSPECIFIED;
        s.mac = None;
        s.open_socket = None;
    }

    fn set_mac(&mut self, mac: &MacAddress) {
        self.0.borrow_mut().mac = Some(*mac);
    }

    fn set_network(&mut self, info: &NetworkInfo) {
        let mut s = self.0.borrow_mut();
        s.mac = Some(info.mac);
        s.ip = info.ip;
        s.programmed.push(*info);
    }

    fn local_ip(&mut self) -> Ipv4Address {
        self.0.borrow().ip
    }

    fn open_udp(&mut self, _port: u16) -> Result<SocketId, ChipError> {
        let mut s = self.0.borrow_mut();
        if s.refuse_open || s.open_socket.is_some() {
            return Err(ChipError::SocketUnavailable);
        }
        s.open_socket = Some(0);
        s.opens += 1;
        Ok(SocketId(0))
    }

    fn close_socket(&mut self, socket: SocketId) {
        let mut s = self.0.borrow_mut();
        assert_eq!(s.open_socket, Some(socket.0), "close of a socket that is not open");
        s.open_socket = None;
        s.closes += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DHCP SERVER
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct DhcpScript {
    /// `run_once` calls after `init` before the lease lands; `None` = never
    pub lease_after: Option<u32>,
    pub lease: Option<DhcpLease>,
    pub inits: u32,
    pub runs_since_init: u32,
    pub ticks: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedDhcp(pub Rc<RefCell<DhcpScript>>);

impl ScriptedDhcp {
    pub fn leasing_after(runs: u32) -> Self {
        let dhcp = Self::default();
        {
            let mut s = dhcp.0.borrow_mut();
            s.lease_after = Some(runs);
            s.lease = Some(office_lease());
        }
        dhcp
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn script(&self) -> std::cell::RefMut<'_, DhcpScript> {
        self.0.borrow_mut()
    }
}

pub fn office_lease() -> DhcpLease {
    DhcpLease {
        ip: Ipv4Address::new(10, 20, 0, 57),
        netmask: Ipv4Address::new(255, 255, 0, 0),
        gateway: Ipv4Address::new(10, 20, 0, 1),
        dns: Ipv4Address::new(10, 20, 0, 2),
    }
}

impl DhcpProtocol for ScriptedDhcp {
    fn init(&mut self, _socket: SocketId, _mac: &MacAddress) {
        let mut s = self.0.borrow_mut();
        s.inits += 1;
        s.runs_since_init = 0;
    }

    fn run_once(&mut self, _now_ms: u64) -> DhcpStatus {
        let mut s = self.0.borrow_mut();
        s.runs_since_init += 1;
        match s.lease_after {
            Some(n) if s.runs_since_init > n => DhcpStatus::Leased,
            _ => DhcpStatus::Running,
        }
    }

    fn tick(&mut self) {
        self.0.borrow_mut().ticks += 1;
    }

    fn lease(&self) -> Option<DhcpLease> {
        self.0.borrow().lease
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FLASH, CLOCK, IRQ, BOARD
// ═══════════════════════════════════════════════════════════════════════════

/// Erased-on-create flash whose bytes outlive the store (power cycles).
#[derive(Debug, Clone)]
pub struct MemFlash(pub Rc<RefCell<Vec<u8>>>);

impl MemFlash {
    pub fn new(sectors: u32) -> Self {
        Self(Rc::new(RefCell::new(vec![0xFF; (sectors * FLASH_SECTOR_SIZE) as usize])))
    }

    /// Same bytes, fresh handle.
    pub fn power_cycle(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    pub fn write_raw(&self, offset: u32, bytes: &[u8]) {
        let start = offset as usize;
        self.0.borrow_mut()[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn read_raw(&self, offset: u32, len: usize) -> Vec<u8> {
        let start = offset as usize;
        self.0.borrow()[start..start + len].to_vec()
    }
}

impl Flash for MemFlash {
    fn capacity(&self) -> u32 {
        self.0.borrow().len() as u32
    }

    fn erase(&mut self, offset: u32, len: u32) -> Result<(), FlashError> {
        picogpio_hwinit::flash::check_range(self.capacity(), offset, len)?;
        let start = offset as usize;
        self.0.borrow_mut()[start..start + len as usize].fill(0xFF);
        Ok(())
    }

    fn program(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError> {
        picogpio_hwinit::flash::check_range(self.capacity(), offset, data.len() as u32)?;
        self.write_raw(offset, data);
        Ok(())
    }

    fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        picogpio_hwinit::flash::check_range(self.capacity(), offset, buf.len() as u32)?;
        let start = offset as usize;
        buf.copy_from_slice(&self.0.borrow()[start..start + buf.len()]);
        Ok(())
    }
}

/// Simulated clock; `delay_ms` advances it instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct SimTimer(pub Rc<Cell<u64>>);

impl SimTimer {
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for SimTimer {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

impl Delay for SimTimer {
    fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms));
    }
}

#[derive(Debug, Default)]
pub struct NoIrq {
    masked: bool,
}

impl InterruptControl for NoIrq {
    fn disable(&mut self) -> bool {
        let was_enabled = !self.masked;
        self.masked = true;
        was_enabled
    }

    fn restore(&mut self, was_enabled: bool) {
        self.masked = !was_enabled;
    }
}

pub struct Board;

impl BoardIdentity for Board {
    fn unique_id(&self) -> [u8; UNIQUE_ID_LEN] {
        BOARD_ID
    }
}

#[derive(Debug, Default)]
pub struct Services {
    pub starts: Vec<NetworkInfo>,
    pub stops: u32,
}

impl DependentServices for Services {
    fn start(&mut self, info: &NetworkInfo) {
        self.starts.push(*info);
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RIG
// ═══════════════════════════════════════════════════════════════════════════

pub type Manager<'s> = NetworkManager<'s, MockChip, ScriptedDhcp, MemFlash, NoIrq, SimTimer>;

/// Handles kept by the test after the manager takes ownership.
pub struct Rig {
    pub chip: MockChip,
    pub dhcp: ScriptedDhcp,
    pub flash: MemFlash,
    pub timer: SimTimer,
}

impl Rig {
    pub fn new(dhcp: ScriptedDhcp) -> Self {
        Self { chip: MockChip::default(), dhcp, flash: MemFlash::new(8), timer: SimTimer::default() }
    }

    pub fn with_flash(dhcp: ScriptedDhcp, flash: MemFlash) -> Self {
        Self { flash, ..Self::new(dhcp) }
    }

    pub fn manager<'s>(&self, status: &'s NetworkStatus) -> Manager<'s> {
        NetworkManager::new(
            self.chip.clone(),
            self.dhcp.clone(),
            RecordStore::new(self.flash.power_cycle(), NoIrq::default()),
            self.timer.clone(),
            status,
            LifecycleConfig::default(),
        )
    }
}

/// Run `service` every 100 ms of simulated time for `ms`.
pub fn run_for<S: DependentServices>(net: &mut Manager<'_>, timer: &SimTimer, services: &mut S, ms: u64) {
    let end = timer.now() + ms;
    while timer.now() < end {
        net.service(services);
        timer.advance(100);
    }
}
