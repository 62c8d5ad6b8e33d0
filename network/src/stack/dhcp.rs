//! DHCP protocol primitives over smoltcp.

use smoltcp::iface::{Config, Interface, SocketHandle, SocketSet};
use smoltcp::phy::Device;
use smoltcp::socket::dhcpv4::{Event as DhcpEvent, Socket as DhcpSocket};
use smoltcp::time::Instant;
use smoltcp::wire::{EthernetAddress, HardwareAddress, IpCidr, Ipv4Address};

use log::{debug, info};

use alloc::vec::Vec;

use crate::driver::traits::SocketId;
use crate::state::dhcp::{DhcpLease, DhcpProtocol, DhcpStatus};
use crate::types::MacAddress;

/// smoltcp-driven DHCP client.
///
/// smoltcp keeps its own retransmit timers off the `run_once` timestamp, so
/// [`tick`](DhcpProtocol::tick) has nothing to do.
pub struct SmoltcpDhcp<D: Device> {
    device: D,
    iface: Interface,
    sockets: SocketSet<'static>,
    handle: Option<SocketHandle>,
    lease: Option<DhcpLease>,
    lost: bool,
}

impl<D: Device> SmoltcpDhcp<D> {
    pub fn new(mut device: D, mac: &MacAddress) -> Self {
        let config = Config::new(HardwareAddress::Ethernet(EthernetAddress(*mac)));
        let iface = Interface::new(config, &mut device, Instant::from_millis(0));
        Self {
            device,
            iface,
            sockets: SocketSet::new(Vec::new()),
            handle: None,
            lease: None,
            lost: false,
        }
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Address currently assigned to the smoltcp interface.
    pub fn ipv4_addr(&self) -> Option<Ipv4Address> {
        self.iface.ipv4_addr()
    }

    fn deconfigure(&mut self) {
        self.iface.update_ip_addrs(|addrs| addrs.clear());
        self.iface.routes_mut().remove_default_ipv4_route();
    }
}

impl<D: Device> DhcpProtocol for SmoltcpDhcp<D> {
    fn init(&mut self, socket: SocketId, mac: &MacAddress) {
        if let Some(handle) = self.handle.take() {
            self.sockets.remove(handle);
        }
        self.deconfigure();
        self.iface.set_hardware_addr(HardwareAddress::Ethernet(EthernetAddress(*mac)));
        self.handle = Some(self.sockets.add(DhcpSocket::new()));
        self.lease = None;
        self.lost = false;
        debug!("[DHCP] smoltcp client bound to chip socket {}", socket.0);
    }

    fn run_once(&mut self, now_ms: u64) -> DhcpStatus {
        let Some(handle) = self.handle else {
            return DhcpStatus::Failed;
        };

        let timestamp = Instant::from_millis(now_ms as i64);
        self.iface.poll(timestamp, &mut self.device, &mut self.sockets);

        match self.sockets.get_mut::<DhcpSocket>(handle).poll() {
            Some(DhcpEvent::Configured(config)) => {
                let cidr = config.address;
                let router = config.router;
                let dns = config.dns_servers.first().copied();

                self.iface.update_ip_addrs(|addrs| {
                    addrs.clear();
                    addrs.push(IpCidr::Ipv4(cidr)).ok();
                });
                if let Some(router) = router {
                    self.iface.routes_mut().add_default_ipv4_route(router).ok();
                }

                let lease = DhcpLease {
                    ip: cidr.address(),
                    netmask: cidr.netmask(),
                    gateway: router.unwrap_or(Ipv4Address::UNSPECIFIED),
                    dns: dns.unwrap_or(Ipv4Address::UNSPECIFIED),
                };
                info!("[DHCP] Got IP {}/{}", lease.ip, cidr.prefix_len());
                self.lease = Some(lease);
            }
            Some(DhcpEvent::Deconfigured) => {
                if self.lease.take().is_some() {
                    debug!("[DHCP] Lease lost");
                    self.lost = true;
                }
                self.iface.update_ip_addrs(|addrs| addrs.clear());
                self.iface.routes_mut().remove_default_ipv4_route();
            }
            None => {}
        }

        if self.lost {
            DhcpStatus::Failed
        } else if self.lease.is_some() {
            DhcpStatus::Leased
        } else {
            DhcpStatus::Running
        }
    }

    fn tick(&mut self) {}

    fn lease(&self) -> Option<DhcpLease> {
        self.lease
    }
}
