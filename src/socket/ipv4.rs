//! IPv4 socket options under their native names.

use super::{ipv4_of, set_deadlines, RawSocket, SocketFamily};
use crate::addr::Endpoint;
use crate::bpf::RawInstruction;
use crate::interface::Interface;
use crate::sys::{self, SourceOp};
use socket2::{InterfaceIndexOrAddress, SockAddr, SockRef};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Instant;

/// IPv4 options of a stream connection.
#[derive(Debug)]
pub struct Conn<S> {
    inner: S,
}

impl<S: RawSocket> Conn<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn socket(&self) -> SockRef<'_> {
        SockRef::from(&self.inner)
    }

    /// Returns the `IP_TTL` of outgoing packets.
    pub fn ttl(&self) -> io::Result<u32> {
        self.socket().ttl()
    }

    pub fn set_ttl(&self, ttl: u32) -> io::Result<()> {
        self.socket().set_ttl(ttl)
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// IPv4 options of a packet-oriented socket.
#[derive(Debug)]
pub struct PacketConn<S> {
    inner: S,
}

impl<S: RawSocket> PacketConn<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn socket(&self) -> SockRef<'_> {
        SockRef::from(&self.inner)
    }

    /// Drops the wrapped socket. An owned socket is closed, a borrowed one
    /// is released.
    pub fn close(self) {
        drop(self.inner);
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn ttl(&self) -> io::Result<u32> {
        self.socket().ttl()
    }

    pub fn set_ttl(&self, ttl: u32) -> io::Result<()> {
        self.socket().set_ttl(ttl)
    }

    pub fn multicast_ttl(&self) -> io::Result<u32> {
        self.socket().multicast_ttl_v4()
    }

    pub fn set_multicast_ttl(&self, ttl: u32) -> io::Result<()> {
        self.socket().set_multicast_ttl_v4(ttl)
    }

    /// Returns the outgoing multicast interface, `None` when the kernel
    /// chooses.
    ///
    /// The kernel reports the interface by address (by index in `0.0.0.x`
    /// form on Windows), so an interface without any IPv4 address reads
    /// back as `None`.
    pub fn multicast_interface(&self) -> io::Result<Option<Interface>> {
        let addr = self.socket().multicast_if_v4()?;
        if addr.is_unspecified() {
            return Ok(None);
        }
        if addr.octets()[0] == 0 {
            return Ok(Interface::by_index(u32::from(addr)));
        }
        Ok(Interface::by_ipv4(addr))
    }

    /// Selects the outgoing multicast interface by index, `None` resets it
    /// to the kernel's choice.
    pub fn set_multicast_interface(&self, ifi: Option<&Interface>) -> io::Result<()> {
        let addr = match ifi {
            Some(ifi) if !ifi.ipv4.is_empty() => ifi.ipv4_addr(),
            Some(ifi) => Interface::by_index(ifi.index)
                .map_or(Ipv4Addr::UNSPECIFIED, |found| found.ipv4_addr()),
            None => Ipv4Addr::UNSPECIFIED,
        };
        sys::set_multicast_if_v4(&self.socket(), interface_index(ifi), addr)
    }

    pub fn multicast_loopback(&self) -> io::Result<bool> {
        self.socket().multicast_loop_v4()
    }

    pub fn set_multicast_loopback(&self, on: bool) -> io::Result<()> {
        self.socket().set_multicast_loop_v4(on)
    }

    /// Joins `group` on `ifi`, or on the interface the kernel picks.
    pub fn join_group(&self, ifi: Option<&Interface>, group: &Endpoint) -> io::Result<()> {
        let group = ipv4_of(group)?;
        self.socket().join_multicast_v4_n(&group, &membership(ifi))
    }

    pub fn leave_group(&self, ifi: Option<&Interface>, group: &Endpoint) -> io::Result<()> {
        let group = ipv4_of(group)?;
        self.socket().leave_multicast_v4_n(&group, &membership(ifi))
    }

    pub fn join_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        self.source_group(SourceOp::Join, ifi, group, source)
    }

    pub fn leave_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        self.source_group(SourceOp::Leave, ifi, group, source)
    }

    /// Re-admits `source` after [`exclude_source_specific_group`](Self::exclude_source_specific_group).
    pub fn include_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        self.source_group(SourceOp::Unblock, ifi, group, source)
    }

    /// Blocks `source` in an any-source membership of `group`.
    pub fn exclude_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        self.source_group(SourceOp::Block, ifi, group, source)
    }

    fn source_group(
        &self,
        op: SourceOp,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        let group = sock_addr(ipv4_of(group)?);
        let source = sock_addr(ipv4_of(source)?);
        sys::source_group(
            &self.socket(),
            SocketFamily::Ipv4,
            op,
            interface_index(ifi),
            &group,
            &source,
        )
    }

    /// Attaches a classic BPF program to the socket.
    pub fn set_bpf(&self, filter: &[RawInstruction]) -> io::Result<()> {
        sys::attach_filter(&self.socket(), filter)
    }

    pub fn set_deadline(&self, deadline: Option<Instant>) -> io::Result<()> {
        set_deadlines(&self.socket(), Some(deadline), Some(deadline))
    }

    pub fn set_read_deadline(&self, deadline: Option<Instant>) -> io::Result<()> {
        set_deadlines(&self.socket(), Some(deadline), None)
    }

    pub fn set_write_deadline(&self, deadline: Option<Instant>) -> io::Result<()> {
        set_deadlines(&self.socket(), None, Some(deadline))
    }
}

fn interface_index(ifi: Option<&Interface>) -> u32 {
    ifi.map_or(0, |ifi| ifi.index)
}

/// Interface selector for group membership: the index where `ip_mreqn`
/// is available, the first IPv4 address elsewhere.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "windows"))]
fn membership(ifi: Option<&Interface>) -> InterfaceIndexOrAddress {
    InterfaceIndexOrAddress::Index(interface_index(ifi))
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "windows")))]
fn membership(ifi: Option<&Interface>) -> InterfaceIndexOrAddress {
    InterfaceIndexOrAddress::Address(ifi.map_or(Ipv4Addr::UNSPECIFIED, Interface::ipv4_addr))
}

fn sock_addr(ip: Ipv4Addr) -> SockAddr {
    SockAddr::from(SocketAddr::from((ip, 0)))
}
