//! IPv6 socket options under their native names.

use super::{ipv6_of, set_deadlines, RawSocket, SocketFamily};
use crate::addr::Endpoint;
use crate::bpf::RawInstruction;
use crate::interface::Interface;
use crate::sys::{self, SourceOp};
use socket2::{SockAddr, SockRef};
use std::io;
use std::net::{Ipv6Addr, SocketAddr};
use std::time::Instant;

/// IPv6 options of a stream connection.
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

    /// Returns the `IPV6_UNICAST_HOPS` of outgoing packets.
    pub fn hop_limit(&self) -> io::Result<u32> {
        self.socket().unicast_hops_v6()
    }

    pub fn set_hop_limit(&self, hop_limit: u32) -> io::Result<()> {
        self.socket().set_unicast_hops_v6(hop_limit)
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// IPv6 options of a packet-oriented socket.
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

    pub fn hop_limit(&self) -> io::Result<u32> {
        self.socket().unicast_hops_v6()
    }

    pub fn set_hop_limit(&self, hop_limit: u32) -> io::Result<()> {
        self.socket().set_unicast_hops_v6(hop_limit)
    }

    pub fn multicast_hop_limit(&self) -> io::Result<u32> {
        self.socket().multicast_hops_v6()
    }

    pub fn set_multicast_hop_limit(&self, hop_limit: u32) -> io::Result<()> {
        self.socket().set_multicast_hops_v6(hop_limit)
    }

    /// Returns the outgoing multicast interface, `None` when the kernel
    /// chooses.
    pub fn multicast_interface(&self) -> io::Result<Option<Interface>> {
        match self.socket().multicast_if_v6()? {
            0 => Ok(None),
            index => Ok(Interface::by_index(index)),
        }
    }

    pub fn set_multicast_interface(&self, ifi: Option<&Interface>) -> io::Result<()> {
        self.socket().set_multicast_if_v6(interface_index(ifi))
    }

    pub fn multicast_loopback(&self) -> io::Result<bool> {
        self.socket().multicast_loop_v6()
    }

    pub fn set_multicast_loopback(&self, on: bool) -> io::Result<()> {
        self.socket().set_multicast_loop_v6(on)
    }

    /// Joins `group` on `ifi`, or on the interface the kernel picks.
    pub fn join_group(&self, ifi: Option<&Interface>, group: &Endpoint) -> io::Result<()> {
        let group = ipv6_of(group)?;
        self.socket().join_multicast_v6(&group, interface_index(ifi))
    }

    pub fn leave_group(&self, ifi: Option<&Interface>, group: &Endpoint) -> io::Result<()> {
        let group = ipv6_of(group)?;
        self.socket().leave_multicast_v6(&group, interface_index(ifi))
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

    pub fn include_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        self.source_group(SourceOp::Unblock, ifi, group, source)
    }

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
        let group = sock_addr(ipv6_of(group)?);
        let source = sock_addr(ipv6_of(source)?);
        sys::source_group(
            &self.socket(),
            SocketFamily::Ipv6,
            op,
            interface_index(ifi),
            &group,
            &source,
        )
    }

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

fn sock_addr(ip: Ipv6Addr) -> SockAddr {
    SockAddr::from(SocketAddr::from((ip, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;

    // hosts without IPv6 loopback skip these
    fn loopback() -> Option<(UdpSocket, Interface)> {
        let sock = UdpSocket::bind("[::1]:0").ok()?;
        let lo = Interface::list()
            .into_iter()
            .find(|ifi| ifi.ipv6.contains(&Ipv6Addr::LOCALHOST))?;
        Some((sock, lo))
    }

    #[test]
    fn multicast_interface_round_trip() {
        let (sock, lo) = match loopback() {
            Some(found) => found,
            None => return,
        };
        let conn = PacketConn::new(&sock);
        conn.set_multicast_interface(Some(&lo)).unwrap();
        assert_eq!(sock_if(&conn), Some(lo.index));
        conn.set_multicast_interface(None).unwrap();
        assert_eq!(conn.multicast_interface().unwrap(), None);
    }

    fn sock_if(conn: &PacketConn<&UdpSocket>) -> Option<u32> {
        conn.multicast_interface().unwrap().map(|ifi| ifi.index)
    }

    #[test]
    fn join_and_leave_on_loopback() {
        let (sock, lo) = match loopback() {
            Some(found) => found,
            None => return,
        };
        let conn = PacketConn::new(&sock);
        let group: Endpoint = "ff12::1234".parse::<Ipv6Addr>().unwrap().into();

        conn.join_group(Some(&lo), &group).unwrap();
        conn.leave_group(Some(&lo), &group).unwrap();
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn source_filters_on_loopback() {
        let (sock, lo) = match loopback() {
            Some(found) => found,
            None => return,
        };
        let conn = PacketConn::new(&sock);
        let source: Endpoint = Ipv6Addr::LOCALHOST.into();

        let ssm: Endpoint = "ff32::8000:1234".parse::<Ipv6Addr>().unwrap().into();
        conn.join_source_specific_group(Some(&lo), &ssm, &source)
            .unwrap();
        conn.leave_source_specific_group(Some(&lo), &ssm, &source)
            .unwrap();

        let asm: Endpoint = "ff12::5678".parse::<Ipv6Addr>().unwrap().into();
        conn.join_group(Some(&lo), &asm).unwrap();
        conn.exclude_source_specific_group(Some(&lo), &asm, &source)
            .unwrap();
        conn.include_source_specific_group(Some(&lo), &asm, &source)
            .unwrap();
        conn.leave_group(Some(&lo), &asm).unwrap();
    }

    #[test]
    fn group_must_be_ipv6() {
        let (sock, _) = match loopback() {
            Some(found) => found,
            None => return,
        };
        let conn = PacketConn::new(&sock);
        let mapped: Endpoint = "::ffff:239.1.1.1".parse::<Ipv6Addr>().unwrap().into();
        let err = conn.join_group(None, &mapped).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
