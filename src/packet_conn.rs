use crate::addr::Endpoint;
use crate::bpf::RawInstruction;
use crate::interface::Interface;
use crate::socket::{self, ipv4, ipv6, RawSocket, SocketFamily};
use std::io;
use std::time::Instant;

/// Multicast and packet-socket options of a socket of either IP version.
///
/// Every method forwards to [`ipv4::PacketConn`] or [`ipv6::PacketConn`];
/// the IPv4 TTL options appear under their IPv6 hop-limit names.
#[derive(Debug)]
pub enum PacketConn<S> {
    V4(ipv4::PacketConn<S>),
    V6(ipv6::PacketConn<S>),
}

macro_rules! forward {
    ($self:ident, $c:ident => $call:expr) => {
        match $self {
            PacketConn::V4($c) => $call,
            PacketConn::V6($c) => $call,
        }
    };
}

impl<S: RawSocket> PacketConn<S> {
    /// Wraps `inner`, which may be an owned socket or a reference to one.
    ///
    /// A local address that cannot be read or is not an IP address selects
    /// IPv6. Construction never fails.
    pub fn new(inner: S) -> Self {
        let local = socket::local_endpoint(&inner);
        let family = SocketFamily::from_endpoint(local.as_ref());
        match &local {
            Some(local) => log::debug!("packet connection on {} uses {:?}", local, family),
            None => log::debug!("packet connection without local address uses {:?}", family),
        }
        match family {
            SocketFamily::Ipv4 => PacketConn::V4(ipv4::PacketConn::new(inner)),
            SocketFamily::Ipv6 => PacketConn::V6(ipv6::PacketConn::new(inner)),
        }
    }

    pub fn family(&self) -> SocketFamily {
        match self {
            PacketConn::V4(_) => SocketFamily::Ipv4,
            PacketConn::V6(_) => SocketFamily::Ipv6,
        }
    }

    /// Returns the IPv4 implementation, or `None` if this is an IPv6 socket.
    pub fn as_v4(&self) -> Option<&ipv4::PacketConn<S>> {
        match self {
            PacketConn::V4(c) => Some(c),
            PacketConn::V6(_) => None,
        }
    }

    /// Returns the IPv6 implementation, or `None` if this is an IPv4 socket.
    pub fn as_v6(&self) -> Option<&ipv6::PacketConn<S>> {
        match self {
            PacketConn::V4(_) => None,
            PacketConn::V6(c) => Some(c),
        }
    }

    pub fn get_ref(&self) -> &S {
        forward!(self, c => c.get_ref())
    }

    pub fn into_inner(self) -> S {
        forward!(self, c => c.into_inner())
    }

    /// Drops the wrapped socket.
    ///
    /// Only an owned socket is closed. A facade built from a reference
    /// merely releases the borrow; the socket stays open and usable.
    pub fn close(self) {
        forward!(self, c => c.close())
    }

    pub fn hop_limit(&self) -> io::Result<u32> {
        match self {
            PacketConn::V4(c) => c.ttl(),
            PacketConn::V6(c) => c.hop_limit(),
        }
    }

    pub fn set_hop_limit(&self, hop_limit: u32) -> io::Result<()> {
        match self {
            PacketConn::V4(c) => c.set_ttl(hop_limit),
            PacketConn::V6(c) => c.set_hop_limit(hop_limit),
        }
    }

    pub fn multicast_hop_limit(&self) -> io::Result<u32> {
        match self {
            PacketConn::V4(c) => c.multicast_ttl(),
            PacketConn::V6(c) => c.multicast_hop_limit(),
        }
    }

    pub fn set_multicast_hop_limit(&self, hop_limit: u32) -> io::Result<()> {
        match self {
            PacketConn::V4(c) => c.set_multicast_ttl(hop_limit),
            PacketConn::V6(c) => c.set_multicast_hop_limit(hop_limit),
        }
    }

    pub fn multicast_interface(&self) -> io::Result<Option<Interface>> {
        forward!(self, c => c.multicast_interface())
    }

    pub fn set_multicast_interface(&self, ifi: Option<&Interface>) -> io::Result<()> {
        forward!(self, c => c.set_multicast_interface(ifi))
    }

    pub fn multicast_loopback(&self) -> io::Result<bool> {
        forward!(self, c => c.multicast_loopback())
    }

    pub fn set_multicast_loopback(&self, on: bool) -> io::Result<()> {
        forward!(self, c => c.set_multicast_loopback(on))
    }

    pub fn join_group(&self, ifi: Option<&Interface>, group: &Endpoint) -> io::Result<()> {
        forward!(self, c => c.join_group(ifi, group))
    }

    pub fn leave_group(&self, ifi: Option<&Interface>, group: &Endpoint) -> io::Result<()> {
        forward!(self, c => c.leave_group(ifi, group))
    }

    pub fn join_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        forward!(self, c => c.join_source_specific_group(ifi, group, source))
    }

    pub fn leave_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        forward!(self, c => c.leave_source_specific_group(ifi, group, source))
    }

    pub fn include_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        forward!(self, c => c.include_source_specific_group(ifi, group, source))
    }

    pub fn exclude_source_specific_group(
        &self,
        ifi: Option<&Interface>,
        group: &Endpoint,
        source: &Endpoint,
    ) -> io::Result<()> {
        forward!(self, c => c.exclude_source_specific_group(ifi, group, source))
    }

    pub fn set_bpf(&self, filter: &[RawInstruction]) -> io::Result<()> {
        forward!(self, c => c.set_bpf(filter))
    }

    pub fn set_deadline(&self, deadline: Option<Instant>) -> io::Result<()> {
        forward!(self, c => c.set_deadline(deadline))
    }

    pub fn set_read_deadline(&self, deadline: Option<Instant>) -> io::Result<()> {
        forward!(self, c => c.set_read_deadline(deadline))
    }

    pub fn set_write_deadline(&self, deadline: Option<Instant>) -> io::Result<()> {
        forward!(self, c => c.set_write_deadline(deadline))
    }
}
