use crate::socket::{self, ipv4, ipv6, RawSocket, SocketFamily};
use std::io;

/// Hop-limit access to a stream connection of either IP version.
///
/// The version is picked once, from the connection's local address, and
/// never changes.
#[derive(Debug)]
pub enum Conn<S> {
    V4(ipv4::Conn<S>),
    V6(ipv6::Conn<S>),
}

impl<S: RawSocket> Conn<S> {
    /// Wraps `inner`, which may be an owned socket or a reference to one.
    ///
    /// A local address that cannot be read or is not an IP address selects
    /// IPv6. Construction never fails.
    pub fn new(inner: S) -> Self {
        let local = socket::local_endpoint(&inner);
        let family = SocketFamily::from_endpoint(local.as_ref());
        match &local {
            Some(local) => log::debug!("stream connection on {} uses {:?}", local, family),
            None => log::debug!("stream connection without local address uses {:?}", family),
        }
        match family {
            SocketFamily::Ipv4 => Conn::V4(ipv4::Conn::new(inner)),
            SocketFamily::Ipv6 => Conn::V6(ipv6::Conn::new(inner)),
        }
    }

    pub fn family(&self) -> SocketFamily {
        match self {
            Conn::V4(_) => SocketFamily::Ipv4,
            Conn::V6(_) => SocketFamily::Ipv6,
        }
    }

    /// TTL on IPv4, hop limit on IPv6.
    pub fn hop_limit(&self) -> io::Result<u32> {
        match self {
            Conn::V4(c) => c.ttl(),
            Conn::V6(c) => c.hop_limit(),
        }
    }

    pub fn set_hop_limit(&self, hop_limit: u32) -> io::Result<()> {
        match self {
            Conn::V4(c) => c.set_ttl(hop_limit),
            Conn::V6(c) => c.set_hop_limit(hop_limit),
        }
    }

    /// Returns the IPv4 implementation, or `None` if this is an IPv6 connection.
    pub fn as_v4(&self) -> Option<&ipv4::Conn<S>> {
        match self {
            Conn::V4(c) => Some(c),
            Conn::V6(_) => None,
        }
    }

    /// Returns the IPv6 implementation, or `None` if this is an IPv4 connection.
    pub fn as_v6(&self) -> Option<&ipv6::Conn<S>> {
        match self {
            Conn::V4(_) => None,
            Conn::V6(c) => Some(c),
        }
    }

    pub fn get_ref(&self) -> &S {
        match self {
            Conn::V4(c) => c.get_ref(),
            Conn::V6(c) => c.get_ref(),
        }
    }

    pub fn into_inner(self) -> S {
        match self {
            Conn::V4(c) => c.into_inner(),
            Conn::V6(c) => c.into_inner(),
        }
    }
}
