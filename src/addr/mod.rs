mod resolve;

pub use self::resolve::resolve;

use ipnet::IpNet;
use socket2::{SockAddr, Type};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Plain IP address, optionally decorated with an IPv6 zone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IpEndpoint {
    /// IP address
    pub ip: IpAddr,
    /// Zone (scope) as written after `%`, e.g. `en0`
    pub zone: Option<String>,
}

impl IpEndpoint {
    pub fn new(ip: IpAddr) -> Self {
        Self { ip, zone: None }
    }

    pub fn with_zone(ip: IpAddr, zone: impl Into<String>) -> Self {
        Self {
            ip,
            zone: Some(zone.into()),
        }
    }
}

impl From<IpAddr> for IpEndpoint {
    fn from(ip: IpAddr) -> Self {
        Self::new(ip)
    }
}

/// Endpoint shapes understood by the classifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Plain IP address.
    Ip(IpEndpoint),
    /// Network address with prefix length.
    IpNet(IpNet),
    /// Stream endpoint.
    Tcp(SocketAddr),
    /// Packet endpoint.
    Udp(SocketAddr),
    /// Socket address of a non-IP family. Carries no IP payload.
    Unknown { family: u16 },
}

impl Endpoint {
    /// Builds an endpoint from an OS socket address.
    ///
    /// The socket type picks the shape: stream sockets yield [`Endpoint::Tcp`],
    /// datagram sockets [`Endpoint::Udp`] and anything else carrying an IP
    /// address (raw sockets) [`Endpoint::Ip`].
    pub fn from_sock_addr(addr: &SockAddr, ty: Type) -> Self {
        match addr.as_socket() {
            Some(sa) if ty == Type::STREAM => Endpoint::Tcp(sa),
            Some(sa) if ty == Type::DGRAM => Endpoint::Udp(sa),
            Some(sa) => Endpoint::Ip(IpEndpoint::new(sa.ip())),
            None => Endpoint::Unknown {
                family: addr.family() as u16,
            },
        }
    }

    /// Returns the embedded IP address, if this shape carries one.
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            Endpoint::Ip(ep) => Some(ep.ip),
            Endpoint::IpNet(net) => Some(net.addr()),
            Endpoint::Tcp(sa) | Endpoint::Udp(sa) => Some(sa.ip()),
            Endpoint::Unknown { .. } => None,
        }
    }

    /// Returns true if the embedded IP address is IPv4, including the
    /// IPv4-mapped IPv6 form.
    pub fn is_v4(&self) -> bool {
        is_v4(Some(self))
    }
}

impl From<IpAddr> for Endpoint {
    fn from(ip: IpAddr) -> Self {
        Endpoint::Ip(IpEndpoint::new(ip))
    }
}

impl From<Ipv4Addr> for Endpoint {
    fn from(ip: Ipv4Addr) -> Self {
        Endpoint::from(IpAddr::V4(ip))
    }
}

impl From<std::net::Ipv6Addr> for Endpoint {
    fn from(ip: std::net::Ipv6Addr) -> Self {
        Endpoint::from(IpAddr::V6(ip))
    }
}

impl From<IpNet> for Endpoint {
    fn from(net: IpNet) -> Self {
        Endpoint::IpNet(net)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Ip(IpEndpoint { ip, zone: Some(zone) }) => write!(f, "{}%{}", ip, zone),
            Endpoint::Ip(IpEndpoint { ip, zone: None }) => write!(f, "{}", ip),
            Endpoint::IpNet(net) => write!(f, "{}", net),
            Endpoint::Tcp(sa) | Endpoint::Udp(sa) => write!(f, "{}", sa),
            Endpoint::Unknown { family } => write!(f, "<address family {}>", family),
        }
    }
}

/// Returns the IP address embedded in `addr`, or `None` when the shape
/// carries none.
pub fn extract_ip(addr: &Endpoint) -> Option<IpAddr> {
    addr.ip()
}

/// Returns the 4-byte form of `ip`, if it has one.
///
/// IPv6 addresses qualify only in the IPv4-mapped form `::ffff:a.b.c.d`;
/// `::` and `::1` do not.
pub fn to4(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// Reports whether `addr` denotes IPv4 space.
///
/// Never fails: an absent address, or one without an IP payload, is
/// treated as IPv6.
pub fn is_v4(addr: Option<&Endpoint>) -> bool {
    addr.and_then(extract_ip).and_then(to4).is_some()
}
