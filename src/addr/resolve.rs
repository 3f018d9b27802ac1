use super::{to4, Endpoint, IpEndpoint};
use crate::error::ResolveError;
use crate::interface::Interface;
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV6};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Ip,
    IpNet,
    Tcp,
    Udp,
}

/// Which addresses a network name admits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    Any,
    V4,
    V6,
}

impl Family {
    fn accepts(&self, ip: IpAddr) -> bool {
        match self {
            Family::Any => true,
            Family::V4 => to4(ip).is_some(),
            Family::V6 => to4(ip).is_none(),
        }
    }

    fn unspecified(&self) -> IpAddr {
        match self {
            Family::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Family::Any | Family::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }
}

fn parse_network(network: &str) -> Result<(Shape, Family), ResolveError> {
    let parsed = match network {
        "ip" => (Shape::Ip, Family::Any),
        "ip4" => (Shape::Ip, Family::V4),
        "ip6" => (Shape::Ip, Family::V6),
        "ip+net" => (Shape::IpNet, Family::Any),
        "tcp" => (Shape::Tcp, Family::Any),
        "tcp4" => (Shape::Tcp, Family::V4),
        "tcp6" => (Shape::Tcp, Family::V6),
        "udp" => (Shape::Udp, Family::Any),
        "udp4" => (Shape::Udp, Family::V4),
        "udp6" => (Shape::Udp, Family::V6),
        _ => return Err(ResolveError::UnknownNetwork(network.to_string())),
    };
    Ok(parsed)
}

/// Resolves `address` on `network` into an [`Endpoint`].
///
/// Networks are `ip`, `ip4`, `ip6`, `tcp`, `tcp4`, `tcp6`, `udp`, `udp4`,
/// `udp6` and `ip+net` (CIDR notation, truncated to the prefix). Host names
/// are looked up with the system resolver; literals never touch it.
///
/// An IPv4-mapped IPv6 literal is kept as written and satisfies the `*4`
/// networks, so `resolve("udp4", "[::ffff:127.0.0.1]:123")` succeeds.
pub fn resolve(network: &str, address: &str) -> Result<Endpoint, ResolveError> {
    let (shape, family) = parse_network(network)?;
    match shape {
        Shape::IpNet => parse_cidr(address),
        Shape::Ip => {
            let (ip, zone) = resolve_host(address, family)?;
            Ok(Endpoint::Ip(IpEndpoint { ip, zone }))
        }
        Shape::Tcp | Shape::Udp => {
            let (host, port) = split_host_port(address)?;
            let port = parse_port(port)?;
            let (ip, zone) = resolve_host(host, family)?;
            let sa = socket_addr(ip, port, zone.as_deref())?;
            if shape == Shape::Tcp {
                Ok(Endpoint::Tcp(sa))
            } else {
                Ok(Endpoint::Udp(sa))
            }
        }
    }
}

fn parse_cidr(s: &str) -> Result<Endpoint, ResolveError> {
    if s.contains('%') {
        return Err(ResolveError::InvalidCidr(s.to_string()));
    }
    let net: IpNet = s
        .parse()
        .map_err(|_| ResolveError::InvalidCidr(s.to_string()))?;
    Ok(Endpoint::IpNet(net.trunc()))
}

fn split_host_port(address: &str) -> Result<(&str, &str), ResolveError> {
    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| ResolveError::InvalidAddress(address.to_string()))?;
        let port = tail
            .strip_prefix(':')
            .ok_or_else(|| ResolveError::MissingPort(address.to_string()))?;
        return Ok((host, port));
    }
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| ResolveError::MissingPort(address.to_string()))?;
    if host.contains(':') {
        // unbracketed IPv6 literal
        return Err(ResolveError::InvalidAddress(address.to_string()));
    }
    Ok((host, port))
}

fn parse_port(port: &str) -> Result<u16, ResolveError> {
    if port.is_empty() {
        return Ok(0);
    }
    port.parse()
        .map_err(|_| ResolveError::InvalidPort(port.to_string()))
}

fn resolve_host(host: &str, family: Family) -> Result<(IpAddr, Option<String>), ResolveError> {
    if host.is_empty() {
        return Ok((family.unspecified(), None));
    }
    let (literal, zone) = match host.split_once('%') {
        Some((literal, zone)) => (literal, Some(zone)),
        None => (host, None),
    };
    if let Ok(ip) = literal.parse::<IpAddr>() {
        if zone.is_some() && !ip.is_ipv6() {
            return Err(ResolveError::InvalidAddress(host.to_string()));
        }
        if zone.map_or(false, str::is_empty) {
            return Err(ResolveError::InvalidAddress(host.to_string()));
        }
        if !family.accepts(ip) {
            return Err(ResolveError::NoSuitableAddress(host.to_string()));
        }
        return Ok((ip, zone.map(str::to_string)));
    }
    if zone.is_some() {
        return Err(ResolveError::InvalidAddress(host.to_string()));
    }

    let ips = dns_lookup::lookup_host(host)?;
    log::trace!("{} resolved to {:?}", host, ips);
    let picked = match family {
        Family::Any => ips
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| ips.first()),
        _ => ips.iter().find(|ip| family.accepts(**ip)),
    };
    match picked {
        Some(ip) => Ok((*ip, None)),
        None => Err(ResolveError::NoSuitableAddress(host.to_string())),
    }
}

fn socket_addr(ip: IpAddr, port: u16, zone: Option<&str>) -> Result<SocketAddr, ResolveError> {
    match ip {
        IpAddr::V4(_) => Ok(SocketAddr::new(ip, port)),
        IpAddr::V6(v6) => {
            let scope_id = match zone {
                Some(zone) => zone_index(zone)?,
                None => 0,
            };
            Ok(SocketAddr::V6(SocketAddrV6::new(v6, port, 0, scope_id)))
        }
    }
}

fn zone_index(zone: &str) -> Result<u32, ResolveError> {
    if let Ok(index) = zone.parse::<u32>() {
        return Ok(index);
    }
    Interface::by_name(zone)
        .map(|ifi| ifi.index)
        .ok_or_else(|| ResolveError::UnknownZone(zone.to_string()))
}
