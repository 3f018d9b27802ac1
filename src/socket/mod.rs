pub mod ipv4;
pub mod ipv6;

use crate::addr::{self, Endpoint};
use socket2::{SockRef, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::{Duration, Instant};

/// Anything that owns or borrows an OS socket handle.
///
/// Implemented for std, socket2 and tokio sockets as well as references to
/// them, so a facade may either own its connection or borrow it.
#[cfg(unix)]
pub trait RawSocket: std::os::fd::AsFd {}
#[cfg(unix)]
impl<T: std::os::fd::AsFd> RawSocket for T {}

/// Anything that owns or borrows an OS socket handle.
///
/// Implemented for std, socket2 and tokio sockets as well as references to
/// them, so a facade may either own its connection or borrow it.
#[cfg(windows)]
pub trait RawSocket: std::os::windows::io::AsSocket {}
#[cfg(windows)]
impl<T: std::os::windows::io::AsSocket> RawSocket for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketFamily {
    Ipv4,
    Ipv6,
}

impl SocketFamily {
    /// IPv4-mapped IPv6 addresses count as IPv4.
    pub fn from_ip(ip: &IpAddr) -> Self {
        if addr::to4(*ip).is_some() {
            SocketFamily::Ipv4
        } else {
            SocketFamily::Ipv6
        }
    }

    /// Absent or non-IP endpoints count as IPv6.
    pub fn from_endpoint(endpoint: Option<&Endpoint>) -> Self {
        if addr::is_v4(endpoint) {
            SocketFamily::Ipv4
        } else {
            SocketFamily::Ipv6
        }
    }

    pub fn is_v4(&self) -> bool {
        matches!(self, SocketFamily::Ipv4)
    }
}

/// Returns the local endpoint of `socket`, or `None` if the OS does not
/// report one.
pub fn local_endpoint<S: RawSocket>(socket: &S) -> Option<Endpoint> {
    let sock = SockRef::from(socket);
    let local = match sock.local_addr() {
        Ok(local) => local,
        Err(e) => {
            log::trace!("local address unavailable: {}", e);
            return None;
        }
    };
    let ty = sock.r#type().unwrap_or(Type::RAW);
    Some(Endpoint::from_sock_addr(&local, ty))
}

pub(crate) fn missing_address() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "missing address")
}

pub(crate) fn ipv4_of(endpoint: &Endpoint) -> io::Result<Ipv4Addr> {
    let ip = endpoint.ip().ok_or_else(missing_address)?;
    addr::to4(ip).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not an IPv4 address", endpoint),
        )
    })
}

pub(crate) fn ipv6_of(endpoint: &Endpoint) -> io::Result<Ipv6Addr> {
    match endpoint.ip().ok_or_else(missing_address)? {
        IpAddr::V6(ip) if ip.to_ipv4_mapped().is_none() => Ok(ip),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not an IPv6 address", endpoint),
        )),
    }
}

/// Converts a deadline into the socket timeout remaining until it.
///
/// A deadline already in the past maps to the shortest timeout the
/// platform honours, since a zero timeout means "block forever".
pub(crate) fn timeout_until(deadline: Option<Instant>) -> Option<Duration> {
    deadline.map(|at| {
        at.saturating_duration_since(Instant::now())
            .max(Duration::from_millis(1))
    })
}

pub(crate) fn set_deadlines(
    sock: &SockRef<'_>,
    read: Option<Option<Instant>>,
    write: Option<Option<Instant>>,
) -> io::Result<()> {
    if let Some(deadline) = read {
        sock.set_read_timeout(timeout_until(deadline))?;
    }
    if let Some(deadline) = write {
        sock.set_write_timeout(timeout_until(deadline))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::UdpSocket;

    #[test]
    fn family_from_mapped_ip() {
        let ip: IpAddr = "::ffff:10.1.2.3".parse().unwrap();
        assert_eq!(SocketFamily::from_ip(&ip), SocketFamily::Ipv4);
        let ip: IpAddr = "::1".parse().unwrap();
        assert_eq!(SocketFamily::from_ip(&ip), SocketFamily::Ipv6);
        assert_eq!(SocketFamily::from_endpoint(None), SocketFamily::Ipv6);
    }

    #[test]
    fn local_endpoint_of_udp_socket() {
        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        let local = sock.local_addr().unwrap();
        assert_eq!(local_endpoint(&sock), Some(Endpoint::Udp(local)));
    }

    #[test]
    fn group_address_checks() {
        let v4: Endpoint = Ipv4Addr::new(224, 0, 0, 251).into();
        let mapped: Endpoint = "::ffff:224.0.0.251".parse::<IpAddr>().unwrap().into();
        let v6: Endpoint = "ff02::fb".parse::<IpAddr>().unwrap().into();
        let none = Endpoint::Unknown { family: 1 };

        assert_eq!(ipv4_of(&v4).unwrap(), Ipv4Addr::new(224, 0, 0, 251));
        assert_eq!(ipv4_of(&mapped).unwrap(), Ipv4Addr::new(224, 0, 0, 251));
        assert_eq!(ipv4_of(&v6).unwrap_err().kind(), io::ErrorKind::InvalidInput);
        assert_eq!(ipv6_of(&mapped).unwrap_err().kind(), io::ErrorKind::InvalidInput);
        assert_eq!(ipv6_of(&none).unwrap_err().to_string(), "missing address");
    }

    #[test]
    fn past_deadline_is_not_infinite() {
        let past = Instant::now() - Duration::from_secs(1);
        assert_eq!(timeout_until(Some(past)), Some(Duration::from_millis(1)));
        assert_eq!(timeout_until(None), None);
        let soon = timeout_until(Some(Instant::now() + Duration::from_secs(10))).unwrap();
        assert!(soon > Duration::from_secs(9));
    }
}
