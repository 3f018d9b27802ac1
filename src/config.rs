use crate::conn::Conn;
use crate::interface::Interface;
use crate::packet_conn::PacketConn;
use crate::socket::RawSocket;
use std::io;
use std::time::{Duration, Instant};

/// Options applied to a [`Conn`] in one call.
#[derive(Debug, Clone, Default)]
pub struct ConnConfig {
    pub hop_limit: Option<u32>,
}

impl ConnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<S: RawSocket>(&self, conn: &Conn<S>) -> io::Result<()> {
        if let Some(hop_limit) = self.hop_limit {
            conn.set_hop_limit(hop_limit)?;
        }
        Ok(())
    }
}

/// Options applied to a [`PacketConn`] in one call, in field order.
///
/// The first failing option aborts the rest.
#[derive(Debug, Clone, Default)]
pub struct PacketConfig {
    pub hop_limit: Option<u32>,
    pub multicast_hop_limit: Option<u32>,
    pub multicast_interface: Option<Interface>,
    pub multicast_loopback: Option<bool>,
    /// Read timeout, turned into a deadline when applied.
    pub read_timeout: Option<Duration>,
    /// Write timeout, turned into a deadline when applied.
    pub write_timeout: Option<Duration>,
}

impl PacketConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<S: RawSocket>(&self, conn: &PacketConn<S>) -> io::Result<()> {
        if let Some(hop_limit) = self.hop_limit {
            conn.set_hop_limit(hop_limit)?;
        }
        if let Some(hop_limit) = self.multicast_hop_limit {
            conn.set_multicast_hop_limit(hop_limit)?;
        }
        if let Some(ifi) = &self.multicast_interface {
            conn.set_multicast_interface(Some(ifi))?;
        }
        if let Some(on) = self.multicast_loopback {
            conn.set_multicast_loopback(on)?;
        }
        let now = Instant::now();
        if let Some(timeout) = self.read_timeout {
            conn.set_read_deadline(Some(now + timeout))?;
        }
        if let Some(timeout) = self.write_timeout {
            conn.set_write_deadline(Some(now + timeout))?;
        }
        Ok(())
    }
}
