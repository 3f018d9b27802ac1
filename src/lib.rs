//! Protocol-agnostic access to IPv4 and IPv6 socket options.
//!
//! [`Conn`] and [`PacketConn`] wrap a socket and pick the IPv4 or IPv6 option
//! set from its local address, so callers can set a hop limit or join a
//! multicast group without branching on the address family:
//!
//! ```no_run
//! use std::net::UdpSocket;
//!
//! let sock = UdpSocket::bind("0.0.0.0:0")?;
//! ipany::PacketConn::new(&sock).set_hop_limit(2)?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! An IPv4-mapped IPv6 address such as `::ffff:127.0.0.1` counts as IPv4.
//! A socket whose local address is unavailable or not an IP address is
//! treated as IPv6.

pub mod addr;
pub mod bpf;
pub mod config;
mod conn;
mod error;
pub mod interface;
mod packet_conn;
pub mod socket;
mod sys;

pub use addr::{extract_ip, is_v4, resolve, to4, Endpoint, IpEndpoint};
pub use config::{ConnConfig, PacketConfig};
pub use conn::Conn;
pub use error::ResolveError;
pub use interface::Interface;
pub use packet_conn::PacketConn;
pub use socket::{RawSocket, SocketFamily};
