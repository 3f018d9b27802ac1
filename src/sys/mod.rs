//! Socket options socket2 does not expose: protocol-independent
//! source-specific multicast, index-based IPv4 multicast interface
//! selection and classic BPF filters.

use crate::bpf::RawInstruction;
use crate::socket::SocketFamily;
use socket2::{SockAddr, SockRef};
use std::io;
use std::net::Ipv4Addr;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux;
#[cfg(any(target_os = "linux", target_os = "android"))]
use self::linux as imp;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
use self::windows as imp;

/// Source-specific membership change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SourceOp {
    Join,
    Leave,
    /// Stop receiving from a source in an any-source group.
    Block,
    /// Undo a previous `Block`.
    Unblock,
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "windows"))]
mod req {
    use socket2::SockAddr;
    use std::ptr;

    const IPPROTO_IP: i32 = 0;
    const IPPROTO_IPV6: i32 = 41;

    #[repr(C, align(8))]
    pub(super) struct Storage(pub(super) [u8; 128]);

    impl Storage {
        pub(super) fn new(addr: &SockAddr) -> Self {
            let mut storage = Storage([0; 128]);
            let len = (addr.len() as usize).min(storage.0.len());
            // SAFETY: `len` is bounded by both the source address and the buffer.
            unsafe {
                ptr::copy_nonoverlapping(addr.as_ptr().cast::<u8>(), storage.0.as_mut_ptr(), len);
            }
            storage
        }
    }

    /// `struct group_source_req`
    #[repr(C)]
    pub(super) struct GroupSourceReq {
        pub(super) interface: u32,
        pub(super) group: Storage,
        pub(super) source: Storage,
    }

    pub(super) fn level(family: crate::socket::SocketFamily) -> i32 {
        if family.is_v4() {
            IPPROTO_IP
        } else {
            IPPROTO_IPV6
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "windows"))]
pub(crate) fn source_group(
    socket: &SockRef<'_>,
    family: SocketFamily,
    op: SourceOp,
    interface: u32,
    group: &SockAddr,
    source: &SockAddr,
) -> io::Result<()> {
    let optname = match op {
        SourceOp::Join => imp::MCAST_JOIN_SOURCE_GROUP,
        SourceOp::Leave => imp::MCAST_LEAVE_SOURCE_GROUP,
        SourceOp::Block => imp::MCAST_BLOCK_SOURCE,
        SourceOp::Unblock => imp::MCAST_UNBLOCK_SOURCE,
    };
    let gsr = req::GroupSourceReq {
        interface,
        group: req::Storage::new(group),
        source: req::Storage::new(source),
    };
    imp::setsockopt(socket, req::level(family), optname, &gsr)
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "windows")))]
pub(crate) fn source_group(
    _socket: &SockRef<'_>,
    _family: SocketFamily,
    _op: SourceOp,
    _interface: u32,
    _group: &SockAddr,
    _source: &SockAddr,
) -> io::Result<()> {
    Err(unsupported("source-specific multicast"))
}

/// Selects the IPv4 outgoing multicast interface, by `index` where the
/// platform allows it and by `addr` elsewhere.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "windows"))]
pub(crate) fn set_multicast_if_v4(
    socket: &SockRef<'_>,
    index: u32,
    addr: Ipv4Addr,
) -> io::Result<()> {
    imp::set_multicast_if_v4(socket, index, addr)
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "windows")))]
pub(crate) fn set_multicast_if_v4(
    socket: &SockRef<'_>,
    _index: u32,
    addr: Ipv4Addr,
) -> io::Result<()> {
    socket.set_multicast_if_v4(&addr)
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn attach_filter(socket: &SockRef<'_>, program: &[RawInstruction]) -> io::Result<()> {
    imp::attach_filter(socket, program)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) fn attach_filter(_socket: &SockRef<'_>, _program: &[RawInstruction]) -> io::Result<()> {
    Err(unsupported("BPF filters"))
}

#[allow(dead_code)]
fn unsupported(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{} not supported on this platform", what),
    )
}
