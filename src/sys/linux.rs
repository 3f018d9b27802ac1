use crate::bpf::RawInstruction;
use socket2::SockRef;
use std::io;
use std::mem;
use std::net::Ipv4Addr;
use std::os::fd::AsRawFd;

pub(crate) use libc::c_int;

pub(crate) const MCAST_BLOCK_SOURCE: c_int = 43;
pub(crate) const MCAST_UNBLOCK_SOURCE: c_int = 44;
pub(crate) const MCAST_JOIN_SOURCE_GROUP: c_int = 46;
pub(crate) const MCAST_LEAVE_SOURCE_GROUP: c_int = 47;

macro_rules! syscall {
    ($fn: ident ( $($arg: expr),* $(,)* )) => {{
        #[allow(unused_unsafe)]
        let res = unsafe { libc::$fn($($arg, )*) };
        if res == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(res)
        }
    }};
}

pub(crate) fn setsockopt<T>(
    socket: &SockRef<'_>,
    level: c_int,
    optname: c_int,
    optval: &T,
) -> io::Result<()> {
    syscall!(setsockopt(
        socket.as_raw_fd(),
        level,
        optname,
        (optval as *const T).cast(),
        mem::size_of::<T>() as libc::socklen_t,
    ))
    .map(|_| ())
}

pub(crate) fn attach_filter(socket: &SockRef<'_>, program: &[RawInstruction]) -> io::Result<()> {
    let len = u16::try_from(program.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "filter program too long"))?;
    let mut filter: Vec<libc::sock_filter> = program
        .iter()
        .map(|ins| libc::sock_filter {
            code: ins.op,
            jt: ins.jt,
            jf: ins.jf,
            k: ins.k,
        })
        .collect();
    let prog = libc::sock_fprog {
        len,
        filter: filter.as_mut_ptr(),
    };
    setsockopt(socket, libc::SOL_SOCKET, libc::SO_ATTACH_FILTER, &prog)
}

/// Sets `IP_MULTICAST_IF` through `ip_mreqn`, selecting the interface by index.
pub(crate) fn set_multicast_if_v4(
    socket: &SockRef<'_>,
    index: u32,
    addr: Ipv4Addr,
) -> io::Result<()> {
    let ifindex = c_int::try_from(index)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "interface index out of range"))?;
    let mreqn = libc::ip_mreqn {
        imr_multiaddr: libc::in_addr { s_addr: 0 },
        imr_address: libc::in_addr {
            s_addr: u32::from(addr).to_be(),
        },
        imr_ifindex: ifindex,
    };
    setsockopt(socket, libc::IPPROTO_IP, libc::IP_MULTICAST_IF, &mreqn)
}
