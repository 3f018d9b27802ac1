use socket2::SockRef;
use std::io;
use std::mem;
use std::net::Ipv4Addr;
use std::os::windows::io::AsRawSocket;

use windows_sys::Win32::Networking::WinSock::{self as sock, SOCKET};

#[allow(non_camel_case_types)]
pub(crate) type c_int = i32;

const IPPROTO_IP: c_int = 0;
const IP_MULTICAST_IF: c_int = 9;

pub(crate) const MCAST_BLOCK_SOURCE: c_int = 43;
pub(crate) const MCAST_UNBLOCK_SOURCE: c_int = 44;
pub(crate) const MCAST_JOIN_SOURCE_GROUP: c_int = 45;
pub(crate) const MCAST_LEAVE_SOURCE_GROUP: c_int = 46;

macro_rules! syscall {
    ($fn: ident ( $($arg: expr),* $(,)* ), $err_test: path, $err_value: expr) => {{
        #[allow(unused_unsafe)]
        let res = unsafe { windows_sys::Win32::Networking::WinSock::$fn($($arg, )*) };
        if $err_test(&res, &$err_value) {
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
    syscall!(
        setsockopt(
            socket.as_raw_socket() as SOCKET,
            level,
            optname,
            (optval as *const T).cast(),
            mem::size_of::<T>() as c_int,
        ),
        PartialEq::eq,
        sock::SOCKET_ERROR
    )
    .map(|_| ())
}

/// Sets `IP_MULTICAST_IF` to an interface index, passed as `0.0.0.x` in
/// network byte order.
pub(crate) fn set_multicast_if_v4(
    socket: &SockRef<'_>,
    index: u32,
    _addr: Ipv4Addr,
) -> io::Result<()> {
    if index >= 1 << 24 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "interface index out of range",
        ));
    }
    setsockopt(socket, IPPROTO_IP, IP_MULTICAST_IF, &index.to_be())
}
