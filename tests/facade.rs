use ipany::{extract_ip, is_v4, resolve, Conn, Endpoint, PacketConn, SocketFamily};
use rand::Rng;
use std::net::{IpAddr, Ipv4Addr, TcpListener, UdpSocket};

#[test]
fn classification_table() {
    let cases: &[(&str, &str, bool)] = &[
        ("0.0.0.0", "ip", true),
        ("0.0.0.0", "ip4", true),
        ("0.0.0.0/0", "ip+net", true),
        ("0.0.0.0:0", "udp", true),
        ("0.0.0.0:0", "udp4", true),
        ("0.0.0.0:0", "tcp", true),
        ("0.0.0.0:0", "tcp4", true),
        ("127.0.0.1", "ip", true),
        ("127.0.0.1", "ip4", true),
        ("127.0.0.1/8", "ip+net", true),
        ("127.0.0.1:0", "udp", true),
        ("127.0.0.1:0", "udp4", true),
        ("127.0.0.1:0", "tcp", true),
        ("127.0.0.1:0", "tcp4", true),
        ("::ffff:127.0.0.1", "ip", true),
        ("::ffff:127.0.0.1", "ip4", true),
        // a /8 would truncate to ::/8, which is IPv6
        ("::ffff:127.0.0.1/102", "ip+net", true),
        ("[::ffff:127.0.0.1]:123", "udp", true),
        ("[::ffff:127.0.0.1]:123", "udp4", true),
        ("[::ffff:127.0.0.1]:123", "tcp", true),
        ("[::ffff:127.0.0.1]:123", "tcp4", true),
        ("::", "ip", false),
        ("::", "ip6", false),
        ("::%en0", "ip6", false),
        ("::/64", "ip+net", false),
        ("[::]:0", "udp", false),
        ("[::]:0", "udp6", false),
        ("[::]:0", "tcp", false),
        ("[::]:0", "tcp6", false),
        ("::1", "ip", false),
        ("::1", "ip6", false),
        ("::1%en0", "ip6", false),
        ("::1/8", "ip+net", false),
        ("[::1]:0", "udp", false),
        ("[::1]:0", "udp6", false),
        ("[::1]:0", "tcp", false),
        ("[::1]:0", "tcp6", false),
    ];

    for (addr, network, expected) in cases {
        let endpoint = match resolve(network, addr) {
            Ok(endpoint) => endpoint,
            Err(e) => panic!("case {:?} {:?}: unexpected error {}", network, addr, e),
        };
        assert_eq!(
            is_v4(Some(&endpoint)),
            *expected,
            "case {:?} {:?} (ip={:?})",
            network,
            addr,
            extract_ip(&endpoint)
        );
    }
}

#[test]
fn same_address_in_every_shape_is_v4() {
    for network in ["udp", "tcp"] {
        assert!(is_v4(Some(&resolve(network, "0.0.0.0:0").unwrap())));
    }
    assert!(is_v4(Some(&resolve("ip", "0.0.0.0").unwrap())));
}

#[test]
fn unrecognized_shape_is_not_v4() {
    let endpoint = Endpoint::Unknown { family: 1 };
    assert_eq!(extract_ip(&endpoint), None);
    assert!(!is_v4(Some(&endpoint)));
    assert!(!is_v4(None));
}

#[test]
fn mapped_addresses_are_v4_regardless_of_decoration() {
    let mut rng = rand::thread_rng();
    for _ in 0..256 {
        let v4 = Ipv4Addr::from(rng.gen::<u32>());
        let mapped = IpAddr::V6(v4.to_ipv6_mapped());
        let port: u16 = rng.gen();
        let prefix: u8 = rng.gen_range(96..=128);

        let shapes = [
            Endpoint::from(mapped),
            Endpoint::Tcp((mapped, port).into()),
            Endpoint::Udp((mapped, port).into()),
            Endpoint::IpNet(ipnet::IpNet::new(mapped, prefix).unwrap().trunc()),
        ];
        for shape in &shapes {
            assert!(shape.is_v4(), "{}", shape);
        }
    }
}

#[test]
fn ipv4_socket_gets_ipv4_backing() {
    let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
    let conn = PacketConn::new(&sock);
    assert!(conn.as_v4().is_some());
    assert!(conn.as_v6().is_none());

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let conn = Conn::new(&listener);
    assert!(conn.as_v4().is_some());
    assert!(conn.as_v6().is_none());
}

#[test]
fn ipv6_socket_gets_ipv6_backing() {
    // hosts without IPv6 loopback cannot run this
    let sock = match UdpSocket::bind("[::1]:0") {
        Ok(sock) => sock,
        Err(_) => return,
    };
    let conn = PacketConn::new(&sock);
    assert_eq!(conn.family(), SocketFamily::Ipv6);
    assert!(conn.as_v4().is_none());
    let v6 = conn.as_v6().unwrap();

    conn.set_hop_limit(5).unwrap();
    assert_eq!(v6.hop_limit().unwrap(), 5);
    conn.set_multicast_hop_limit(2).unwrap();
    assert_eq!(v6.multicast_hop_limit().unwrap(), 2);
    conn.set_multicast_loopback(false).unwrap();
    assert!(!sock.multicast_loop_v6().unwrap());
    assert_eq!(conn.multicast_interface().unwrap(), None);

    let listener = TcpListener::bind("[::1]:0").unwrap();
    let conn = Conn::new(listener);
    assert!(conn.as_v6().is_some());
    conn.set_hop_limit(44).unwrap();
    assert_eq!(conn.hop_limit().unwrap(), 44);
}

#[test]
fn mapped_local_address_gets_ipv4_backing() {
    let sock = match UdpSocket::bind("[::ffff:127.0.0.1]:0") {
        Ok(sock) => sock,
        Err(_) => return,
    };
    let conn = PacketConn::new(&sock);
    assert_eq!(conn.family(), SocketFamily::Ipv4);
}

#[cfg(unix)]
#[test]
fn non_ip_socket_falls_back_to_ipv6() {
    let sock = std::os::unix::net::UnixDatagram::unbound().unwrap();
    let conn = PacketConn::new(&sock);
    assert_eq!(conn.family(), SocketFamily::Ipv6);
    assert!(conn.as_v4().is_none());
    assert!(conn.as_v6().is_some());

    // forwarded calls fail the way the IPv6 option set fails on this socket
    assert!(conn.set_hop_limit(3).is_err());

    let (a, _b) = std::os::unix::net::UnixStream::pair().unwrap();
    let conn = Conn::new(&a);
    assert!(conn.as_v6().is_some());
}

#[test]
fn deadlines_become_timeouts() {
    use std::time::{Duration, Instant};

    let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
    let conn = PacketConn::new(&sock);
    conn.set_deadline(Some(Instant::now() + Duration::from_secs(30)))
        .unwrap();
    assert!(sock.read_timeout().unwrap().is_some());
    assert!(sock.write_timeout().unwrap().is_some());

    conn.set_write_deadline(None).unwrap();
    assert!(sock.read_timeout().unwrap().is_some());
    assert_eq!(sock.write_timeout().unwrap(), None);

    conn.set_read_deadline(Some(Instant::now())).unwrap();
    let mut buf = [0u8; 16];
    let err = sock.recv_from(&mut buf).unwrap_err();
    assert!(matches!(
        err.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    ));
}

#[cfg(any(target_os = "linux", target_os = "android"))]
#[test]
fn bpf_filter_attaches() {
    let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
    let conn = PacketConn::new(&sock);
    // drop everything
    conn.set_bpf(&[ipany::bpf::ret(0)]).unwrap();
    assert!(conn.set_bpf(&[]).is_err());
}
