use ipany::{resolve, Endpoint, PacketConn};
use std::net::UdpSocket;

fn main() {
    // IPv4 socket
    let bind = "0.0.0.0:0";
    // IPv6 socket
    //let bind = "[::]:0";
    let sock = UdpSocket::bind(bind).unwrap();
    let conn = PacketConn::new(&sock);
    println!("Family: {:?}", conn.family());

    conn.set_hop_limit(2).unwrap();
    println!("Hop limit: {}", conn.hop_limit().unwrap());

    // mDNS group of the socket's family
    let group: Endpoint = if conn.as_v4().is_some() {
        resolve("ip4", "224.0.0.251").unwrap()
    } else {
        resolve("ip6", "ff02::fb").unwrap()
    };
    match conn.join_group(None, &group) {
        Ok(_) => println!("Joined {}", group),
        Err(e) => println!("Join {} failed: {}", group, e),
    }
    println!("Multicast loopback: {:?}", conn.multicast_loopback());
}
