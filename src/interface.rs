use std::net::{Ipv4Addr, Ipv6Addr};

/// Network interface as seen by the multicast options.
///
/// IPv4 multicast options identify an interface by one of its addresses,
/// IPv6 ones by its index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    /// Interface index
    pub index: u32,
    /// Interface name, e.g. `eth0`
    pub name: String,
    /// IPv4 addresses assigned to the interface
    pub ipv4: Vec<Ipv4Addr>,
    /// IPv6 addresses assigned to the interface
    pub ipv6: Vec<Ipv6Addr>,
}

impl Interface {
    /// Lists the interfaces on this host.
    pub fn list() -> Vec<Interface> {
        default_net::get_interfaces()
            .into_iter()
            .map(Interface::from)
            .collect()
    }

    pub fn by_index(index: u32) -> Option<Interface> {
        Self::list().into_iter().find(|ifi| ifi.index == index)
    }

    pub fn by_name(name: &str) -> Option<Interface> {
        Self::list().into_iter().find(|ifi| ifi.name == name)
    }

    /// Finds the interface owning `addr`.
    pub fn by_ipv4(addr: Ipv4Addr) -> Option<Interface> {
        Self::list()
            .into_iter()
            .find(|ifi| ifi.ipv4.contains(&addr))
    }

    /// Address used to name this interface in IPv4 socket options.
    ///
    /// Interfaces without an IPv4 address map to `0.0.0.0`, leaving the
    /// choice to the kernel.
    pub fn ipv4_addr(&self) -> Ipv4Addr {
        self.ipv4.first().copied().unwrap_or(Ipv4Addr::UNSPECIFIED)
    }
}

impl From<default_net::Interface> for Interface {
    fn from(ifi: default_net::Interface) -> Self {
        Interface {
            index: ifi.index,
            name: ifi.name,
            ipv4: ifi.ipv4.iter().map(|net| net.addr).collect(),
            ipv6: ifi.ipv6.iter().map(|net| net.addr).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_lookups_are_none() {
        assert_eq!(Interface::by_name("no-such-interface0"), None);
        assert_eq!(Interface::by_index(u32::MAX), None);
    }

    #[test]
    fn ipv4_addr_defaults_to_unspecified() {
        let ifi = Interface {
            index: 7,
            name: String::from("test0"),
            ipv4: vec![],
            ipv6: vec![Ipv6Addr::LOCALHOST],
        };
        assert_eq!(ifi.ipv4_addr(), Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn listed_interfaces_round_trip_by_index() {
        for ifi in Interface::list() {
            assert_eq!(Interface::by_index(ifi.index).map(|i| i.index), Some(ifi.index));
        }
    }
}
