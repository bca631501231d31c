use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Host identity plus every network interface with its addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub hostname: String,
    pub ip_address: Option<IpAddr>,
    pub interfaces: Vec<NetworkInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub mac_address: Option<String>,
    pub addresses: Vec<InterfaceAddress>,
}

/// One address bound to an interface, with its prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub address: IpAddr,
    pub prefix: u8,
}

impl InterfaceAddress {
    /// Netmask expanded from the prefix length.
    #[must_use]
    pub fn netmask(&self) -> IpAddr {
        match self.address {
            IpAddr::V4(_) => {
                let bits = u32::MAX.checked_shl(32 - u32::from(self.prefix.min(32))).unwrap_or(0);
                IpAddr::from(bits.to_be_bytes())
            }
            IpAddr::V6(_) => {
                let bits = u128::MAX
                    .checked_shl(128 - u32::from(self.prefix.min(128)))
                    .unwrap_or(0);
                IpAddr::from(bits.to_be_bytes())
            }
        }
    }

    /// IPv4 broadcast address; `None` for IPv6.
    #[must_use]
    pub fn broadcast(&self) -> Option<IpAddr> {
        match (self.address, self.netmask()) {
            (IpAddr::V4(addr), IpAddr::V4(mask)) => {
                let host_bits = !u32::from(mask);
                Some(IpAddr::from((u32::from(addr) | host_bits).to_be_bytes()))
            }
            _ => None,
        }
    }
}
