//! Subnet bounds and usable host range

use serde::{Deserialize, Serialize};

use crate::address::Ipv4Address;
use crate::mask::{PrefixLength, SubnetMask};

/// Derived subnet properties
///
/// When `usable_host_count > 0`:
/// `network <= first_usable_host <= last_usable_host <= broadcast`.
/// With no usable hosts the range collapses to `network..=broadcast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetResult {
    /// Lowest address (host bits clear)
    pub network: Ipv4Address,
    /// Highest address (host bits set)
    pub broadcast: Ipv4Address,
    /// Addresses that can be assigned to hosts
    pub usable_host_count: u64,
    pub first_usable_host: Ipv4Address,
    pub last_usable_host: Ipv4Address,
}

impl SubnetResult {
    /// Check if an address falls between network and broadcast
    pub fn contains(&self, addr: Ipv4Address) -> bool {
        self.network <= addr && addr <= self.broadcast
    }
}

/// Compute network, broadcast and the usable host range.
///
/// /31 is a point-to-point link with both ends usable, /32 is a single host.
/// Every other prefix reserves the network and broadcast addresses.
///
/// # Examples
///
/// ```
/// use subcalc_core::{build_mask, compute_subnet, parse_address, PrefixLength};
///
/// let addr = parse_address("192.168.1.10").unwrap();
/// let prefix = PrefixLength::new(24).unwrap();
/// let subnet = compute_subnet(addr, build_mask(prefix), prefix);
///
/// assert_eq!(subnet.network.to_string(), "192.168.1.0");
/// assert_eq!(subnet.first_usable_host.to_string(), "192.168.1.1");
/// assert_eq!(subnet.last_usable_host.to_string(), "192.168.1.254");
/// ```
pub fn compute_subnet(
    address: Ipv4Address,
    mask: SubnetMask,
    prefix: PrefixLength,
) -> SubnetResult {
    let network = address.to_u32() & mask.bits();
    let broadcast = network | mask.host_bits();

    let (usable_host_count, first, last) = match prefix.get() {
        32 => (1, network, network),
        31 => (2, network, broadcast),
        _ => {
            let usable = (1u64 << prefix.host_bits()).saturating_sub(2);
            if usable > 0 {
                (usable, network.wrapping_add(1), broadcast.wrapping_sub(1))
            } else {
                // Unreachable for /0../30, kept in case the host policy changes.
                (0, network, broadcast)
            }
        }
    };

    SubnetResult {
        network: network.into(),
        broadcast: broadcast.into(),
        usable_host_count,
        first_usable_host: first.into(),
        last_usable_host: last.into(),
    }
}
