//! Legacy address class and RFC 1918 scope

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Ipv4Address;

/// Classful addressing class, decided by the first octet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressClass {
    /// 0-127
    A,
    /// 128-191
    B,
    /// 192-223
    C,
    /// 224-239 (multicast)
    D,
    /// 240-255 (reserved)
    E,
}

impl AddressClass {
    pub fn from_first_octet(octet: u8) -> Self {
        match octet {
            0..=127 => AddressClass::A,
            128..=191 => AddressClass::B,
            192..=223 => AddressClass::C,
            224..=239 => AddressClass::D,
            _ => AddressClass::E,
        }
    }

    /// Display label, e.g. "Class A"
    pub fn label(&self) -> &'static str {
        match self {
            AddressClass::A => "Class A",
            AddressClass::B => "Class B",
            AddressClass::C => "Class C",
            AddressClass::D => "Class D",
            AddressClass::E => "Class E",
        }
    }
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an address belongs to private address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Private,
    Public,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Private => f.write_str("Private"),
            Scope::Public => f.write_str("Public"),
        }
    }
}

/// Class and scope of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressClassification {
    pub address_class: AddressClass,
    pub scope: Scope,
}

/// Check for the RFC 1918 ranges: 10/8, 172.16/12 and 192.168/16
pub fn is_private(addr: Ipv4Address) -> bool {
    matches!(
        addr.octets(),
        [10, _, _, _] | [172, 16..=31, _, _] | [192, 168, _, _]
    )
}

/// Classify an address.
///
/// # Examples
///
/// ```
/// use subcalc_core::{classify, parse_address, AddressClass, Scope};
///
/// let c = classify(parse_address("8.8.8.8").unwrap());
/// assert_eq!(c.address_class, AddressClass::A);
/// assert_eq!(c.scope, Scope::Public);
/// ```
pub fn classify(addr: Ipv4Address) -> AddressClassification {
    let scope = if is_private(addr) {
        Scope::Private
    } else {
        Scope::Public
    };

    AddressClassification {
        address_class: AddressClass::from_first_octet(addr.octets()[0]),
        scope,
    }
}
