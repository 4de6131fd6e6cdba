//! Dotted-quad IPv4 addresses
//!
//! [`Ipv4Address`] keeps the four octets and derives the big-endian `u32`
//! on demand, so the two forms can never disagree.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::format::format_address;
use crate::{parse_decimal, Result, SubnetError};

/// IPv4 address (octet 0 is the most significant byte)
///
/// Serializes as a dotted-quad string.
///
/// # Examples
///
/// ```
/// use subcalc_core::Ipv4Address;
///
/// let addr = Ipv4Address::from_octets([192, 168, 1, 10]);
/// assert_eq!(addr.to_u32(), 0xC0A8010A);
/// assert_eq!(Ipv4Address::from(0xC0A8010A), addr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4Address {
    octets: [u8; 4],
}

impl Ipv4Address {
    /// Build an address from its four octets
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self { octets }
    }

    /// The four octets, most significant first
    pub fn octets(&self) -> [u8; 4] {
        self.octets
    }

    /// Integer form: `o0*2^24 + o1*2^16 + o2*2^8 + o3`
    pub fn to_u32(&self) -> u32 {
        u32::from_be_bytes(self.octets)
    }
}

impl From<u32> for Ipv4Address {
    fn from(value: u32) -> Self {
        Self::from_octets(value.to_be_bytes())
    }
}

impl From<Ipv4Address> for u32 {
    fn from(addr: Ipv4Address) -> Self {
        addr.to_u32()
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Self::from_octets(octets)
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Self::from_octets(addr.octets())
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        Ipv4Addr::from(addr.octets)
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_address(self.to_u32()))
    }
}

impl FromStr for Ipv4Address {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self> {
        parse_address(s)
    }
}

impl Serialize for Ipv4Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_address(&text).map_err(de::Error::custom)
    }
}

/// Parse a dotted-quad string.
///
/// Surrounding whitespace is ignored. Octets are base-10 integers in 0-255.
///
/// # Errors
///
/// * [`SubnetError::Format`] - not exactly four parts, or a non-numeric octet
/// * [`SubnetError::Range`] - an octet outside 0-255
///
/// # Examples
///
/// ```
/// use subcalc_core::parse_address;
///
/// let addr = parse_address("10.0.0.5").unwrap();
/// assert_eq!(addr.octets(), [10, 0, 0, 5]);
///
/// assert!(parse_address("1.2.3").unwrap_err().is_format());
/// assert!(parse_address("300.1.1.1").unwrap_err().is_range());
/// ```
pub fn parse_address(input: &str) -> Result<Ipv4Address> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() != 4 {
        return Err(SubnetError::Format(format!(
            "wrong octet count: '{trimmed}' has {} part(s), expected 4",
            parts.len()
        )));
    }

    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        *slot = parse_decimal(part, 0..=255, "octet")? as u8;
    }

    Ok(Ipv4Address::from_octets(octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let addr = parse_address("192.168.1.10").unwrap();
        assert_eq!(addr.octets(), [192, 168, 1, 10]);
        assert_eq!(addr.to_u32(), 0xC0A8010A);
    }

    #[test]
    fn test_parse_address_extremes() {
        assert_eq!(parse_address("0.0.0.0").unwrap().to_u32(), 0);
        assert_eq!(parse_address("255.255.255.255").unwrap().to_u32(), u32::MAX);
        assert_eq!(parse_address("128.0.0.0").unwrap().to_u32(), 0x8000_0000);
    }

    #[test]
    fn test_parse_address_trims() {
        let addr = parse_address("\t 8.8.4.4  ").unwrap();
        assert_eq!(addr.octets(), [8, 8, 4, 4]);
    }

    #[test]
    fn test_wrong_octet_count() {
        for input in ["1.2.3", "1.2.3.4.5", "", "1234", "1.2.3.4."] {
            let err = parse_address(input).unwrap_err();
            assert!(err.is_format(), "{input:?} should be a format error");
            assert!(err.to_string().contains("wrong octet count"));
        }
    }

    #[test]
    fn test_non_numeric_octet() {
        for input in ["a.b.c.d", "1.2.3.x", "1..2.3", "1.2.3. 4", "0x10.0.0.1"] {
            let err = parse_address(input).unwrap_err();
            assert!(err.is_format(), "{input:?} should be a format error");
            assert!(err.to_string().contains("non-numeric octet"));
        }
    }

    #[test]
    fn test_octet_out_of_range() {
        for input in ["300.1.1.1", "1.256.1.1", "1.1.1.-1", "1.1.1.99999999999999999999"] {
            let err = parse_address(input).unwrap_err();
            assert!(err.is_range(), "{input:?} should be a range error");
            assert!(err.to_string().contains("octet out of range"));
        }
    }

    #[test]
    fn test_u32_conversions() {
        let addr = Ipv4Address::from(0x0A000005);
        assert_eq!(addr.octets(), [10, 0, 0, 5]);
        assert_eq!(u32::from(addr), 0x0A000005);
    }

    #[test]
    fn test_std_conversions() {
        let std_addr = Ipv4Addr::new(172, 16, 5, 4);
        let addr = Ipv4Address::from(std_addr);
        assert_eq!(addr.to_string(), "172.16.5.4");
        assert_eq!(Ipv4Addr::from(addr), std_addr);
    }

    #[test]
    fn test_from_str() {
        let addr: Ipv4Address = "1.1.1.1".parse().unwrap();
        assert_eq!(addr, Ipv4Address::from_octets([1, 1, 1, 1]));
        assert!("1.1.1".parse::<Ipv4Address>().is_err());
    }

    #[test]
    fn test_ordering_matches_integer_order() {
        let low = Ipv4Address::from(0x0AFF_FFFF);
        let high = Ipv4Address::from(0x0B00_0000);
        assert!(low < high);
    }

    #[test]
    fn test_serde_as_string() {
        let addr = Ipv4Address::from_octets([10, 1, 2, 3]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"10.1.2.3\"");

        let back: Ipv4Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);

        assert!(serde_json::from_str::<Ipv4Address>("\"10.1.2\"").is_err());
    }
}
