//! Prefix lengths and the masks derived from them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{parse_decimal, Result, SubnetError};

/// Longest IPv4 prefix (host route)
pub const MAX_PREFIX_LEN: u8 = 32;

/// CIDR prefix length in 0-32
///
/// 0 matches every address, 32 matches a single host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PrefixLength(u8);

impl PrefixLength {
    /// Create a prefix length, rejecting anything above 32
    pub fn new(len: u8) -> Result<Self> {
        if len > MAX_PREFIX_LEN {
            return Err(SubnetError::Range(format!("prefix out of range: {len}")));
        }
        Ok(Self(len))
    }

    /// Number of network bits
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of host bits (`32 - len`)
    pub fn host_bits(self) -> u8 {
        MAX_PREFIX_LEN - self.0
    }
}

impl TryFrom<u8> for PrefixLength {
    type Error = SubnetError;

    fn try_from(len: u8) -> Result<Self> {
        Self::new(len)
    }
}

impl From<PrefixLength> for u8 {
    fn from(prefix: PrefixLength) -> Self {
        prefix.0
    }
}

impl fmt::Display for PrefixLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PrefixLength {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self> {
        parse_prefix_length(s)
    }
}

/// Parse a prefix length from text.
///
/// # Errors
///
/// * [`SubnetError::Format`] - not a base-10 integer
/// * [`SubnetError::Range`] - outside 0-32
///
/// # Examples
///
/// ```
/// use subcalc_core::parse_prefix_length;
///
/// assert_eq!(parse_prefix_length("24").unwrap().get(), 24);
/// assert!(parse_prefix_length("abc").unwrap_err().is_format());
/// assert!(parse_prefix_length("33").unwrap_err().is_range());
/// ```
pub fn parse_prefix_length(input: &str) -> Result<PrefixLength> {
    let len = parse_decimal(input.trim(), 0..=MAX_PREFIX_LEN as i64, "prefix")?;
    PrefixLength::new(len as u8)
}

/// Contiguous network mask: the top `prefix` bits set, the rest clear
///
/// Only obtainable through [`build_mask`], so arbitrary bit patterns never
/// show up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubnetMask {
    bits: u32,
    prefix: PrefixLength,
}

impl SubnetMask {
    /// Mask as a 32-bit integer
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Prefix this mask was built from
    pub fn prefix(&self) -> PrefixLength {
        self.prefix
    }

    /// Bitwise complement within 32 bits (the host part)
    pub fn host_bits(&self) -> u32 {
        !self.bits
    }
}

/// Derive the mask for a prefix length.
///
/// # Examples
///
/// ```
/// use subcalc_core::{build_mask, PrefixLength};
///
/// let mask = build_mask(PrefixLength::new(24).unwrap());
/// assert_eq!(mask.bits(), 0xFFFF_FF00);
///
/// let mask = build_mask(PrefixLength::new(0).unwrap());
/// assert_eq!(mask.bits(), 0);
/// ```
pub fn build_mask(prefix: PrefixLength) -> SubnetMask {
    // A u32 shifted left by 32 overflows, so /0 is spelled out.
    let bits = if prefix.get() == 0 {
        0
    } else {
        u32::MAX << prefix.host_bits()
    };

    SubnetMask { bits, prefix }
}
