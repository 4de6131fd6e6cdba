//! IPv4 subnet calculator core
//!
//! Derives subnet properties from a dotted-quad address and a CIDR prefix:
//! - [`parse_address`] - validate a dotted-quad string
//! - [`parse_prefix_length`] / [`build_mask`] - validate a prefix, derive its mask
//! - [`compute_subnet`] - network, broadcast and usable host range
//! - [`classify`] - legacy address class and private/public scope
//! - [`format_address`] / [`format_mask`] - render integers back to text
//!
//! Every stage is a pure function over 32-bit integers. [`calculate`] runs the
//! whole pipeline and stops at the first validation failure.
//!
//! # Examples
//!
//! ```
//! use subcalc_core::{calculate, AddressClass, Scope};
//!
//! let calc = calculate("192.168.1.10", "24").unwrap();
//! assert_eq!(calc.subnet.network.to_string(), "192.168.1.0");
//! assert_eq!(calc.subnet.broadcast.to_string(), "192.168.1.255");
//! assert_eq!(calc.subnet.usable_host_count, 254);
//! assert_eq!(calc.mask.dotted, "255.255.255.0");
//! assert_eq!(calc.classification.address_class, AddressClass::C);
//! assert_eq!(calc.classification.scope, Scope::Private);
//! ```

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::debug;

pub mod address;
pub mod classify;
pub mod format;
pub mod mask;
pub mod subnet;

pub use address::{parse_address, Ipv4Address};
pub use classify::{classify, is_private, AddressClass, AddressClassification, Scope};
pub use format::{format_address, format_binary, format_mask, MaskStrings};
pub use mask::{build_mask, parse_prefix_length, PrefixLength, SubnetMask, MAX_PREFIX_LEN};
pub use subnet::{compute_subnet, SubnetResult};

/// Validation errors
///
/// Both kinds are final: a calculation that hits one produces no result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubnetError {
    /// Input is not structurally valid (octet count, non-numeric text)
    #[error("Format error: {0}")]
    Format(String),

    /// Input is numeric but outside its allowed bounds
    #[error("Range error: {0}")]
    Range(String),
}

impl SubnetError {
    /// True for structural failures
    pub fn is_format(&self) -> bool {
        matches!(self, SubnetError::Format(_))
    }

    /// True for out-of-bounds failures
    pub fn is_range(&self) -> bool {
        matches!(self, SubnetError::Range(_))
    }
}

pub type Result<T> = std::result::Result<T, SubnetError>;

/// Parse a base-10 integer and check it against `bounds`.
///
/// Integers too large for `i64` are still numeric, so they report a range
/// failure rather than a format failure.
pub(crate) fn parse_decimal(text: &str, bounds: RangeInclusive<i64>, what: &str) -> Result<i64> {
    match text.parse::<i64>() {
        Ok(value) if bounds.contains(&value) => Ok(value),
        Ok(_) => Err(SubnetError::Range(format!("{what} out of range: {text}"))),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(SubnetError::Range(format!("{what} out of range: {text}")))
        }
        Err(_) => Err(SubnetError::Format(format!("non-numeric {what}: '{text}'"))),
    }
}

/// Everything derived from one address/prefix pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    /// Address as entered
    pub address: Ipv4Address,
    /// Prefix length as entered
    pub prefix_len: PrefixLength,
    /// Network, broadcast and usable host range
    #[serde(flatten)]
    pub subnet: SubnetResult,
    /// Mask in dotted-decimal and dotted-binary form
    pub mask: MaskStrings,
    /// Address class and scope
    #[serde(flatten)]
    pub classification: AddressClassification,
}

impl Calculation {
    /// Usable host range as `first – last`
    pub fn host_range(&self) -> String {
        format!("{} – {}", self.subnet.first_usable_host, self.subnet.last_usable_host)
    }
}

/// Run the full pipeline on an address and a prefix length.
///
/// # Arguments
///
/// * `ip` - dotted-quad address (e.g., "10.0.0.5")
/// * `cidr` - prefix length (e.g., "8")
///
/// # Examples
///
/// ```
/// use subcalc_core::calculate;
///
/// let calc = calculate("10.0.0.5", "8").unwrap();
/// assert_eq!(calc.subnet.usable_host_count, 16_777_214);
///
/// assert!(calculate("300.1.1.1", "8").unwrap_err().is_range());
/// assert!(calculate("10.0.0.5", "abc").unwrap_err().is_format());
/// ```
pub fn calculate(ip: &str, cidr: &str) -> Result<Calculation> {
    let outcome = evaluate(ip.trim(), cidr.trim());

    match &outcome {
        Ok(calc) => debug!(
            ip = %calc.address,
            prefix = calc.prefix_len.get(),
            network = %calc.subnet.network,
            broadcast = %calc.subnet.broadcast,
            "subnet calculated"
        ),
        Err(e) => debug!(ip, cidr, error = %e, "calculation rejected"),
    }

    outcome
}

/// Run the full pipeline on combined `address/prefix` notation.
///
/// # Examples
///
/// ```
/// use subcalc_core::calculate_cidr;
///
/// let calc = calculate_cidr("172.20.0.1/31").unwrap();
/// assert_eq!(calc.subnet.usable_host_count, 2);
/// assert!(calculate_cidr("172.20.0.1").is_err());
/// ```
pub fn calculate_cidr(notation: &str) -> Result<Calculation> {
    match notation.trim().split_once('/') {
        Some((ip, cidr)) if !cidr.contains('/') => calculate(ip, cidr),
        _ => Err(SubnetError::Format(format!(
            "expected address/prefix: '{}'",
            notation.trim()
        ))),
    }
}

fn evaluate(ip: &str, cidr: &str) -> Result<Calculation> {
    if ip.is_empty() || cidr.is_empty() {
        return Err(SubnetError::Format(
            "missing input: both address and prefix are required".to_string(),
        ));
    }

    let address = parse_address(ip)?;
    let prefix_len = parse_prefix_length(cidr)?;
    let mask = build_mask(prefix_len);

    Ok(Calculation {
        address,
        prefix_len,
        subnet: compute_subnet(address, mask, prefix_len),
        mask: format_mask(mask),
        classification: classify(address),
    })
}
