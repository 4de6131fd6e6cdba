//! Dotted-decimal and dotted-binary rendering

use serde::{Deserialize, Serialize};

use crate::mask::SubnetMask;

/// Mask rendered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskStrings {
    /// e.g. "255.255.255.0"
    pub dotted: String,
    /// e.g. "11111111.11111111.11111111.00000000"
    pub binary: String,
}

/// Render a 32-bit value as a dotted quad.
///
/// ```
/// use subcalc_core::format_address;
///
/// assert_eq!(format_address(0xC0A80101), "192.168.1.1");
/// ```
pub fn format_address(value: u32) -> String {
    let [a, b, c, d] = value.to_be_bytes();
    format!("{a}.{b}.{c}.{d}")
}

/// Render a 32-bit value as four dot-separated groups of eight binary digits
pub fn format_binary(value: u32) -> String {
    value
        .to_be_bytes()
        .iter()
        .map(|octet| format!("{octet:08b}"))
        .collect::<Vec<_>>()
        .join(".")
}

pub fn format_mask(mask: SubnetMask) -> MaskStrings {
    MaskStrings {
        dotted: format_address(mask.bits()),
        binary: format_binary(mask.bits()),
    }
}
