//! CEA-608 code tables.
//!
//! Every code is transmitted as a pair of 7-bit values and exists in two
//! variants, one per caption channel.

pub mod attribute;
pub mod control;
pub mod mid_row;
pub mod pac;
pub mod special;
pub mod standard;

use model::styles::{named, Color};

/// The two CEA-608 caption channels of field 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SccChannel {
    One,
    Two,
}

impl std::fmt::Display for SccChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SccChannel::One => write!(f, "CC1"),
            SccChannel::Two => write!(f, "CC2"),
        }
    }
}

/// Maps the shared color selection bits of PACs and mid-row codes.
pub(crate) fn color_from_style_bits(bits: u16) -> Option<Color> {
    match bits {
        0x00 | 0x01 => Some(named::WHITE),
        0x02 | 0x03 => Some(named::GREEN),
        0x04 | 0x05 => Some(named::BLUE),
        0x06 | 0x07 => Some(named::CYAN),
        0x08 | 0x09 => Some(named::RED),
        0x0A | 0x0B => Some(named::YELLOW),
        0x0C | 0x0D => Some(named::MAGENTA),
        _ => None,
    }
}
