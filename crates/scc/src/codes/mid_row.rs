//! Mid-row codes: in-line pen style changes.

use model::styles::{Color, FontStyle, TextDecoration};

use super::{color_from_style_bits, SccChannel};

/// A decoded mid-row code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SccMidRowCode {
    style_bits: u16,
    channel: SccChannel,
}

impl SccMidRowCode {
    pub fn find(value: u16) -> Option<SccMidRowCode> {
        let channel = match value & 0xFF00 {
            0x1100 => SccChannel::One,
            0x1900 => SccChannel::Two,
            _ => return None,
        };
        let low = value & 0x00FF;
        if !(0x20..=0x2F).contains(&low) {
            return None;
        }
        Some(SccMidRowCode { style_bits: low & 0x0F, channel })
    }

    pub fn channel(self) -> SccChannel {
        self.channel
    }

    pub fn color(self) -> Option<Color> {
        color_from_style_bits(self.style_bits)
    }

    pub fn font_style(self) -> Option<FontStyle> {
        if self.style_bits >= 0x0E {
            Some(FontStyle::Italic)
        } else {
            None
        }
    }

    pub fn text_decoration(self) -> Option<TextDecoration> {
        if self.style_bits % 2 == 1 {
            Some(TextDecoration::underlined())
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self.style_bits {
            0x00 | 0x01 => "WHITE",
            0x02 | 0x03 => "GREEN",
            0x04 | 0x05 => "BLUE",
            0x06 | 0x07 => "CYAN",
            0x08 | 0x09 => "RED",
            0x0A | 0x0B => "YELLOW",
            0x0C | 0x0D => "MAGENTA",
            _ => "ITALICS",
        }
    }
}
