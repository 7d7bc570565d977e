//! Preamble address codes: cursor placement and pen presets.

use model::styles::{named, Color, FontStyle, TextDecoration};

use super::{color_from_style_bits, SccChannel};

/// `(byte_1 & 0x07, byte_2 & 0x60)` to caption row, 1-based.
const ROW_MAPPING: &[((u8, u8), u8)] = &[
    ((0x01, 0x40), 1),
    ((0x01, 0x60), 2),
    ((0x02, 0x40), 3),
    ((0x02, 0x60), 4),
    ((0x05, 0x40), 5),
    ((0x05, 0x60), 6),
    ((0x06, 0x40), 7),
    ((0x06, 0x60), 8),
    ((0x07, 0x40), 9),
    ((0x07, 0x60), 10),
    ((0x00, 0x40), 11),
    ((0x03, 0x40), 12),
    ((0x03, 0x60), 13),
    ((0x04, 0x40), 14),
    ((0x04, 0x60), 15),
];

/// A decoded preamble address code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SccPreambleAddressCode {
    row: u8,
    indent: Option<u8>,
    color: Option<Color>,
    italic: bool,
    underline: bool,
    channel: SccChannel,
}

impl SccPreambleAddressCode {
    /// Decodes a PAC from a parity-stripped byte pair, or `None` if the
    /// pair is not a PAC.
    pub fn find(byte_1: u8, byte_2: u8) -> Option<SccPreambleAddressCode> {
        if !(0x10..0x20).contains(&byte_1) || !(0x40..0x80).contains(&byte_2) {
            return None;
        }

        let row_bits = ((byte_1 & 0x0F) % 0x08, byte_2 & 0x60);
        let row = ROW_MAPPING.iter().find(|(bits, _)| *bits == row_bits).map(|(_, row)| *row)?;

        let desc = u16::from(byte_2 & 0x1F);
        let underline = desc % 2 == 1;
        let italic = desc == 0x0E || desc == 0x0F;

        let (color, indent) = if desc < 0x10 {
            let color = if italic { Some(named::WHITE) } else { color_from_style_bits(desc) };
            (color, None)
        } else {
            let indent = ((desc - 0x10) - (desc % 2)) * 2;
            (None, Some(indent as u8))
        };

        let channel = if byte_1 & 0x08 != 0 { SccChannel::Two } else { SccChannel::One };

        Some(SccPreambleAddressCode { row, indent, color, italic, underline, channel })
    }

    /// Builds a PAC for encoding. `indent` must be a multiple of 4.
    pub fn new(
        channel: SccChannel,
        row: u8,
        color: Color,
        indent: Option<u8>,
        italic: bool,
        underline: bool,
    ) -> SccPreambleAddressCode {
        SccPreambleAddressCode {
            row,
            indent,
            color: Some(color),
            italic,
            underline,
            channel,
        }
    }

    /// The 1-based caption row.
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column offset; always a multiple of 4.
    pub fn indent(self) -> Option<u8> {
        self.indent
    }

    pub fn color(self) -> Option<Color> {
        self.color
    }

    pub fn font_style(self) -> Option<FontStyle> {
        self.italic.then_some(FontStyle::Italic)
    }

    pub fn text_decoration(self) -> Option<TextDecoration> {
        self.underline.then(TextDecoration::underlined)
    }

    pub fn channel(self) -> SccChannel {
        self.channel
    }

    /// Encodes the PAC as a parity-less wire value.
    pub fn packet(self) -> u16 {
        let (row_high, row_low) = ROW_MAPPING
            .iter()
            .find(|(_, row)| *row == self.row)
            .map(|((high, low), _)| (*high, *low))
            .unwrap_or((0x04, 0x60));

        let desc: u8 = match self.indent {
            Some(indent) => 0x10 + (indent / 2) + u8::from(self.underline),
            None if self.italic => 0x0E + u8::from(self.underline),
            None => {
                let color_bits: u8 = match self.color {
                    Some(named::GREEN) => 0x02,
                    Some(named::BLUE) => 0x04,
                    Some(named::CYAN) => 0x06,
                    Some(named::RED) => 0x08,
                    Some(named::YELLOW) => 0x0A,
                    Some(named::MAGENTA) => 0x0C,
                    _ => 0x00,
                };
                color_bits + u8::from(self.underline)
            }
        };

        let byte_1 =
            0x10 | (u8::from(self.channel == SccChannel::Two) << 3) | row_high;
        let byte_2 = 0x40 | row_low | desc;

        (u16::from(byte_1) << 8) | u16::from(byte_2)
    }
}
