//! Background and foreground attribute codes.

use model::styles::{named, Color, TextDecoration};

use super::SccChannel;

/// A decoded background/foreground attribute code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SccAttributeCode {
    color: Color,
    background: bool,
    underline: bool,
    channel: SccChannel,
}

const SEMI: u8 = 0x88;

const CODES: &[(u16, Color, bool, bool)] = &[
    // (channel-1 value, color, is_background, underline)
    (0x1020, Color::rgba(0xFF, 0xFF, 0xFF, 0xFF), true, false), // BWO
    (0x1021, Color::rgba(0xFF, 0xFF, 0xFF, SEMI), true, false), // BWS
    (0x1022, Color::rgba(0x00, 0xFF, 0x00, 0xFF), true, false), // BGO
    (0x1023, Color::rgba(0x00, 0xFF, 0x00, SEMI), true, false), // BGS
    (0x1024, Color::rgba(0x00, 0x00, 0xFF, 0xFF), true, false), // BBO
    (0x1025, Color::rgba(0x00, 0x00, 0xFF, SEMI), true, false), // BBS
    (0x1026, Color::rgba(0x00, 0xFF, 0xFF, 0xFF), true, false), // BCO
    (0x1027, Color::rgba(0x00, 0xFF, 0xFF, SEMI), true, false), // BCS
    (0x1028, Color::rgba(0xFF, 0x00, 0x00, 0xFF), true, false), // BRO
    (0x1029, Color::rgba(0xFF, 0x00, 0x00, SEMI), true, false), // BRS
    (0x102A, Color::rgba(0xFF, 0xFF, 0x00, 0xFF), true, false), // BYO
    (0x102B, Color::rgba(0xFF, 0xFF, 0x00, SEMI), true, false), // BYS
    (0x102C, Color::rgba(0xFF, 0x00, 0xFF, 0xFF), true, false), // BMO
    (0x102D, Color::rgba(0xFF, 0x00, 0xFF, SEMI), true, false), // BMS
    (0x102E, Color::rgba(0x00, 0x00, 0x00, 0xFF), true, false), // BAO
    (0x102F, Color::rgba(0x00, 0x00, 0x00, SEMI), true, false), // BAS
    (0x172D, Color::rgba(0x00, 0x00, 0x00, 0x00), true, false), // BT
    (0x172E, named::BLACK, false, false),                       // FA
    (0x172F, named::BLACK, false, true),                        // FAU
];

impl SccAttributeCode {
    pub fn find(value: u16) -> Option<SccAttributeCode> {
        for &(ch1, color, background, underline) in CODES {
            if value == ch1 {
                return Some(SccAttributeCode {
                    color,
                    background,
                    underline,
                    channel: SccChannel::One,
                });
            }
            if value == ch1 + 0x0800 {
                return Some(SccAttributeCode {
                    color,
                    background,
                    underline,
                    channel: SccChannel::Two,
                });
            }
        }
        None
    }

    pub fn color(self) -> Color {
        self.color
    }

    pub fn is_background(self) -> bool {
        self.background
    }

    pub fn text_decoration(self) -> Option<TextDecoration> {
        self.underline.then(TextDecoration::underlined)
    }

    pub fn channel(self) -> SccChannel {
        self.channel
    }
}
