//! Control codes.

use super::SccChannel;

/// A CEA-608 control code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SccControlCode {
    /// Reserved (formerly Alarm Off)
    Aof,
    /// Reserved (formerly Alarm On)
    Aon,
    /// Backspace
    Bs,
    /// Carriage Return
    Cr,
    /// Delete to End of Row
    Der,
    /// Erase Displayed Memory
    Edm,
    /// Erase Non-Displayed Memory
    Enm,
    /// End of Caption (flip memories)
    Eoc,
    /// Flash On
    Fon,
    /// Resume Caption Loading
    Rcl,
    /// Resume Direct Captioning
    Rdc,
    /// Resume Text Display
    Rtd,
    /// Tab Offset 1 Column
    To1,
    /// Tab Offset 2 Columns
    To2,
    /// Tab Offset 3 Columns
    To3,
    /// Text Restart
    Tr,
    /// Roll-Up Captions, 2 Rows
    Ru2,
    /// Roll-Up Captions, 3 Rows
    Ru3,
    /// Roll-Up Captions, 4 Rows
    Ru4,
}

const CODES: &[(SccControlCode, u16, u16)] = &[
    (SccControlCode::Aof, 0x1422, 0x1C22),
    (SccControlCode::Aon, 0x1423, 0x1C23),
    (SccControlCode::Bs, 0x1421, 0x1C21),
    (SccControlCode::Cr, 0x142D, 0x1C2D),
    (SccControlCode::Der, 0x1424, 0x1C24),
    (SccControlCode::Edm, 0x142C, 0x1C2C),
    (SccControlCode::Enm, 0x142E, 0x1C2E),
    (SccControlCode::Eoc, 0x142F, 0x1C2F),
    (SccControlCode::Fon, 0x1428, 0x1C28),
    (SccControlCode::Rcl, 0x1420, 0x1C20),
    (SccControlCode::Rdc, 0x1429, 0x1C29),
    (SccControlCode::Rtd, 0x142B, 0x1C2B),
    (SccControlCode::To1, 0x1721, 0x1F21),
    (SccControlCode::To2, 0x1722, 0x1F22),
    (SccControlCode::To3, 0x1723, 0x1F23),
    (SccControlCode::Tr, 0x142A, 0x1C2A),
    (SccControlCode::Ru2, 0x1425, 0x1C25),
    (SccControlCode::Ru3, 0x1426, 0x1C26),
    (SccControlCode::Ru4, 0x1427, 0x1C27),
];

impl SccControlCode {
    pub fn find(value: u16) -> Option<(SccControlCode, SccChannel)> {
        for &(code, ch1, ch2) in CODES {
            if value == ch1 {
                return Some((code, SccChannel::One));
            }
            if value == ch2 {
                return Some((code, SccChannel::Two));
            }
        }
        None
    }

    /// Channel-1 wire value.
    pub fn value(self) -> u16 {
        CODES.iter().find(|(code, _, _)| *code == self).map(|(_, ch1, _)| *ch1).unwrap_or(0)
    }

    pub fn name(self) -> &'static str {
        match self {
            SccControlCode::Aof => "AOF",
            SccControlCode::Aon => "AON",
            SccControlCode::Bs => "BS",
            SccControlCode::Cr => "CR",
            SccControlCode::Der => "DER",
            SccControlCode::Edm => "EDM",
            SccControlCode::Enm => "ENM",
            SccControlCode::Eoc => "EOC",
            SccControlCode::Fon => "FON",
            SccControlCode::Rcl => "RCL",
            SccControlCode::Rdc => "RDC",
            SccControlCode::Rtd => "RTD",
            SccControlCode::To1 => "TO1",
            SccControlCode::To2 => "TO2",
            SccControlCode::To3 => "TO3",
            SccControlCode::Tr => "TR",
            SccControlCode::Ru2 => "RU2",
            SccControlCode::Ru3 => "RU3",
            SccControlCode::Ru4 => "RU4",
        }
    }
}
