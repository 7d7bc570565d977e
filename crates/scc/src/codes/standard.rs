//! The CEA-608 standard character set.
//!
//! Mostly ASCII, with a handful of accented-letter substitutions.

/// Decodes one standard character byte (parity stripped).
pub fn decode(byte: u8) -> Option<char> {
    match byte {
        0x2A => Some('\u{00E1}'), // á
        0x5C => Some('\u{00E9}'), // é
        0x5E => Some('\u{00ED}'), // í
        0x5F => Some('\u{00F3}'), // ó
        0x60 => Some('\u{00FA}'), // ú
        0x7B => Some('\u{00E7}'), // ç
        0x7C => Some('\u{00F7}'), // ÷
        0x7D => Some('\u{00D1}'), // Ñ
        0x7E => Some('\u{00F1}'), // ñ
        0x7F => Some('\u{2588}'), // █ solid block
        0x20..=0x7A => Some(byte as char),
        _ => None,
    }
}

/// Encodes a character into the standard set, if representable.
pub fn encode(c: char) -> Option<u8> {
    match c {
        '\u{00E1}' => Some(0x2A),
        '\u{00E9}' => Some(0x5C),
        '\u{00ED}' => Some(0x5E),
        '\u{00F3}' => Some(0x5F),
        '\u{00FA}' => Some(0x60),
        '\u{00E7}' => Some(0x7B),
        '\u{00F7}' => Some(0x7C),
        '\u{00D1}' => Some(0x7D),
        '\u{00F1}' => Some(0x7E),
        '\u{2588}' => Some(0x7F),
        // code points displaced by the substitutions above have no encoding
        '*' | '\\' | '^' | '_' | '`' | '{' | '|' | '}' | '~' => None,
        c if (' '..='z').contains(&c) => Some(c as u8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        for c in "ABC abc 0123 .,!?".chars() {
            assert_eq!(decode(encode(c).unwrap()), Some(c));
        }
    }

    #[test]
    fn substitutions_replace_ascii_points() {
        assert_eq!(decode(0x2A), Some('\u{00E1}'));
        assert_eq!(encode('*'), None);
        assert_eq!(decode(0x7F), Some('\u{2588}'));
    }
}
