//! SCC line parsing and decoding.

use log::{debug, warn};

use model::timecode::SmpteTimeCode;
use model::times::FPS_30;
use model::Error;

use crate::codes::attribute::SccAttributeCode;
use crate::codes::control::SccControlCode;
use crate::codes::mid_row::SccMidRowCode;
use crate::codes::pac::SccPreambleAddressCode;
use crate::codes::special::{find_extended, find_special};
use crate::codes::standard;
use crate::codes::SccChannel;
use crate::context::SccContext;
use crate::word::SccWord;

/// A classified code pair.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SccCode {
    Pac(SccPreambleAddressCode),
    Attribute(SccAttributeCode),
    MidRow(SccMidRowCode),
    Control(SccControlCode, SccChannel),
    Special(char, SccChannel),
    Extended(char, SccChannel),
}

impl SccCode {
    /// Classifies a word whose first byte is below 0x20.
    pub fn classify(word: SccWord) -> Option<SccCode> {
        if let Some(pac) = SccPreambleAddressCode::find(word.byte_1, word.byte_2) {
            return Some(SccCode::Pac(pac));
        }
        if let Some(attribute) = SccAttributeCode::find(word.value) {
            return Some(SccCode::Attribute(attribute));
        }
        if let Some(mid_row) = SccMidRowCode::find(word.value) {
            return Some(SccCode::MidRow(mid_row));
        }
        if let Some((control, channel)) = SccControlCode::find(word.value) {
            return Some(SccCode::Control(control, channel));
        }
        if let Some((c, channel)) = find_special(word.value) {
            return Some(SccCode::Special(c, channel));
        }
        if let Some((c, channel)) = find_extended(word.value) {
            return Some(SccCode::Extended(c, channel));
        }
        None
    }

    pub fn channel(self) -> SccChannel {
        match self {
            SccCode::Pac(pac) => pac.channel(),
            SccCode::Attribute(attribute) => attribute.channel(),
            SccCode::MidRow(mid_row) => mid_row.channel(),
            SccCode::Control(_, channel)
            | SccCode::Special(_, channel)
            | SccCode::Extended(_, channel) => channel,
        }
    }
}

/// One data line: a time code and its words.
pub(crate) struct SccLine {
    pub time_code: SmpteTimeCode,
    pub words: Vec<SccWord>,
}

impl SccLine {
    /// Parses a line. Returns `None` for lines that carry no data (the
    /// format header, blank lines); malformed words are parse errors.
    pub fn from_str(line: &str) -> Result<Option<SccLine>, Error> {
        let Some((tc_text, words_text)) = line.split_once('\t') else {
            return Ok(None);
        };

        let Ok(time_code) = SmpteTimeCode::parse(tc_text.trim(), FPS_30) else {
            return Ok(None);
        };

        let words = words_text
            .split_whitespace()
            .map(SccWord::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(SccLine { time_code, words }))
    }

    /// Feeds the line's words through the decoder.
    pub fn process(&self, context: &mut SccContext<'_>) -> Result<(), Error> {
        let mut previous: Option<SccWord> = None;

        for &word in &self.words {
            // the wire format transmits control pairs twice; the second
            // copy has no effect
            if previous.is_some_and(|prev| prev.value == word.value && prev.is_code()) {
                previous = None;
                continue;
            }

            if word.value == 0 {
                continue;
            }

            if word.byte_1 < 0x20 {
                match SccCode::classify(word) {
                    Some(code) => self.apply(context, code)?,
                    None => warn!("unsupported SCC word {:#06x}", word.value),
                }
            } else {
                if context.current_channel != SccChannel::One {
                    continue;
                }
                let mut text = String::new();
                for byte in [word.byte_1, word.byte_2] {
                    match standard::decode(byte) {
                        Some(c) => text.push(c),
                        None if byte == 0 => {}
                        None => debug!("unmapped character byte {byte:#04x}"),
                    }
                }
                context.write_text(&text, &self.time_code);
            }

            previous = Some(word);
        }

        Ok(())
    }

    fn apply(&self, context: &mut SccContext<'_>, code: SccCode) -> Result<(), Error> {
        // only the primary channel is decoded
        let channel = code.channel();
        if channel != SccChannel::One {
            if context.current_channel != channel {
                warn!("skipping caption channel 2 content");
            }
            context.current_channel = channel;
            return Ok(());
        }
        context.current_channel = SccChannel::One;

        match code {
            SccCode::Pac(pac) => context.handle_pac(pac, &self.time_code),
            SccCode::Attribute(attribute) => context.handle_attribute(attribute),
            SccCode::MidRow(mid_row) => context.handle_mid_row(mid_row, &self.time_code),
            SccCode::Control(control, _) => {
                context.handle_control(control, &self.time_code)?;
            }
            SccCode::Special(c, _) => context.write_text(&c.to_string(), &self.time_code),
            SccCode::Extended(c, _) => {
                // extended characters replace the standard fallback
                // character transmitted just before them
                context.backspace();
                context.write_text(&c.to_string(), &self.time_code);
            }
        }
        Ok(())
    }
}
