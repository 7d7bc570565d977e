//! SCC writer.
//!
//! Consumes the ISD sequence of a document and emits line-21 byte pairs:
//! pop-on chunks (RCL/ENM, per-row PACs, text, EOC, with a trailing EDM
//! erase), or roll-up continuations (RUx/CR and the new bottom row) when a
//! cue extends its predecessor by one line.

use log::{debug, info, warn};

use isd::{generate_isd_sequence, IsdElement, IsdRegion};
use model::styles::{named, TextAlign};
use model::timecode::SmpteTimeCode;
use model::times::{offset_to_f64, offset_to_frames, FrameRate, TimeOffset, FPS_29_97, FPS_30};
use model::{Document, ElementKind, Error, StyleProperty, StyleValue};

use crate::codes::control::SccControlCode;
use crate::codes::pac::SccPreambleAddressCode;
use crate::codes::special::special_from_char;
use crate::codes::standard;
use crate::codes::SccChannel;
use crate::config::SccWriterConfiguration;

const MAX_LINE_WIDTH: usize = 32;

struct Line {
    text: Vec<u8>,
    alignment: TextAlign,
}

fn encode_text(text: &str, out: &mut Vec<u8>) {
    for c in text.chars() {
        if let Some(byte) = standard::encode(c) {
            out.push(byte);
        } else if let Some(pair) = special_from_char(c) {
            out.push((pair >> 8) as u8);
            out.push((pair & 0xFF) as u8);
        } else {
            debug!("character {c:?} is not representable in CEA-608");
            out.push(0x20);
        }
    }
}

fn collect_lines(element: &IsdElement, lines: &mut Vec<Line>) {
    match element.kind {
        ElementKind::P => {
            let alignment = match element.style(StyleProperty::TextAlign) {
                Some(StyleValue::TextAlign(a)) => *a,
                _ => TextAlign::Start,
            };
            lines.push(Line { text: Vec::new(), alignment });
            for child in &element.children {
                collect_lines(child, lines);
            }
        }
        ElementKind::Br => {
            let alignment = lines.last().map(|l| l.alignment).unwrap_or(TextAlign::Start);
            lines.push(Line { text: Vec::new(), alignment });
        }
        ElementKind::Text => {
            if let Some(line) = lines.last_mut() {
                encode_text(&element.text, &mut line.text);
            }
        }
        _ => {
            for child in &element.children {
                collect_lines(child, lines);
            }
        }
    }
}

fn lines_from_region(region: &IsdRegion) -> Vec<Line> {
    let mut lines = Vec::new();
    for body in &region.children {
        collect_lines(body, &mut lines);
    }
    lines.retain(|line| !line.text.is_empty());
    lines
}

fn odd_parity(octet: u8) -> u8 {
    if octet.count_ones() % 2 == 0 {
        octet | 0x80
    } else {
        octet
    }
}

/// A run of contiguous line-21 octets anchored at a start frame.
struct Chunk {
    octets: Vec<u8>,
    start_frame: Option<i64>,
    is_erase: bool,
}

impl Chunk {
    fn new() -> Chunk {
        Chunk { octets: Vec::new(), start_frame: None, is_erase: false }
    }

    fn push_control_code(&mut self, code: u16) {
        let hi = (code >> 8) as u8;
        let lo = (code & 0xFF) as u8;
        if self.octets.len() % 2 == 1 {
            self.octets.push(0);
        }
        self.octets.push(hi);
        self.octets.push(lo);
        // control pairs are always transmitted twice
        if (0x10..=0x1F).contains(&hi) {
            self.octets.push(hi);
            self.octets.push(lo);
        }
    }

    fn push_octet(&mut self, octet: u8) {
        self.octets.push(octet);
    }

    /// Duration in frames: one frame per byte pair.
    fn dur(&self) -> i64 {
        (self.octets.len() as i64 + 1) / 2
    }

    fn end(&self) -> Option<i64> {
        self.start_frame.map(|start| start + self.dur())
    }

    fn overlaps(&self, other: &Chunk) -> bool {
        match (self.start_frame, self.end(), other.start_frame, other.end()) {
            (Some(begin), Some(end), Some(other_begin), Some(other_end)) => {
                other_begin <= end && other_end >= begin
            }
            _ => false,
        }
    }

    /// Splices `other` into this chunk at the frame where it is anchored,
    /// preserving this chunk's end time.
    fn insert(&mut self, other: &Chunk) {
        let (Some(begin), Some(other_begin)) = (self.start_frame, other.start_frame) else {
            return;
        };
        let at = ((other_begin - begin).max(0) as usize * 2).min(self.octets.len());
        self.octets.splice(at..at, other.octets.iter().copied());
        self.start_frame = Some(begin - other.dur());
    }

    fn format(&self, label_rate: FrameRate) -> String {
        let start = self.start_frame.unwrap_or(0).max(0);
        let tc = SmpteTimeCode::from_frames(start, label_rate);

        let mut packets = Vec::new();
        let mut bytes = self.octets.chunks_exact(2);
        for pair in bytes.by_ref() {
            packets.push(format!("{:02x}{:02x}", odd_parity(pair[0]), odd_parity(pair[1])));
        }
        if let [last] = bytes.remainder() {
            packets.push(format!("{:02x}{:02x}", odd_parity(*last), odd_parity(0)));
        }

        format!("{tc}\t{}", packets.join(" "))
    }
}

struct SccWriterContext {
    config: SccWriterConfiguration,
    chunks: Vec<Chunk>,
    last_lines: Option<Vec<Vec<u8>>>,
    last_was_rollup: bool,
    start_offset: i64,
}

impl SccWriterContext {
    fn new(config: SccWriterConfiguration) -> Result<SccWriterContext, Error> {
        let start_offset = match &config.start_tc {
            Some(text) => {
                SmpteTimeCode::parse(text, config.frame_rate.frame_rate())?.to_frames()
            }
            None => 0,
        };
        Ok(SccWriterContext {
            config,
            chunks: Vec::new(),
            last_lines: None,
            last_was_rollup: false,
            start_offset,
        })
    }

    fn counting_rate(&self) -> FrameRate {
        self.config.frame_rate.frame_rate()
    }

    fn label_rate(&self) -> FrameRate {
        if self.config.frame_rate.drop_frame() {
            FPS_29_97
        } else {
            FPS_30
        }
    }

    fn frames_at(&self, offset: &TimeOffset) -> i64 {
        offset_to_frames(offset, self.counting_rate()) + self.start_offset
    }

    /// Whether `lines` extends the previously written cue by one bottom
    /// row, the signature of a roll-up stream.
    fn is_rollup_continuation(&self, lines: &[Line]) -> bool {
        if self.config.force_popon {
            return false;
        }
        let Some(previous) = &self.last_lines else {
            return false;
        };
        if lines.is_empty() || lines.len() > usize::from(self.config.rollup_lines) {
            return false;
        }
        let shared = lines.len() - 1;
        if previous.len() < shared {
            return false;
        }
        lines[..shared]
            .iter()
            .zip(&previous[previous.len() - shared..])
            .all(|(line, prev)| line.text == *prev)
            && shared > 0
    }

    fn reflow(&self, lines: Vec<Line>) -> Result<Vec<Line>, Error> {
        if lines.iter().all(|l| l.text.len() <= MAX_LINE_WIDTH) {
            return Ok(lines);
        }
        if !self.config.allow_reflow {
            return Err(Error::UnsupportedFeature(format!(
                "line width exceeds the SCC maximum of {MAX_LINE_WIDTH} cells"
            )));
        }

        let alignment = lines.first().map(|l| l.alignment).unwrap_or(TextAlign::Start);

        let mut text: Vec<u8> = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                text.push(b' ');
            }
            text.extend_from_slice(&line.text);
        }
        // collapse double spaces introduced by the join
        text.dedup_by(|a, b| *a == b' ' && *b == b' ');

        let mut reflowed = Vec::new();
        let mut rest = text.as_slice();
        while rest.len() > MAX_LINE_WIDTH {
            let break_at = rest[..MAX_LINE_WIDTH]
                .iter()
                .rposition(|&c| c == b' ')
                .unwrap_or(MAX_LINE_WIDTH);
            reflowed.push(Line { text: rest[..break_at].to_vec(), alignment });
            rest = &rest[(break_at + 1).min(rest.len())..];
        }
        reflowed.push(Line { text: rest.to_vec(), alignment });
        Ok(reflowed)
    }

    fn add_isd(
        &mut self,
        regions: Vec<&IsdRegion>,
        begin: &TimeOffset,
        end: Option<&TimeOffset>,
    ) -> Result<(), Error> {
        let with_content: Vec<&IsdRegion> =
            regions.into_iter().filter(|r| !r.is_empty()).collect();

        if with_content.is_empty() {
            return Ok(());
        }
        if with_content.len() > 1 {
            warn!(
                "skipping ISD at {}s: more than one region",
                offset_to_f64(begin)
            );
            return Ok(());
        }

        let lines = lines_from_region(with_content[0]);
        if lines.is_empty() {
            info!("skipping ISD at {}s: no lines of text", offset_to_f64(begin));
            return Ok(());
        }

        let lines = self.reflow(lines)?;

        if self.is_rollup_continuation(&lines) {
            self.add_rollup(&lines, begin);
        } else {
            self.add_popon(&lines, begin, end)?;
        }

        self.last_lines = Some(lines.into_iter().map(|l| l.text).collect());
        Ok(())
    }

    fn add_rollup(&mut self, lines: &[Line], begin: &TimeOffset) {
        // the previous cue stays on screen: drop its scheduled erase
        if !self.last_was_rollup && self.chunks.last().is_some_and(|c| c.is_erase) {
            self.chunks.pop();
        }

        let mut chunk = Chunk::new();
        let depth_code = match self.config.rollup_lines {
            2 => SccControlCode::Ru2,
            3 => SccControlCode::Ru3,
            _ => SccControlCode::Ru4,
        };
        chunk.push_control_code(depth_code.value());
        chunk.push_control_code(SccControlCode::Cr.value());
        let pac = SccPreambleAddressCode::new(SccChannel::One, 15, named::WHITE, Some(0), false, false);
        chunk.push_control_code(pac.packet());

        let mut begin_frame = self.frames_at(begin) - chunk.dur();
        if let Some(last_end) = self.chunks.last().and_then(Chunk::end) {
            if begin_frame < last_end {
                warn!(
                    "overlapping roll-up text at {}",
                    SmpteTimeCode::from_frames(last_end, self.label_rate())
                );
                begin_frame = last_end;
            }
        }

        if let Some(line) = lines.last() {
            for &byte in &line.text {
                chunk.push_octet(byte);
            }
        }
        chunk.start_frame = Some(begin_frame);
        self.chunks.push(chunk);
        self.last_was_rollup = true;
    }

    fn add_popon(
        &mut self,
        lines: &[Line],
        begin: &TimeOffset,
        end: Option<&TimeOffset>,
    ) -> Result<(), Error> {
        let mut chunk = Chunk::new();
        chunk.push_control_code(SccControlCode::Rcl.value());
        chunk.push_control_code(SccControlCode::Enm.value());

        let first_row = 15 - lines.len() as u8;
        for (index, line) in lines.iter().enumerate() {
            let indent = match line.alignment {
                TextAlign::Center => Some(32usize.saturating_sub(line.text.len()) / 2),
                TextAlign::End => Some(32usize.saturating_sub(line.text.len())),
                TextAlign::Start => None,
            };

            // PAC indents advance in steps of four cells; pad the rest
            // with spaces
            let spaces = indent.map(|i| i % 4).unwrap_or(0);
            let indent = indent.map(|i| (i / 4 * 4) as u8);

            let pac = SccPreambleAddressCode::new(
                SccChannel::One,
                first_row + index as u8,
                named::WHITE,
                indent,
                false,
                false,
            );
            chunk.push_control_code(pac.packet());

            for _ in 0..spaces {
                chunk.push_octet(0x20);
            }
            for &byte in &line.text {
                chunk.push_octet(byte);
            }
        }
        chunk.push_control_code(SccControlCode::Eoc.value());

        chunk.start_frame = Some(self.frames_at(begin) - chunk.dur());

        if self.chunks.len() >= 2 {
            let reserved = self.chunks[self.chunks.len() - 2].end().unwrap_or(0)
                + self.chunks[self.chunks.len() - 1].dur();
            if chunk.start_frame.is_some_and(|start| reserved > start) {
                warn!("skipping caption at {}s due to overlap", offset_to_f64(begin));
                return Ok(());
            }
        }
        if let Some(last) = self.chunks.last() {
            if chunk.overlaps(last) {
                let last = self.chunks.pop().unwrap();
                chunk.insert(&last);
            }
        }

        self.chunks.push(chunk);
        self.last_was_rollup = false;

        if let Some(end) = end {
            let mut erase = Chunk::new();
            erase.push_control_code(SccControlCode::Edm.value());
            erase.is_erase = true;
            erase.start_frame = Some(self.frames_at(end) - erase.dur());
            self.chunks.push(erase);
        }
        Ok(())
    }

    fn finish(self) -> String {
        let label = self.label_rate();
        let mut out = String::from("Scenarist_SCC V1.0\n");
        for chunk in &self.chunks {
            out.push('\n');
            out.push_str(&chunk.format(label));
            out.push('\n');
        }
        out
    }
}

/// Converts the data model to an SCC document.
pub fn from_model(
    doc: &Document,
    config: Option<&SccWriterConfiguration>,
    mut progress: impl FnMut(f64),
) -> Result<String, Error> {
    let mut context = SccWriterContext::new(config.cloned().unwrap_or_default())?;

    let sequence = generate_isd_sequence(doc, |p| progress(p / 2.0))?;
    let total = sequence.len().max(1);

    for index in 0..sequence.len() {
        let (begin, isd) = &sequence[index];
        let end = sequence.get(index + 1).map(|(t, _)| t);
        context.add_isd(isd.regions.iter().collect(), begin, end)?;
        progress(0.5 + (index + 1) as f64 / total as f64 / 2.0);
    }

    Ok(context.finish())
}
