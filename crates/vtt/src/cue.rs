//! WebVTT cues.

use std::fmt;

use model::styles::TextAlign;
use model::times::{offset_to_f64, TimeOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineAlignment {
    Start,
    Center,
    End,
}

impl LineAlignment {
    fn as_str(self) -> &'static str {
        match self {
            LineAlignment::Start => "start",
            LineAlignment::Center => "center",
            LineAlignment::End => "end",
        }
    }
}

fn cue_timestamp(offset: &TimeOffset) -> String {
    model::timecode::ClockTime::from_seconds(offset_to_f64(offset)).to_string()
}

#[derive(Debug, Clone)]
pub(crate) struct VttCue {
    pub id: usize,
    pub begin: TimeOffset,
    pub end: Option<TimeOffset>,
    pub text: String,
    pub line: Option<(i64, LineAlignment)>,
    pub align: Option<TextAlign>,
    pub emit_id: bool,
}

impl VttCue {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Collapses runs of blank lines inside the payload; WebVTT cue text
    /// cannot contain them.
    pub fn normalize_eol(&mut self) {
        let lines: Vec<&str> = self.text.trim_end_matches('\n').split('\n').collect();
        let mut out: Vec<&str> = Vec::with_capacity(lines.len());
        for line in lines {
            if line.trim().is_empty() && out.last().is_some_and(|l| l.trim().is_empty()) {
                continue;
            }
            out.push(line);
        }
        self.text = out.join("\n");
    }
}

impl fmt::Display for VttCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.emit_id {
            writeln!(f, "{}", self.id)?;
        }

        let end = self.end.clone().unwrap_or_else(|| self.begin.clone());
        write!(f, "{} --> {}", cue_timestamp(&self.begin), cue_timestamp(&end))?;

        if let Some((line, alignment)) = self.line {
            write!(f, " line:{}% align:{}", line.clamp(0, 100), alignment.as_str())?;
        }
        if let Some(align) = self.align {
            let keyword = match align {
                TextAlign::Start => "left",
                TextAlign::Center => "center",
                TextAlign::End => "right",
            };
            write!(f, " position:50% align:{keyword}")?;
        }

        writeln!(f)?;
        writeln!(f, "{}", self.text)
    }
}
