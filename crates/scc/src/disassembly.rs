//! Human-readable dump of a classified SCC stream.

use model::styles::{named, Color};

use crate::codes::SccChannel;
use crate::line::{SccCode, SccLine};
use crate::word::SccWord;

fn color_code(color: Color) -> String {
    let opaque = Color { a: 0xFF, ..color };
    let mut out = match opaque {
        named::WHITE => "Wh",
        named::GREEN | named::LIME => "Gr",
        named::BLUE => "Bl",
        named::CYAN => "Cy",
        named::RED => "R",
        named::YELLOW => "Y",
        named::MAGENTA => "Ma",
        named::BLACK => "Bk",
        _ => "",
    }
    .to_string();

    if color.a == 0 {
        out = "T".to_string();
    } else if color.a == 0x88 {
        out.push('S');
    }
    out
}

fn word_disassembly(word: SccWord) -> String {
    if word.value == 0 {
        return "{}".to_string();
    }

    if word.byte_1 < 0x20 {
        return match SccCode::classify(word) {
            Some(SccCode::Pac(pac)) => {
                let mut out = format!("{{{:02}", pac.row());
                match pac.indent() {
                    Some(indent) => out.push_str(&format!("{indent:02}")),
                    None => {
                        out.push_str(&pac.color().map(color_code).unwrap_or_default());
                        if pac.font_style().is_some() {
                            out.push('I');
                        }
                    }
                }
                if pac.text_decoration().is_some() {
                    out.push('U');
                }
                out.push('}');
                out
            }
            Some(SccCode::Attribute(attribute)) => {
                let prefix = if attribute.is_background() { "B" } else { "F" };
                format!("{{{}{}}}", prefix, color_code(attribute.color()))
            }
            Some(SccCode::MidRow(mid_row)) => format!("{{{}}}", mid_row.name()),
            Some(SccCode::Control(control, _)) => format!("{{{}}}", control.name()),
            Some(SccCode::Special(c, _)) | Some(SccCode::Extended(c, _)) => c.to_string(),
            None => format!("{{??{:04x}}}", word.value),
        };
    }

    let mut out = String::new();
    for byte in [word.byte_1, word.byte_2] {
        if byte != 0 {
            out.push(crate::codes::standard::decode(byte).unwrap_or('?'));
        }
    }
    out
}

pub(crate) fn line_disassembly(line: &SccLine, show_channel: bool) -> String {
    let mut out = format!("{}\t", line.time_code);
    for &word in &line.words {
        if show_channel && word.byte_1 < 0x20 {
            if let Some(code) = SccCode::classify(word) {
                if code.channel() == SccChannel::Two {
                    out.push_str("[CC2]");
                }
            }
        }
        out.push_str(&word_disassembly(word));
    }
    out
}
