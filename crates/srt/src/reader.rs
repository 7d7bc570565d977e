//! SRT reader.
//!
//! Cue blocks are a counter line, a time-code line and text lines up to a
//! blank line. Inline `<b>/<i>/<u>/<font color>` tags (and their
//! `{bold}`-style variants) map to styled spans.

use log::warn;

use model::styles::{
    named, Color, DisplayAlign, Extent, FontFamily, FontStyle, FontWeight, GenericFontFamily,
    Length, LineHeight, Position, TextAlign, TextDecoration, TextOutline,
};
use model::times::{offset_from_millis, TimeOffset};
use model::{Document, ElementKind, Error, NodeId, StyleProperty, StyleValue};

const DEFAULT_REGION_ID: &str = "r1";

fn make_default_region(doc: &mut Document) -> Result<(), Error> {
    let region = doc.put_region(DEFAULT_REGION_ID)?;
    doc.set_style(
        region,
        StyleProperty::Origin,
        Some(StyleValue::Position(Position { x: Length::pct(5.0), y: Length::pct(5.0) })),
    )?;
    doc.set_style(
        region,
        StyleProperty::Extent,
        Some(StyleValue::Extent(Extent {
            width: Length::pct(90.0),
            height: Length::pct(90.0),
        })),
    )?;
    doc.set_style(
        region,
        StyleProperty::DisplayAlign,
        Some(StyleValue::DisplayAlign(DisplayAlign::After)),
    )?;
    doc.set_style(region, StyleProperty::TextAlign, Some(StyleValue::TextAlign(TextAlign::Center)))?;
    doc.set_style(
        region,
        StyleProperty::LineHeight,
        Some(StyleValue::LineHeight(LineHeight::Length(Length::pct(125.0)))),
    )?;
    doc.set_style(
        region,
        StyleProperty::FontFamily,
        Some(StyleValue::FontFamilies(vec![
            FontFamily::Named("Verdana".into()),
            FontFamily::Named("Arial".into()),
            FontFamily::Named("Tiresias".into()),
            FontFamily::Generic(GenericFontFamily::SansSerif),
        ])),
    )?;
    doc.set_style(region, StyleProperty::FontSize, Some(StyleValue::Length(Length::pct(80.0))))?;
    doc.set_style(region, StyleProperty::Color, Some(StyleValue::Color(named::WHITE)))?;
    doc.set_style(
        region,
        StyleProperty::TextOutline,
        Some(StyleValue::TextOutline(TextOutline::Outline {
            color: Some(named::BLACK),
            thickness: Length::pct(5.0),
        })),
    )?;
    Ok(())
}

/// Parses `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
fn parse_cue_times(line: &str) -> Option<(TimeOffset, TimeOffset)> {
    let (begin, end) = line.split_once("-->")?;

    fn parse_one(text: &str) -> Option<TimeOffset> {
        let text = text.trim();
        let (hms, ms) = text.split_once(',')?;
        let mut parts = hms.split(':');
        let hours: i64 = parts.next()?.parse().ok()?;
        let minutes: i64 = parts.next()?.parse().ok()?;
        let seconds: i64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || ms.len() != 3 {
            return None;
        }
        let millis: i64 = ms.parse().ok()?;
        Some(offset_from_millis(
            ((hours * 3600 + minutes * 60 + seconds) * 1000) + millis,
        ))
    }

    Some((parse_one(begin)?, parse_one(end)?))
}

/// Replaces the `{bold}` tag family with its angle-bracket form.
fn normalize_tags(text: &str) -> String {
    text.replace("{bold}", "<bold>")
        .replace("{/bold}", "</bold>")
        .replace("{italic}", "<italic>")
        .replace("{/italic}", "</italic>")
        .replace("{underline}", "<underline>")
        .replace("{/underline}", "</underline>")
}

fn color_attribute(tag: &str) -> Option<&str> {
    let rest = tag.strip_prefix("font")?.trim_start();
    let value = rest.strip_prefix("color")?.trim_start().strip_prefix('=')?.trim();
    Some(value.trim_matches(|c| c == '"' || c == '\''))
}

struct InlineParser<'a> {
    doc: &'a mut Document,
    stack: Vec<NodeId>,
    line_number: usize,
}

impl InlineParser<'_> {
    fn push_text(&mut self, text: &str) -> Result<(), Error> {
        let parent = *self.stack.last().unwrap();
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                let br = self.doc.create_element(ElementKind::Br)?;
                self.doc.push_child(parent, br)?;
            }
            if line.is_empty() {
                continue;
            }
            let span = self.doc.create_element(ElementKind::Span)?;
            let t = self.doc.create_text(line);
            self.doc.push_child(span, t)?;
            self.doc.push_child(parent, span)?;
        }
        Ok(())
    }

    fn open_tag(&mut self, tag: &str) -> Result<(), Error> {
        let parent = *self.stack.last().unwrap();
        let span = self.doc.create_element(ElementKind::Span)?;
        self.doc.push_child(parent, span)?;
        self.stack.push(span);

        match tag.split_whitespace().next().unwrap_or_default() {
            "b" | "bold" => self.doc.set_style(
                span,
                StyleProperty::FontWeight,
                Some(StyleValue::FontWeight(FontWeight::Bold)),
            )?,
            "i" | "italic" => self.doc.set_style(
                span,
                StyleProperty::FontStyle,
                Some(StyleValue::FontStyle(FontStyle::Italic)),
            )?,
            "u" | "underline" => self.doc.set_style(
                span,
                StyleProperty::TextDecoration,
                Some(StyleValue::TextDecoration(TextDecoration::underlined())),
            )?,
            "font" => match color_attribute(tag).map(parse_color) {
                Some(Some(color)) => {
                    self.doc.set_style(span, StyleProperty::Color, Some(StyleValue::Color(color)))?;
                }
                Some(None) => {
                    warn!("unknown color in font tag at line {}", self.line_number);
                }
                None => {
                    warn!("font tag without a color attribute at line {}", self.line_number);
                }
            },
            other => warn!("unknown tag {other:?} at line {}", self.line_number),
        }
        Ok(())
    }

    fn close_tag(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
}

fn parse_color(text: &str) -> Option<Color> {
    named::parse(text)
}

/// Builds the inline content of a cue under `p`.
fn parse_inline(
    doc: &mut Document,
    p: NodeId,
    text: &str,
    line_number: usize,
) -> Result<(), Error> {
    let text = normalize_tags(text);
    let mut parser = InlineParser { doc, stack: vec![p], line_number };

    let mut rest = text.as_str();
    while let Some(open) = rest.find('<') {
        let (data, tagged) = rest.split_at(open);
        if !data.is_empty() {
            parser.push_text(data)?;
        }
        let Some(close) = tagged.find('>') else {
            parser.push_text(tagged)?;
            rest = "";
            break;
        };
        let tag = &tagged[1..close];
        if tag.starts_with('/') {
            parser.close_tag();
        } else {
            parser.open_tag(tag)?;
        }
        rest = &tagged[close + 1..];
    }
    if !rest.is_empty() {
        parser.push_text(rest)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Counter,
    TimeCode,
    Text,
}

/// Converts an SRT document to the data model.
pub fn to_model(content: &str, mut progress: impl FnMut(f64)) -> Result<Document, Error> {
    let mut doc = Document::new();
    make_default_region(&mut doc)?;

    let body = doc.create_element(ElementKind::Body)?;
    doc.set_region_ref(body, Some(DEFAULT_REGION_ID))?;
    doc.set_body(Some(body))?;
    let div = doc.create_element(ElementKind::Div)?;
    doc.push_child(body, div)?;

    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len().max(1);

    let mut state = State::Counter;
    let mut current_p: Option<NodeId> = None;
    let mut cue_text = String::new();
    let mut cue_start_line = 0;

    // a trailing pseudo-line flushes the last cue
    for (index, line) in lines.iter().copied().map(Some).chain([None]).enumerate() {
        if index < total {
            progress((index + 1) as f64 / total as f64);
        }

        match state {
            State::Counter => {
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                if line.trim().parse::<u64>().is_err() {
                    return Err(Error::Parse(format!(
                        "missing subtitle counter at line {}",
                        index + 1
                    )));
                }
                state = State::TimeCode;
            }

            State::TimeCode => {
                let Some(line) = line else { break };
                let Some((begin, end)) = parse_cue_times(line) else {
                    return Err(Error::Parse(format!("missing time code at line {}", index + 1)));
                };

                let p = doc.create_element(ElementKind::P)?;
                doc.set_begin(p, Some(begin))?;
                doc.set_end(p, Some(end))?;
                doc.push_child(div, p)?;
                current_p = Some(p);

                cue_text.clear();
                cue_start_line = index + 1;
                state = State::Text;
            }

            State::Text => {
                let at_end = line.map_or(true, |l| l.trim().is_empty());
                if at_end {
                    if let Some(p) = current_p.take() {
                        parse_inline(&mut doc, p, cue_text.trim_end_matches('\n'), cue_start_line)?;
                    }
                    state = State::Counter;
                    continue;
                }
                if !cue_text.is_empty() {
                    cue_text.push('\n');
                }
                cue_text.push_str(line.unwrap_or_default());
            }
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_time_lines_parse() {
        let (begin, end) = parse_cue_times("00:00:01,000 --> 00:00:02,500").unwrap();
        assert_eq!(begin, offset_from_millis(1000));
        assert_eq!(end, offset_from_millis(2500));

        assert!(parse_cue_times("not a time code").is_none());
        assert!(parse_cue_times("00:00:01,00 --> 00:00:02,500").is_none());
    }

    #[test]
    fn font_color_attributes_parse() {
        assert_eq!(color_attribute("font color=\"red\""), Some("red"));
        assert_eq!(color_attribute("font color=#00ff00"), Some("#00ff00"));
        assert_eq!(color_attribute("font size=3"), None);
    }
}
