//! SRT writer.
//!
//! Walks the ISD sequence of the document: each synchronic interval with
//! visible content becomes one numbered cue.

use log::{debug, warn};

use filters::isd_filters::{DefaultStyleValues, MergeParagraphs, MergeRegions, SupportedStyles};
use filters::IsdFilter;
use isd::{generate_isd_sequence, Isd, IsdElement};
use model::styles::{named, FontStyle, FontWeight, TextDecoration};
use model::times::{offset_from_secs, TimeOffset};
use model::{Document, ElementKind, Error, StyleProperty, StyleValue};

use crate::config::SrtWriterConfiguration;
use crate::timecode::SrtTimeCode;

fn is_bold(element: &IsdElement) -> bool {
    matches!(
        element.style(StyleProperty::FontWeight),
        Some(StyleValue::FontWeight(FontWeight::Bold))
    )
}

fn is_italic(element: &IsdElement) -> bool {
    matches!(
        element.style(StyleProperty::FontStyle),
        Some(StyleValue::FontStyle(FontStyle::Italic))
    )
}

fn is_underlined(element: &IsdElement) -> bool {
    matches!(
        element.style(StyleProperty::TextDecoration),
        Some(StyleValue::TextDecoration(TextDecoration { underline: Some(true), .. }))
    )
}

fn font_color(element: &IsdElement) -> Option<String> {
    let color = element.style(StyleProperty::Color)?.as_color()?;
    Some(format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a))
}

struct SrtCue {
    id: usize,
    begin: TimeOffset,
    end: Option<TimeOffset>,
    text: String,
}

impl SrtCue {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn to_block(&self, end: &TimeOffset) -> String {
        format!(
            "{}\n{} --> {}\n{}\n",
            self.id,
            SrtTimeCode::from_time_offset(&self.begin),
            SrtTimeCode::from_time_offset(end),
            self.text.trim_end_matches('\n')
        )
    }
}

struct SrtContext {
    config: SrtWriterConfiguration,
    filters: Vec<Box<dyn IsdFilter>>,
    cues: Vec<SrtCue>,
}

impl SrtContext {
    fn new(config: SrtWriterConfiguration) -> SrtContext {
        let supported = [
            (StyleProperty::FontWeight, vec![]),
            (
                StyleProperty::FontStyle,
                vec![
                    StyleValue::FontStyle(FontStyle::Normal),
                    StyleValue::FontStyle(FontStyle::Italic),
                ],
            ),
            (
                StyleProperty::TextDecoration,
                // the resolved form: underline on, other lines off
                vec![StyleValue::TextDecoration(TextDecoration {
                    underline: Some(true),
                    line_through: Some(false),
                    overline: Some(false),
                })],
            ),
            (StyleProperty::Color, vec![]),
        ]
        .into_iter()
        .collect();

        let defaults = [
            (StyleProperty::Color, StyleValue::Color(named::WHITE)),
            (StyleProperty::BackgroundColor, StyleValue::Color(named::TRANSPARENT)),
            (StyleProperty::FontWeight, StyleValue::FontWeight(FontWeight::Normal)),
            (StyleProperty::FontStyle, StyleValue::FontStyle(FontStyle::Normal)),
        ]
        .into_iter()
        .collect();

        let filters: Vec<Box<dyn IsdFilter>> = vec![
            Box::new(MergeRegions),
            Box::new(MergeParagraphs),
            Box::new(SupportedStyles::new(supported)),
            Box::new(DefaultStyleValues::new(defaults)),
        ];

        SrtContext { config, filters, cues: Vec::new() }
    }

    fn append_inline(&self, out: &mut String, element: &IsdElement, parent: Option<&IsdElement>) {
        match element.kind {
            ElementKind::Br => out.push('\n'),
            ElementKind::Text => out.push_str(&element.text),
            _ => {
                // only open a tag where the style actually changes, so
                // inherited values do not nest redundant markup
                let formatting = self.config.text_formatting;
                let bold =
                    formatting && is_bold(element) && !parent.is_some_and(is_bold);
                let italic =
                    formatting && is_italic(element) && !parent.is_some_and(is_italic);
                let underline =
                    formatting && is_underlined(element) && !parent.is_some_and(is_underlined);
                let color = if formatting {
                    font_color(element).filter(|c| parent.and_then(font_color).as_ref() != Some(c))
                } else {
                    None
                };

                if let Some(color) = &color {
                    out.push_str(&format!("<font color=\"{color}\">"));
                }
                if bold {
                    out.push_str("<b>");
                }
                if italic {
                    out.push_str("<i>");
                }
                if underline {
                    out.push_str("<u>");
                }

                for child in &element.children {
                    self.append_inline(out, child, Some(element));
                }

                if underline {
                    out.push_str("</u>");
                }
                if italic {
                    out.push_str("</i>");
                }
                if bold {
                    out.push_str("</b>");
                }
                if color.is_some() {
                    out.push_str("</font>");
                }
            }
        }
    }

    fn add_isd(
        &mut self,
        mut isd: Isd,
        begin: TimeOffset,
        end: Option<&TimeOffset>,
    ) -> Result<(), Error> {
        for filter in &self.filters {
            filter.process(&mut isd)?;
        }

        for region in &isd.regions {
            for body in &region.children {
                for div in &body.children {
                    for p in &div.children {
                        let mut text = String::new();
                        self.append_inline(&mut text, p, None);

                        let cue = SrtCue {
                            id: self.cues.len() + 1,
                            begin: begin.clone(),
                            end: end.cloned(),
                            text,
                        };
                        if cue.is_blank() {
                            debug!("skipping an empty cue");
                            continue;
                        }
                        self.cues.push(cue);
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> String {
        // an unbounded trailing cue gets a default ten-second duration
        if let Some(last) = self.cues.last_mut() {
            if last.end.is_none() {
                warn!("unbounded last cue, defaulting its duration to 10 seconds");
                last.end = Some(&last.begin + offset_from_secs(10));
            }
        }

        let mut out = String::new();
        for (index, cue) in self.cues.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let Some(end) = &cue.end else { continue };
            out.push_str(&cue.to_block(end));
        }
        out
    }
}

/// Converts the data model to an SRT document.
pub fn from_model(
    doc: &Document,
    config: Option<&SrtWriterConfiguration>,
    mut progress: impl FnMut(f64),
) -> Result<String, Error> {
    let mut context = SrtContext::new(config.cloned().unwrap_or_default());

    let sequence = generate_isd_sequence(doc, |p| progress(p / 2.0))?;
    let total = sequence.len().max(1);

    let mut iter = sequence.into_iter().peekable();
    let mut index = 0usize;
    while let Some((begin, isd)) = iter.next() {
        let end = iter.peek().map(|(t, _)| t.clone());
        context.add_isd(isd, begin, end.as_ref())?;
        index += 1;
        progress(0.5 + index as f64 / total as f64 / 2.0);
    }

    Ok(context.finish())
}
