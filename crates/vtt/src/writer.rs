//! WebVTT writer over the ISD sequence.
//!
//! Colors become generated `::cue` CSS classes; bold, italics and
//! underline become inline tags. Optional cue settings carry the region
//! line position.

use log::{debug, warn};

use filters::isd_filters::{DefaultStyleValues, MergeParagraphs, MergeRegions, SupportedStyles};
use filters::IsdFilter;
use isd::{generate_isd_sequence, Isd, IsdElement, IsdRegion};
use model::styles::{named, DisplayAlign, FontStyle, FontWeight, TextAlign, TextDecoration};
use model::times::{offset_from_secs, TimeOffset};
use model::{Document, ElementKind, Error, StyleProperty, StyleValue};

use crate::config::VttWriterConfiguration;
use crate::cue::{LineAlignment, VttCue};

fn color_hex(color: model::styles::Color) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
}

fn color_classname(prefix: &str, color: model::styles::Color) -> String {
    format!("{prefix}{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
}

struct CssClass {
    property: &'static str,
    value: String,
    name: String,
}

impl CssClass {
    fn to_block(&self) -> String {
        format!("::cue(.{}) {{\n  {}: {};\n}}", self.name, self.property, self.value)
    }
}

struct VttContext {
    config: VttWriterConfiguration,
    filters: Vec<Box<dyn IsdFilter>>,
    cues: Vec<VttCue>,
    classes: Vec<CssClass>,
}

impl VttContext {
    fn new(config: VttWriterConfiguration) -> VttContext {
        let mut filters: Vec<Box<dyn IsdFilter>> = Vec::new();

        if !config.line_position {
            filters.push(Box::new(MergeRegions));
        }
        filters.push(Box::new(MergeParagraphs));

        let mut supported: std::collections::BTreeMap<StyleProperty, Vec<StyleValue>> = [
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
                vec![StyleValue::TextDecoration(TextDecoration {
                    underline: Some(true),
                    line_through: Some(false),
                    overline: Some(false),
                })],
            ),
            (StyleProperty::Color, vec![]),
            (StyleProperty::BackgroundColor, vec![]),
        ]
        .into_iter()
        .collect();

        if config.line_position {
            supported.insert(StyleProperty::Origin, vec![]);
            supported.insert(StyleProperty::Extent, vec![]);
            supported.insert(StyleProperty::DisplayAlign, vec![]);
        }
        filters.push(Box::new(SupportedStyles::new(supported)));

        filters.push(Box::new(DefaultStyleValues::new(
            [
                (StyleProperty::Color, StyleValue::Color(named::WHITE)),
                (StyleProperty::BackgroundColor, StyleValue::Color(named::TRANSPARENT)),
                (StyleProperty::FontWeight, StyleValue::FontWeight(FontWeight::Normal)),
                (StyleProperty::FontStyle, StyleValue::FontStyle(FontStyle::Normal)),
            ]
            .into_iter()
            .collect(),
        )));

        VttContext { config, filters, cues: Vec::new(), classes: Vec::new() }
    }

    fn class_for(&mut self, property: &'static str, prefix: &str, color: model::styles::Color) -> String {
        let name = color_classname(prefix, color);
        if !self.classes.iter().any(|c| c.name == name) {
            self.classes.push(CssClass { property, value: color_hex(color), name: name.clone() });
        }
        name
    }

    fn append_inline(&mut self, out: &mut String, element: &IsdElement, parent: Option<&IsdElement>) {
        match element.kind {
            ElementKind::Br => out.push('\n'),
            ElementKind::Text => out.push_str(&element.text),
            _ => {
                let style_of = |e: &IsdElement, p| e.style(p).cloned();

                let bold = matches!(
                    element.style(StyleProperty::FontWeight),
                    Some(StyleValue::FontWeight(FontWeight::Bold))
                ) && parent.and_then(|p| style_of(p, StyleProperty::FontWeight))
                    != style_of(element, StyleProperty::FontWeight);
                let italic = matches!(
                    element.style(StyleProperty::FontStyle),
                    Some(StyleValue::FontStyle(FontStyle::Italic))
                ) && parent.and_then(|p| style_of(p, StyleProperty::FontStyle))
                    != style_of(element, StyleProperty::FontStyle);
                let underline = matches!(
                    element.style(StyleProperty::TextDecoration),
                    Some(StyleValue::TextDecoration(TextDecoration {
                        underline: Some(true),
                        ..
                    }))
                ) && parent.and_then(|p| style_of(p, StyleProperty::TextDecoration))
                    != style_of(element, StyleProperty::TextDecoration);

                let color = element
                    .style(StyleProperty::Color)
                    .and_then(StyleValue::as_color)
                    .filter(|_| {
                        parent.and_then(|p| style_of(p, StyleProperty::Color))
                            != style_of(element, StyleProperty::Color)
                    });
                let bg_color = element
                    .style(StyleProperty::BackgroundColor)
                    .and_then(StyleValue::as_color)
                    .filter(|_| {
                        parent.and_then(|p| style_of(p, StyleProperty::BackgroundColor))
                            != style_of(element, StyleProperty::BackgroundColor)
                    });

                if let Some(color) = color {
                    let class = self.class_for("color", "color", color);
                    out.push_str(&format!("<c.{class}>"));
                }
                if let Some(color) = bg_color {
                    let class = self.class_for("background-color", "bgcolor", color);
                    out.push_str(&format!("<c.{class}>"));
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
                if bg_color.is_some() {
                    out.push_str("</c>");
                }
                if color.is_some() {
                    out.push_str("</c>");
                }
            }
        }
    }

    fn line_settings(&self, region: &IsdRegion) -> Option<(i64, LineAlignment)> {
        if !self.config.line_position {
            return None;
        }

        let origin = match region.style(StyleProperty::Origin) {
            Some(StyleValue::Position(p)) => *p,
            _ => return None,
        };
        let extent = match region.style(StyleProperty::Extent) {
            Some(StyleValue::Extent(e)) => *e,
            _ => return None,
        };
        let display_align = match region.style(StyleProperty::DisplayAlign) {
            Some(StyleValue::DisplayAlign(da)) => *da,
            _ => DisplayAlign::Before,
        };

        Some(match display_align {
            DisplayAlign::After => {
                ((origin.y.value + extent.height.value).round() as i64, LineAlignment::End)
            }
            DisplayAlign::Before => (origin.y.value.round() as i64, LineAlignment::Start),
            DisplayAlign::Center => (
                (origin.y.value + extent.height.value / 2.0).round() as i64,
                LineAlignment::Center,
            ),
        })
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

        let regions = std::mem::take(&mut isd.regions);
        for region in &regions {
            let line = self.line_settings(region);
            for body in &region.children {
                for div in &body.children {
                    for p in &div.children {
                        let align = self.config.text_align.then(|| {
                            match p.style(StyleProperty::TextAlign) {
                                Some(StyleValue::TextAlign(a)) => *a,
                                _ => TextAlign::Center,
                            }
                        });

                        let mut text = String::new();
                        self.append_inline(&mut text, p, None);

                        let mut cue = VttCue {
                            id: self.cues.len() + 1,
                            begin: begin.clone(),
                            end: end.cloned(),
                            text,
                            line,
                            align,
                            emit_id: self.config.cue_id,
                        };
                        cue.normalize_eol();
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
        if let Some(last) = self.cues.last_mut() {
            if last.end.is_none() {
                if last.is_blank() {
                    self.cues.pop();
                } else {
                    warn!("unbounded last cue, defaulting its duration to 10 seconds");
                    last.end = Some(&last.begin + offset_from_secs(10));
                }
            }
        }

        let mut out = String::from("WEBVTT\n\n");

        if !self.classes.is_empty() {
            out.push_str("STYLE\n::cue {\n  background-color: transparent;\n}\n");
            for class in &self.classes {
                out.push_str(&class.to_block());
                out.push('\n');
            }
            out.push('\n');
        }

        for (index, cue) in self.cues.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&cue.to_string());
        }
        out
    }
}

/// Converts the data model to a WebVTT document.
pub fn from_model(
    doc: &Document,
    config: Option<&VttWriterConfiguration>,
    mut progress: impl FnMut(f64),
) -> Result<String, Error> {
    let mut context = VttContext::new(config.cloned().unwrap_or_default());

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
