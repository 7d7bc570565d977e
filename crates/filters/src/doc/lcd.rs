//! The least-common-denominator filter.
//!
//! Repositions every region onto a single safe-area rectangle, merges
//! regions that become indistinguishable, and drops all styling except
//! color and text alignment, so that row-addressed formats (teletext,
//! CEA-608) can carry the result.

use std::collections::HashMap;

use serde::Deserialize;

use model::styles::{
    named, Color, DisplayAlign, Extent, Length, Position, TextAlign, WritingMode,
};
use model::times::TimeOffset;
use model::{Document, ElementKind, Error, NodeId, StyleProperty, StyleValue};

use crate::doc::{retain_style_properties, RemoveAnimations};
use crate::DocumentFilter;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LcdConfig {
    /// Safe-area inset, an integer percentage of the root container.
    pub safe_area: u8,
    pub preserve_text_align: bool,
    /// Overrides the text color, as a TTML named color or `#rrggbb[aa]`.
    pub color: Option<String>,
    /// Overrides the background color.
    pub bg_color: Option<String>,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self { safe_area: 10, preserve_text_align: false, color: None, bg_color: None }
    }
}

pub struct LcdFilter {
    safe_area: f64,
    preserve_text_align: bool,
    color: Option<Color>,
    bg_color: Option<Color>,
}

fn parse_color(specification: &Option<String>) -> Result<Option<Color>, Error> {
    match specification {
        None => Ok(None),
        Some(text) => named::parse(text)
            .map(Some)
            .ok_or_else(|| Error::Domain(format!("unknown color specification: {text}"))),
    }
}

impl LcdFilter {
    pub fn from_config(config: Option<&serde_json::Value>) -> Result<LcdFilter, Error> {
        let config: LcdConfig = match config {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| Error::Domain(format!("invalid lcd configuration: {e}")))?,
            None => LcdConfig::default(),
        };
        if config.safe_area > 30 {
            return Err(Error::Domain("safe area must be between 0 and 30".into()));
        }
        Ok(LcdFilter {
            safe_area: f64::from(config.safe_area),
            preserve_text_align: config.preserve_text_align,
            color: parse_color(&config.color)?,
            bg_color: parse_color(&config.bg_color)?,
        })
    }

    fn region_metrics(doc: &Document, region: NodeId) -> (Position, Extent, WritingMode, DisplayAlign) {
        let origin = match doc.style(region, StyleProperty::Origin) {
            Some(StyleValue::Position(p)) => *p,
            _ => Position { x: Length::pct(0.0), y: Length::pct(0.0) },
        };
        let extent = match doc.style(region, StyleProperty::Extent) {
            Some(StyleValue::Extent(e)) => *e,
            _ => Extent { width: Length::pct(100.0), height: Length::pct(100.0) },
        };
        let writing_mode = match doc.style(region, StyleProperty::WritingMode) {
            Some(StyleValue::WritingMode(wm)) => *wm,
            _ => WritingMode::Lrtb,
        };
        let display_align = match doc.style(region, StyleProperty::DisplayAlign) {
            Some(StyleValue::DisplayAlign(da)) => *da,
            _ => DisplayAlign::Before,
        };
        (origin, extent, writing_mode, display_align)
    }

    /// Whether the region renders in the top half of the root container,
    /// which decides where merged captions anchor.
    fn anchored_before(
        origin: Position,
        extent: Extent,
        writing_mode: WritingMode,
        display_align: DisplayAlign,
    ) -> bool {
        match writing_mode {
            WritingMode::Lrtb | WritingMode::Rltb => {
                (display_align == DisplayAlign::Before && origin.y.value < 50.0)
                    || origin.y.value + extent.height.value < 50.0
            }
            WritingMode::Tblr => {
                (display_align == DisplayAlign::Before && origin.x.value < 50.0)
                    || origin.x.value + extent.width.value < 50.0
            }
            WritingMode::Tbrl => {
                (display_align == DisplayAlign::Before && origin.x.value >= 50.0)
                    || origin.x.value + extent.width.value >= 50.0
            }
        }
    }

    fn apply_bg_color(&self, doc: &mut Document, color: Color) -> Result<(), Error> {
        let Some(body) = doc.body() else {
            return Ok(());
        };
        let paragraphs: Vec<NodeId> =
            doc.dfs(body).filter(|n| doc.kind(*n) == ElementKind::P).collect();
        for p in paragraphs {
            doc.set_style(p, StyleProperty::BackgroundColor, Some(StyleValue::Color(color)))?;
        }
        Ok(())
    }
}

type RegionFingerprint = (Option<TimeOffset>, Option<TimeOffset>, WritingMode, DisplayAlign);

impl DocumentFilter for LcdFilter {
    fn name(&self) -> &'static str {
        "lcd"
    }

    fn process(&self, doc: &mut Document) -> Result<(), Error> {
        // strip everything but layout, color and (optionally) alignment
        let mut retained = vec![
            StyleProperty::Display,
            StyleProperty::DisplayAlign,
            StyleProperty::Extent,
            StyleProperty::Origin,
            StyleProperty::Position,
        ];
        if self.preserve_text_align {
            retained.push(StyleProperty::TextAlign);
        }
        if self.color.is_none() {
            retained.push(StyleProperty::Color);
        }
        if self.bg_color.is_none() {
            retained.push(StyleProperty::BackgroundColor);
        }
        retain_style_properties(doc, &retained)?;

        RemoveAnimations.process(doc)?;

        // reposition all regions onto the safe area and coalesce the ones
        // that become identical
        let mut kept: Vec<(RegionFingerprint, String)> = Vec::new();
        let mut aliases: HashMap<String, String> = HashMap::new();

        let regions: Vec<NodeId> = doc.regions().collect();
        for region in regions {
            let (origin, extent, writing_mode, display_align) = Self::region_metrics(doc, region);

            let display_align = if Self::anchored_before(origin, extent, writing_mode, display_align)
            {
                DisplayAlign::Before
            } else {
                DisplayAlign::After
            };

            doc.set_style(
                region,
                StyleProperty::DisplayAlign,
                Some(StyleValue::DisplayAlign(display_align)),
            )?;
            doc.set_style(
                region,
                StyleProperty::Origin,
                Some(StyleValue::Position(Position {
                    x: Length::pct(self.safe_area),
                    y: Length::pct(self.safe_area),
                })),
            )?;
            doc.set_style(
                region,
                StyleProperty::Extent,
                Some(StyleValue::Extent(Extent {
                    width: Length::pct(100.0 - 2.0 * self.safe_area),
                    height: Length::pct(100.0 - 2.0 * self.safe_area),
                })),
            )?;
            doc.set_style(region, StyleProperty::Position, None)?;

            let id = doc.element_id(region).unwrap_or_default().to_string();
            let fingerprint =
                (doc.begin(region).cloned(), doc.end(region).cloned(), writing_mode, display_align);

            match kept.iter().find(|(existing, _)| *existing == fingerprint) {
                Some((_, kept_id)) => {
                    aliases.insert(id, kept_id.clone());
                }
                None => {
                    kept.push((fingerprint, id));
                }
            }
        }

        // repoint content at the surviving regions, then drop the aliases
        if let Some(body) = doc.body() {
            let nodes: Vec<NodeId> = doc.dfs(body).collect();
            for node in nodes {
                let Some(target) =
                    doc.region_ref(node).and_then(|id| aliases.get(id)).cloned()
                else {
                    continue;
                };
                doc.set_region_ref(node, Some(&target))?;
            }
        }
        for alias in aliases.keys() {
            doc.remove_region(alias);
        }

        if let Some(color) = self.bg_color {
            self.apply_bg_color(doc, color)?;
        }

        if let Some(body) = doc.body() {
            if let Some(color) = self.color {
                doc.set_style(body, StyleProperty::Color, Some(StyleValue::Color(color)))?;
            }
            if !self.preserve_text_align {
                doc.set_style(
                    body,
                    StyleProperty::TextAlign,
                    Some(StyleValue::TextAlign(TextAlign::Center)),
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::times::offset_from_secs;

    fn fixture() -> Document {
        let mut doc = Document::new();
        let top = doc.put_region("top").unwrap();
        doc.set_style(
            top,
            StyleProperty::Origin,
            Some(StyleValue::Position(Position { x: Length::pct(10.0), y: Length::pct(5.0) })),
        )
        .unwrap();
        doc.set_style(
            top,
            StyleProperty::Extent,
            Some(StyleValue::Extent(Extent {
                width: Length::pct(80.0),
                height: Length::pct(15.0),
            })),
        )
        .unwrap();

        let bottom = doc.put_region("bottom").unwrap();
        doc.set_style(
            bottom,
            StyleProperty::Origin,
            Some(StyleValue::Position(Position { x: Length::pct(10.0), y: Length::pct(80.0) })),
        )
        .unwrap();
        doc.set_style(
            bottom,
            StyleProperty::Extent,
            Some(StyleValue::Extent(Extent {
                width: Length::pct(80.0),
                height: Length::pct(15.0),
            })),
        )
        .unwrap();

        let body = doc.create_element(ElementKind::Body).unwrap();
        doc.set_body(Some(body)).unwrap();
        let div = doc.create_element(ElementKind::Div).unwrap();
        doc.push_child(body, div).unwrap();

        for (region, text) in [("top", "up"), ("bottom", "down")] {
            let p = doc.create_element(ElementKind::P).unwrap();
            doc.push_child(div, p).unwrap();
            doc.set_region_ref(p, Some(region)).unwrap();
            doc.set_begin(p, Some(offset_from_secs(0))).unwrap();
            doc.set_end(p, Some(offset_from_secs(2))).unwrap();
            let span = doc.create_element(ElementKind::Span).unwrap();
            doc.push_child(p, span).unwrap();
            doc.set_style(
                span,
                StyleProperty::FontSize,
                Some(StyleValue::Length(Length::pct(120.0))),
            )
            .unwrap();
            let t = doc.create_text(text);
            doc.push_child(span, t).unwrap();
        }
        doc
    }

    #[test]
    fn repositions_regions_and_strips_styling() {
        let mut doc = fixture();
        let filter = LcdFilter::from_config(None).unwrap();
        filter.process(&mut doc).unwrap();

        // distinct anchors survive as distinct regions
        assert_eq!(doc.regions().count(), 2);

        for region in doc.regions().collect::<Vec<_>>() {
            let Some(StyleValue::Position(origin)) = doc.style(region, StyleProperty::Origin)
            else {
                panic!("origin missing");
            };
            assert_eq!(origin.x, Length::pct(10.0));
            assert_eq!(origin.y, Length::pct(10.0));
        }

        // font sizing was dropped everywhere
        let body = doc.body().unwrap();
        for node in doc.dfs(body).collect::<Vec<_>>() {
            if doc.kind(node) != ElementKind::Text {
                assert!(doc.style(node, StyleProperty::FontSize).is_none());
            }
        }
    }

    #[test]
    fn identical_regions_are_merged() {
        let mut doc = fixture();
        // anchor both regions at the bottom
        let top = doc.region("top").unwrap();
        doc.set_style(
            top,
            StyleProperty::Origin,
            Some(StyleValue::Position(Position { x: Length::pct(10.0), y: Length::pct(70.0) })),
        )
        .unwrap();

        let filter = LcdFilter::from_config(None).unwrap();
        filter.process(&mut doc).unwrap();

        assert_eq!(doc.regions().count(), 1);

        // every paragraph now references the surviving region
        let body = doc.body().unwrap();
        let survivor = doc.regions().next().unwrap();
        let survivor_id = doc.element_id(survivor).unwrap().to_string();
        for node in doc.dfs(body).collect::<Vec<_>>() {
            if doc.kind(node) == ElementKind::P {
                assert_eq!(doc.region_ref(node), Some(survivor_id.as_str()));
            }
        }
    }

    #[test]
    fn color_overrides_apply() {
        let mut doc = fixture();
        let config = serde_json::json!({ "color": "yellow", "bg_color": "#000000" });
        let filter = LcdFilter::from_config(Some(&config)).unwrap();
        filter.process(&mut doc).unwrap();

        let body = doc.body().unwrap();
        assert_eq!(
            doc.style(body, StyleProperty::Color),
            Some(&StyleValue::Color(named::YELLOW))
        );
    }

    #[test]
    fn rejects_out_of_range_safe_area() {
        let config = serde_json::json!({ "safe_area": 45 });
        assert!(LcdFilter::from_config(Some(&config)).is_err());
    }
}
