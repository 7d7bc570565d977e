//! SCC (CEA-608) reader and writer.
//!
//! The reader decodes `Scenarist_SCC V1.0` files: each line is a SMPTE
//! time code and a run of four-hex-digit words, every word a pair of
//! 7-bit-plus-parity bytes. The decoded code stream drives a dual-buffer
//! state machine ([`context`]) whose visible snapshots become caption
//! paragraphs in the document model.

mod codes;
pub mod config;
mod context;
mod disassembly;
mod grid;
mod line;
mod paragraph;
mod word;
mod writer;

use log::warn;

use model::styles::{
    DisplayAlign, Extent, FontFamily, GenericFontFamily, Length, LineHeight, Position,
    ShowBackground,
};
use model::{
    ActiveArea, CellResolution, Document, ElementKind, Error, StyleProperty, StyleValue,
};

use config::SccReaderConfiguration;
use context::SccContext;
use line::SccLine;

pub use writer::from_model;

/// Rows and columns of the CEA-608 safe area.
pub const SAFE_AREA_ROWS: u32 = 15;
pub const SAFE_AREA_COLUMNS: u32 = 32;

/// Root cell grid: the safe area covers 80% of the root container.
const ROOT_ROWS: u32 = 19;
const ROOT_COLUMNS: u32 = 40;

const REGION_ID: &str = "safeArea";

/// Converts an SCC document to the data model.
pub fn to_model(
    content: &str,
    config: Option<&SccReaderConfiguration>,
    mut progress: impl FnMut(f64),
) -> Result<Document, Error> {
    let mut doc = Document::new();
    doc.set_cell_resolution(CellResolution { rows: ROOT_ROWS, columns: ROOT_COLUMNS });

    let x_offset = (ROOT_COLUMNS - SAFE_AREA_COLUMNS) / 2;
    let y_offset = (ROOT_ROWS - SAFE_AREA_ROWS) / 2;

    doc.set_active_area(Some(ActiveArea::new(
        f64::from(x_offset) / f64::from(ROOT_COLUMNS),
        f64::from(y_offset) / f64::from(ROOT_ROWS),
        f64::from(ROOT_COLUMNS - 2 * x_offset) / f64::from(ROOT_COLUMNS),
        f64::from(ROOT_ROWS - 2 * y_offset) / f64::from(ROOT_ROWS),
    )?));

    // one region spanning the safe area holds every caption
    let region = doc.put_region(REGION_ID)?;
    doc.set_style(
        region,
        StyleProperty::Origin,
        Some(StyleValue::Position(Position {
            x: Length::pct((f64::from(x_offset) * 100.0 / f64::from(ROOT_COLUMNS)).round()),
            y: Length::pct((f64::from(y_offset) * 100.0 / f64::from(ROOT_ROWS)).round()),
        })),
    )?;
    doc.set_style(
        region,
        StyleProperty::Extent,
        Some(StyleValue::Extent(Extent {
            width: Length::pct(
                (f64::from(SAFE_AREA_COLUMNS) * 100.0 / f64::from(ROOT_COLUMNS)).round(),
            ),
            height: Length::pct(
                (f64::from(SAFE_AREA_ROWS) * 100.0 / f64::from(ROOT_ROWS)).round(),
            ),
        })),
    )?;
    doc.set_style(
        region,
        StyleProperty::ShowBackground,
        Some(StyleValue::ShowBackground(ShowBackground::WhenActive)),
    )?;
    doc.set_style(
        region,
        StyleProperty::DisplayAlign,
        Some(StyleValue::DisplayAlign(DisplayAlign::After)),
    )?;

    let body = doc.create_element(ElementKind::Body)?;
    doc.set_body(Some(body))?;

    // the default "normal" line height overflows the 15-row grid
    doc.set_style(
        body,
        StyleProperty::LineHeight,
        Some(StyleValue::LineHeight(LineHeight::Length(Length::pct(100.0)))),
    )?;
    doc.set_style(
        body,
        StyleProperty::FontFamily,
        Some(StyleValue::FontFamilies(vec![
            FontFamily::Named("Consolas".into()),
            FontFamily::Named("Monaco".into()),
            FontFamily::Generic(GenericFontFamily::Monospace),
        ])),
    )?;
    doc.set_style(
        body,
        StyleProperty::LinePadding,
        Some(StyleValue::Length(Length::cells(0.25))),
    )?;

    let div = doc.create_element(ElementKind::Div)?;
    doc.push_child(body, div)?;

    let text_alignment = config.map(|c| c.text_align).unwrap_or_default();
    let mut context = SccContext::new(&mut doc, div, REGION_ID.to_string(), text_alignment);

    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len().max(1);

    for (index, raw) in lines.iter().enumerate() {
        match SccLine::from_str(raw) {
            Ok(Some(line)) => line.process(&mut context)?,
            Ok(None) => {}
            Err(error) => warn!("skipping SCC line {}: {error}", index + 1),
        }
        progress((index + 1) as f64 / total as f64);
    }

    context.flush()?;

    Ok(doc)
}

/// Dumps an SCC document in a readable disassembly form.
pub fn to_disassembly(content: &str, show_channel: bool) -> String {
    let mut out = String::new();
    for raw in content.lines() {
        match SccLine::from_str(raw) {
            Ok(Some(line)) => {
                out.push_str(&disassembly::line_disassembly(&line, show_channel));
                out.push('\n');
            }
            Ok(None) => {}
            Err(error) => warn!("skipping SCC line: {error}"),
        }
    }
    out
}
