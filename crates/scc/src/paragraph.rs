//! Caption paragraph emission.
//!
//! A snapshot of the visible grid becomes a `p` element: contiguous runs
//! of identically-styled cells become spans, row gaps become line breaks,
//! and unwritten rows and columns trim away. Cell positions convert to
//! percentages of the 32×15 safe-area grid per SMPTE RP 2052-10.

use log::warn;

use model::styles::{named, FontStyle, Length, Position, TextAlign, TextDecoration};
use model::timecode::SmpteTimeCode;
use model::{Document, ElementKind, Error, NodeId, StyleProperty, StyleValue};

use crate::config::TextAlignment;
use crate::grid::{Grid, Pen, GRID_COLS, GRID_ROWS};

#[allow(clippy::too_many_arguments)]
pub(crate) fn push_caption(
    doc: &mut Document,
    div: NodeId,
    region_id: &str,
    grid: &Grid,
    begin: &SmpteTimeCode,
    end: Option<&SmpteTimeCode>,
    count: usize,
    alignment: TextAlignment,
) -> Result<(), Error> {
    let rows = grid.content_rows();
    if rows.is_empty() {
        return Ok(());
    }

    let p = doc.create_element(ElementKind::P)?;
    doc.set_element_id(p, Some(&format!("caption{count}")))?;
    doc.set_begin(p, Some(begin.to_temporal_offset()))?;
    doc.set_end(p, end.map(SmpteTimeCode::to_temporal_offset))?;
    doc.set_region_ref(p, Some(region_id))?;

    let text_align = match alignment {
        TextAlignment::Auto => guess_text_alignment(grid),
        other => other.text_align(),
    };
    doc.set_style(p, StyleProperty::TextAlign, Some(StyleValue::TextAlign(text_align)))?;

    let mut last_row: Option<usize> = None;
    for &row in &rows {
        if let Some(last) = last_row {
            for _ in 0..(row - last) {
                let br = doc.create_element(ElementKind::Br)?;
                doc.push_child(p, br)?;
            }
        }
        last_row = Some(row);

        for (col, text, pen) in grid.runs(row) {
            let span = doc.create_element(ElementKind::Span)?;
            apply_pen(doc, span, row, col, pen)?;
            let text_node = doc.create_text(text);
            doc.push_child(span, text_node)?;
            doc.push_child(p, span)?;
        }
    }

    doc.push_child(div, p)
}

fn apply_pen(
    doc: &mut Document,
    span: NodeId,
    row: usize,
    col: usize,
    pen: Pen,
) -> Result<(), Error> {
    let origin = Position {
        x: Length::pct((col as f64 * 100.0 / GRID_COLS as f64).round()),
        y: Length::pct((row as f64 * 100.0 / GRID_ROWS as f64).round()),
    };
    doc.set_style(span, StyleProperty::Origin, Some(StyleValue::Position(origin)))?;

    if let Some(color) = pen.color {
        doc.set_style(span, StyleProperty::Color, Some(StyleValue::Color(color)))?;
    }
    if pen.italic {
        doc.set_style(span, StyleProperty::FontStyle, Some(StyleValue::FontStyle(FontStyle::Italic)))?;
    }
    if pen.underline {
        doc.set_style(
            span,
            StyleProperty::TextDecoration,
            Some(StyleValue::TextDecoration(TextDecoration::underlined())),
        )?;
    }
    // CEA-608 text always renders on an opaque box
    let background = pen.background.unwrap_or(named::BLACK);
    doc.set_style(span, StyleProperty::BackgroundColor, Some(StyleValue::Color(background)))?;
    Ok(())
}

struct LineShape {
    indent: usize,
    length: usize,
    leading_spaces: usize,
    trailing_spaces: usize,
}

fn line_shapes(grid: &Grid) -> Vec<LineShape> {
    grid.content_rows()
        .into_iter()
        .map(|row| {
            let mut first = GRID_COLS;
            let mut last = 0;
            for col in 0..GRID_COLS {
                if grid.get(row, col).is_some() {
                    first = first.min(col);
                    last = col;
                }
            }
            let mut leading = 0;
            while grid.get(row, first + leading).is_some_and(|c| c.ch == ' ') {
                leading += 1;
            }
            let mut trailing = 0;
            while trailing <= last - first
                && grid.get(row, last - trailing).is_some_and(|c| c.ch == ' ')
            {
                trailing += 1;
            }
            LineShape {
                indent: first,
                length: last - first + 1,
                leading_spaces: leading,
                trailing_spaces: trailing,
            }
        })
        .collect()
}

/// Detects the paragraph text alignment from the content indentation.
fn guess_text_alignment(grid: &Grid) -> TextAlign {
    let lines = line_shapes(grid);

    let Some(longest) = lines.iter().max_by_key(|l| l.length) else {
        return TextAlign::Start;
    };

    let right_offset = |line: &LineShape| GRID_COLS - (line.indent + line.length);

    let left_border = longest.indent + longest.leading_spaces;
    let right_border = right_offset(longest) + longest.trailing_spaces;

    if lines.iter().all(|l| l.indent + l.leading_spaces == left_border) {
        return TextAlign::Start;
    }

    if lines.iter().all(|l| right_offset(l) + l.trailing_spaces == right_border) {
        return TextAlign::End;
    }

    let centered = lines.iter().all(|l| {
        let left = (l.indent + l.leading_spaces) as i64 - left_border as i64;
        let right = (right_offset(l) + l.trailing_spaces) as i64 - right_border as i64;
        (left - right).abs() < 2
    });
    if centered {
        return TextAlign::Center;
    }

    warn!("cannot detect the paragraph text alignment, defaulting to start");
    TextAlign::Start
}
