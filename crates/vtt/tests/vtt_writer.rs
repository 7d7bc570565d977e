use model::styles::{named, FontStyle, Length, Position, TextDecoration};
use model::times::offset_from_secs;
use model::{Document, ElementKind, NodeId, StyleProperty, StyleValue};
use vtt::config::VttWriterConfiguration;

fn cue_doc() -> Document {
    let mut doc = Document::new();
    doc.put_region("r1").unwrap();
    let body = doc.create_element(ElementKind::Body).unwrap();
    doc.set_body(Some(body)).unwrap();
    doc.set_region_ref(body, Some("r1")).unwrap();
    let div = doc.create_element(ElementKind::Div).unwrap();
    doc.push_child(body, div).unwrap();

    let p = doc.create_element(ElementKind::P).unwrap();
    doc.push_child(div, p).unwrap();
    doc.set_begin(p, Some(offset_from_secs(1))).unwrap();
    doc.set_end(p, Some(offset_from_secs(3))).unwrap();

    let span = doc.create_element(ElementKind::Span).unwrap();
    doc.push_child(p, span).unwrap();
    doc.set_style(span, StyleProperty::Color, Some(StyleValue::Color(named::YELLOW)))
        .unwrap();
    doc.set_style(span, StyleProperty::FontStyle, Some(StyleValue::FontStyle(FontStyle::Italic)))
        .unwrap();
    let t = doc.create_text("Hello cue");
    doc.push_child(span, t).unwrap();
    doc
}

#[test]
fn emits_header_cue_and_style_block() {
    let doc = cue_doc();
    let out = vtt::from_model(&doc, None, |_| {}).unwrap();

    assert!(out.starts_with("WEBVTT\n"), "missing header: {out}");
    assert!(out.contains("00:00:01.000 --> 00:00:03.000"), "bad timing: {out}");
    assert!(out.contains("<i>"), "italics lost: {out}");
    assert!(out.contains("<c.colorffff00ff>"), "color class lost: {out}");
    assert!(out.contains("STYLE"), "style block missing: {out}");
    assert!(out.contains("::cue(.colorffff00ff)"), "css class missing: {out}");
    assert!(out.contains("Hello cue"), "payload missing: {out}");
}

#[test]
fn cue_identifiers_can_be_disabled() {
    let doc = cue_doc();
    let config = VttWriterConfiguration { cue_id: false, ..Default::default() };
    let out = vtt::from_model(&doc, Some(&config), |_| {}).unwrap();
    assert!(!out.lines().any(|l| l.trim() == "1"), "cue id present: {out}");
}

#[test]
fn line_position_settings_follow_the_region() {
    let mut doc = cue_doc();
    let region = doc.region("r1").unwrap();
    doc.set_style(
        region,
        StyleProperty::Origin,
        Some(StyleValue::Position(Position { x: Length::pct(10.0), y: Length::pct(80.0) })),
    )
    .unwrap();
    doc.set_style(
        region,
        StyleProperty::Extent,
        Some(StyleValue::Extent(model::styles::Extent {
            width: Length::pct(80.0),
            height: Length::pct(10.0),
        })),
    )
    .unwrap();
    doc.set_style(
        region,
        StyleProperty::DisplayAlign,
        Some(StyleValue::DisplayAlign(model::styles::DisplayAlign::After)),
    )
    .unwrap();

    let config = VttWriterConfiguration { line_position: true, ..Default::default() };
    let out = vtt::from_model(&doc, Some(&config), |_| {}).unwrap();
    assert!(out.contains("line:90% align:end"), "line settings missing: {out}");
}

fn find_span(doc: &Document, root: NodeId) -> NodeId {
    doc.dfs(root).find(|n| doc.kind(*n) == ElementKind::Span).unwrap()
}

#[test]
fn underline_survives_resolution_and_markup() {
    let mut doc = cue_doc();
    let body = doc.body().unwrap();
    let span = find_span(&doc, body);
    doc.set_style(
        span,
        StyleProperty::TextDecoration,
        Some(StyleValue::TextDecoration(TextDecoration::underlined())),
    )
    .unwrap();

    let out = vtt::from_model(&doc, None, |_| {}).unwrap();
    assert!(out.contains("<u>"), "underline lost: {out}");
}
