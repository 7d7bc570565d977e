use model::styles::{named, FontStyle, Length, Position, TextAlign};
use model::times::offset_from_ratio;
use model::{Document, ElementKind, NodeId, StyleProperty, StyleValue};

fn read(content: &str) -> Document {
    scc::to_model(content, None, |_| {}).unwrap()
}

fn paragraphs(doc: &Document) -> Vec<NodeId> {
    let body = doc.body().unwrap();
    let div = doc.children(body).next().unwrap();
    doc.children(div).collect()
}

fn paragraph_text(doc: &Document, p: NodeId) -> String {
    let mut out = String::new();
    for node in doc.dfs(p) {
        match doc.kind(node) {
            ElementKind::Text => out.push_str(doc.text(node)),
            ElementKind::Br => out.push('\n'),
            _ => {}
        }
    }
    out
}

#[test]
fn pop_on_minimum() {
    let doc = read("Scenarist_SCC V1.0\n\n00:00:00:22\t9420 9420 9470 9470 4c6f 7265 6d80\n");

    let ps = paragraphs(&doc);
    assert_eq!(ps.len(), 1);

    let p = ps[0];
    assert_eq!(paragraph_text(&doc, p), "Lorem");
    assert_eq!(doc.begin(p), Some(&offset_from_ratio(22, 30)));
    assert_eq!(doc.end(p), None);
    assert_eq!(doc.region_ref(p), Some("safeArea"));

    // row 15, column 0 of the 32x15 grid, as percentages
    let span = doc.children(p).next().unwrap();
    let Some(StyleValue::Position(origin)) = doc.style(span, StyleProperty::Origin) else {
        panic!("span origin missing");
    };
    assert_eq!(origin.x, Length::pct(0.0));
    assert_eq!(origin.y, Length::pct(93.0));
}

#[test]
fn end_of_caption_flips_buffers() {
    let content = "\
00:00:01:00\t9420 9470 c8e9
00:00:02:00\t942f
00:00:02:10\t9420 9470 42f9 e580
00:00:03:00\t942f
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    assert_eq!(ps.len(), 2);

    assert_eq!(paragraph_text(&doc, ps[0]), "Hi");
    assert_eq!(doc.begin(ps[0]), Some(&offset_from_ratio(60, 30)));
    assert_eq!(doc.end(ps[0]), Some(&offset_from_ratio(90, 30)));

    assert_eq!(paragraph_text(&doc, ps[1]), "Bye");
    assert_eq!(doc.begin(ps[1]), Some(&offset_from_ratio(90, 30)));
    assert_eq!(doc.end(ps[1]), None);
}

#[test]
fn erase_display_closes_the_caption() {
    let content = "\
00:00:01:00\t9420 9470 c8e9 942f
00:00:04:00\t942c
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    assert_eq!(ps.len(), 1);
    assert_eq!(doc.begin(ps[0]), Some(&offset_from_ratio(30, 30)));
    assert_eq!(doc.end(ps[0]), Some(&offset_from_ratio(120, 30)));
}

#[test]
fn roll_up_shifts_rows_and_opens_new_captions() {
    let content = "\
00:00:01:00\t9425 9470 4f6e e580
00:00:02:00\t942d 54f7 ef80
00:00:03:00\t942d
";
    // RU2; "One"; CR; "Two"; CR
    let doc = read(content);
    let ps = paragraphs(&doc);
    assert_eq!(ps.len(), 3);

    assert_eq!(paragraph_text(&doc, ps[0]), "One");
    assert_eq!(paragraph_text(&doc, ps[1]), "One\nTwo");
    // after the second carriage return only "Two" remains in the window
    assert_eq!(paragraph_text(&doc, ps[2]), "Two");

    // paragraph intervals are half-open, non-overlapping and ordered
    let mut previous_end = None;
    for &p in &ps {
        let begin = doc.begin(p).unwrap().clone();
        if let Some(ref prev) = previous_end {
            assert!(begin >= *prev);
        }
        if let Some(end) = doc.end(p) {
            assert!(&begin < end);
            previous_end = Some(end.clone());
        }
    }
}

#[test]
fn duplicated_control_pairs_collapse() {
    // EOC transmitted twice must flip only once
    let content = "\
00:00:01:00\t9420 9420 9470 c1c2
00:00:02:00\t942f 942f
00:00:05:00\t942c 942c
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    assert_eq!(ps.len(), 1);
    assert_eq!(paragraph_text(&doc, ps[0]), "AB");
}

#[test]
fn mid_row_codes_split_styled_spans() {
    let content = "\
00:00:01:00\t9420 9470 c1c1 1128 c2c2
00:00:02:00\t942f
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    let spans: Vec<NodeId> = doc.children(ps[0]).collect();
    assert_eq!(spans.len(), 2);

    assert_eq!(paragraph_text(&doc, spans[0]), "AA");
    assert!(doc.style(spans[0], StyleProperty::Color).is_none());

    // the mid-row code occupies one column as a styled space
    assert_eq!(paragraph_text(&doc, spans[1]), " BB");
    assert_eq!(
        doc.style(spans[1], StyleProperty::Color),
        Some(&StyleValue::Color(named::RED))
    );
}

#[test]
fn styled_pac_applies_italics() {
    // PAC row 15 white italics: 0x14 0x6E
    let content = "\
00:00:01:00\t9420 146e c1c1
00:00:02:00\t942f
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    let span = doc.children(ps[0]).next().unwrap();
    assert_eq!(
        doc.style(span, StyleProperty::FontStyle),
        Some(&StyleValue::FontStyle(FontStyle::Italic))
    );
}

#[test]
fn extended_characters_replace_their_fallback() {
    // "a" then the extended À pair: the fallback character is erased
    let content = "\
00:00:01:00\t9420 9470 e180 1230
00:00:02:00\t942f
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    assert_eq!(paragraph_text(&doc, ps[0]), "\u{00C0}");
}

#[test]
fn backspace_at_column_zero_is_a_no_op() {
    // BS (0x1421) twice at column 0, then text
    let content = "\
00:00:01:00\t9420 9470 9421 1421 c1c2
00:00:02:00\t942f
";
    // the doubled BS collapses; the single effect hits column 0 and does
    // nothing
    let doc = read(content);
    let ps = paragraphs(&doc);
    assert_eq!(paragraph_text(&doc, ps[0]), "AB");
}

#[test]
fn tab_offsets_advance_and_clamp_the_cursor() {
    // PAC row 15 indent 28 (0x147e), then TO3 clamps the cursor at 31
    let content = "\
00:00:01:00\t9420 147e 1723 1726?
";
    // malformed second tab word makes the line skip with a log
    let doc = read(content);
    assert!(paragraphs(&doc).is_empty());

    let content = "\
00:00:01:00\t9420 147e 1723 c1c2
00:00:02:00\t942f
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    let span = doc.children(ps[0]).next().unwrap();
    // column 28 + 3 = 31; the second character overwrites column 31
    let Some(StyleValue::Position(origin)) = doc.style(span, StyleProperty::Origin) else {
        panic!("origin missing");
    };
    assert_eq!(origin.x, Length::pct(97.0));
    assert_eq!(paragraph_text(&doc, span), "B");
}

#[test]
fn header_and_blank_lines_are_skipped() {
    let doc = read("Scenarist_SCC V1.0\n\n\n");
    assert!(paragraphs(&doc).is_empty());
}

#[test]
fn configured_alignment_overrides_the_guess() {
    let config = scc::config::SccReaderConfiguration {
        text_align: scc::config::TextAlignment::Center,
    };
    let content = "\
00:00:01:00\t9420 9470 c1c2
00:00:02:00\t942f
";
    let doc = scc::to_model(content, Some(&config), |_| {}).unwrap();
    let ps = paragraphs(&doc);
    assert_eq!(
        doc.style(ps[0], StyleProperty::TextAlign),
        Some(&StyleValue::TextAlign(TextAlign::Center))
    );
}

#[test]
fn drop_frame_time_codes_use_ntsc_rates() {
    let content = "\
00:01:00;02\t9420 9470 c1c2
00:01:10;02\t942f
";
    let doc = read(content);
    let ps = paragraphs(&doc);
    // 1800 frames at 30000/1001 fps
    assert_eq!(doc.begin(ps[0]), Some(&offset_from_ratio(1800 * 1001, 30000)));
}

#[test]
fn disassembly_names_the_codes() {
    let dump =
        scc::to_disassembly("00:00:00:22\t9420 9470 4c6f 7265 6d80\n", false);
    assert!(dump.contains("{RCL}"));
    assert!(dump.contains("{1500}"));
    assert!(dump.contains("Lorem"));
}
