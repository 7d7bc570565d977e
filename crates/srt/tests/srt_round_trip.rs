use model::styles::{named, FontStyle, FontWeight};
use model::times::offset_from_millis;
use model::{Document, ElementKind, NodeId, StyleProperty, StyleValue};

const SAMPLE: &str = "\
1
00:00:01,000 --> 00:00:02,500
Hello <i>there</i>

2
00:00:03,000 --> 00:00:04,000
<b>Bold</b> and
<font color=\"red\">red</font>
";

fn paragraphs(doc: &Document) -> Vec<NodeId> {
    let body = doc.body().unwrap();
    let div = doc.children(body).next().unwrap();
    doc.children(div).collect()
}

fn subtree_text(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for n in doc.dfs(node) {
        match doc.kind(n) {
            ElementKind::Text => out.push_str(doc.text(n)),
            ElementKind::Br => out.push('\n'),
            _ => {}
        }
    }
    out
}

#[test]
fn reader_builds_timed_styled_paragraphs() {
    let doc = srt::to_model(SAMPLE, |_| {}).unwrap();
    let ps = paragraphs(&doc);
    assert_eq!(ps.len(), 2);

    assert_eq!(doc.begin(ps[0]), Some(&offset_from_millis(1000)));
    assert_eq!(doc.end(ps[0]), Some(&offset_from_millis(2500)));
    assert_eq!(subtree_text(&doc, ps[0]), "Hello there");

    // the italic tag produced a styled span
    let italic = doc
        .dfs(ps[0])
        .find(|n| {
            doc.style(*n, StyleProperty::FontStyle)
                == Some(&StyleValue::FontStyle(FontStyle::Italic))
        })
        .expect("italic span");
    assert_eq!(subtree_text(&doc, italic), "there");

    assert_eq!(subtree_text(&doc, ps[1]), "Bold and\nred");
    let bold = doc
        .dfs(ps[1])
        .find(|n| {
            doc.style(*n, StyleProperty::FontWeight)
                == Some(&StyleValue::FontWeight(FontWeight::Bold))
        })
        .expect("bold span");
    assert_eq!(subtree_text(&doc, bold), "Bold");

    let red = doc
        .dfs(ps[1])
        .find(|n| doc.style(*n, StyleProperty::Color) == Some(&StyleValue::Color(named::RED)))
        .expect("red span");
    assert_eq!(subtree_text(&doc, red), "red");
}

#[test]
fn missing_counter_is_a_parse_error() {
    let bad = "00:00:01,000 --> 00:00:02,000\nno counter\n";
    assert!(srt::to_model(bad, |_| {}).is_err());
}

#[test]
fn writer_round_trips_text_and_formatting() {
    let doc = srt::to_model(SAMPLE, |_| {}).unwrap();
    let out = srt::from_model(&doc, None, |_| {}).unwrap();

    assert!(out.contains("00:00:01,000 --> 00:00:02,500"), "bad timing in {out}");
    assert!(out.contains("Hello <i>there</i>"), "italic lost in {out}");
    assert!(out.contains("<b>Bold</b>"), "bold lost in {out}");
    assert!(out.contains("<font color=\"#ff0000ff\">red</font>"), "color lost in {out}");

    // cues are numbered from one
    assert!(out.starts_with("1\n"), "bad counter in {out}");
}

#[test]
fn formatting_can_be_disabled() {
    let doc = srt::to_model(SAMPLE, |_| {}).unwrap();
    let config = srt::config::SrtWriterConfiguration { text_formatting: false };
    let out = srt::from_model(&doc, Some(&config), |_| {}).unwrap();
    assert!(!out.contains('<'), "tags present in {out}");
}
