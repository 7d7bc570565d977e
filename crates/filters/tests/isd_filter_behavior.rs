use filters::isd_filters::{DefaultStyleValues, MergeParagraphs, MergeRegions, SupportedStyles};
use filters::IsdFilter;
use isd::{Isd, IsdElement, IsdRegion, StyleMap};
use model::styles::named;
use model::{CellResolution, ElementKind, PixelResolution, StyleProperty, StyleValue};

fn text(content: &str) -> IsdElement {
    let mut t = IsdElement::new(ElementKind::Text);
    t.text = content.to_string();
    t
}

fn paragraph(content: &str) -> IsdElement {
    let mut span = IsdElement::new(ElementKind::Span);
    span.children.push(text(content));
    let mut p = IsdElement::new(ElementKind::P);
    p.children.push(span);
    p
}

fn region_with_paragraphs(id: &str, contents: &[&str]) -> IsdRegion {
    let mut div = IsdElement::new(ElementKind::Div);
    for content in contents {
        div.children.push(paragraph(content));
    }
    let mut body = IsdElement::new(ElementKind::Body);
    body.children.push(div);
    IsdRegion { id: id.to_string(), styles: StyleMap::new(), children: vec![body] }
}

fn isd_with(regions: Vec<IsdRegion>) -> Isd {
    Isd {
        lang: String::new(),
        cell_resolution: CellResolution::default(),
        px_resolution: PixelResolution::default(),
        active_area: None,
        regions,
    }
}

fn gathered_text(element: &IsdElement) -> String {
    let mut out = element.text.clone();
    for child in &element.children {
        if child.kind == ElementKind::Br {
            out.push('\n');
        }
        out.push_str(&gathered_text(child));
    }
    out
}

#[test]
fn regions_merge_into_one() {
    let mut isd = isd_with(vec![
        region_with_paragraphs("a", &["first"]),
        region_with_paragraphs("b", &["second"]),
    ]);

    MergeRegions.process(&mut isd).unwrap();

    assert_eq!(isd.regions.len(), 1);
    assert_eq!(isd.regions[0].id, "a_b");
    let body = &isd.regions[0].children[0];
    assert_eq!(gathered_text(body), "firstsecond");
}

#[test]
fn merging_leaves_single_regions_untouched() {
    let mut isd = isd_with(vec![region_with_paragraphs("only", &["text"])]);
    let before = isd.clone();
    MergeRegions.process(&mut isd).unwrap();
    assert_eq!(isd, before);
}

#[test]
fn paragraphs_merge_with_breaks_between() {
    let mut isd = isd_with(vec![region_with_paragraphs("r", &["one", "two"])]);

    MergeParagraphs.process(&mut isd).unwrap();

    let body = &isd.regions[0].children[0];
    assert_eq!(body.children.len(), 1);
    let div = &body.children[0];
    assert_eq!(div.children.len(), 1);
    assert_eq!(gathered_text(&div.children[0]), "one\ntwo");
}

#[test]
fn unsupported_styles_are_stripped() {
    let mut isd = isd_with(vec![region_with_paragraphs("r", &["styled"])]);
    let span = &mut isd.regions[0].children[0].children[0].children[0].children[0];
    span.styles.insert(StyleProperty::Color, StyleValue::Color(named::RED));
    span.styles.insert(StyleProperty::Opacity, StyleValue::Number(0.5));

    let supported = [(StyleProperty::Color, vec![])].into_iter().collect();
    SupportedStyles::new(supported).process(&mut isd).unwrap();

    let span = &isd.regions[0].children[0].children[0].children[0].children[0];
    assert_eq!(span.styles.len(), 1);
    assert!(span.style(StyleProperty::Color).is_some());
}

#[test]
fn default_values_are_pruned_unless_parent_differs() {
    let mut isd = isd_with(vec![region_with_paragraphs("r", &["x"])]);
    {
        let p = &mut isd.regions[0].children[0].children[0].children[0];
        p.styles.insert(StyleProperty::Color, StyleValue::Color(named::RED));
        let span = &mut p.children[0];
        // white on the child resets the parent's red; it must survive
        span.styles.insert(StyleProperty::Color, StyleValue::Color(named::WHITE));
    }

    let defaults = [(StyleProperty::Color, StyleValue::Color(named::WHITE))]
        .into_iter()
        .collect();
    DefaultStyleValues::new(defaults).process(&mut isd).unwrap();

    let p = &isd.regions[0].children[0].children[0].children[0];
    let span = &p.children[0];
    assert!(span.style(StyleProperty::Color).is_some(), "reset value was pruned");

    // a plain default with no overriding parent is pruned
    let mut isd = isd_with(vec![region_with_paragraphs("r", &["y"])]);
    isd.regions[0].children[0].children[0].children[0].children[0]
        .styles
        .insert(StyleProperty::Color, StyleValue::Color(named::WHITE));
    let defaults = [(StyleProperty::Color, StyleValue::Color(named::WHITE))]
        .into_iter()
        .collect();
    DefaultStyleValues::new(defaults).process(&mut isd).unwrap();
    let span = &isd.regions[0].children[0].children[0].children[0].children[0];
    assert!(span.style(StyleProperty::Color).is_none());
}
