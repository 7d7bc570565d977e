use isd::{from_model, generate_isd_sequence, significant_times, Isd, IsdElement};
use model::styles::{
    named, Length, LengthUnit, Position, ShowBackground, WhiteSpaceHandling,
};
use model::times::{offset_from_ratio, offset_from_secs};
use model::{
    AnimationStep, Document, ElementKind, NodeId, StyleProperty, StyleValue,
};

fn simple_doc() -> (Document, NodeId) {
    let mut doc = Document::new();
    doc.put_region("r1").unwrap();
    let body = doc.create_element(ElementKind::Body).unwrap();
    doc.set_body(Some(body)).unwrap();
    (doc, body)
}

fn paragraph_with_text(doc: &mut Document, parent: NodeId, text: &str) -> (NodeId, NodeId) {
    let div = doc.create_element(ElementKind::Div).unwrap();
    doc.push_child(parent, div).unwrap();
    let p = doc.create_element(ElementKind::P).unwrap();
    doc.push_child(div, p).unwrap();
    let span = doc.create_element(ElementKind::Span).unwrap();
    doc.push_child(p, span).unwrap();
    let t = doc.create_text(text);
    doc.push_child(span, t).unwrap();
    (div, span)
}

fn find_kind<'a>(element: &'a IsdElement, kind: ElementKind) -> Option<&'a IsdElement> {
    if element.kind == kind {
        return Some(element);
    }
    element.children.iter().find_map(|c| find_kind(c, kind))
}

fn gathered_text(element: &IsdElement) -> String {
    let mut out = element.text.clone();
    for child in &element.children {
        out.push_str(&gathered_text(child));
    }
    out
}

#[test]
fn timed_div_is_active_within_its_interval_only() {
    let (mut doc, body) = simple_doc();
    let (div, _) = paragraph_with_text(&mut doc, body, "X");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_begin(div, Some(offset_from_secs(1))).unwrap();
    doc.set_end(div, Some(offset_from_secs(3))).unwrap();
    let region = doc.region("r1").unwrap();
    doc.set_style(
        region,
        StyleProperty::ShowBackground,
        Some(StyleValue::ShowBackground(ShowBackground::WhenActive)),
    )
    .unwrap();

    // inclusive lower bound
    let isd = from_model(&doc, &offset_from_secs(1)).unwrap();
    assert_eq!(isd.regions.len(), 1);
    let p = find_kind(&isd.regions[0].children[0], ElementKind::P).unwrap();
    assert_eq!(gathered_text(p), "X");

    // exclusive upper bound
    let isd = from_model(&doc, &offset_from_secs(3)).unwrap();
    assert!(isd.is_empty());

    // before the interval
    let isd = from_model(&doc, &offset_from_ratio(1, 2)).unwrap();
    assert!(isd.is_empty());
}

#[test]
fn zero_length_elements_are_never_active() {
    let (mut doc, body) = simple_doc();
    let (div, _) = paragraph_with_text(&mut doc, body, "X");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_begin(div, Some(offset_from_secs(2))).unwrap();
    doc.set_end(div, Some(offset_from_secs(2))).unwrap();
    let region = doc.region("r1").unwrap();
    doc.set_style(
        region,
        StyleProperty::ShowBackground,
        Some(StyleValue::ShowBackground(ShowBackground::WhenActive)),
    )
    .unwrap();

    let isd = from_model(&doc, &offset_from_secs(2)).unwrap();
    assert!(isd.is_empty());
}

#[test]
fn animation_steps_override_inline_styles_over_their_interval() {
    let (mut doc, body) = simple_doc();
    let (div, span) = paragraph_with_text(&mut doc, body, "t");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_style(span, StyleProperty::Color, Some(StyleValue::Color(named::RED))).unwrap();
    doc.add_animation_step(
        span,
        AnimationStep {
            property: StyleProperty::Color,
            begin: Some(offset_from_secs(1)),
            end: Some(offset_from_secs(2)),
            value: StyleValue::Color(named::GREEN),
        },
    )
    .unwrap();

    let color_at = |t| {
        let isd = from_model(&doc, &t).unwrap();
        let span = find_kind(&isd.regions[0].children[0], ElementKind::Span).unwrap();
        span.style(StyleProperty::Color).unwrap().as_color().unwrap()
    };

    assert_eq!(color_at(offset_from_ratio(1, 2)), named::RED);
    assert_eq!(color_at(offset_from_ratio(3, 2)), named::GREEN);
    assert_eq!(color_at(offset_from_secs(2)), named::RED);
}

#[test]
fn inheritable_styles_cascade_from_ancestors() {
    let (mut doc, body) = simple_doc();
    let (div, _) = paragraph_with_text(&mut doc, body, "t");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_style(body, StyleProperty::Color, Some(StyleValue::Color(named::BLUE))).unwrap();

    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    let span = find_kind(&isd.regions[0].children[0], ElementKind::Span).unwrap();
    assert_eq!(span.style(StyleProperty::Color).unwrap().as_color().unwrap(), named::BLUE);

    // color is not applicable on body and is dropped there
    let body = &isd.regions[0].children[0];
    assert_eq!(body.kind, ElementKind::Body);
    assert!(body.style(StyleProperty::Color).is_none());
}

#[test]
fn percentage_origins_resolve_to_root_relative_units() {
    let mut doc = Document::new();
    let region = doc.put_region("r1").unwrap();
    doc.set_style(
        region,
        StyleProperty::Origin,
        Some(StyleValue::Position(Position {
            x: Length::pct(10.0),
            y: Length::pct(20.0),
        })),
    )
    .unwrap();

    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    // showBackground defaults to always, so the empty region materializes
    assert_eq!(isd.regions.len(), 1);

    let Some(StyleValue::Position(origin)) = isd.regions[0].style(StyleProperty::Origin) else {
        panic!("origin missing");
    };
    assert_eq!(origin.x, Length::new(10.0, LengthUnit::Rw));
    assert_eq!(origin.y, Length::new(20.0, LengthUnit::Rh));
}

#[test]
fn significant_times_start_at_zero_and_increase_strictly() {
    let (mut doc, body) = simple_doc();
    let (div, span) = paragraph_with_text(&mut doc, body, "t");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_begin(div, Some(offset_from_secs(1))).unwrap();
    doc.set_end(div, Some(offset_from_secs(3))).unwrap();
    doc.add_animation_step(
        span,
        AnimationStep {
            property: StyleProperty::Color,
            begin: Some(offset_from_secs(1)),
            end: Some(offset_from_secs(2)),
            value: StyleValue::Color(named::GREEN),
        },
    )
    .unwrap();

    let times = significant_times(&doc);
    assert_eq!(times[0], offset_from_secs(0));
    for pair in times.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    // 0, 1 (div begin), 2 (animation end, relative to div begin: 1+1 and 1+2
    // clipped), 3 (div end)
    assert!(times.contains(&offset_from_secs(1)));
    assert!(times.contains(&offset_from_secs(3)));

    // the ISD is constant between consecutive significant times
    let a = from_model(&doc, &offset_from_ratio(11, 10)).unwrap();
    let b = from_model(&doc, &offset_from_ratio(19, 10)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn isd_sequence_covers_every_significant_time() {
    let (mut doc, body) = simple_doc();
    let (div, _) = paragraph_with_text(&mut doc, body, "t");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_begin(div, Some(offset_from_secs(1))).unwrap();
    doc.set_end(div, Some(offset_from_secs(3))).unwrap();

    let mut ticks = 0usize;
    let sequence = generate_isd_sequence(&doc, |_| ticks += 1).unwrap();
    assert_eq!(sequence.len(), significant_times(&doc).len());
    assert_eq!(ticks, sequence.len());
}

#[test]
fn always_shown_region_materializes_without_content() {
    let mut doc = Document::new();
    doc.put_region("background").unwrap();

    let isd = from_model(&doc, &offset_from_secs(5)).unwrap();
    assert_eq!(isd.regions.len(), 1);
    assert!(isd.regions[0].is_empty());
}

#[test]
fn unregioned_content_binds_to_the_first_declared_region() {
    let mut doc = Document::new();
    doc.put_region("first").unwrap();
    doc.put_region("second").unwrap();
    let body = doc.create_element(ElementKind::Body).unwrap();
    doc.set_body(Some(body)).unwrap();
    paragraph_with_text(&mut doc, body, "hello");

    for region in ["first", "second"] {
        let r = doc.region(region).unwrap();
        doc.set_style(
            r,
            StyleProperty::ShowBackground,
            Some(StyleValue::ShowBackground(ShowBackground::WhenActive)),
        )
        .unwrap();
    }

    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    assert_eq!(isd.regions.len(), 1);
    assert_eq!(isd.regions[0].id, "first");
}

#[test]
fn regioned_descendants_surface_through_transparent_ancestors() {
    let mut doc = Document::new();
    doc.put_region("r1").unwrap();
    doc.put_region("r2").unwrap();
    let body = doc.create_element(ElementKind::Body).unwrap();
    doc.set_body(Some(body)).unwrap();
    let (div, _) = paragraph_with_text(&mut doc, body, "in r2");
    doc.set_region_ref(div, Some("r2")).unwrap();

    let r1 = doc.region("r1").unwrap();
    doc.set_style(
        r1,
        StyleProperty::ShowBackground,
        Some(StyleValue::ShowBackground(ShowBackground::WhenActive)),
    )
    .unwrap();

    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    assert_eq!(isd.regions.len(), 1);
    assert_eq!(isd.regions[0].id, "r2");
    let p = find_kind(&isd.regions[0].children[0], ElementKind::P).unwrap();
    assert_eq!(gathered_text(p), "in r2");
}

#[test]
fn descendants_can_rebind_out_of_an_ancestor_bound_elsewhere() {
    let mut doc = Document::new();
    doc.put_region("r1").unwrap();
    doc.put_region("r2").unwrap();
    for region in ["r1", "r2"] {
        let r = doc.region(region).unwrap();
        doc.set_style(
            r,
            StyleProperty::ShowBackground,
            Some(StyleValue::ShowBackground(ShowBackground::WhenActive)),
        )
        .unwrap();
    }

    let body = doc.create_element(ElementKind::Body).unwrap();
    doc.set_body(Some(body)).unwrap();
    let div = doc.create_element(ElementKind::Div).unwrap();
    doc.push_child(body, div).unwrap();
    let p = doc.create_element(ElementKind::P).unwrap();
    doc.push_child(div, p).unwrap();
    doc.set_region_ref(p, Some("r2")).unwrap();

    // one span stays with the paragraph's region, the other overrides it
    let span_a = doc.create_element(ElementKind::Span).unwrap();
    doc.push_child(p, span_a).unwrap();
    let t = doc.create_text("two");
    doc.push_child(span_a, t).unwrap();

    let span_b = doc.create_element(ElementKind::Span).unwrap();
    doc.push_child(p, span_b).unwrap();
    doc.set_region_ref(span_b, Some("r1")).unwrap();
    let t = doc.create_text("one");
    doc.push_child(span_b, t).unwrap();

    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    assert_eq!(isd.regions.len(), 2);

    let r1 = isd.region("r1").unwrap();
    let p1 = find_kind(&r1.children[0], ElementKind::P).unwrap();
    assert_eq!(gathered_text(p1), "one");

    let r2 = isd.region("r2").unwrap();
    let p2 = find_kind(&r2.children[0], ElementKind::P).unwrap();
    assert_eq!(gathered_text(p2), "two");
}

#[test]
fn empty_spans_with_a_visible_background_survive() {
    let (mut doc, body) = simple_doc();
    let (div, span) = paragraph_with_text(&mut doc, body, "   ");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_style(span, StyleProperty::BackgroundColor, Some(StyleValue::Color(named::BLACK)))
        .unwrap();

    // the whitespace-only payload collapses away, but the span paints a
    // box and must stay
    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    let span = find_kind(&isd.regions[0].children[0], ElementKind::Span).unwrap();
    assert!(span.children.is_empty());
    assert_eq!(
        span.style(StyleProperty::BackgroundColor).unwrap().as_color().unwrap(),
        named::BLACK
    );
}

#[test]
fn empty_paragraphs_with_a_visible_background_survive() {
    let (mut doc, body) = simple_doc();
    let div = doc.create_element(ElementKind::Div).unwrap();
    doc.push_child(body, div).unwrap();
    doc.set_region_ref(div, Some("r1")).unwrap();
    let p = doc.create_element(ElementKind::P).unwrap();
    doc.push_child(div, p).unwrap();
    doc.set_style(p, StyleProperty::BackgroundColor, Some(StyleValue::Color(named::BLUE)))
        .unwrap();

    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    let p = find_kind(&isd.regions[0].children[0], ElementKind::P).unwrap();
    assert!(p.children.is_empty());
}

fn assert_styles_resolved(element: &IsdElement) {
    for (property, value) in &element.styles {
        assert!(property.validates(value), "{property:?} outside its domain");
        assert!(
            element.kind.applicable_styles().contains(property),
            "{property:?} retained on {:?}",
            element.kind
        );
    }
    for child in &element.children {
        assert_styles_resolved(child);
    }
}

#[test]
fn resolved_styles_are_total_and_domain_valid() {
    let (mut doc, body) = simple_doc();
    let (div, span) = paragraph_with_text(&mut doc, body, "t");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_style(span, StyleProperty::FontSize, Some(StyleValue::Length(Length::pct(50.0))))
        .unwrap();

    let isd = from_model(&doc, &offset_from_secs(0)).unwrap();
    for region in &isd.regions {
        for (property, value) in &region.styles {
            assert!(property.validates(value));
        }
        for child in &region.children {
            assert_styles_resolved(child);
        }
        // a region's computed map covers all its applicable properties
        for property in ElementKind::Region.applicable_styles() {
            assert!(region.styles.contains_key(property), "missing {property:?}");
        }
    }
}

#[test]
fn regenerating_an_isd_shaped_document_is_stable() {
    // Embed an ISD back into a CDM (all styles inline, no timing) and take
    // its snapshot again: the resolved result must not change.
    let (mut doc, body) = simple_doc();
    let (div, span) = paragraph_with_text(&mut doc, body, "t");
    doc.set_region_ref(div, Some("r1")).unwrap();
    doc.set_style(span, StyleProperty::Color, Some(StyleValue::Color(named::RED))).unwrap();

    let first = from_model(&doc, &offset_from_secs(0)).unwrap();
    let rebuilt = rebuild_document(&first);
    let second = from_model(&rebuilt, &offset_from_secs(0)).unwrap();
    assert_eq!(first, second);
}

fn rebuild_document(isd: &Isd) -> Document {
    let mut doc = Document::new();
    doc.set_cell_resolution(isd.cell_resolution);
    doc.set_px_resolution(isd.px_resolution);
    doc.set_lang(isd.lang.clone());

    for region in &isd.regions {
        let node = doc.put_region(&region.id).unwrap();
        for (property, value) in &region.styles {
            doc.set_style(node, *property, Some(value.clone())).unwrap();
        }
        for body in &region.children {
            let body_node = rebuild_element(&mut doc, body, &region.id);
            doc.set_body(Some(body_node)).unwrap();
        }
    }
    doc
}

fn rebuild_element(doc: &mut Document, element: &IsdElement, region: &str) -> NodeId {
    let node = match element.kind {
        ElementKind::Text => doc.create_text(element.text.clone()),
        kind => {
            let node = doc.create_element(kind).unwrap();
            for (property, value) in &element.styles {
                doc.set_style(node, *property, Some(value.clone())).unwrap();
            }
            if element.kind == ElementKind::Body {
                doc.set_region_ref(node, Some(region)).unwrap();
            }
            if element.space == WhiteSpaceHandling::Preserve {
                doc.set_space(node, WhiteSpaceHandling::Preserve);
            }
            node
        }
    };
    let children: Vec<NodeId> =
        element.children.iter().map(|c| rebuild_element(doc, c, region)).collect();
    if !children.is_empty() {
        doc.push_children(node, &children).unwrap();
    }
    node
}
