//! Style cascade resolution.
//!
//! The computed value of a property on an element is, in priority order:
//! an active animation step, the inline value, the parent's computed value
//! (inheritable properties), the document initial value, the property
//! default. Relative units are folded to root-relative ones here; the
//! computation order below follows the inter-property dependencies
//! (e.g. `em` lengths need the computed font size).

use std::collections::BTreeSet;

use model::styles::*;
use model::times::TimeOffset;
use model::{Document, ElementKind, NodeId, StyleProperty, StyleValue};

use crate::text;
use crate::{
    has_visible_background, is_display_none, make_absolute, shows_background_always, IsdElement,
    StyleMap,
};

const COMPUTE_ORDER: &[StyleProperty] = &[
    StyleProperty::FontSize,
    StyleProperty::Extent,
    StyleProperty::Position,
    StyleProperty::Origin,
    StyleProperty::LineHeight,
    StyleProperty::LinePadding,
    StyleProperty::RubyReserve,
    StyleProperty::TextOutline,
    StyleProperty::TextShadow,
    StyleProperty::TextEmphasis,
    StyleProperty::Padding,
];

pub(crate) struct Resolver<'a> {
    pub doc: &'a Document,
    pub offset: &'a TimeOffset,
    pub selected_region: &'a str,
    pub default_region: Option<&'a str>,
}

impl Resolver<'_> {
    #[allow(clippy::too_many_arguments)]
    pub fn process(
        &self,
        node: NodeId,
        inherited_region: Option<&str>,
        parent_styles: Option<&StyleMap>,
        parent_kind: Option<ElementKind>,
        parent_begin: Option<&TimeOffset>,
        parent_end: Option<&TimeOffset>,
        region_wm: Option<WritingMode>,
    ) -> Option<IsdElement> {
        let doc = self.doc;
        let kind = doc.kind(node);

        let (begin, end) =
            make_absolute(doc.begin(node), doc.end(node), parent_begin, parent_end);

        // temporally inactive subtrees are pruned wholesale
        if &begin > self.offset {
            return None;
        }
        if let Some(ref e) = end {
            if e <= self.offset {
                return None;
            }
        }

        let associated = doc.region_ref(node).or(inherited_region);

        // An element binds to its associated region, falling back to the
        // first declared region. A leaf bound elsewhere is pruned; a
        // container is kept transparent, since a descendant may override
        // the binding back to the selected region.
        let binds_here = kind == ElementKind::Region
            || associated.or(self.default_region) == Some(self.selected_region);

        if !binds_here && !doc.has_children(node) {
            return None;
        }

        let mut element = IsdElement::new(kind);
        element.id = doc.element_id(node).map(str::to_owned);

        if kind != ElementKind::Br && kind != ElementKind::Text {
            element.lang = doc.element_lang(node).to_string();
            element.space = doc.space(node);
        }

        if kind == ElementKind::Text {
            element.text = doc.text(node).to_string();
        }

        let mut to_compute: BTreeSet<StyleProperty> = BTreeSet::new();

        // animation steps override inline values over their interval
        for step in doc.animation_steps(node) {
            let (anim_begin, anim_end) =
                make_absolute(step.begin.as_ref(), step.end.as_ref(), Some(&begin), end.as_ref());

            if &anim_begin > self.offset {
                continue;
            }
            if let Some(ref e) = anim_end {
                if e <= self.offset {
                    continue;
                }
            }

            if !element.styles.contains_key(&step.property) {
                element.styles.insert(step.property, step.value.clone());
                to_compute.insert(step.property);
            }
        }

        // inline values
        for (property, value) in doc.styles(node) {
            if element.styles.contains_key(&property) {
                continue;
            }
            element.styles.insert(property, value.clone());
            to_compute.insert(property);
        }

        // `position` participates only when explicitly specified; its
        // computed effect is folded into `origin` and never emitted.
        let position_specified = element.styles.contains_key(&StyleProperty::Position);

        // inherited styling
        if !matches!(kind, ElementKind::Br | ElementKind::Text | ElementKind::Region) {
            if let Some(parent) = parent_styles {
                for (property, parent_value) in parent {
                    inherit(*property, parent_value, parent_kind, kind, &mut element.styles);
                }
            }
        }

        // initial values for everything still unset
        if kind != ElementKind::Br && kind != ElementKind::Text {
            for &property in StyleProperty::ALL {
                if element.styles.contains_key(&property) {
                    continue;
                }
                let value = doc
                    .initial_value(property)
                    .cloned()
                    .unwrap_or_else(|| property.initial_value());
                element.styles.insert(property, value);
                to_compute.insert(property);
            }
        }

        if !position_specified {
            to_compute.remove(&StyleProperty::Position);
        }

        let region_wm = if kind == ElementKind::Region {
            crate::region_writing_mode(&element.styles)
        } else {
            region_wm.unwrap_or(WritingMode::Lrtb)
        };

        self.compute_styles(&to_compute, parent_styles, &mut element.styles, region_wm);

        if is_display_none(&element.styles) {
            return None;
        }

        // children
        if kind == ElementKind::Region {
            if let Some(body) = doc.body() {
                if let Some(child) = self.process(
                    body,
                    associated,
                    Some(&element.styles),
                    Some(kind),
                    None,
                    None,
                    Some(region_wm),
                ) {
                    element.children.push(child);
                }
            }
        } else {
            for child in doc.children(node) {
                if let Some(isd_child) = self.process(
                    child,
                    associated,
                    Some(&element.styles),
                    Some(kind),
                    Some(&begin),
                    end.as_ref(),
                    Some(region_wm),
                ) {
                    element.children.push(isd_child);
                }
            }
        }

        if !element.children.is_empty()
            && matches!(kind, ElementKind::P | ElementKind::Rt | ElementKind::Rtc)
        {
            text::process_lwsp(&mut element);
            text::prune_empty_spans(&mut element);
        }

        // only applicable computed values are retained in the ISD
        let applicable = kind.applicable_styles();
        element.styles.retain(|p, _| applicable.contains(p));

        match kind {
            ElementKind::Br | ElementKind::Text | ElementKind::Rb | ElementKind::Rbc => {
                Some(element)
            }
            _ if !element.children.is_empty() => Some(element),
            ElementKind::Region => shows_background_always(&element.styles).then_some(element),
            // an empty subtree survives if it paints a visible background
            // in the selected region
            _ if binds_here && has_visible_background(&element.styles) => Some(element),
            _ => None,
        }
    }

    fn compute_styles(
        &self,
        to_compute: &BTreeSet<StyleProperty>,
        parent_styles: Option<&StyleMap>,
        styles: &mut StyleMap,
        region_wm: WritingMode,
    ) {
        for &property in COMPUTE_ORDER {
            if to_compute.contains(&property) {
                self.compute_one(property, parent_styles, styles, region_wm);
            }
        }
    }

    fn cell_height(&self) -> Length {
        Length::rh(100.0 / self.doc.cell_resolution().rows as f64)
    }

    fn cell_width(&self) -> Length {
        Length::rw(100.0 / self.doc.cell_resolution().columns as f64)
    }

    fn px_height(&self) -> Length {
        Length::rh(100.0 / self.doc.px_resolution().height as f64)
    }

    fn px_width(&self) -> Length {
        Length::rw(100.0 / self.doc.px_resolution().width as f64)
    }

    fn font_size_of(styles: &StyleMap) -> Length {
        styles
            .get(&StyleProperty::FontSize)
            .and_then(StyleValue::as_length)
            .unwrap_or(Length::cells(1.0))
    }

    fn compute_one(
        &self,
        property: StyleProperty,
        parent_styles: Option<&StyleMap>,
        styles: &mut StyleMap,
        region_wm: WritingMode,
    ) {
        let font_size = Self::font_size_of(styles);

        match property {
            StyleProperty::FontSize => {
                let parent_value = parent_styles
                    .and_then(|p| p.get(&StyleProperty::FontSize))
                    .and_then(StyleValue::as_length);
                let pct_ref = parent_value.unwrap_or_else(|| self.cell_height());
                let computed = compute_length(
                    font_size,
                    pct_ref,
                    pct_ref,
                    self.cell_height(),
                    self.px_height(),
                );
                styles.insert(property, StyleValue::Length(computed));
            }

            StyleProperty::Extent => {
                let Some(StyleValue::Extent(extent)) = styles.get(&property).cloned() else {
                    return;
                };
                let height = compute_length(
                    extent.height,
                    Length::rh(100.0),
                    font_size,
                    self.cell_height(),
                    self.px_height(),
                );
                let width = compute_length(
                    extent.width,
                    Length::rw(100.0),
                    font_size,
                    self.cell_width(),
                    self.px_width(),
                );
                styles.insert(property, StyleValue::Extent(Extent { width, height }));
            }

            StyleProperty::Position => {
                // fold the alignment point into an origin, given the
                // computed extent
                let Some(StyleValue::Position(pos)) = styles.get(&property).cloned() else {
                    return;
                };
                let Some(StyleValue::Extent(extent)) =
                    styles.get(&StyleProperty::Extent).cloned()
                else {
                    return;
                };
                if pos.x.unit != LengthUnit::Pct || pos.y.unit != LengthUnit::Pct {
                    log::warn!("non-percentage position values are not supported");
                    return;
                }
                let origin = Position {
                    x: Length::rw((100.0 - extent.width.value) * pos.x.value / 100.0),
                    y: Length::rh((100.0 - extent.height.value) * pos.y.value / 100.0),
                };
                styles.insert(StyleProperty::Origin, StyleValue::Position(origin));
            }

            StyleProperty::Origin => {
                let Some(StyleValue::Position(origin)) = styles.get(&property).cloned() else {
                    return;
                };
                let x = compute_length(
                    origin.x,
                    Length::rw(100.0),
                    font_size,
                    self.cell_width(),
                    self.px_width(),
                );
                let y = compute_length(
                    origin.y,
                    Length::rh(100.0),
                    font_size,
                    self.cell_height(),
                    self.px_height(),
                );
                styles.insert(property, StyleValue::Position(Position { x, y }));
            }

            StyleProperty::LineHeight => {
                let Some(StyleValue::LineHeight(value)) = styles.get(&property).cloned() else {
                    return;
                };
                if let LineHeight::Length(length) = value {
                    let computed = compute_length(
                        length,
                        font_size,
                        font_size,
                        self.cell_height(),
                        self.px_height(),
                    );
                    styles.insert(
                        property,
                        StyleValue::LineHeight(LineHeight::Length(computed)),
                    );
                }
            }

            StyleProperty::LinePadding => {
                let Some(StyleValue::Length(value)) = styles.get(&property).cloned() else {
                    return;
                };
                let computed = compute_length(
                    value,
                    font_size,
                    font_size,
                    self.cell_height(),
                    self.px_height(),
                );
                styles.insert(property, StyleValue::Length(computed));
            }

            StyleProperty::RubyReserve => {
                let Some(StyleValue::RubyReserve(value)) = styles.get(&property).cloned() else {
                    return;
                };
                let RubyReserve::Reserve { position, length } = value else {
                    return;
                };
                let length = match length {
                    Some(l) => compute_length(
                        l,
                        font_size,
                        font_size,
                        self.cell_height(),
                        self.px_height(),
                    ),
                    None => Length::new(font_size.value / 2.0, font_size.unit),
                };
                styles.insert(
                    property,
                    StyleValue::RubyReserve(RubyReserve::Reserve {
                        position,
                        length: Some(length),
                    }),
                );
            }

            StyleProperty::TextOutline => {
                let Some(StyleValue::TextOutline(value)) = styles.get(&property).cloned() else {
                    return;
                };
                let TextOutline::Outline { color, thickness } = value else {
                    return;
                };
                let color =
                    color.or_else(|| styles.get(&StyleProperty::Color).and_then(StyleValue::as_color));
                let thickness = compute_length(
                    thickness,
                    font_size,
                    font_size,
                    self.cell_height(),
                    self.px_height(),
                );
                styles.insert(
                    property,
                    StyleValue::TextOutline(TextOutline::Outline { color, thickness }),
                );
            }

            StyleProperty::TextShadow => {
                let Some(StyleValue::TextShadow(value)) = styles.get(&property).cloned() else {
                    return;
                };
                let TextShadow::Shadows(shadows) = value else {
                    return;
                };
                let element_color =
                    styles.get(&StyleProperty::Color).and_then(StyleValue::as_color);
                let computed = shadows
                    .into_iter()
                    .map(|shadow| Shadow {
                        x_offset: compute_length(
                            shadow.x_offset,
                            font_size,
                            font_size,
                            self.cell_height(),
                            self.px_height(),
                        ),
                        y_offset: compute_length(
                            shadow.y_offset,
                            font_size,
                            font_size,
                            self.cell_height(),
                            self.px_height(),
                        ),
                        blur_radius: shadow.blur_radius.map(|b| {
                            compute_length(
                                b,
                                font_size,
                                font_size,
                                self.cell_height(),
                                self.px_height(),
                            )
                        }),
                        color: shadow.color.or(element_color),
                    })
                    .collect();
                styles.insert(property, StyleValue::TextShadow(TextShadow::Shadows(computed)));
            }

            StyleProperty::TextEmphasis => {
                let Some(StyleValue::TextEmphasis(value)) = styles.get(&property).cloned() else {
                    return;
                };
                if value.style == TextEmphasisStyle::None {
                    return;
                }
                let color = value
                    .color
                    .or_else(|| styles.get(&StyleProperty::Color).and_then(StyleValue::as_color));
                let style = if value.style == TextEmphasisStyle::Auto {
                    if region_wm.is_vertical() {
                        TextEmphasisStyle::FilledSesame
                    } else {
                        TextEmphasisStyle::FilledCircle
                    }
                } else {
                    value.style
                };
                styles.insert(
                    property,
                    StyleValue::TextEmphasis(TextEmphasis { style, color, ..value }),
                );
            }

            StyleProperty::Padding => {
                let Some(StyleValue::Padding(padding)) = styles.get(&property).cloned() else {
                    return;
                };
                let Some(StyleValue::Extent(extent)) =
                    styles.get(&StyleProperty::Extent).cloned()
                else {
                    return;
                };
                let wm = match styles.get(&StyleProperty::WritingMode) {
                    Some(StyleValue::WritingMode(wm)) => *wm,
                    _ => region_wm,
                };
                let vertical = wm.is_vertical();

                let (block_pct, block_c, block_px) = if vertical {
                    (extent.width, self.cell_width(), self.px_width())
                } else {
                    (extent.height, self.cell_height(), self.px_height())
                };
                let (inline_pct, inline_c, inline_px) = if vertical {
                    (extent.height, self.cell_height(), self.px_height())
                } else {
                    (extent.width, self.cell_width(), self.px_width())
                };

                let computed = Padding {
                    before: compute_length(padding.before, block_pct, font_size, block_c, block_px),
                    end: compute_length(padding.end, inline_pct, font_size, inline_c, inline_px),
                    after: compute_length(padding.after, block_pct, font_size, block_c, block_px),
                    start: compute_length(padding.start, inline_pct, font_size, inline_c, inline_px),
                };
                styles.insert(property, StyleValue::Padding(computed));
            }

            _ => {}
        }
    }
}

/// Folds a relative length onto the given references.
fn compute_length(
    source: Length,
    pct_ref: Length,
    em_ref: Length,
    c_ref: Length,
    px_ref: Length,
) -> Length {
    match source.unit {
        LengthUnit::Pct => Length::new(source.value * pct_ref.value / 100.0, pct_ref.unit),
        LengthUnit::Em => Length::new(source.value * em_ref.value, em_ref.unit),
        LengthUnit::C => Length::new(source.value * c_ref.value, c_ref.unit),
        LengthUnit::Px => Length::new(source.value * px_ref.value, px_ref.unit),
        LengthUnit::Rh | LengthUnit::Rw => source,
    }
}

/// Applies one parent property to a child during the cascade.
fn inherit(
    property: StyleProperty,
    parent_value: &StyleValue,
    parent_kind: Option<ElementKind>,
    kind: ElementKind,
    styles: &mut StyleMap,
) {
    match property {
        StyleProperty::FontSize => {
            if styles.contains_key(&property) {
                return;
            }
            let Some(parent_length) = parent_value.as_length() else {
                return;
            };
            // ruby text renders at half the base font size by default
            let halved = kind == ElementKind::Rtc
                || (kind == ElementKind::Rt && parent_kind != Some(ElementKind::Rtc));
            let value = if halved {
                Length::new(parent_length.value / 2.0, parent_length.unit)
            } else {
                parent_length
            };
            styles.insert(property, StyleValue::Length(value));
        }

        StyleProperty::TextDecoration => {
            let StyleValue::TextDecoration(parent_deco) = parent_value else {
                return;
            };
            let merged = match styles.get(&property) {
                Some(StyleValue::TextDecoration(specified)) => TextDecoration {
                    underline: specified.underline.or(parent_deco.underline),
                    line_through: specified.line_through.or(parent_deco.line_through),
                    overline: specified.overline.or(parent_deco.overline),
                },
                _ => *parent_deco,
            };
            styles.insert(property, StyleValue::TextDecoration(merged));
        }

        _ => {
            if property.is_inherited() && !styles.contains_key(&property) {
                styles.insert(property, parent_value.clone());
            }
        }
    }
}
