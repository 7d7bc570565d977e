//! Intermediate Synchronic Document generation.
//!
//! An [`Isd`] is a snapshot of a [`model::Document`] at one instant: the
//! regions active at that time, each holding a deep copy of the content
//! subtree restricted to active elements, with every style property
//! resolved to a computed value and all timing stripped.

mod resolve;
mod text;

use std::collections::{BTreeMap, BTreeSet};

use model::styles::{Display, ShowBackground, WhiteSpaceHandling, WritingMode};
use model::times::TimeOffset;
use model::{
    ActiveArea, CellResolution, Document, ElementKind, Error, NodeId, PixelResolution,
    StyleProperty, StyleValue,
};
use num_traits::Signed;

/// Fully resolved styles of one ISD node.
pub type StyleMap = BTreeMap<StyleProperty, StyleValue>;

/// A style-resolved, timing-free content element.
#[derive(Debug, Clone, PartialEq)]
pub struct IsdElement {
    pub kind: ElementKind,
    pub id: Option<String>,
    pub lang: String,
    pub space: WhiteSpaceHandling,
    pub styles: StyleMap,
    /// Character payload of `Text` nodes.
    pub text: String,
    pub children: Vec<IsdElement>,
}

impl IsdElement {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            lang: String::new(),
            space: WhiteSpaceHandling::Default,
            styles: StyleMap::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn style(&self, property: StyleProperty) -> Option<&StyleValue> {
        self.styles.get(&property)
    }
}

/// A materialized region of an ISD, holding at most one body subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct IsdRegion {
    pub id: String,
    pub styles: StyleMap,
    pub children: Vec<IsdElement>,
}

impl IsdRegion {
    pub fn style(&self, property: StyleProperty) -> Option<&StyleValue> {
        self.styles.get(&property)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// An Intermediate Synchronic Document.
#[derive(Debug, Clone, PartialEq)]
pub struct Isd {
    pub lang: String,
    pub cell_resolution: CellResolution,
    pub px_resolution: PixelResolution,
    pub active_area: Option<ActiveArea>,
    /// Regions in document declaration order.
    pub regions: Vec<IsdRegion>,
}

impl Isd {
    pub fn region(&self, id: &str) -> Option<&IsdRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

pub(crate) fn make_absolute(
    begin_offset: Option<&TimeOffset>,
    end_offset: Option<&TimeOffset>,
    parent_begin: Option<&TimeOffset>,
    parent_end: Option<&TimeOffset>,
) -> (TimeOffset, Option<TimeOffset>) {
    let zero = TimeOffset::from_integer(0.into());
    let base = parent_begin.cloned().unwrap_or_else(|| zero.clone());

    let begin = &base + begin_offset.cloned().unwrap_or(zero);

    let end = match end_offset {
        Some(e) => {
            let end = &base + e;
            match parent_end {
                Some(pe) => Some(end.min(pe.clone())),
                None => Some(end),
            }
        }
        None => parent_end.cloned(),
    };

    (begin, end)
}

fn collect_times(
    doc: &Document,
    node: NodeId,
    parent_begin: Option<&TimeOffset>,
    parent_end: Option<&TimeOffset>,
    times: &mut BTreeSet<TimeOffset>,
) {
    let (begin, end) = make_absolute(doc.begin(node), doc.end(node), parent_begin, parent_end);

    times.insert(begin.clone());
    if let Some(ref e) = end {
        times.insert(e.clone());
    }

    for step in doc.animation_steps(node) {
        let (anim_begin, anim_end) =
            make_absolute(step.begin.as_ref(), step.end.as_ref(), Some(&begin), end.as_ref());
        times.insert(anim_begin);
        if let Some(e) = anim_end {
            times.insert(e);
        }
    }

    for child in doc.children(node) {
        collect_times(doc, child, Some(&begin), end.as_ref(), times);
    }
}

/// The strictly increasing sequence of instants at which the ISD of `doc`
/// can change, starting at zero.
pub fn significant_times(doc: &Document) -> Vec<TimeOffset> {
    let mut times = BTreeSet::new();
    times.insert(TimeOffset::from_integer(0.into()));

    for region in doc.regions() {
        collect_times(doc, region, None, None, &mut times);
    }

    if let Some(body) = doc.body() {
        collect_times(doc, body, None, None, &mut times);
    }

    times.into_iter().collect()
}

/// Builds the ISD of `doc` at `offset`.
pub fn from_model(doc: &Document, offset: &TimeOffset) -> Result<Isd, Error> {
    if offset.is_negative() {
        return Err(Error::Domain("ISD offset must not be negative".into()));
    }

    let default_region = doc.default_region().and_then(|r| doc.element_id(r)).map(str::to_owned);

    let mut regions = Vec::new();

    for region_node in doc.regions() {
        let region_id = doc.element_id(region_node).unwrap_or_default().to_string();
        let resolver = resolve::Resolver {
            doc,
            offset,
            selected_region: &region_id,
            default_region: default_region.as_deref(),
        };

        if let Some(element) = resolver.process(region_node, None, None, None, None, None, None) {
            regions.push(IsdRegion {
                id: region_id,
                styles: element.styles,
                children: element.children,
            });
        }
    }

    Ok(Isd {
        lang: doc.lang().to_string(),
        cell_resolution: doc.cell_resolution(),
        px_resolution: doc.px_resolution(),
        active_area: doc.active_area(),
        regions,
    })
}

/// Builds the full ISD sequence of `doc`: one `(begin, Isd)` pair per
/// significant time, in increasing order. Consecutive pairs delimit
/// half-open presentation intervals. `progress` is invoked after each step
/// with a completion fraction.
pub fn generate_isd_sequence(
    doc: &Document,
    mut progress: impl FnMut(f64),
) -> Result<Vec<(TimeOffset, Isd)>, Error> {
    let times = significant_times(doc);
    let total = times.len();
    let mut sequence = Vec::with_capacity(total);

    for (index, time) in times.into_iter().enumerate() {
        let isd = from_model(doc, &time)?;
        sequence.push((time, isd));
        progress((index + 1) as f64 / total as f64);
    }

    Ok(sequence)
}

pub(crate) fn region_writing_mode(styles: &StyleMap) -> WritingMode {
    match styles.get(&StyleProperty::WritingMode) {
        Some(StyleValue::WritingMode(wm)) => *wm,
        _ => WritingMode::Lrtb,
    }
}

pub(crate) fn is_display_none(styles: &StyleMap) -> bool {
    matches!(styles.get(&StyleProperty::Display), Some(StyleValue::Display(Display::None)))
}

pub(crate) fn shows_background_always(styles: &StyleMap) -> bool {
    matches!(
        styles.get(&StyleProperty::ShowBackground),
        Some(StyleValue::ShowBackground(ShowBackground::Always))
    )
}

/// Whether the computed background is anything but fully transparent.
pub(crate) fn has_visible_background(styles: &StyleMap) -> bool {
    matches!(
        styles.get(&StyleProperty::BackgroundColor),
        Some(StyleValue::Color(color)) if color.a != 0
    )
}
