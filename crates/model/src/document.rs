//! The Canonical Document Model.
//!
//! A [`Document`] owns its node graph exclusively: content elements live in
//! an arena and are addressed by [`NodeId`]. Elements are created detached,
//! mutated through the accessors below, and inserted under a parent with
//! [`Document::push_child`]; every mutation preserves the content grammar,
//! region-id uniqueness and referential integrity.

use std::collections::HashMap;

use indextree::Arena;
pub use indextree::NodeId;
use num_rational::Ratio;

use crate::content::{
    is_valid_ruby_children, is_valid_rtc_children, is_valid_xml_id, AnimationStep, ElementData,
    ElementKind,
};
use crate::error::Error;
use crate::properties::{StyleProperty, StyleValue};
use crate::styles::WhiteSpaceHandling;
use crate::times::TimeOffset;
use num_traits::Signed;

/// Dimensions of the root container expressed in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellResolution {
    pub rows: u32,
    pub columns: u32,
}

impl CellResolution {
    pub fn new(rows: u32, columns: u32) -> Result<Self, Error> {
        if rows == 0 || columns == 0 {
            return Err(Error::Domain("cell resolution terms must be positive".into()));
        }
        Ok(Self { rows, columns })
    }
}

impl Default for CellResolution {
    fn default() -> Self {
        Self { rows: 15, columns: 32 }
    }
}

/// Extent of the root container in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelResolution {
    pub width: u32,
    pub height: u32,
}

impl PixelResolution {
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::Domain("pixel resolution terms must be positive".into()));
        }
        Ok(Self { width, height })
    }
}

impl Default for PixelResolution {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

/// Active area within the root container, as fractions of its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveArea {
    pub left_offset: f64,
    pub top_offset: f64,
    pub width: f64,
    pub height: f64,
}

impl ActiveArea {
    pub fn new(left_offset: f64, top_offset: f64, width: f64, height: f64) -> Result<Self, Error> {
        for v in [left_offset, top_offset, width, height] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::Domain("active area terms must be in [0, 1]".into()));
            }
        }
        Ok(Self { left_offset, top_offset, width, height })
    }
}

/// A TTML document: root body, out-of-line regions, initial values and the
/// root-container coordinate systems.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<ElementData>,
    body: Option<NodeId>,
    region_order: Vec<NodeId>,
    region_ids: HashMap<String, NodeId>,
    initial_values: std::collections::BTreeMap<StyleProperty, StyleValue>,
    cell_resolution: CellResolution,
    px_resolution: PixelResolution,
    active_area: Option<ActiveArea>,
    display_aspect_ratio: Option<Ratio<i64>>,
    lang: String,
    content_profiles: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            body: None,
            region_order: Vec::new(),
            region_ids: HashMap::new(),
            initial_values: std::collections::BTreeMap::new(),
            cell_resolution: CellResolution::default(),
            px_resolution: PixelResolution::default(),
            active_area: None,
            display_aspect_ratio: None,
            lang: String::new(),
            content_profiles: Vec::new(),
        }
    }

    fn data(&self, node: NodeId) -> &ElementData {
        self.arena[node].get()
    }

    fn data_mut(&mut self, node: NodeId) -> &mut ElementData {
        self.arena[node].get_mut()
    }

    // root-container attributes

    pub fn cell_resolution(&self) -> CellResolution {
        self.cell_resolution
    }

    pub fn set_cell_resolution(&mut self, resolution: CellResolution) {
        self.cell_resolution = resolution;
    }

    pub fn px_resolution(&self) -> PixelResolution {
        self.px_resolution
    }

    pub fn set_px_resolution(&mut self, resolution: PixelResolution) {
        self.px_resolution = resolution;
    }

    pub fn active_area(&self) -> Option<ActiveArea> {
        self.active_area
    }

    pub fn set_active_area(&mut self, area: Option<ActiveArea>) {
        self.active_area = area;
    }

    pub fn display_aspect_ratio(&self) -> Option<Ratio<i64>> {
        self.display_aspect_ratio
    }

    pub fn set_display_aspect_ratio(&mut self, dar: Option<Ratio<i64>>) {
        self.display_aspect_ratio = dar;
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.lang = lang.into();
    }

    pub fn content_profiles(&self) -> &[String] {
        &self.content_profiles
    }

    pub fn add_content_profile(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        if !self.content_profiles.contains(&uri) {
            self.content_profiles.push(uri);
        }
    }

    // body

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn set_body(&mut self, body: Option<NodeId>) -> Result<(), Error> {
        if let Some(node) = body {
            if self.kind(node) != ElementKind::Body {
                return Err(Error::structure("document body must be a body element"));
            }
            if self.parent(node).is_some() {
                return Err(Error::structure("document body must be a root element"));
            }
        }
        self.body = body;
        Ok(())
    }

    // regions

    pub fn has_region(&self, region_id: &str) -> bool {
        self.region_ids.contains_key(region_id)
    }

    /// Registers a new region and returns its node. Region ids are unique
    /// and immutable.
    pub fn put_region(&mut self, region_id: &str) -> Result<NodeId, Error> {
        if !is_valid_xml_id(region_id) {
            return Err(Error::Domain(format!("invalid region id: {region_id}")));
        }
        if self.region_ids.contains_key(region_id) {
            return Err(Error::DuplicateId(region_id.to_string()));
        }
        let mut data = ElementData::new(ElementKind::Region);
        data.id = Some(region_id.to_string());
        let node = self.arena.new_node(data);
        self.region_order.push(node);
        self.region_ids.insert(region_id.to_string(), node);
        Ok(node)
    }

    pub fn region(&self, region_id: &str) -> Option<NodeId> {
        self.region_ids.get(region_id).copied()
    }

    /// Regions in declaration order.
    pub fn regions(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.region_order.iter().copied()
    }

    /// The default region for content with no region reference in its
    /// ancestor chain: the first declared region.
    pub fn default_region(&self) -> Option<NodeId> {
        self.region_order.first().copied()
    }

    /// Unregisters a region and clears every reference to it.
    pub fn remove_region(&mut self, region_id: &str) {
        let Some(node) = self.region_ids.remove(region_id) else {
            return;
        };
        self.region_order.retain(|n| *n != node);

        if let Some(body) = self.body {
            let referring: Vec<NodeId> = body
                .descendants(&self.arena)
                .filter(|n| self.data(*n).region.as_deref() == Some(region_id))
                .collect();
            for n in referring {
                self.data_mut(n).region = None;
            }
        }
    }

    // initial values

    pub fn initial_value(&self, property: StyleProperty) -> Option<&StyleValue> {
        self.initial_values.get(&property)
    }

    pub fn has_initial_value(&self, property: StyleProperty) -> bool {
        self.initial_values.contains_key(&property)
    }

    /// Sets or clears the document-wide initial value of `property`.
    pub fn put_initial_value(
        &mut self,
        property: StyleProperty,
        value: Option<StyleValue>,
    ) -> Result<(), Error> {
        match value {
            None => {
                self.initial_values.remove(&property);
            }
            Some(value) => {
                if !property.validates(&value) {
                    return Err(Error::Domain(format!(
                        "invalid value for {property:?}: {value:?}"
                    )));
                }
                self.initial_values.insert(property, value);
            }
        }
        Ok(())
    }

    pub fn initial_values(&self) -> impl Iterator<Item = (StyleProperty, &StyleValue)> {
        self.initial_values.iter().map(|(p, v)| (*p, v))
    }

    // element creation

    /// Creates a detached content element. Text nodes are created with
    /// [`Document::create_text`]; regions with [`Document::put_region`].
    pub fn create_element(&mut self, kind: ElementKind) -> Result<NodeId, Error> {
        match kind {
            ElementKind::Text => Err(Error::structure("use create_text for text nodes")),
            ElementKind::Region => Err(Error::structure("use put_region for regions")),
            _ => Ok(self.arena.new_node(ElementData::new(kind))),
        }
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        let mut data = ElementData::new(ElementKind::Text);
        data.text = text.into();
        self.arena.new_node(data)
    }

    // per-element accessors

    pub fn kind(&self, node: NodeId) -> ElementKind {
        self.data(node).kind
    }

    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.data(node).id.as_deref()
    }

    pub fn set_element_id(&mut self, node: NodeId, id: Option<&str>) -> Result<(), Error> {
        match self.kind(node) {
            ElementKind::Text => {
                return Err(Error::structure("text nodes do not carry an id"));
            }
            ElementKind::Region => {
                if id != self.element_id(node) {
                    return Err(Error::structure("region ids are immutable"));
                }
                return Ok(());
            }
            _ => {}
        }
        if let Some(id) = id {
            if !is_valid_xml_id(id) {
                return Err(Error::Domain(format!("invalid xml:id: {id}")));
            }
            self.data_mut(node).id = Some(id.to_string());
        } else {
            self.data_mut(node).id = None;
        }
        Ok(())
    }

    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<&StyleValue> {
        self.data(node).styles.get(&property)
    }

    pub fn has_style(&self, node: NodeId, property: StyleProperty) -> bool {
        self.data(node).styles.contains_key(&property)
    }

    /// Sets or clears an inline style value. Validation is by value domain;
    /// per-kind applicability is resolved during ISD generation.
    pub fn set_style(
        &mut self,
        node: NodeId,
        property: StyleProperty,
        value: Option<StyleValue>,
    ) -> Result<(), Error> {
        if self.kind(node) == ElementKind::Text {
            return Err(Error::structure("text nodes do not carry style properties"));
        }
        match value {
            None => {
                self.data_mut(node).styles.remove(&property);
            }
            Some(value) => {
                if !property.validates(&value) {
                    return Err(Error::Domain(format!(
                        "invalid value for {property:?}: {value:?}"
                    )));
                }
                self.data_mut(node).styles.insert(property, value);
            }
        }
        Ok(())
    }

    pub fn styles(&self, node: NodeId) -> impl Iterator<Item = (StyleProperty, &StyleValue)> {
        self.data(node).styles.iter().map(|(p, v)| (*p, v))
    }

    pub fn begin(&self, node: NodeId) -> Option<&TimeOffset> {
        self.data(node).begin.as_ref()
    }

    pub fn set_begin(&mut self, node: NodeId, offset: Option<TimeOffset>) -> Result<(), Error> {
        self.check_timed(node)?;
        if let Some(ref t) = offset {
            if t.is_negative() {
                return Err(Error::domain("begin offset must not be negative"));
            }
        }
        self.data_mut(node).begin = offset;
        Ok(())
    }

    pub fn end(&self, node: NodeId) -> Option<&TimeOffset> {
        self.data(node).end.as_ref()
    }

    pub fn set_end(&mut self, node: NodeId, offset: Option<TimeOffset>) -> Result<(), Error> {
        self.check_timed(node)?;
        if let Some(ref t) = offset {
            if t.is_negative() {
                return Err(Error::domain("end offset must not be negative"));
            }
        }
        self.data_mut(node).end = offset;
        Ok(())
    }

    fn check_timed(&self, node: NodeId) -> Result<(), Error> {
        if !self.kind(node).is_timed() {
            return Err(Error::structure("element does not carry temporal properties"));
        }
        Ok(())
    }

    pub fn animation_steps(&self, node: NodeId) -> &[AnimationStep] {
        &self.data(node).animations
    }

    pub fn add_animation_step(&mut self, node: NodeId, step: AnimationStep) -> Result<(), Error> {
        self.check_timed(node)?;
        if !step.property.is_animatable() {
            return Err(Error::structure("style property is not animatable"));
        }
        if !step.property.validates(&step.value) {
            return Err(Error::Domain(format!(
                "invalid value for {:?}: {:?}",
                step.property, step.value
            )));
        }
        if let Some(ref t) = step.begin {
            if t.is_negative() {
                return Err(Error::domain("animation begin must not be negative"));
            }
        }
        self.data_mut(node).animations.push(step);
        Ok(())
    }

    pub fn remove_animation_step(&mut self, node: NodeId, index: usize) {
        if index < self.data(node).animations.len() {
            self.data_mut(node).animations.remove(index);
        }
    }

    pub fn clear_animation_steps(&mut self, node: NodeId) {
        self.data_mut(node).animations.clear();
    }

    pub fn region_ref(&self, node: NodeId) -> Option<&str> {
        self.data(node).region.as_deref()
    }

    /// Associates the element (and its subtree) with a region, by id.
    pub fn set_region_ref(&mut self, node: NodeId, region_id: Option<&str>) -> Result<(), Error> {
        match self.kind(node) {
            ElementKind::Region => {
                return Err(Error::structure("regions cannot reference regions"));
            }
            ElementKind::Text | ElementKind::Br => {
                return Err(Error::structure("element is not associated with a region"));
            }
            _ => {}
        }
        if let Some(id) = region_id {
            if !self.has_region(id) {
                return Err(Error::MissingRegion(id.to_string()));
            }
            self.data_mut(node).region = Some(id.to_string());
        } else {
            self.data_mut(node).region = None;
        }
        Ok(())
    }

    pub fn element_lang(&self, node: NodeId) -> &str {
        &self.data(node).lang
    }

    pub fn set_element_lang(&mut self, node: NodeId, lang: impl Into<String>) {
        self.data_mut(node).lang = lang.into();
    }

    pub fn space(&self, node: NodeId) -> WhiteSpaceHandling {
        self.data(node).space
    }

    pub fn set_space(&mut self, node: NodeId, space: WhiteSpaceHandling) {
        self.data_mut(node).space = space;
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.data(node).text
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<(), Error> {
        if self.kind(node) != ElementKind::Text {
            return Err(Error::structure("only text nodes carry character payloads"));
        }
        self.data_mut(node).text = text.into();
        Ok(())
    }

    // hierarchy

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena[node].parent()
    }

    /// The root of the tree `node` belongs to.
    pub fn root(&self, node: NodeId) -> NodeId {
        let mut root = node;
        while let Some(parent) = self.parent(root) {
            root = parent;
        }
        root
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.arena)
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        self.arena[node].first_child().is_some()
    }

    /// The element and its subtree in document (depth-first) order.
    pub fn dfs(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    /// Appends `child` under `parent`, enforcing the content grammar.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        let parent_kind = self.kind(parent);
        let child_kind = self.kind(child);

        if matches!(parent_kind, ElementKind::Ruby | ElementKind::Rtc) {
            return Err(Error::structure(
                "ruby container children must be pushed together with push_children",
            ));
        }
        if !parent_kind.accepts_child(child_kind) {
            return Err(Error::Structure(format!(
                "{child_kind:?} is not a valid child of {parent_kind:?}"
            )));
        }
        self.attach(parent, child)
    }

    /// Appends `children` under `parent`. Ruby containers validate the full
    /// child pattern; other kinds fall back to repeated [`Self::push_child`].
    pub fn push_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), Error> {
        let parent_kind = self.kind(parent);
        match parent_kind {
            ElementKind::Ruby | ElementKind::Rtc => {
                if self.has_children(parent) {
                    return Err(Error::structure(
                        "remove existing ruby children before pushing new ones",
                    ));
                }
                let kinds: Vec<ElementKind> = children.iter().map(|c| self.kind(*c)).collect();
                let valid = match parent_kind {
                    ElementKind::Ruby => is_valid_ruby_children(&kinds),
                    _ => is_valid_rtc_children(&kinds),
                };
                if !valid {
                    return Err(Error::Structure(format!(
                        "children of {parent_kind:?} do not conform to the ruby grammar"
                    )));
                }
                for child in children {
                    self.attach(parent, *child)?;
                }
                Ok(())
            }
            _ => {
                for child in children {
                    self.push_child(parent, *child)?;
                }
                Ok(())
            }
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        if parent == child {
            return Err(Error::structure("an element cannot be its own child"));
        }
        if self.parent(child).is_some() {
            return Err(Error::structure("element already has a parent"));
        }
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|e| Error::Structure(e.to_string()))
    }

    /// Detaches `node` (and its subtree) from its parent, if any.
    pub fn detach(&mut self, node: NodeId) {
        node.detach(&mut self.arena);
    }

    /// Removes `child` from `parent`'s children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        if self.parent(child) != Some(parent) {
            return Err(Error::structure("element is not a child of this element"));
        }
        self.detach(child);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::named;
    use crate::times::offset_from_secs;

    #[test]
    fn grammar_is_enforced_on_push() {
        let mut doc = Document::new();
        let body = doc.create_element(ElementKind::Body).unwrap();
        let div = doc.create_element(ElementKind::Div).unwrap();
        let p = doc.create_element(ElementKind::P).unwrap();

        doc.push_child(body, div).unwrap();
        assert!(doc.push_child(body, p).is_err());
        doc.push_child(div, p).unwrap();

        let span = doc.create_element(ElementKind::Span).unwrap();
        let text = doc.create_text("hello");
        let stray = doc.create_text("t");
        doc.push_child(p, span).unwrap();
        doc.push_child(span, text).unwrap();
        assert!(doc.push_child(p, stray).is_err());

        assert_eq!(doc.root(text), body);
        assert_eq!(doc.parent(span), Some(p));
    }

    #[test]
    fn region_ids_are_unique() {
        let mut doc = Document::new();
        doc.put_region("r1").unwrap();
        assert!(matches!(doc.put_region("r1"), Err(Error::DuplicateId(_))));
        assert!(doc.has_region("r1"));
    }

    #[test]
    fn region_references_must_resolve() {
        let mut doc = Document::new();
        let div = doc.create_element(ElementKind::Div).unwrap();
        assert!(matches!(doc.set_region_ref(div, Some("nope")), Err(Error::MissingRegion(_))));

        doc.put_region("r1").unwrap();
        doc.set_region_ref(div, Some("r1")).unwrap();
        assert_eq!(doc.region_ref(div), Some("r1"));

        doc.remove_region("r1");
        assert!(!doc.has_region("r1"));
    }

    #[test]
    fn removing_a_region_clears_references() {
        let mut doc = Document::new();
        doc.put_region("r1").unwrap();
        let body = doc.create_element(ElementKind::Body).unwrap();
        doc.set_body(Some(body)).unwrap();
        let div = doc.create_element(ElementKind::Div).unwrap();
        doc.push_child(body, div).unwrap();
        doc.set_region_ref(div, Some("r1")).unwrap();

        doc.remove_region("r1");
        assert_eq!(doc.region_ref(div), None);
    }

    #[test]
    fn text_nodes_reject_styles_and_timing() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        assert!(doc
            .set_style(text, StyleProperty::Color, Some(StyleValue::Color(named::RED)))
            .is_err());
        assert!(doc.set_begin(text, Some(offset_from_secs(1))).is_err());
    }

    #[test]
    fn style_values_are_domain_checked() {
        let mut doc = Document::new();
        let span = doc.create_element(ElementKind::Span).unwrap();
        assert!(matches!(
            doc.set_style(span, StyleProperty::Color, Some(StyleValue::Number(3.0))),
            Err(Error::Domain(_))
        ));
        doc.set_style(span, StyleProperty::Color, Some(StyleValue::Color(named::BLUE))).unwrap();
    }

    #[test]
    fn ruby_children_are_validated_as_a_batch() {
        let mut doc = Document::new();
        let ruby = doc.create_element(ElementKind::Ruby).unwrap();
        let rb = doc.create_element(ElementKind::Rb).unwrap();
        let rt = doc.create_element(ElementKind::Rt).unwrap();

        assert!(doc.push_child(ruby, rb).is_err());
        doc.push_children(ruby, &[rb, rt]).unwrap();

        let ruby2 = doc.create_element(ElementKind::Ruby).unwrap();
        let rb2 = doc.create_element(ElementKind::Rb).unwrap();
        assert!(doc.push_children(ruby2, &[rb2]).is_err());
    }

    #[test]
    fn negative_times_are_domain_errors() {
        let mut doc = Document::new();
        let p = doc.create_element(ElementKind::P).unwrap();
        assert!(doc.set_begin(p, Some(-offset_from_secs(1))).is_err());
    }
}
