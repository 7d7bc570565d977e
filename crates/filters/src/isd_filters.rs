//! ISD filters used by the text-based writers.

use std::collections::BTreeMap;

use log::{debug, warn};

use isd::{Isd, IsdElement, IsdRegion, StyleMap};
use model::{ElementKind, Error, StyleProperty, StyleValue};

use crate::IsdFilter;

/// Merges all regions of an ISD into a single one, concatenating their
/// body content in region order.
pub struct MergeRegions;

impl IsdFilter for MergeRegions {
    fn process(&self, isd: &mut Isd) -> Result<(), Error> {
        let populated = isd.regions.iter().filter(|r| !r.is_empty()).count();
        if isd.regions.len() <= 1 || populated <= 1 {
            return Ok(());
        }

        warn!("merging ISD regions");

        let mut merged_body: Option<IsdElement> = None;
        let mut ids = Vec::new();

        for region in isd.regions.drain(..) {
            ids.push(region.id);
            for body in region.children {
                match merged_body.as_mut() {
                    Some(target) => target.children.extend(body.children),
                    None => merged_body = Some(body),
                }
            }
        }

        isd.regions.push(IsdRegion {
            id: ids.join("_"),
            styles: StyleMap::new(),
            children: merged_body.into_iter().collect(),
        });
        Ok(())
    }
}

/// Merges every paragraph of a region into one, separating the originals
/// with line breaks.
pub struct MergeParagraphs;

impl MergeParagraphs {
    fn merge_body(body: &mut IsdElement) {
        let paragraph_count: usize = body
            .children
            .iter()
            .map(|div| div.children.iter().filter(|c| c.kind == ElementKind::P).count())
            .sum();
        if paragraph_count <= 1 {
            return;
        }

        warn!("merging ISD paragraphs");

        let mut target_p = IsdElement::new(ElementKind::P);
        target_p.lang = body.lang.clone();
        target_p.space = body.space;

        let divs = std::mem::take(&mut body.children);
        let div_count = divs.len();
        for (div_index, div) in divs.into_iter().enumerate() {
            let p_count = div.children.len();
            for (p_index, p) in div.children.into_iter().enumerate() {
                if p.kind != ElementKind::P {
                    continue;
                }
                if target_p.styles.is_empty() {
                    target_p.styles = p.styles.clone();
                }
                target_p.children.extend(p.children);
                if p_index + 1 < p_count {
                    target_p.children.push(IsdElement::new(ElementKind::Br));
                }
            }
            if div_index + 1 < div_count {
                target_p.children.push(IsdElement::new(ElementKind::Br));
            }
        }

        let mut target_div = IsdElement::new(ElementKind::Div);
        target_div.lang = body.lang.clone();
        target_div.space = body.space;
        target_div.children.push(target_p);
        body.children = vec![target_div];
    }
}

impl IsdFilter for MergeParagraphs {
    fn process(&self, isd: &mut Isd) -> Result<(), Error> {
        for region in &mut isd.regions {
            for body in &mut region.children {
                Self::merge_body(body);
            }
        }
        Ok(())
    }
}

/// Keeps only whitelisted style properties, optionally restricted to a set
/// of allowed values.
pub struct SupportedStyles {
    supported: BTreeMap<StyleProperty, Vec<StyleValue>>,
}

impl SupportedStyles {
    pub fn new(supported: BTreeMap<StyleProperty, Vec<StyleValue>>) -> Self {
        Self { supported }
    }

    fn filter_map(&self, styles: &mut StyleMap) {
        styles.retain(|property, value| match self.supported.get(property) {
            Some(allowed) => allowed.is_empty() || allowed.contains(value),
            None => false,
        });
    }

    fn filter_element(&self, element: &mut IsdElement) {
        self.filter_map(&mut element.styles);
        for child in &mut element.children {
            self.filter_element(child);
        }
    }
}

impl IsdFilter for SupportedStyles {
    fn process(&self, isd: &mut Isd) -> Result<(), Error> {
        debug!("filtering unsupported style properties from ISD");
        for region in &mut isd.regions {
            self.filter_map(&mut region.styles);
            for child in &mut region.children {
                self.filter_element(child);
            }
        }
        Ok(())
    }
}

/// Drops style values equal to a configured default, so writers only see
/// deliberate styling.
pub struct DefaultStyleValues {
    defaults: BTreeMap<StyleProperty, StyleValue>,
}

impl DefaultStyleValues {
    pub fn new(defaults: BTreeMap<StyleProperty, StyleValue>) -> Self {
        Self { defaults }
    }

    fn filter_element(&self, element: &mut IsdElement, parent: Option<&StyleMap>) {
        let mut remove = Vec::new();
        for (property, value) in &element.styles {
            if let Some(parent_styles) = parent {
                if property.is_inherited() {
                    // a parent that still carries the property holds a
                    // non-default value; the child may be resetting it
                    if parent_styles.get(property).is_some_and(|pv| pv != value) {
                        continue;
                    }
                }
            }
            if self.defaults.get(property) == Some(value) {
                remove.push(*property);
            }
        }
        for property in remove {
            element.styles.remove(&property);
        }

        let own_styles = element.styles.clone();
        for child in &mut element.children {
            self.filter_element(child, Some(&own_styles));
        }
    }
}

impl IsdFilter for DefaultStyleValues {
    fn process(&self, isd: &mut Isd) -> Result<(), Error> {
        for region in &mut isd.regions {
            let region_styles = region.styles.clone();
            for child in &mut region.children {
                self.filter_element(child, Some(&region_styles));
            }
        }
        Ok(())
    }
}
