//! Document filters.

pub mod lcd;

use model::{Document, Error, NodeId, StyleProperty};

use crate::DocumentFilter;

/// Removes every discrete animation step from the document.
pub struct RemoveAnimations;

impl RemoveAnimations {
    fn process_subtree(doc: &mut Document, root: NodeId) {
        let nodes: Vec<NodeId> = doc.dfs(root).collect();
        for node in nodes {
            doc.clear_animation_steps(node);
        }
    }
}

impl DocumentFilter for RemoveAnimations {
    fn name(&self) -> &'static str {
        "remove-animations"
    }

    fn process(&self, doc: &mut Document) -> Result<(), Error> {
        let regions: Vec<NodeId> = doc.regions().collect();
        for region in regions {
            doc.clear_animation_steps(region);
        }
        if let Some(body) = doc.body() {
            Self::process_subtree(doc, body);
        }
        Ok(())
    }
}

/// Removes inline style values for every property outside `retained`,
/// document-wide (elements, regions, initial values).
pub(crate) fn retain_style_properties(
    doc: &mut Document,
    retained: &[StyleProperty],
) -> Result<(), Error> {
    let dropped: Vec<StyleProperty> = StyleProperty::ALL
        .iter()
        .copied()
        .filter(|p| !retained.contains(p))
        .collect();

    for &property in &dropped {
        doc.put_initial_value(property, None)?;
    }

    let mut nodes: Vec<NodeId> = doc.regions().collect();
    if let Some(body) = doc.body() {
        nodes.extend(doc.dfs(body));
    }

    for node in nodes {
        if doc.kind(node) == model::ElementKind::Text {
            continue;
        }
        for &property in &dropped {
            doc.set_style(node, property, None)?;
        }
    }
    Ok(())
}
