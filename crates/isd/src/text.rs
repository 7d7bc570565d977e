//! Whitespace handling over resolved paragraph content.

use model::styles::WhiteSpaceHandling;
use model::ElementKind;

use crate::IsdElement;

/// Path from a paragraph root to one of its text/br descendants.
type Path = Vec<usize>;

struct TextNode {
    path: Path,
    is_br: bool,
    preserve: bool,
}

fn node<'a>(root: &'a IsdElement, path: &[usize]) -> &'a IsdElement {
    let mut current = root;
    for &index in path {
        current = &current.children[index];
    }
    current
}

fn node_mut<'a>(root: &'a mut IsdElement, path: &[usize]) -> &'a mut IsdElement {
    let mut current = root;
    for &index in path {
        current = &mut current.children[index];
    }
    current
}

/// Collects text and br nodes in document order, excluding ruby annotation
/// subtrees, the way line layout consumes them.
fn collect(element: &IsdElement, path: &mut Path, out: &mut Vec<TextNode>) {
    for (index, child) in element.children.iter().enumerate() {
        path.push(index);
        match child.kind {
            ElementKind::Br => out.push(TextNode {
                path: path.clone(),
                is_br: true,
                preserve: false,
            }),
            ElementKind::Text if !child.text.is_empty() => out.push(TextNode {
                path: path.clone(),
                is_br: false,
                preserve: element.space == WhiteSpaceHandling::Preserve,
            }),
            ElementKind::Rt | ElementKind::Rtc | ElementKind::Rp => {}
            _ => collect(child, path, out),
        }
        path.pop();
    }
}

fn is_lwsp(c: char) -> bool {
    matches!(c, '\t' | '\r' | '\n' | ' ')
}

fn collapse_lwsp(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_lwsp(c) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Collapses linear whitespace and trims line-adjacent spaces across the
/// text content of a resolved `p`, `rt` or `rtc` element.
pub(crate) fn process_lwsp(root: &mut IsdElement) {
    let mut nodes = Vec::new();
    collect(root, &mut Vec::new(), &mut nodes);

    // first pass: collapse runs and strip leading spaces
    let mut i = 0;
    while i < nodes.len() {
        if nodes[i].is_br || nodes[i].preserve {
            i += 1;
            continue;
        }

        let mut trimmed = collapse_lwsp(&node(root, &nodes[i].path).text);

        if trimmed.starts_with(' ') {
            let after_lwsp = i == 0 || {
                let prev = &nodes[i - 1];
                prev.is_br
                    || node(root, &prev.path).text.chars().last().is_some_and(is_lwsp)
            };
            if after_lwsp {
                trimmed.remove(0);
            }
        }

        let empty = trimmed.is_empty();
        node_mut(root, &nodes[i].path).text = trimmed;

        if empty {
            nodes.remove(i);
        } else {
            i += 1;
        }
    }

    // second pass: strip trailing spaces before line ends
    for i in 0..nodes.len() {
        if nodes[i].is_br || nodes[i].preserve {
            continue;
        }

        let text = &node(root, &nodes[i].path).text;
        if !text.ends_with(' ') {
            continue;
        }

        let before_break = i + 1 == nodes.len() || {
            let next = &nodes[i + 1];
            next.is_br
                || node(root, &next.path)
                    .text
                    .chars()
                    .next()
                    .is_some_and(|c| matches!(c, '\r' | '\n'))
        };
        if before_break {
            let text = &mut node_mut(root, &nodes[i].path).text;
            text.pop();
        }
    }
}

/// Removes empty text nodes and spans left childless by whitespace
/// processing, unless they carry a visible background.
pub(crate) fn prune_empty_spans(element: &mut IsdElement) {
    for child in &mut element.children {
        prune_empty_spans(child);
    }
    element.children.retain(|child| match child.kind {
        ElementKind::Text => !child.text.is_empty(),
        ElementKind::Span => {
            !child.children.is_empty() || crate::has_visible_background(&child.styles)
        }
        _ => true,
    });
}
