use crate::element::{Content, Element};
use crate::layout::LayoutResult;

/// Find the deepest clickable, enabled element at the given coordinates.
/// Returns None if no such element contains the point.
pub fn hit_test(layout: &LayoutResult, root: &Element, x: u16, y: u16) -> Option<String> {
    let rect = layout.get(&root.id)?;
    if !rect.contains(x, y) {
        return None;
    }

    // Later children are painted last, so they win.
    if let Content::Children(children) = &root.content {
        for child in children.iter().rev() {
            if let Some(id) = hit_test(layout, child, x, y) {
                return Some(id);
            }
        }
    }

    if root.clickable && !root.disabled {
        Some(root.id.clone())
    } else {
        None
    }
}

/// Collect IDs of focusable, enabled elements in document order.
pub fn collect_focusable(root: &Element) -> Vec<String> {
    let mut ids = Vec::new();
    collect_focusable_into(root, &mut ids);
    ids
}

fn collect_focusable_into(element: &Element, ids: &mut Vec<String>) {
    if element.focusable && !element.disabled {
        ids.push(element.id.clone());
    }
    if let Content::Children(children) = &element.content {
        for child in children {
            collect_focusable_into(child, ids);
        }
    }
}
