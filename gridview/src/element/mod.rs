mod node;

pub use node::{Content, Element};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(found) = find_element(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Mutable variant of [`find_element`], for patching a built tree (focus
/// highlight, for instance).
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    match &mut root.content {
        Content::Children(children) => children
            .iter_mut()
            .find_map(|child| find_element_mut(child, id)),
        _ => None,
    }
}

/// Collect the text of an element and all of its descendants, in document order.
pub fn collect_text(root: &Element) -> Vec<&str> {
    let mut out = Vec::new();
    collect_text_into(root, &mut out);
    out
}

fn collect_text_into<'a>(element: &'a Element, out: &mut Vec<&'a str>) {
    match &element.content {
        Content::None => {}
        Content::Text(text) => out.push(text),
        Content::Children(children) => {
            for child in children {
                collect_text_into(child, out);
            }
        }
    }
}
