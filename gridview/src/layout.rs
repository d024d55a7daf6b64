//! Minimal flow layout: rows place children left to right, columns top to
//! bottom. `Fill` children share whatever their siblings leave over, and
//! children stretch across the parent's cross axis.

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::element::{Content, Element};
use crate::types::{Direction, Size};

pub type LayoutResult = HashMap<String, Rect>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn shrink(self, top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            x: self.x.saturating_add(left),
            y: self.y.saturating_add(top),
            width: self.width.saturating_sub(left.saturating_add(right)),
            height: self.height.saturating_sub(top.saturating_add(bottom)),
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Display width of a string in terminal columns.
pub fn display_width(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}

/// Intrinsic size of an element: content size plus padding, with fixed
/// sizes taking precedence.
pub fn measure(element: &Element) -> (u16, u16) {
    let (content_w, content_h) = match &element.content {
        Content::None => (0, 0),
        Content::Text(text) => {
            let lines: Vec<&str> = text.lines().collect();
            let width = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
            (width, (lines.len() as u16).max(1))
        }
        Content::Children(children) => measure_children(element, children),
    };

    let pad = &element.padding;
    let width = content_w.saturating_add(pad.left.saturating_add(pad.right));
    let height = content_h.saturating_add(pad.top.saturating_add(pad.bottom));

    let width = match element.width {
        Size::Fixed(n) => n,
        Size::Fill | Size::Auto => width,
    };
    let height = match element.height {
        Size::Fixed(n) => n,
        Size::Fill | Size::Auto => height,
    };
    (width, height)
}

fn measure_children(element: &Element, children: &[Element]) -> (u16, u16) {
    let gap_total = element
        .gap
        .saturating_mul(children.len().saturating_sub(1) as u16);
    let sizes = children.iter().map(measure);

    match element.direction {
        Direction::Row => {
            let (w, h) = sizes.fold((0u16, 0u16), |(w, h), (cw, ch)| {
                (w.saturating_add(cw), h.max(ch))
            });
            (w.saturating_add(gap_total), h)
        }
        Direction::Column => {
            let (w, h) = sizes.fold((0u16, 0u16), |(w, h), (cw, ch)| {
                (w.max(cw), h.saturating_add(ch))
            });
            (w, h.saturating_add(gap_total))
        }
    }
}

pub fn layout(element: &Element, available: Rect) -> LayoutResult {
    let mut result = LayoutResult::new();
    let width = resolve(element, available.width, true);
    let height = resolve(element, available.height, false);
    let rect = Rect::new(available.x, available.y, width, height);
    result.insert(element.id.clone(), rect);
    layout_children(element, rect, &mut result);
    result
}

/// Size of the root along one axis.
fn resolve(element: &Element, available: u16, is_width: bool) -> u16 {
    match axis_size(element, is_width) {
        Size::Fixed(n) => n.min(available),
        Size::Fill => available,
        Size::Auto if grows(element, is_width) => available,
        Size::Auto => {
            let (w, h) = measure(element);
            let measured = if is_width { w } else { h };
            measured.min(available)
        }
    }
}

fn axis_size(element: &Element, is_width: bool) -> Size {
    if is_width {
        element.width
    } else {
        element.height
    }
}

/// An `Auto` container takes all the space it is offered when some
/// descendant fills that axis.
fn grows(element: &Element, is_width: bool) -> bool {
    let Content::Children(children) = &element.content else {
        return false;
    };
    children.iter().any(|child| match axis_size(child, is_width) {
        Size::Fill => true,
        Size::Auto => grows(child, is_width),
        Size::Fixed(_) => false,
    })
}

fn layout_children(element: &Element, rect: Rect, result: &mut LayoutResult) {
    let Content::Children(children) = &element.content else {
        return;
    };
    if children.is_empty() {
        return;
    }

    let pad = &element.padding;
    let inner = rect.shrink(pad.top, pad.right, pad.bottom, pad.left);
    let is_row = element.direction == Direction::Row;
    let (main_size, cross_size) = if is_row {
        (inner.width, inner.height)
    } else {
        (inner.height, inner.width)
    };
    let gap_total = element
        .gap
        .saturating_mul(children.len().saturating_sub(1) as u16);

    // First pass: everything that doesn't fill claims its measured size.
    let mut main_sizes = Vec::with_capacity(children.len());
    let mut fixed_total = 0u16;
    let mut fill_count = 0u16;
    for child in children {
        let main = match axis_size(child, is_row) {
            Size::Fixed(n) => Some(n),
            Size::Fill => None,
            Size::Auto if grows(child, is_row) => None,
            Size::Auto => {
                let (w, h) = measure(child);
                Some(if is_row { w } else { h })
            }
        };
        match main {
            Some(n) => fixed_total = fixed_total.saturating_add(n),
            None => fill_count += 1,
        }
        main_sizes.push(main);
    }

    let remaining = main_size.saturating_sub(fixed_total.saturating_add(gap_total));
    let fill_share = if fill_count > 0 {
        remaining / fill_count
    } else {
        0
    };

    let end = if is_row { inner.right() } else { inner.bottom() };
    let mut cursor = if is_row { inner.x } else { inner.y };

    // Second pass: the parent decides each child's rect. Cross sizes stretch
    // to the inner cross size unless fixed.
    for (child, main) in children.iter().zip(main_sizes) {
        let size = main.unwrap_or(fill_share).min(end.saturating_sub(cursor));
        let cross = match axis_size(child, !is_row) {
            Size::Fixed(n) => n.min(cross_size),
            Size::Fill | Size::Auto => cross_size,
        };

        let child_rect = if is_row {
            Rect::new(cursor, inner.y, size, cross)
        } else {
            Rect::new(inner.x, cursor, cross, size)
        };
        result.insert(child.id.clone(), child_rect);
        layout_children(child, child_rect, result);

        cursor = cursor.saturating_add(size).saturating_add(element.gap);
    }
}
