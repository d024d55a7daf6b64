use unicode_width::UnicodeWidthChar;

use crate::buffer::{Buffer, Cell};
use crate::element::{Content, Element};
use crate::layout::{LayoutResult, Rect, layout, measure};
use crate::types::{Rgb, Style};

const DEFAULT_FG: Rgb = Rgb::new(255, 255, 255);

pub fn render_to_buffer(element: &Element, layout: &LayoutResult, buf: &mut Buffer) {
    render_element(element, layout, buf, Style::default());
}

/// Lay out and paint `element` into a buffer `width` columns wide and as tall
/// as the element measures, then return the buffer's text rows joined by
/// newlines.
pub fn render_to_string(element: &Element, width: u16) -> String {
    let (_, height) = measure(element);
    let area = Rect::from_size(width, height);
    let result = layout(element, area);
    let mut buf = Buffer::new(width, height);
    render_to_buffer(element, &result, &mut buf);
    buf.to_lines().join("\n")
}

fn render_element(element: &Element, layout: &LayoutResult, buf: &mut Buffer, inherited: Style) {
    let Some(rect) = layout.get(&element.id) else {
        return;
    };
    let style = inherited.patch(element.style);

    if let Some(bg) = element.style.background {
        fill_rect(buf, *rect, bg);
    }

    match &element.content {
        Content::None => {}
        Content::Text(text) => render_text(text, element, *rect, buf, style),
        Content::Children(children) => {
            for child in children {
                render_element(child, layout, buf, style);
            }
        }
    }
}

fn fill_rect(buf: &mut Buffer, rect: Rect, bg: Rgb) {
    for y in rect.y..rect.bottom().min(buf.height()) {
        for x in rect.x..rect.right().min(buf.width()) {
            if let Some(cell) = buf.get_mut(x, y) {
                cell.bg = bg;
            }
        }
    }
}

fn render_text(text: &str, element: &Element, rect: Rect, buf: &mut Buffer, style: Style) {
    let fg = style.foreground.unwrap_or(DEFAULT_FG);
    let pad = &element.padding;
    let inner = rect.shrink(pad.top, pad.right, pad.bottom, pad.left);

    for (line_no, line) in text.lines().enumerate() {
        let y = inner.y.saturating_add(line_no as u16);
        if y >= inner.bottom() {
            break;
        }

        let mut x = inner.x;
        for ch in line.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if x.saturating_add(w) > inner.right() {
                break;
            }

            // Keep whatever background is already painted unless one is set.
            let bg = style
                .background
                .unwrap_or_else(|| buf.get(x, y).map(|c| c.bg).unwrap_or_default());

            buf.set(
                x,
                y,
                Cell::new(ch).with_fg(fg).with_bg(bg).with_style(style.text_style),
            );
            if w == 2 {
                if let Some(cell) = buf.get_mut(x + 1, y) {
                    cell.wide_continuation = true;
                    cell.bg = bg;
                }
            }
            x += w;
        }
    }
}
