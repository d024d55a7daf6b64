//! Raw-mode terminal with double-buffered diff drawing.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use gridview::{
    Buffer, Element, LayoutResult, Rect, Rgb, TextStyle, display_width, layout, render_to_buffer,
};

pub struct Terminal {
    stdout: Stdout,
    current: Buffer,
    previous: Buffer,
    last_layout: LayoutResult,
}

impl Terminal {
    /// Enter raw mode and the alternate screen. The terminal is restored on
    /// drop and on panic.
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = restore();
            original_hook(info);
        }));

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
            last_layout: LayoutResult::new(),
        })
    }

    /// Lay out and draw `root`, writing only the cells that changed.
    pub fn render(&mut self, root: &Element) -> io::Result<&LayoutResult> {
        let (width, height) = terminal::size()?;
        if width != self.current.width() || height != self.current.height() {
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            // Nothing on screen matches the fresh back buffer.
            execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        self.current.clear();
        self.last_layout = layout(root, Rect::from_size(width, height));
        render_to_buffer(root, &self.last_layout, &mut self.current);

        self.flush_diff()?;
        std::mem::swap(&mut self.current, &mut self.previous);

        Ok(&self.last_layout)
    }

    /// Layout from the last render, used for mouse hit testing.
    pub fn layout(&self) -> &LayoutResult {
        &self.last_layout
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_x = u16::MAX;
        let mut last_y = u16::MAX;
        let mut last_width: u16 = 1;
        let mut last_fg: Option<Rgb> = None;
        let mut last_bg: Option<Rgb> = None;
        let mut last_style = TextStyle::new();

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;

        for (x, y, cell) in self.current.diff(&self.previous) {
            if cell.wide_continuation {
                continue;
            }

            if y != last_y || x != last_x.wrapping_add(last_width) {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }

            if last_fg != Some(cell.fg) {
                queue!(self.stdout, SetForegroundColor(to_color(cell.fg)))?;
                last_fg = Some(cell.fg);
            }
            if last_bg != Some(cell.bg) {
                queue!(self.stdout, SetBackgroundColor(to_color(cell.bg)))?;
                last_bg = Some(cell.bg);
            }

            if cell.style != last_style {
                apply_style(&mut self.stdout, last_style, cell.style)?;
                last_style = cell.style;
            }

            let mut utf8 = [0u8; 4];
            let glyph = cell.char.encode_utf8(&mut utf8);
            write!(self.stdout, "{glyph}")?;

            last_x = x;
            last_y = y;
            last_width = display_width(glyph).max(1);
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = restore();
    }
}

fn restore() -> io::Result<()> {
    execute!(
        io::stdout(),
        DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn apply_style(out: &mut Stdout, from: TextStyle, to: TextStyle) -> io::Result<()> {
    // Bold and dim share one reset, so re-apply whichever survives.
    if (from.bold && !to.bold) || (from.dim && !to.dim) {
        queue!(out, SetAttribute(Attribute::NormalIntensity))?;
        if to.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if to.dim {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
    } else {
        if to.bold && !from.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if to.dim && !from.dim {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
    }

    if to.underline != from.underline {
        let attr = if to.underline {
            Attribute::Underlined
        } else {
            Attribute::NoUnderline
        };
        queue!(out, SetAttribute(attr))?;
    }
    if to.reverse != from.reverse {
        let attr = if to.reverse {
            Attribute::Reverse
        } else {
            Attribute::NoReverse
        };
        queue!(out, SetAttribute(attr))?;
    }
    Ok(())
}
