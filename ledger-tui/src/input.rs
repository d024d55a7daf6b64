//! Terminal events mapped to ledger commands.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    FocusNext,
    FocusPrev,
    /// Activate the focused element.
    Activate,
    NextPage,
    PrevPage,
    /// Left click at a cell position.
    Click { x: u16, y: u16 },
    /// Terminal size changed; only a redraw is needed.
    Resize,
}

impl Input {
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) => Self::from_key(key),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => Some(Self::Click {
                x: *column,
                y: *row,
            }),
            Event::Resize(..) => Some(Self::Resize),
            _ => None,
        }
    }

    fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char('c') if ctrl => Some(Self::Quit),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Self::FocusPrev),
            KeyCode::Tab => Some(Self::FocusNext),
            KeyCode::BackTab => Some(Self::FocusPrev),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Self::Activate),
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => Some(Self::NextPage),
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => Some(Self::PrevPage),
            _ => None,
        }
    }
}
