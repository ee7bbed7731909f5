//! Frontend-agnostic input events.
//!
//! Frontends translate their native event streams (crossterm for the TUI)
//! into this enum so the core only handles one event shape.

use crossterm::event::{KeyCode, KeyModifiers, MouseEventKind};

/// Events emitted by frontends, converted to a unified format
#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Mouse input (terminal cell coordinates)
    Mouse {
        kind: MouseEventKind,
        x: u16,
        y: u16,
        modifiers: KeyModifiers,
    },
    /// Terminal/window resize
    Resize { width: u16, height: u16 },
    /// The window lost focus; any pointer gesture in progress is abandoned
    FocusLost,
    /// Application quit signal
    Quit,
}

impl FrontendEvent {
    /// Create a key event
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    /// Create a mouse event
    pub fn mouse(kind: MouseEventKind, x: u16, y: u16, modifiers: KeyModifiers) -> Self {
        Self::Mouse {
            kind,
            x,
            y,
            modifiers,
        }
    }

    /// Create a resize event
    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    /// Create a quit event
    pub fn quit() -> Self {
        Self::Quit
    }
}
