//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal frontend implements.
//! It provides a unified interface for event polling, rendering, and cleanup
//! so the core never touches the terminal directly.

pub mod events;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait
///
/// Separates rendering concerns from the widget logic in [`AppCore`].
pub trait Frontend {
    /// Poll for user input events
    ///
    /// Returns all pending events (keyboard, mouse, resize, focus) converted
    /// to the frontend-agnostic `FrontendEvent` enum, or an empty list when
    /// the poll times out.
    fn poll_events(&mut self) -> Result<Vec<FrontendEvent>>;

    /// Paint the current application state
    ///
    /// Mutable because drawing the widget clears its pending redraw request.
    fn render(&mut self, app: &mut AppCore) -> Result<()>;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current drawing area size `(width, height)` in cells
    fn size(&self) -> (u16, u16);
}
