//! TUI Frontend (ratatui-based)
//!
//! Implements the Frontend trait using ratatui for terminal rendering and
//! crossterm for event handling, plus the cell canvas the widget paints on.

pub mod app;
pub mod canvas;

pub use app::TuiFrontend;
pub use canvas::{BufferCanvas, CellMetrics};
