//! Segmented loading widget (rendering-agnostic)
//!
//! State, measurement math, and the renderer all live here; nothing in this
//! module knows about terminals. Frontends provide a [`renderer::Canvas`] and
//! feed the widget resize and mutation calls.

pub mod float_text_loading;
pub mod geometry;
pub mod renderer;
pub mod state;
pub mod text_format;

pub use float_text_loading::FloatTextLoading;
pub use geometry::{RectF, Size, TextMetrics};
pub use renderer::{Canvas, DisplayList};
pub use state::WidgetState;
pub use text_format::TextFormat;
