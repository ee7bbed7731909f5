//! Paints prepared geometry onto a [`Canvas`].
//!
//! The renderer has no state of its own; it walks the geometry in a fixed
//! back-to-front order so the same geometry always yields the same calls.

use crate::color::Rgba;
use crate::config::StyleConfig;
use crate::widgets::geometry::{FrameGeometry, RectF, Size, SurfaceGeometry, TextMetrics};
use serde::Serialize;

/// Drawing surface the renderer paints on.
pub trait Canvas: TextMetrics {
    fn fill_round_rect(&mut self, rect: RectF, radius: f32, color: Rgba);

    /// Stroke centered on the rect edges.
    fn stroke_round_rect(&mut self, rect: RectF, radius: f32, stroke_width: f32, color: Rgba);

    fn fill_rect(&mut self, rect: RectF, color: Rgba);

    /// Blit a marker glyph into `rect`.
    fn draw_glyph(&mut self, glyph: &str, rect: RectF, color: Rgba);

    /// Draw `text` starting at `x`, vertically centered on `center_y`.
    fn draw_text(&mut self, text: &str, x: f32, center_y: f32, color: Rgba);
}

pub fn render(
    canvas: &mut dyn Canvas,
    surface: &SurfaceGeometry,
    frame: &FrameGeometry,
    style: &StyleConfig,
) {
    canvas.fill_round_rect(
        surface.background,
        style.border_corner,
        style.background_color,
    );
    canvas.stroke_round_rect(
        surface.border,
        style.border_corner,
        style.border_width,
        style.border_color,
    );

    for item in &frame.fill.full {
        canvas.fill_rect(*item, style.progress_color);
    }
    if let Some(partial) = frame.fill.partial {
        canvas.fill_rect(partial, style.progress_color);
    }

    if let Some(glyph) = style.marker.glyph.as_deref() {
        canvas.draw_glyph(glyph, frame.marker, style.marker.color);
    }

    canvas.draw_text(
        &frame.label.text,
        frame.label.x,
        frame.label.y,
        style.text_color,
    );
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRoundRect {
        rect: RectF,
        radius: f32,
        color: Rgba,
    },
    StrokeRoundRect {
        rect: RectF,
        radius: f32,
        stroke_width: f32,
        color: Rgba,
    },
    FillRect {
        rect: RectF,
        color: Rgba,
    },
    Glyph {
        glyph: String,
        rect: RectF,
        color: Rgba,
    },
    Text {
        text: String,
        x: f32,
        center_y: f32,
        color: Rgba,
    },
}

/// Canvas that records draw calls instead of painting them.
pub struct DisplayList<M> {
    metrics: M,
    ops: Vec<DrawOp>,
}

impl<M: TextMetrics> DisplayList<M> {
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            ops: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }
}

impl<M: TextMetrics> TextMetrics for DisplayList<M> {
    fn measure(&self, text: &str) -> Size {
        self.metrics.measure(text)
    }
}

impl<M: TextMetrics> Canvas for DisplayList<M> {
    fn fill_round_rect(&mut self, rect: RectF, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::FillRoundRect {
            rect,
            radius,
            color,
        });
    }

    fn stroke_round_rect(&mut self, rect: RectF, radius: f32, stroke_width: f32, color: Rgba) {
        self.ops.push(DrawOp::StrokeRoundRect {
            rect,
            radius,
            stroke_width,
            color,
        });
    }

    fn fill_rect(&mut self, rect: RectF, color: Rgba) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn draw_glyph(&mut self, glyph: &str, rect: RectF, color: Rgba) {
        self.ops.push(DrawOp::Glyph {
            glyph: glyph.to_string(),
            rect,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, center_y: f32, color: Rgba) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            center_y,
            color,
        });
    }
}
