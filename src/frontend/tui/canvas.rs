//! Cell canvas for the loading widget.
//!
//! Maps widget surface units 1:1 onto terminal cells inside a buffer area.
//! Rects are rasterized outward to whole cells, fractional fill coverage is
//! drawn with left eighth-block glyphs, and translucent colors are blended
//! over whatever is already in the cell.

use crate::color::Rgba;
use crate::widgets::{Canvas, RectF, Size, TextMetrics};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Widget},
};

/// Left-aligned partial blocks, indexed by eighths of a cell.
const LEFT_EIGHTHS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
const RIGHT_HALF: char = '▐';

/// Text metrics for a monospace terminal: display width in cells, one row tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMetrics;

impl TextMetrics for CellMetrics {
    fn measure(&self, text: &str) -> Size {
        Size::new(Span::raw(text).width() as f32, 1.0)
    }
}

pub struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl<'a> BufferCanvas<'a> {
    /// Canvas whose origin is the top-left cell of `area`.
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        let area = area.intersection(*buf.area());
        Self { buf, area }
    }

    /// Whole cells touched by `rect`, in buffer coordinates.
    fn cells(&self, rect: RectF) -> Option<Rect> {
        let width = f32::from(self.area.width);
        let height = f32::from(self.area.height);
        let left = rect.left.floor().clamp(0.0, width);
        let right = rect.right.ceil().clamp(0.0, width);
        let top = rect.top.floor().clamp(0.0, height);
        let bottom = rect.bottom.ceil().clamp(0.0, height);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(
            self.area.x + left as u16,
            self.area.y + top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }

    /// Buffer position of a local cell, if it lies on the canvas.
    fn position(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= f32::from(self.area.width) || y >= f32::from(self.area.height)
        {
            return None;
        }
        Some((self.area.x + x as u16, self.area.y + y as u16))
    }

    fn background_at(&self, x: u16, y: u16) -> Rgba {
        match self.buf[(x, y)].bg {
            Color::Rgb(r, g, b) => Rgba::rgb(r, g, b),
            _ => Rgba::BLACK,
        }
    }

    fn resolve(&self, color: Rgba, x: u16, y: u16) -> Color {
        color.over(self.background_at(x, y)).to_color()
    }

    /// Glyph for a cell covering `[cell, cell + 1)` when the fill spans
    /// `[left, right)`.
    fn coverage_glyph(cell: f32, left: f32, right: f32) -> Option<char> {
        let coverage = right.min(cell + 1.0) - left.max(cell);
        if coverage <= 0.0 {
            return None;
        }
        if coverage >= 1.0 {
            return Some(LEFT_EIGHTHS[8]);
        }
        if left <= cell {
            let eighths = (coverage * 8.0).round() as usize;
            return (eighths > 0).then(|| LEFT_EIGHTHS[eighths.min(8)]);
        }
        // Starts mid-cell: only a right half block is available
        (coverage >= 0.5).then_some(RIGHT_HALF)
    }

    fn draw_string(&mut self, text: &str, x: f32, row: f32, color: Rgba) {
        let width = CellMetrics.measure(text).width;
        let max_x = (f32::from(self.area.width) - width).max(0.0);
        let x = x.round().clamp(0.0, max_x);
        let Some((bx, by)) = self.position(x, row.floor()) else {
            return;
        };
        let fg = self.resolve(color, bx, by);
        let max_width = usize::from(self.area.right() - bx);
        self.buf
            .set_stringn(bx, by, text, max_width, Style::default().fg(fg));
    }
}

impl TextMetrics for BufferCanvas<'_> {
    fn measure(&self, text: &str) -> Size {
        CellMetrics.measure(text)
    }
}

impl Canvas for BufferCanvas<'_> {
    // Cells cannot be rounded; the border's rounded glyphs carry the radius
    fn fill_round_rect(&mut self, rect: RectF, _radius: f32, color: Rgba) {
        let Some(cells) = self.cells(rect) else {
            return;
        };
        for y in cells.top()..cells.bottom() {
            for x in cells.left()..cells.right() {
                let bg = self.resolve(color, x, y);
                self.buf[(x, y)].set_char(' ').set_bg(bg);
            }
        }
    }

    fn stroke_round_rect(&mut self, rect: RectF, radius: f32, stroke_width: f32, color: Rgba) {
        if stroke_width <= 0.0 {
            return;
        }
        let Some(cells) = self.cells(rect) else {
            return;
        };
        let border_type = if radius > 0.0 {
            BorderType::Rounded
        } else if stroke_width >= 2.0 {
            BorderType::Thick
        } else {
            BorderType::Plain
        };
        let fg = self.resolve(color, cells.x, cells.y);
        Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(fg))
            .render(cells, self.buf);
    }

    fn fill_rect(&mut self, rect: RectF, color: Rgba) {
        let Some(cells) = self.cells(rect) else {
            return;
        };
        for y in cells.top()..cells.bottom() {
            for x in cells.left()..cells.right() {
                let local = f32::from(x) - f32::from(self.area.x);
                let Some(glyph) = Self::coverage_glyph(local, rect.left, rect.right) else {
                    continue;
                };
                let fg = self.resolve(color, x, y);
                self.buf[(x, y)].set_char(glyph).set_fg(fg);
            }
        }
    }

    fn draw_glyph(&mut self, glyph: &str, rect: RectF, color: Rgba) {
        let width = CellMetrics.measure(glyph).width;
        self.draw_string(glyph, rect.center_x() - width / 2.0, rect.center_y(), color);
    }

    fn draw_text(&mut self, text: &str, x: f32, center_y: f32, color: Rgba) {
        self.draw_string(text, x, center_y, color);
    }
}
