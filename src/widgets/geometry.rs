//! Measurement math for the segmented loading widget.
//!
//! Everything here is a pure function of its inputs. [`SurfaceGeometry`] is
//! derived once per resize, [`FrameGeometry`] once per paint; neither keeps
//! state between calls, so repeated paints of the same state are identical.

use crate::config::{MarkerAnchor, Padding, StyleConfig};
use crate::widgets::WidgetState;
use serde::Serialize;

/// Axis-aligned rectangle in surface units, edges stored explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.left + amount,
            self.top + amount,
            self.right - amount,
            self.bottom - amount,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Text measurement supplied by the drawing surface.
pub trait TextMetrics {
    fn measure(&self, text: &str) -> Size;
}

/// Configuration problems detected while measuring. The widget still
/// renders (with zero-width items) and logs the issue.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryIssue {
    #[error("item count must be at least 1, got {item_count}")]
    InvalidItemCount { item_count: i32 },

    #[error(
        "{available} units of width cannot hold {item_count} items \
         ({reserved} units are taken by spacing and border)"
    )]
    InsufficientWidth {
        available: f32,
        reserved: f32,
        item_count: i32,
    },
}

/// Geometry that only changes when the surface is resized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurfaceGeometry {
    pub view_width: f32,
    pub view_height: f32,
    pub item_width: f32,
    pub background: RectF,
    pub border: RectF,
    pub issue: Option<GeometryIssue>,
}

impl SurfaceGeometry {
    /// Total width covered by items and the gaps between them.
    pub fn track_width(&self, item_count: i32, spacing: f32) -> f32 {
        if item_count <= 0 {
            return 0.0;
        }
        let n = item_count as f32;
        n * self.item_width + (n - 1.0) * spacing
    }
}

pub fn compute_surface_geometry(
    width: f32,
    height: f32,
    padding: &Padding,
    style: &StyleConfig,
    item_count: i32,
    spacing: f32,
) -> SurfaceGeometry {
    let background = RectF::new(0.0, height - style.track_height, width, height);
    // Stroke is centered on the rect edge
    let border = background.inset(style.border_width / 2.0);

    let (item_width, issue) = if item_count <= 0 {
        (0.0, Some(GeometryIssue::InvalidItemCount { item_count }))
    } else {
        let available = width - padding.left - padding.right;
        let reserved = spacing * (item_count - 1) as f32 + style.border_width * 2.0;
        let item_width = ((available - reserved) / item_count as f32).round();
        if item_width < 0.0 {
            (
                0.0,
                Some(GeometryIssue::InsufficientWidth {
                    available,
                    reserved,
                    item_count,
                }),
            )
        } else {
            // max() also turns -0.0 into 0.0
            (item_width.max(0.0), None)
        }
    };

    SurfaceGeometry {
        view_width: width,
        view_height: height,
        item_width,
        background,
        border,
        issue,
    }
}

/// Result of the segment-fill walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    /// Items that are completely filled, left to right.
    pub full: Vec<RectF>,
    /// Terminal item filled part of the way. `None` when the fill ends exactly
    /// on an item boundary.
    pub partial: Option<RectF>,
    /// Last rect the walk touched (full or partial).
    pub last: RectF,
}

impl Fill {
    pub fn filled_width(&self) -> f32 {
        let full: f32 = self.full.iter().map(RectF::width).sum();
        full + self.partial.map_or(0.0, |r| r.width())
    }

    pub fn anchor_x(&self, anchor: MarkerAnchor) -> f32 {
        match anchor {
            MarkerAnchor::FillEdge => self.last.right,
            MarkerAnchor::SegmentCenter => self.last.center_x(),
        }
    }
}

/// Walk the items left to right, each worth `max / item_count` of progress.
///
/// Items the progress runs past are full; the first item it does not run
/// past is terminal and filled by the leftover fraction.
pub fn compute_fill(
    state: &WidgetState,
    surface: &SurfaceGeometry,
    style: &StyleConfig,
    padding: &Padding,
) -> Fill {
    let item_width = surface.item_width;
    let spacing = state.item_spacing();
    let top = surface.background.top + padding.top + style.border_width;
    let bottom = surface.view_height - padding.bottom - style.border_width;
    let mut left = padding.left + style.border_width;

    let mut full = Vec::new();
    let filled = state.filled_items();
    let item_count = state.item_count();

    for index in 0..item_count {
        let item = RectF::new(left, top, left + item_width, bottom);
        let fraction = (filled - f64::from(index)).clamp(0.0, 1.0);

        if filled > f64::from(index + 1) && index < item_count - 1 {
            full.push(item);
            left += item_width + spacing;
            continue;
        }

        if fraction >= 1.0 {
            full.push(item);
            return Fill {
                full,
                partial: None,
                last: item,
            };
        }
        let partial = RectF::new(left, top, left + fraction as f32 * item_width, bottom);
        return Fill {
            full,
            partial: Some(partial),
            last: partial,
        };
    }

    // No items to walk: zero-width fill at the track start
    let empty = RectF::new(left, top, left, bottom);
    Fill {
        full,
        partial: Some(empty),
        last: empty,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub x: f32,
    /// Vertical center of the text.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Geometry for a single paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameGeometry {
    pub fill: Fill,
    pub anchor_x: f32,
    pub marker: RectF,
    pub label: Label,
}

pub fn compute_frame_geometry<M: TextMetrics + ?Sized>(
    state: &WidgetState,
    surface: &SurfaceGeometry,
    style: &StyleConfig,
    padding: &Padding,
    metrics: &M,
) -> FrameGeometry {
    let fill = compute_fill(state, surface, style, padding);
    let anchor_x = fill.anchor_x(style.marker.anchor);

    let marker_style = &style.marker;
    let marker_bottom = surface.background.top - marker_style.bottom;
    let marker = RectF::new(
        anchor_x - marker_style.width / 2.0,
        marker_bottom - marker_style.height,
        anchor_x + marker_style.width / 2.0,
        marker_bottom,
    );

    let text = style.text_format.format(state.progress());
    let size = metrics.measure(&text);
    let max_x = (surface.view_width - size.width).max(0.0);
    let x = (anchor_x - size.width / 2.0).clamp(0.0, max_x);
    let y = marker.top - style.text_bottom - size.height / 2.0;

    FrameGeometry {
        fill,
        anchor_x,
        marker,
        label: Label {
            text,
            x,
            y,
            width: size.width,
            height: size.height,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::widgets::TextFormat;

    /// One unit per char, one unit tall.
    struct CharMetrics;

    impl TextMetrics for CharMetrics {
        fn measure(&self, text: &str) -> Size {
            Size::new(text.chars().count() as f32, 1.0)
        }
    }

    fn style() -> StyleConfig {
        let mut style = StyleConfig {
            track_height: 3.0,
            border_width: 1.0,
            border_corner: 1.0,
            text_format: TextFormat::new("%s%%"),
            ..StyleConfig::default()
        };
        style.marker.glyph = Some("v".to_string());
        style.marker.color = Rgba::WHITE;
        style.marker.width = 1.0;
        style.marker.height = 1.0;
        style
    }

    /// 102 wide, border 1 on each side, ten items of width 10.
    fn setup(progress: i32) -> (WidgetState, SurfaceGeometry, StyleConfig) {
        let style = style();
        let mut state = WidgetState::new(10, 0.0);
        state.set_max(100);
        state.set_progress(progress);
        let surface = compute_surface_geometry(102.0, 8.0, &Padding::default(), &style, 10, 0.0);
        (state, surface, style)
    }

    #[test]
    fn test_surface_rects() {
        let (_, surface, _) = setup(0);
        assert_eq!(surface.item_width, 10.0);
        assert_eq!(surface.background, RectF::new(0.0, 5.0, 102.0, 8.0));
        assert_eq!(surface.border, RectF::new(0.5, 5.5, 101.5, 7.5));
        assert!(surface.issue.is_none());
        assert_eq!(surface.track_width(10, 0.0), 100.0);
    }

    #[test]
    fn test_item_width_accounts_for_spacing_and_padding() {
        let padding = Padding {
            left: 2.0,
            right: 3.0,
            ..Padding::default()
        };
        let surface = compute_surface_geometry(60.0, 4.0, &padding, &style(), 5, 2.0);
        // (60 - 5 - 8 - 2) / 5 = 9
        assert_eq!(surface.item_width, 9.0);
    }

    #[test]
    fn test_item_width_rounds_to_nearest() {
        // (77 - 2) / 10 = 7.5 rounds up
        let surface = compute_surface_geometry(77.0, 4.0, &Padding::default(), &style(), 10, 0.0);
        assert_eq!(surface.item_width, 8.0);
    }

    #[test]
    fn test_invalid_item_count_degrades() {
        let surface = compute_surface_geometry(50.0, 4.0, &Padding::default(), &style(), 0, 0.0);
        assert_eq!(surface.item_width, 0.0);
        assert_eq!(
            surface.issue,
            Some(GeometryIssue::InvalidItemCount { item_count: 0 })
        );

        let mut state = WidgetState::new(0, 0.0);
        state.set_progress(50);
        let fill = compute_fill(&state, &surface, &style(), &Padding::default());
        assert!(fill.full.is_empty());
        assert_eq!(fill.filled_width(), 0.0);
    }

    #[test]
    fn test_too_narrow_surface_degrades() {
        let surface = compute_surface_geometry(10.0, 4.0, &Padding::default(), &style(), 10, 2.0);
        assert_eq!(surface.item_width, 0.0);
        assert!(matches!(
            surface.issue,
            Some(GeometryIssue::InsufficientWidth { item_count: 10, .. })
        ));
    }

    #[test]
    fn test_partial_fill_at_45() {
        let (state, surface, style) = setup(45);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());

        assert_eq!(fill.full.len(), 4);
        assert_eq!(fill.full[0], RectF::new(1.0, 6.0, 11.0, 7.0));
        assert_eq!(fill.full[3].right, 41.0);
        let partial = fill.partial.expect("item 5 is partially filled");
        assert_eq!(partial.left, 41.0);
        assert_eq!(partial.width(), 5.0);
        assert_eq!(fill.filled_width(), 45.0);
    }

    #[test]
    fn test_zero_progress_is_zero_width_at_first_item() {
        let (state, surface, style) = setup(0);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());
        assert!(fill.full.is_empty());
        assert_eq!(fill.partial, Some(RectF::new(1.0, 6.0, 1.0, 7.0)));
        assert_eq!(fill.anchor_x(MarkerAnchor::FillEdge), 1.0);
    }

    #[test]
    fn test_full_progress_fills_every_item() {
        let (state, surface, style) = setup(100);
        let frame =
            compute_frame_geometry(&state, &surface, &style, &Padding::default(), &CharMetrics);

        assert_eq!(frame.fill.full.len(), 10);
        assert!(frame.fill.partial.is_none());
        assert_eq!(frame.fill.filled_width(), 100.0);
        // Marker centered over item 10 (91..101)
        assert_eq!(frame.anchor_x, 96.0);
        assert_eq!(frame.marker.center_x(), 96.0);
    }

    #[test]
    fn test_default_anchor_is_center_of_last_touched_rect() {
        let (mut state, surface, style) = setup(0);
        let padding = Padding::default();
        for progress in 0..=100 {
            state.set_progress(progress);
            let frame = compute_frame_geometry(&state, &surface, &style, &padding, &CharMetrics);
            assert_eq!(frame.anchor_x, frame.fill.last.center_x(), "progress {}", progress);
        }

        state.set_progress(45);
        let frame = compute_frame_geometry(&state, &surface, &style, &padding, &CharMetrics);
        assert_eq!(frame.anchor_x, 43.5);
    }

    #[test]
    fn test_fill_edge_anchor_follows_fill_end() {
        let (state, surface, mut style) = setup(45);
        style.marker.anchor = MarkerAnchor::FillEdge;
        let frame =
            compute_frame_geometry(&state, &surface, &style, &Padding::default(), &CharMetrics);
        assert_eq!(frame.anchor_x, 46.0);
        assert_eq!(frame.marker.center_x(), 46.0);
    }

    #[test]
    fn test_item_boundary_has_no_partial() {
        let (state, surface, style) = setup(40);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());
        assert_eq!(fill.full.len(), 4);
        assert!(fill.partial.is_none());
        assert_eq!(fill.anchor_x(MarkerAnchor::SegmentCenter), 36.0);
        assert_eq!(fill.anchor_x(MarkerAnchor::FillEdge), 41.0);
    }

    #[test]
    fn test_filled_width_tracks_progress() {
        let (mut state, surface, style) = setup(0);
        let track = surface.track_width(10, 0.0);
        for progress in 0..=100 {
            state.set_progress(progress);
            let fill = compute_fill(&state, &surface, &style, &Padding::default());
            let expected = (progress as f32 / 100.0 * track).round();
            assert!(
                (fill.filled_width() - expected).abs() <= 1.0,
                "progress {}: {} vs {}",
                progress,
                fill.filled_width(),
                expected
            );
        }
    }

    #[test]
    fn test_spacing_advances_item_slots() {
        let style = style();
        let mut state = WidgetState::new(4, 2.0);
        state.set_max(8);
        state.set_progress(5);
        // (40 - 6 - 2) / 4 = 8
        let surface = compute_surface_geometry(40.0, 6.0, &Padding::default(), &style, 4, 2.0);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());

        assert_eq!(fill.full.len(), 2);
        assert_eq!(fill.full[1].left, 11.0);
        let partial = fill.partial.unwrap();
        assert_eq!(partial.left, 21.0);
        assert_eq!(partial.width(), 4.0);
    }

    #[test]
    fn test_uneven_split_converges_at_max() {
        let style = style();
        let mut state = WidgetState::new(3, 0.0);
        state.set_max(100);
        state.set_progress(100);
        let surface = compute_surface_geometry(32.0, 6.0, &Padding::default(), &style, 3, 0.0);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());

        assert_eq!(fill.full.len(), 3);
        assert!(fill.partial.is_none());
        assert_eq!(fill.filled_width(), surface.track_width(3, 0.0));
    }

    #[test]
    fn test_filled_width_tracks_progress_for_uneven_max() {
        let style = style();
        let padding = Padding::default();
        // (302 - 2) / 3 = 100 per item
        let surface = compute_surface_geometry(302.0, 6.0, &padding, &style, 3, 0.0);
        let track = surface.track_width(3, 0.0);
        for max in [7, 10, 100] {
            let mut state = WidgetState::new(3, 0.0);
            state.set_max(max);
            let mut previous = 0.0;
            for progress in 0..=max {
                state.set_progress(progress);
                let fill = compute_fill(&state, &surface, &style, &padding);
                let expected = progress as f32 / max as f32 * track;
                assert!(
                    (fill.filled_width() - expected).abs() <= 1.0,
                    "max {} progress {}: {} vs {}",
                    max,
                    progress,
                    fill.filled_width(),
                    expected
                );
                assert!(fill.filled_width() >= previous);
                previous = fill.filled_width();
            }
            assert_eq!(previous, track);
        }
    }

    #[test]
    fn test_max_below_item_count() {
        let style = style();
        let mut state = WidgetState::new(10, 0.0);
        state.set_max(5);
        state.set_progress(5);
        let surface = compute_surface_geometry(102.0, 6.0, &Padding::default(), &style, 10, 0.0);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());
        assert_eq!(fill.full.len(), 10);
        assert!(fill.partial.is_none());

        state.set_progress(0);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());
        assert_eq!(fill.filled_width(), 0.0);
    }

    #[test]
    fn test_zero_max_renders_empty() {
        let (mut state, surface, style) = setup(0);
        state.set_max(0);
        let fill = compute_fill(&state, &surface, &style, &Padding::default());
        assert!(fill.full.is_empty());
        assert_eq!(fill.filled_width(), 0.0);
    }

    #[test]
    fn test_marker_and_label_stack_above_track() {
        let (state, surface, mut style) = setup(45);
        style.marker.bottom = 1.0;
        style.text_bottom = 1.0;
        let frame =
            compute_frame_geometry(&state, &surface, &style, &Padding::default(), &CharMetrics);

        assert_eq!(frame.anchor_x, 43.5);
        assert_eq!(frame.marker, RectF::new(43.0, 3.0, 44.0, 4.0));
        assert_eq!(frame.label.text, "45%");
        assert_eq!(frame.label.x, 42.0);
        assert_eq!(frame.label.y, 1.5);
    }

    #[test]
    fn test_label_is_clamped_to_surface() {
        let (mut state, surface, style) = setup(0);
        let padding = Padding::default();

        let frame = compute_frame_geometry(&state, &surface, &style, &padding, &CharMetrics);
        assert_eq!(frame.label.x, 0.0);

        state.set_progress(100);
        let frame = compute_frame_geometry(&state, &surface, &style, &padding, &CharMetrics);
        assert_eq!(frame.label.x, 94.0);

        // Anchored on the fill end, "100%" would overhang the right edge
        let mut edge_style = style.clone();
        edge_style.marker.anchor = MarkerAnchor::FillEdge;
        let frame = compute_frame_geometry(&state, &surface, &edge_style, &padding, &CharMetrics);
        assert_eq!(frame.label.x, 102.0 - 4.0);

        for progress in 0..=100 {
            state.set_progress(progress);
            let frame = compute_frame_geometry(&state, &surface, &style, &padding, &CharMetrics);
            assert!(frame.label.x >= 0.0);
            assert!(frame.label.x <= surface.view_width - frame.label.width);
        }
    }

    #[test]
    fn test_frame_geometry_is_idempotent() {
        let (state, surface, style) = setup(63);
        let padding = Padding::default();
        let a = compute_frame_geometry(&state, &surface, &style, &padding, &CharMetrics);
        let b = compute_frame_geometry(&state, &surface, &style, &padding, &CharMetrics);
        assert_eq!(a, b);
    }
}
