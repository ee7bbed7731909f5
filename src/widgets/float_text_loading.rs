use crate::config::{Padding, StyleConfig, WidgetConfig};
use crate::core::drag::ProgressControl;
use crate::widgets::geometry::{
    compute_frame_geometry, compute_surface_geometry, FrameGeometry, Size, SurfaceGeometry,
    TextMetrics,
};
use crate::widgets::renderer::{self, Canvas};
use crate::widgets::WidgetState;

/// Segmented loading bar with a floating percentage label.
///
/// Owns the [`WidgetState`] and the style it was built with. Surface geometry
/// is cached between resizes; frame geometry is recomputed on every draw.
/// Mutations raise a redraw request that the host collects with
/// [`FloatTextLoading::take_redraw_request`], so several mutations between
/// paints collapse into one paint.
pub struct FloatTextLoading {
    state: WidgetState,
    style: StyleConfig,
    padding: Padding,
    surface: SurfaceGeometry,
    redraw_requested: bool,
}

impl FloatTextLoading {
    pub fn new(config: &WidgetConfig, style: StyleConfig) -> Self {
        let mut state = WidgetState::new(config.item_count, config.item_spacing);
        state.set_max(config.max);
        state.set_progress(config.progress);

        Self {
            state,
            style,
            padding: config.padding,
            surface: SurfaceGeometry::default(),
            redraw_requested: true,
        }
    }

    pub fn progress(&self) -> i32 {
        self.state.progress()
    }

    pub fn max(&self) -> i32 {
        self.state.max()
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn surface(&self) -> &SurfaceGeometry {
        &self.surface
    }

    /// Clamp into `[0, max]`, store, and request a redraw.
    pub fn set_progress(&mut self, progress: i32) {
        self.state.set_progress(progress);
        self.invalidate();
    }

    /// Change the scale (negative falls back to 100), reset progress to 0,
    /// re-measure items, and request a redraw.
    pub fn set_max(&mut self, max: i32) {
        self.state.set_max(max);
        self.recompute_surface(self.surface.view_width, self.surface.view_height);
        self.invalidate();
    }

    /// Resize hook. The widget takes whatever size it is given.
    pub fn measure(&mut self, width: f32, height: f32) -> Size {
        self.recompute_surface(width, height);
        self.invalidate();
        Size::new(width, height)
    }

    pub fn frame_geometry<M: TextMetrics + ?Sized>(&self, metrics: &M) -> FrameGeometry {
        compute_frame_geometry(
            &self.state,
            &self.surface,
            &self.style,
            &self.padding,
            metrics,
        )
    }

    /// Draw hook: compute this frame's geometry and paint it.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let frame = self.frame_geometry(&*canvas);
        renderer::render(canvas, &self.surface, &frame, &self.style);
        self.redraw_requested = false;
    }

    /// True if a redraw was requested since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    fn recompute_surface(&mut self, width: f32, height: f32) {
        let surface = compute_surface_geometry(
            width,
            height,
            &self.padding,
            &self.style,
            self.state.item_count(),
            self.state.item_spacing(),
        );
        if let Some(issue) = &surface.issue {
            tracing::warn!(width, height, "Rendering empty track: {}", issue);
        } else {
            tracing::debug!(width, height, item_width = surface.item_width, "Measured surface");
        }
        self.surface = surface;
    }
}

impl ProgressControl for FloatTextLoading {
    fn progress(&self) -> i32 {
        FloatTextLoading::progress(self)
    }

    fn set_progress(&mut self, progress: i32) {
        FloatTextLoading::set_progress(self, progress);
    }
}
