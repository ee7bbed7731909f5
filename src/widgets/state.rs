/// Scale used when a negative max is requested.
pub const DEFAULT_MAX: i32 = 100;

/// Progress state for the segmented loading widget (rendering-agnostic)
///
/// Holds progress/max and the item layout. Progress only changes through the
/// clamped setters, so `0 <= progress <= max` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    progress: i32,
    max: i32,
    item_count: i32,
    item_spacing: f32,
}

impl WidgetState {
    pub fn new(item_count: i32, item_spacing: f32) -> Self {
        Self {
            progress: 0,
            max: DEFAULT_MAX,
            item_count,
            item_spacing: item_spacing.max(0.0),
        }
    }

    pub fn progress(&self) -> i32 {
        self.progress
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn item_count(&self) -> i32 {
        self.item_count
    }

    pub fn item_spacing(&self) -> f32 {
        self.item_spacing
    }

    /// Store `progress` clamped into `[0, max]`.
    pub fn set_progress(&mut self, progress: i32) {
        self.progress = progress.clamp(0, self.max);
    }

    /// Change the scale. Negative values fall back to [`DEFAULT_MAX`].
    /// Progress is always reset to 0.
    pub fn set_max(&mut self, max: i32) {
        self.max = if max < 0 { DEFAULT_MAX } else { max };
        self.progress = 0;
    }

    /// Nominal progress represented by one item (`max / item_count`).
    pub fn progress_per_item(&self) -> i32 {
        if self.item_count > 0 {
            self.max / self.item_count
        } else {
            0
        }
    }

    /// Progress expressed in items: `progress * item_count / max`.
    ///
    /// Each item stands for `max / item_count` of progress, fractional when
    /// the count does not divide `max`. Reaches exactly `item_count` at
    /// `progress == max`.
    pub fn filled_items(&self) -> f64 {
        if self.item_count <= 0 || self.max <= 0 {
            return 0.0;
        }
        f64::from(self.progress) * f64::from(self.item_count) / f64::from(self.max)
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new(10, 0.0)
    }
}
