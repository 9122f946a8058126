use egui::{Pos2, Rect};

/// Maps between value space and pixel space for one laid-out track.
///
/// The horizontal span excludes the handle radius on both sides so a handle
/// at either end stays fully inside the widget rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
  span_min_x: f32,
  span_width: f32,
  center_y: f32,
  value_min: f32,
  value_max: f32,
  minimum_range_offset: Option<f32>,
}

impl TrackGeometry {
  #[must_use]
  pub fn new(
    rect: Rect,
    handle_radius: f32,
    value_min: f32,
    value_max: f32,
    minimum_range_offset: Option<f32>,
  ) -> Self {
    Self {
      span_min_x: rect.min.x + handle_radius,
      span_width: (rect.width() - 2.0 * handle_radius).max(0.0),
      center_y: rect.center().y,
      value_min,
      value_max,
      minimum_range_offset,
    }
  }

  #[must_use]
  pub fn span_min_x(&self) -> f32 {
    self.span_min_x
  }

  #[must_use]
  pub fn span_max_x(&self) -> f32 {
    self.span_min_x + self.span_width
  }

  #[must_use]
  pub fn center_y(&self) -> f32 {
    self.center_y
  }

  /// Pixel x for a value. A degenerate or inverted domain collapses to the
  /// left edge of the span.
  #[must_use]
  pub fn value_to_x(&self, value: f32) -> f32 {
    let span = self.value_max - self.value_min;
    if span <= 0.0 {
      return self.span_min_x;
    }
    let fraction = ((value - self.value_min) / span).clamp(0.0, 1.0);
    self.span_min_x + fraction * self.span_width
  }

  /// Value for a pixel x, pinned to the domain.
  #[must_use]
  pub fn x_to_value(&self, x: f32) -> f32 {
    if self.span_width <= 0.0 {
      return self.value_min;
    }
    let fraction = ((x - self.span_min_x) / self.span_width).clamp(0.0, 1.0);
    self.value_min + fraction * (self.value_max - self.value_min)
  }

  /// Visual centers for both handles.
  ///
  /// When a minimum pixel separation is configured and the handles sit
  /// closer than that, they are spread symmetrically around their midpoint,
  /// pinned to the track span. Crossed-over handles are never spread.
  #[must_use]
  pub fn handle_centers(&self, lower: f32, upper: f32) -> (Pos2, Pos2) {
    let mut lower_x = self.value_to_x(lower);
    let mut upper_x = self.value_to_x(upper);
    if let Some(offset) = self.minimum_range_offset
      && lower <= upper
      && upper_x - lower_x < offset
    {
      let mid = (lower_x + upper_x) / 2.0;
      lower_x = (mid - offset / 2.0).max(self.span_min_x);
      upper_x = (mid + offset / 2.0).min(self.span_max_x());
    }
    (
      Pos2::new(lower_x, self.center_y),
      Pos2::new(upper_x, self.center_y),
    )
  }
}
