use log::warn;

/// Identifies one of the two slider handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
  /// Handle for the lower end of the selected range.
  Lower,
  /// Handle for the upper end of the selected range.
  Upper,
}

/// Clamp that tolerates inverted bounds instead of panicking.
fn pin(value: f32, low: f32, high: f32) -> f32 {
  value.max(low).min(high)
}

/// Value state of the slider: domain bounds, both selected values and the
/// rules constraining them.
///
/// All mutation goes through setters that keep the values pinned to the
/// domain, honor the per-handle limits and enforce the minimum range.
/// Invalid configuration is never an error; values degrade to the nearest
/// reachable state.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeModel {
  minimum_value: f32,
  maximum_value: f32,
  minimum_range: f32,
  step_value: f32,
  step_value_continuously: bool,
  lower_maximum_value: Option<f32>,
  upper_minimum_value: Option<f32>,
  push_enabled: bool,
  lower_value: f32,
  upper_value: f32,
}

impl Default for RangeModel {
  fn default() -> Self {
    Self {
      minimum_value: 0.0,
      maximum_value: 1.0,
      minimum_range: 0.0,
      step_value: 0.0,
      step_value_continuously: false,
      lower_maximum_value: None,
      upper_minimum_value: None,
      push_enabled: false,
      lower_value: 0.0,
      upper_value: 1.0,
    }
  }
}

impl RangeModel {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn minimum_value(&self) -> f32 {
    self.minimum_value
  }

  #[must_use]
  pub fn maximum_value(&self) -> f32 {
    self.maximum_value
  }

  #[must_use]
  pub fn minimum_range(&self) -> f32 {
    self.minimum_range
  }

  #[must_use]
  pub fn step_value(&self) -> f32 {
    self.step_value
  }

  #[must_use]
  pub fn step_value_continuously(&self) -> bool {
    self.step_value_continuously
  }

  #[must_use]
  pub fn lower_maximum_value(&self) -> Option<f32> {
    self.lower_maximum_value
  }

  #[must_use]
  pub fn upper_minimum_value(&self) -> Option<f32> {
    self.upper_minimum_value
  }

  #[must_use]
  pub fn push_enabled(&self) -> bool {
    self.push_enabled
  }

  #[must_use]
  pub fn lower_value(&self) -> f32 {
    self.lower_value
  }

  #[must_use]
  pub fn upper_value(&self) -> f32 {
    self.upper_value
  }

  /// Current value of the given handle.
  #[must_use]
  pub fn value(&self, handle: Handle) -> f32 {
    match handle {
      Handle::Lower => self.lower_value,
      Handle::Upper => self.upper_value,
    }
  }

  /// Whether the lower value currently exceeds the upper value. Only
  /// reachable with a negative minimum range and push disabled.
  #[must_use]
  pub fn crossed_over(&self) -> bool {
    self.lower_value > self.upper_value
  }

  /// Set the lower domain bound and re-pin both values.
  pub fn set_minimum_value(&mut self, value: f32) {
    if value > self.maximum_value {
      warn!(
        "minimum value {value} exceeds maximum value {}, domain is degenerate",
        self.maximum_value
      );
    }
    self.minimum_value = value;
    self.reclamp();
  }

  /// Set the upper domain bound and re-pin both values.
  pub fn set_maximum_value(&mut self, value: f32) {
    if value < self.minimum_value {
      warn!(
        "maximum value {value} is below minimum value {}, domain is degenerate",
        self.minimum_value
      );
    }
    self.maximum_value = value;
    self.reclamp();
  }

  /// Set both domain bounds in one step and re-pin the values.
  pub fn set_bounds(&mut self, minimum: f32, maximum: f32) {
    if minimum > maximum {
      warn!("bounds [{minimum}, {maximum}] are inverted, domain is degenerate");
    }
    self.minimum_value = minimum;
    self.maximum_value = maximum;
    self.reclamp();
  }

  /// Set the minimum gap between the values. A negative gap allows the
  /// handles to cross when push is disabled.
  pub fn set_minimum_range(&mut self, range: f32) {
    self.minimum_range = range;
    self.reclamp();
  }

  /// Set the quantization step. Zero disables stepping; negative values are
  /// treated as zero.
  pub fn set_step_value(&mut self, step: f32) {
    if step < 0.0 {
      warn!("step value {step} is negative, stepping disabled");
    }
    self.step_value = step.max(0.0);
  }

  pub fn set_step_value_continuously(&mut self, continuously: bool) {
    self.step_value_continuously = continuously;
  }

  /// Extra upper limit for the lower handle only.
  pub fn set_lower_maximum_value(&mut self, limit: Option<f32>) {
    self.lower_maximum_value = limit;
    self.reclamp();
  }

  /// Extra lower limit for the upper handle only.
  pub fn set_upper_minimum_value(&mut self, limit: Option<f32>) {
    self.upper_minimum_value = limit;
    self.reclamp();
  }

  pub fn set_push_enabled(&mut self, enabled: bool) {
    self.push_enabled = enabled;
  }

  /// Round a value to the nearest step multiple. Identity when stepping is
  /// disabled. Applying it twice gives the same result as once.
  #[must_use]
  pub fn step_aligned(&self, value: f32) -> f32 {
    if self.step_value > 0.0 {
      (value / self.step_value).round() * self.step_value
    } else {
      value
    }
  }

  /// Assign a new value to one handle.
  ///
  /// The value is pinned to the domain, capped by the handle's own limit and
  /// then checked against the minimum range: with push enabled the other
  /// handle is moved out of the way as far as its bound allows, otherwise
  /// this handle is clamped. The final pin means the gap can only break at
  /// the domain edges when the range does not fit the domain at all.
  pub fn set_value(&mut self, handle: Handle, value: f32) {
    match handle {
      Handle::Lower => self.set_lower(value),
      Handle::Upper => self.set_upper(value),
    }
  }

  /// Assign both values at once. The handle moving away from the other is
  /// applied first, so the pair never clamps against a stale counterpart.
  pub fn set_values(&mut self, lower: f32, upper: f32) {
    if upper >= self.upper_value {
      self.set_upper(upper);
      self.set_lower(lower);
    } else {
      self.set_lower(lower);
      self.set_upper(upper);
    }
  }

  fn set_lower(&mut self, value: f32) {
    let mut value = pin(value, self.minimum_value, self.maximum_value);
    if let Some(limit) = self.lower_maximum_value {
      value = value.min(limit);
    }
    let gap_limit = self.upper_value - self.minimum_range;
    if value > gap_limit {
      if self.push_enabled {
        let pushed = (value + self.minimum_range).min(self.maximum_value);
        self.upper_value = pushed;
        if pushed < value + self.minimum_range {
          value = pushed - self.minimum_range;
        }
      } else {
        value = gap_limit;
      }
    }
    self.lower_value = pin(value, self.minimum_value, self.maximum_value);
  }

  fn set_upper(&mut self, value: f32) {
    let mut value = pin(value, self.minimum_value, self.maximum_value);
    if let Some(limit) = self.upper_minimum_value {
      value = value.max(limit);
    }
    let gap_limit = self.lower_value + self.minimum_range;
    if value < gap_limit {
      if self.push_enabled {
        let pushed = (value - self.minimum_range).max(self.minimum_value);
        self.lower_value = pushed;
        if pushed > value - self.minimum_range {
          value = pushed + self.minimum_range;
        }
      } else {
        value = gap_limit;
      }
    }
    self.upper_value = pin(value, self.minimum_value, self.maximum_value);
  }

  /// Re-run both values through their pipelines after a configuration
  /// change. The upper value is pinned first so the lower value clamps
  /// against an already valid counterpart.
  fn reclamp(&mut self) {
    let mut upper = pin(self.upper_value, self.minimum_value, self.maximum_value);
    if let Some(limit) = self.upper_minimum_value {
      upper = pin(upper.max(limit), self.minimum_value, self.maximum_value);
    }
    self.upper_value = upper;
    self.set_lower(self.lower_value);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use assert_approx_eq::assert_approx_eq;
  use rstest::rstest;

  fn model_0_100() -> RangeModel {
    let mut model = RangeModel::new();
    model.set_maximum_value(100.0);
    model.set_values(20.0, 80.0);
    model
  }

  #[test]
  fn test_defaults() {
    let model = RangeModel::new();
    assert_approx_eq!(model.minimum_value(), 0.0);
    assert_approx_eq!(model.maximum_value(), 1.0);
    assert_approx_eq!(model.lower_value(), 0.0);
    assert_approx_eq!(model.upper_value(), 1.0);
    assert_approx_eq!(model.step_value(), 0.0);
    assert_approx_eq!(model.minimum_range(), 0.0);
    assert!(!model.push_enabled());
    assert!(!model.step_value_continuously());
    assert!(!model.crossed_over());
  }

  #[rstest]
  #[case(-10.0, 0.0)]
  #[case(0.0, 0.0)]
  #[case(50.0, 50.0)]
  #[case(100.0, 100.0)]
  #[case(150.0, 100.0)]
  fn test_lower_pinned_to_domain(#[case] input: f32, #[case] expected: f32) {
    let mut model = model_0_100();
    model.set_minimum_range(-200.0);
    model.set_value(Handle::Lower, input);
    assert_approx_eq!(model.lower_value(), expected);
  }

  #[rstest]
  #[case(-10.0, 20.0)]
  #[case(60.0, 60.0)]
  #[case(130.0, 100.0)]
  fn test_upper_pinned_to_domain_and_gap(#[case] input: f32, #[case] expected: f32) {
    let mut model = model_0_100();
    model.set_value(Handle::Upper, input);
    assert_approx_eq!(model.upper_value(), expected);
  }

  #[test]
  fn test_minimum_range_clamps_dragged_handle() {
    let mut model = model_0_100();
    model.set_minimum_range(10.0);
    model.set_value(Handle::Lower, 75.0);
    assert_approx_eq!(model.lower_value(), 70.0);
    assert_approx_eq!(model.upper_value(), 80.0);
  }

  #[test]
  fn test_push_moves_other_handle_by_overlap() {
    let mut model = model_0_100();
    model.set_minimum_range(10.0);
    model.set_push_enabled(true);
    model.set_value(Handle::Lower, 75.0);
    assert_approx_eq!(model.lower_value(), 75.0);
    assert_approx_eq!(model.upper_value(), 85.0);
  }

  #[test]
  fn test_push_clamps_when_other_handle_hits_bound() {
    let mut model = model_0_100();
    model.set_minimum_range(10.0);
    model.set_push_enabled(true);
    model.set_values(20.0, 95.0);
    model.set_value(Handle::Lower, 92.0);
    assert_approx_eq!(model.upper_value(), 100.0);
    assert_approx_eq!(model.lower_value(), 90.0);
  }

  #[test]
  fn test_push_downward_moves_lower() {
    let mut model = model_0_100();
    model.set_minimum_range(10.0);
    model.set_push_enabled(true);
    model.set_value(Handle::Upper, 25.0);
    assert_approx_eq!(model.upper_value(), 25.0);
    assert_approx_eq!(model.lower_value(), 15.0);
  }

  #[test]
  fn test_push_downward_blocked_at_minimum() {
    let mut model = model_0_100();
    model.set_minimum_range(10.0);
    model.set_push_enabled(true);
    model.set_values(5.0, 80.0);
    model.set_value(Handle::Upper, 3.0);
    assert_approx_eq!(model.lower_value(), 0.0);
    assert_approx_eq!(model.upper_value(), 10.0);
  }

  #[rstest]
  #[case(5.0, 42.0, 40.0)]
  #[case(5.0, 43.0, 45.0)]
  #[case(5.0, 40.0, 40.0)]
  #[case(0.25, 0.6, 0.5)]
  #[case(0.0, 42.3, 42.3)]
  fn test_step_aligned(#[case] step: f32, #[case] input: f32, #[case] expected: f32) {
    let mut model = RangeModel::new();
    model.set_maximum_value(100.0);
    model.set_step_value(step);
    assert_approx_eq!(model.step_aligned(input), expected);
  }

  #[test]
  fn test_step_aligned_is_idempotent() {
    let mut model = RangeModel::new();
    model.set_maximum_value(100.0);
    model.set_step_value(7.0);
    for raw in [0.0, 3.4, 12.9, 50.0, 99.9] {
      let once = model.step_aligned(raw);
      assert_approx_eq!(model.step_aligned(once), once);
    }
  }

  #[test]
  fn test_negative_step_disables_stepping() {
    let mut model = RangeModel::new();
    model.set_step_value(-5.0);
    assert_approx_eq!(model.step_value(), 0.0);
    assert_approx_eq!(model.step_aligned(0.42), 0.42);
  }

  #[test]
  fn test_negative_minimum_range_allows_crossing() {
    let mut model = model_0_100();
    model.set_minimum_range(-30.0);
    model.set_value(Handle::Lower, 95.0);
    assert_approx_eq!(model.lower_value(), 95.0);
    assert_approx_eq!(model.upper_value(), 80.0);
    assert!(model.crossed_over());
  }

  #[test]
  fn test_crossing_limited_by_negative_range() {
    let mut model = model_0_100();
    model.set_minimum_range(-10.0);
    model.set_value(Handle::Lower, 95.0);
    assert_approx_eq!(model.lower_value(), 90.0);
    assert!(model.crossed_over());
  }

  #[test]
  fn test_per_handle_limits() {
    let mut model = model_0_100();
    model.set_lower_maximum_value(Some(40.0));
    model.set_upper_minimum_value(Some(60.0));
    model.set_value(Handle::Lower, 55.0);
    assert_approx_eq!(model.lower_value(), 40.0);
    model.set_value(Handle::Upper, 30.0);
    assert_approx_eq!(model.upper_value(), 60.0);
  }

  #[test]
  fn test_set_values_applies_moving_away_handle_first() {
    let mut model = model_0_100();
    model.set_minimum_range(10.0);

    model.set_values(90.0, 95.0);
    assert_approx_eq!(model.lower_value(), 85.0);
    assert_approx_eq!(model.upper_value(), 95.0);

    model.set_values(0.0, 5.0);
    assert_approx_eq!(model.lower_value(), 0.0);
    assert_approx_eq!(model.upper_value(), 10.0);

    model.set_values(30.0, 60.0);
    assert_approx_eq!(model.lower_value(), 30.0);
    assert_approx_eq!(model.upper_value(), 60.0);
  }

  #[test]
  fn test_minimum_range_wider_than_domain_pins_to_edges() {
    let mut model = model_0_100();
    model.set_minimum_range(150.0);
    model.set_value(Handle::Lower, 50.0);
    assert_approx_eq!(model.lower_value(), 0.0);
    model.set_value(Handle::Upper, 50.0);
    assert_approx_eq!(model.upper_value(), 100.0);
  }

  #[test]
  fn test_inverted_domain_degrades_without_panic() {
    let mut model = RangeModel::new();
    model.set_minimum_value(5.0);
    assert_approx_eq!(model.lower_value(), 1.0);
    assert_approx_eq!(model.upper_value(), 1.0);
    model.set_value(Handle::Lower, 3.0);
    assert_approx_eq!(model.lower_value(), 1.0);
  }

  #[test]
  fn test_shrinking_domain_reclamps_values() {
    let mut model = model_0_100();
    model.set_maximum_value(50.0);
    assert_approx_eq!(model.lower_value(), 20.0);
    assert_approx_eq!(model.upper_value(), 50.0);
    model.set_minimum_value(30.0);
    assert_approx_eq!(model.lower_value(), 30.0);
  }

  #[test]
  fn test_set_bounds_moves_past_the_old_domain() {
    let mut model = RangeModel::new();
    model.set_bounds(50.0, 100.0);
    assert_approx_eq!(model.minimum_value(), 50.0);
    assert_approx_eq!(model.maximum_value(), 100.0);
    assert_approx_eq!(model.lower_value(), 50.0);
    assert_approx_eq!(model.upper_value(), 50.0);
  }

  #[test]
  fn test_value_by_handle() {
    let model = model_0_100();
    assert_approx_eq!(model.value(Handle::Lower), 20.0);
    assert_approx_eq!(model.value(Handle::Upper), 80.0);
  }
}
