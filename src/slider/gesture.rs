use egui::Pos2;
use log::debug;

use super::model::{Handle, RangeModel};
use super::track::TrackGeometry;

/// Phase of a pointer event fed to the gesture machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
  Down,
  Move,
  Up,
  Cancel,
}

/// One pointer event: phase, position and delivery time in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchInput {
  pub phase: TouchPhase,
  pub pos: Pos2,
  pub time: f64,
}

impl TouchInput {
  #[must_use]
  pub fn down(pos: Pos2, time: f64) -> Self {
    Self {
      phase: TouchPhase::Down,
      pos,
      time,
    }
  }

  #[must_use]
  pub fn move_to(pos: Pos2, time: f64) -> Self {
    Self {
      phase: TouchPhase::Move,
      pos,
      time,
    }
  }

  #[must_use]
  pub fn up(pos: Pos2, time: f64) -> Self {
    Self {
      phase: TouchPhase::Up,
      pos,
      time,
    }
  }

  #[must_use]
  pub fn cancel(pos: Pos2, time: f64) -> Self {
    Self {
      phase: TouchPhase::Cancel,
      pos,
      time,
    }
  }
}

/// Interaction tuning passed to the gesture machine with each event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
  /// Report every intermediate value change, not only the one on release.
  pub continuous: bool,
  /// Arm fine-tuning after the pointer rests on a handle long enough.
  pub long_press_scales_touches: bool,
  /// Multiplier for pointer deltas while fine-tuning is armed.
  pub touch_scale: f32,
  /// Rest time that arms fine-tuning, in seconds.
  pub long_press_duration: f64,
  /// Movement tolerance while resting, in pixels.
  pub long_press_jitter: f32,
  /// Maximum distance from a handle center that still grabs it.
  pub hit_radius: f32,
  pub lower_handle_hidden: bool,
  pub upper_handle_hidden: bool,
}

impl Default for InteractionConfig {
  fn default() -> Self {
    Self {
      continuous: true,
      long_press_scales_touches: false,
      touch_scale: 0.1,
      long_press_duration: 0.5,
      long_press_jitter: 8.0,
      hit_radius: 15.0,
      lower_handle_hidden: false,
      upper_handle_hidden: false,
    }
  }
}

/// What one event did, for the widget to translate into response flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureOutcome {
  /// A value change to report under the continuous policy.
  pub changed: bool,
  /// A handle was grabbed.
  pub began: bool,
  /// The gesture finished.
  pub ended: bool,
}

/// Pointer state machine for the slider.
///
/// Idle until a touch lands on a handle, then tracking that handle until the
/// touch lifts. While tracking, an orthogonal scaling flag arms once the
/// pointer has rested long enough, attenuating further movement for
/// fine-tuning. Up and cancel both return to idle.
#[derive(Debug, Clone)]
pub struct GestureState {
  tracking: Option<Handle>,
  /// Horizontal offset between the grab point and the handle center.
  grab_offset: f32,
  /// Accumulated pointer position with scaling applied to each delta.
  effective_x: f32,
  last_x: f32,
  /// Last rest position and time, for the long-press check.
  anchor_pos: Pos2,
  anchor_time: f64,
  scaling_active: bool,
  pending_change: bool,
}

impl Default for GestureState {
  fn default() -> Self {
    Self {
      tracking: None,
      grab_offset: 0.0,
      effective_x: 0.0,
      last_x: 0.0,
      anchor_pos: Pos2::ZERO,
      anchor_time: 0.0,
      scaling_active: false,
      pending_change: false,
    }
  }
}

impl GestureState {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Handle currently being dragged, if any.
  #[must_use]
  pub fn tracking(&self) -> Option<Handle> {
    self.tracking
  }

  /// Whether fine-tuning is armed for the current gesture.
  #[must_use]
  pub fn scaling_active(&self) -> bool {
    self.scaling_active
  }

  /// Feed one pointer event through the machine, updating the model.
  pub fn handle_event(
    &mut self,
    input: TouchInput,
    model: &mut RangeModel,
    track: &TrackGeometry,
    config: &InteractionConfig,
  ) -> GestureOutcome {
    match input.phase {
      TouchPhase::Down => self.touch_down(input, model, track, config),
      TouchPhase::Move => self.touch_move(input, model, track, config),
      TouchPhase::Up | TouchPhase::Cancel => self.touch_up(model, config),
    }
  }

  /// Arm fine-tuning from time passing alone, without a new pointer event.
  /// Returns true when the flag switches on.
  pub fn refresh_scaling(&mut self, now: f64, config: &InteractionConfig) -> bool {
    if self.tracking.is_some()
      && config.long_press_scales_touches
      && !self.scaling_active
      && now - self.anchor_time >= config.long_press_duration
    {
      self.scaling_active = true;
      debug!("touch scaling armed");
      return true;
    }
    false
  }

  fn touch_down(
    &mut self,
    input: TouchInput,
    model: &RangeModel,
    track: &TrackGeometry,
    config: &InteractionConfig,
  ) -> GestureOutcome {
    if self.tracking.is_some() {
      return GestureOutcome::default();
    }
    let Some(handle) = hit_test(input.pos, model, track, config) else {
      return GestureOutcome::default();
    };
    let (lower_center, upper_center) =
      track.handle_centers(model.lower_value(), model.upper_value());
    let center = match handle {
      Handle::Lower => lower_center,
      Handle::Upper => upper_center,
    };
    self.tracking = Some(handle);
    self.grab_offset = input.pos.x - center.x;
    self.effective_x = input.pos.x;
    self.last_x = input.pos.x;
    self.anchor_pos = input.pos;
    self.anchor_time = input.time;
    self.scaling_active = false;
    self.pending_change = false;
    debug!("tracking {handle:?} handle");
    GestureOutcome {
      began: true,
      ..Default::default()
    }
  }

  #[allow(clippy::float_cmp)]
  fn touch_move(
    &mut self,
    input: TouchInput,
    model: &mut RangeModel,
    track: &TrackGeometry,
    config: &InteractionConfig,
  ) -> GestureOutcome {
    let Some(handle) = self.tracking else {
      return GestureOutcome::default();
    };
    if config.long_press_scales_touches && !self.scaling_active {
      if input.pos.distance(self.anchor_pos) > config.long_press_jitter {
        self.anchor_pos = input.pos;
        self.anchor_time = input.time;
      } else if input.time - self.anchor_time >= config.long_press_duration {
        self.scaling_active = true;
        debug!("touch scaling armed");
      }
    }
    let scale = if self.scaling_active {
      config.touch_scale
    } else {
      1.0
    };
    self.effective_x += (input.pos.x - self.last_x) * scale;
    self.last_x = input.pos.x;

    let raw = track.x_to_value(self.effective_x - self.grab_offset);
    let target = if model.step_value_continuously() {
      model.step_aligned(raw)
    } else {
      raw
    };
    let before = (model.lower_value(), model.upper_value());
    model.set_value(handle, target);
    let changed = (model.lower_value(), model.upper_value()) != before;
    if changed {
      self.pending_change = true;
    }
    GestureOutcome {
      changed: changed && config.continuous,
      ..Default::default()
    }
  }

  #[allow(clippy::float_cmp)]
  fn touch_up(&mut self, model: &mut RangeModel, config: &InteractionConfig) -> GestureOutcome {
    let Some(handle) = self.tracking.take() else {
      return GestureOutcome::default();
    };
    let mut changed = false;
    if model.step_value() > 0.0 && !model.step_value_continuously() {
      let before = (model.lower_value(), model.upper_value());
      let snapped = model.step_aligned(model.value(handle));
      model.set_value(handle, snapped);
      changed = (model.lower_value(), model.upper_value()) != before;
    }
    let report = if config.continuous {
      changed
    } else {
      changed || self.pending_change
    };
    self.scaling_active = false;
    self.pending_change = false;
    debug!("tracking ended");
    GestureOutcome {
      changed: report,
      began: false,
      ended: true,
    }
  }
}

/// Pick the handle a touch lands on. The closer center wins when both are in
/// range; the upper handle wins an exact tie. Hidden handles never hit.
fn hit_test(
  pos: Pos2,
  model: &RangeModel,
  track: &TrackGeometry,
  config: &InteractionConfig,
) -> Option<Handle> {
  let (lower_center, upper_center) =
    track.handle_centers(model.lower_value(), model.upper_value());
  let lower_distance = lower_center.distance(pos);
  let upper_distance = upper_center.distance(pos);
  let lower_hit = !config.lower_handle_hidden && lower_distance <= config.hit_radius;
  let upper_hit = !config.upper_handle_hidden && upper_distance <= config.hit_radius;
  match (lower_hit, upper_hit) {
    (true, true) => {
      if lower_distance < upper_distance {
        Some(Handle::Lower)
      } else {
        Some(Handle::Upper)
      }
    }
    (true, false) => Some(Handle::Lower),
    (false, true) => Some(Handle::Upper),
    (false, false) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use assert_approx_eq::assert_approx_eq;
  use egui::Rect;

  fn track() -> TrackGeometry {
    TrackGeometry::new(
      Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(110.0, 20.0)),
      5.0,
      0.0,
      100.0,
      None,
    )
  }

  fn model(lower: f32, upper: f32) -> RangeModel {
    let mut model = RangeModel::new();
    model.set_maximum_value(100.0);
    model.set_values(lower, upper);
    model
  }

  /// Pointer position over the handle center for a value on the test track.
  fn at(value: f32) -> Pos2 {
    Pos2::new(5.0 + value, 10.0)
  }

  #[test]
  fn test_down_away_from_handles_is_ignored() {
    let mut gesture = GestureState::new();
    let mut model = model(0.0, 100.0);
    let outcome = gesture.handle_event(
      TouchInput::down(at(50.0), 0.0),
      &mut model,
      &track(),
      &InteractionConfig::default(),
    );
    assert_eq!(outcome, GestureOutcome::default());
    assert_eq!(gesture.tracking(), None);
  }

  #[test]
  fn test_down_grabs_nearest_handle() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let outcome = gesture.handle_event(
      TouchInput::down(at(22.0), 0.0),
      &mut model,
      &track(),
      &InteractionConfig::default(),
    );
    assert!(outcome.began);
    assert_eq!(gesture.tracking(), Some(Handle::Lower));
  }

  #[test]
  fn test_exact_tie_prefers_upper_handle() {
    let mut gesture = GestureState::new();
    let mut model = model(50.0, 50.0);
    gesture.handle_event(
      TouchInput::down(at(50.0), 0.0),
      &mut model,
      &track(),
      &InteractionConfig::default(),
    );
    assert_eq!(gesture.tracking(), Some(Handle::Upper));
  }

  #[test]
  fn test_hidden_handles_are_not_grabbed() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let config = InteractionConfig {
      lower_handle_hidden: true,
      ..Default::default()
    };
    let outcome = gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track(), &config);
    assert!(!outcome.began);
    assert_eq!(gesture.tracking(), None);
  }

  #[test]
  fn test_drag_clamps_against_minimum_range() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    model.set_minimum_range(10.0);
    let track = track();
    let config = InteractionConfig::default();

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    let outcome = gesture.handle_event(TouchInput::move_to(at(75.0), 0.1), &mut model, &track, &config);
    assert!(outcome.changed);
    assert_approx_eq!(model.lower_value(), 70.0);
    assert_approx_eq!(model.upper_value(), 80.0);

    let outcome = gesture.handle_event(TouchInput::up(at(75.0), 0.2), &mut model, &track, &config);
    assert!(outcome.ended);
    assert!(!outcome.changed);
    assert_eq!(gesture.tracking(), None);
  }

  #[test]
  fn test_drag_pushes_other_handle() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    model.set_minimum_range(10.0);
    model.set_push_enabled(true);
    let track = track();
    let config = InteractionConfig::default();

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    gesture.handle_event(TouchInput::move_to(at(75.0), 0.1), &mut model, &track, &config);
    assert_approx_eq!(model.lower_value(), 75.0);
    assert_approx_eq!(model.upper_value(), 85.0);
  }

  #[test]
  fn test_release_snaps_to_step() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    model.set_step_value(5.0);
    let track = track();
    let config = InteractionConfig::default();

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    gesture.handle_event(TouchInput::move_to(at(42.0), 0.1), &mut model, &track, &config);
    assert_approx_eq!(model.lower_value(), 42.0);

    let outcome = gesture.handle_event(TouchInput::up(at(42.0), 0.2), &mut model, &track, &config);
    assert!(outcome.changed);
    assert_approx_eq!(model.lower_value(), 40.0);
  }

  #[test]
  fn test_continuous_stepping_quantizes_live() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    model.set_step_value(5.0);
    model.set_step_value_continuously(true);
    let track = track();
    let config = InteractionConfig::default();

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    let outcome = gesture.handle_event(TouchInput::move_to(at(42.0), 0.1), &mut model, &track, &config);
    assert!(outcome.changed);
    assert_approx_eq!(model.lower_value(), 40.0);

    let outcome = gesture.handle_event(TouchInput::move_to(at(41.0), 0.2), &mut model, &track, &config);
    assert!(!outcome.changed);
    assert_approx_eq!(model.lower_value(), 40.0);

    let outcome = gesture.handle_event(TouchInput::move_to(at(43.0), 0.3), &mut model, &track, &config);
    assert!(outcome.changed);
    assert_approx_eq!(model.lower_value(), 45.0);

    let outcome = gesture.handle_event(TouchInput::up(at(43.0), 0.4), &mut model, &track, &config);
    assert!(!outcome.changed);
    assert_approx_eq!(model.lower_value(), 45.0);
  }

  #[test]
  fn test_change_reported_on_release_when_not_continuous() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let track = track();
    let config = InteractionConfig {
      continuous: false,
      ..Default::default()
    };

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    let outcome = gesture.handle_event(TouchInput::move_to(at(30.0), 0.1), &mut model, &track, &config);
    assert!(!outcome.changed);
    assert_approx_eq!(model.lower_value(), 30.0);

    let outcome = gesture.handle_event(TouchInput::up(at(30.0), 0.2), &mut model, &track, &config);
    assert!(outcome.changed);
  }

  #[test]
  fn test_release_without_movement_reports_no_change() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let track = track();
    let config = InteractionConfig {
      continuous: false,
      ..Default::default()
    };

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    let outcome = gesture.handle_event(TouchInput::up(at(20.0), 0.1), &mut model, &track, &config);
    assert!(outcome.ended);
    assert!(!outcome.changed);
  }

  #[test]
  fn test_cancel_behaves_like_release() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let track = track();
    let config = InteractionConfig {
      continuous: false,
      long_press_scales_touches: true,
      ..Default::default()
    };

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    gesture.handle_event(TouchInput::move_to(at(30.0), 0.1), &mut model, &track, &config);
    gesture.refresh_scaling(1.0, &config);
    assert!(gesture.scaling_active());

    let outcome = gesture.handle_event(TouchInput::cancel(at(30.0), 1.1), &mut model, &track, &config);
    assert!(outcome.ended);
    assert!(outcome.changed);
    assert!(!gesture.scaling_active());
    assert_eq!(gesture.tracking(), None);
  }

  #[test]
  fn test_grab_offset_keeps_drag_relative() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let track = track();
    let config = InteractionConfig::default();

    // Grab 5 px right of the handle center, then move 10 px right.
    gesture.handle_event(
      TouchInput::down(Pos2::new(30.0, 10.0), 0.0),
      &mut model,
      &track,
      &config,
    );
    gesture.handle_event(
      TouchInput::move_to(Pos2::new(40.0, 10.0), 0.1),
      &mut model,
      &track,
      &config,
    );
    assert_approx_eq!(model.lower_value(), 30.0);
  }

  #[test]
  fn test_long_press_arms_scaling_and_attenuates_movement() {
    let mut gesture = GestureState::new();
    let mut model = model(50.0, 100.0);
    let track = track();
    let config = InteractionConfig {
      long_press_scales_touches: true,
      ..Default::default()
    };

    gesture.handle_event(TouchInput::down(at(50.0), 0.0), &mut model, &track, &config);
    gesture.handle_event(
      TouchInput::move_to(Pos2::new(57.0, 10.0), 0.2),
      &mut model,
      &track,
      &config,
    );
    assert!(!gesture.scaling_active());
    assert_approx_eq!(model.lower_value(), 52.0);

    gesture.handle_event(
      TouchInput::move_to(Pos2::new(57.0, 10.0), 0.6),
      &mut model,
      &track,
      &config,
    );
    assert!(gesture.scaling_active());
    assert_approx_eq!(model.lower_value(), 52.0);

    gesture.handle_event(
      TouchInput::move_to(Pos2::new(67.0, 10.0), 0.7),
      &mut model,
      &track,
      &config,
    );
    assert_approx_eq!(model.lower_value(), 53.0);
  }

  #[test]
  fn test_jitter_resets_long_press_anchor() {
    let mut gesture = GestureState::new();
    let mut model = model(50.0, 100.0);
    let track = track();
    let config = InteractionConfig {
      long_press_scales_touches: true,
      ..Default::default()
    };

    gesture.handle_event(TouchInput::down(at(50.0), 0.0), &mut model, &track, &config);
    gesture.handle_event(
      TouchInput::move_to(Pos2::new(75.0, 10.0), 0.3),
      &mut model,
      &track,
      &config,
    );
    gesture.handle_event(
      TouchInput::move_to(Pos2::new(75.0, 10.0), 0.6),
      &mut model,
      &track,
      &config,
    );
    assert!(!gesture.scaling_active());

    gesture.handle_event(
      TouchInput::move_to(Pos2::new(75.0, 10.0), 0.9),
      &mut model,
      &track,
      &config,
    );
    assert!(gesture.scaling_active());
  }

  #[test]
  fn test_refresh_scaling_arms_without_movement() {
    let mut gesture = GestureState::new();
    let mut model = model(50.0, 100.0);
    let track = track();
    let config = InteractionConfig {
      long_press_scales_touches: true,
      ..Default::default()
    };

    gesture.handle_event(TouchInput::down(at(50.0), 0.0), &mut model, &track, &config);
    assert!(!gesture.refresh_scaling(0.3, &config));
    assert!(gesture.refresh_scaling(0.6, &config));
    assert!(gesture.scaling_active());
  }

  #[test]
  fn test_events_while_idle_are_ignored() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let track = track();
    let config = InteractionConfig::default();

    let outcome = gesture.handle_event(TouchInput::move_to(at(50.0), 0.0), &mut model, &track, &config);
    assert_eq!(outcome, GestureOutcome::default());
    let outcome = gesture.handle_event(TouchInput::up(at(50.0), 0.1), &mut model, &track, &config);
    assert_eq!(outcome, GestureOutcome::default());
    assert_approx_eq!(model.lower_value(), 20.0);
  }

  #[test]
  fn test_second_down_while_tracking_is_ignored() {
    let mut gesture = GestureState::new();
    let mut model = model(20.0, 80.0);
    let track = track();
    let config = InteractionConfig::default();

    gesture.handle_event(TouchInput::down(at(20.0), 0.0), &mut model, &track, &config);
    let outcome = gesture.handle_event(TouchInput::down(at(80.0), 0.1), &mut model, &track, &config);
    assert!(!outcome.began);
    assert_eq!(gesture.tracking(), Some(Handle::Lower));
  }
}
