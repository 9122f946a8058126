use egui::{Color32, Pos2, Rect, Response, Sense, Ui, Vec2, Widget};
use log::warn;

use super::animation::AnimationState;
use super::gesture::{GestureState, InteractionConfig, TouchInput};
use super::model::{Handle, RangeModel};
use super::style::{HandleVisualState, SliderStyle};
use super::track::TrackGeometry;

// Layout constants
const MIN_WIDTH: f32 = 60.0;
const VERTICAL_PADDING: f32 = 4.0;
const SCALING_HALO_FACTOR: f32 = 2.2;
const MIN_TOUCH_SCALE: f32 = 0.001;

fn track_background_color(ui: &Ui) -> Color32 {
  ui.visuals().widgets.inactive.bg_fill
}

fn track_border_color(ui: &Ui) -> Color32 {
  ui.visuals().widgets.inactive.bg_stroke.color
}

fn track_fill_color(ui: &Ui) -> Color32 {
  ui.visuals().selection.bg_fill
}

fn track_crossed_over_color(ui: &Ui) -> Color32 {
  ui.visuals().warn_fg_color
}

fn scaling_halo_color(ui: &Ui) -> Color32 {
  ui.visuals().selection.bg_fill.gamma_multiply(0.3)
}

fn handle_visuals(ui: &Ui, highlighted: bool) -> (Color32, egui::Stroke) {
  let widgets = &ui.visuals().widgets;
  let visuals = if highlighted {
    &widgets.active
  } else {
    &widgets.inactive
  };
  (visuals.bg_fill, visuals.fg_stroke)
}

/// A dual-handle slider selecting a `[lower, upper]` range of values.
///
/// Keep one instance alive across frames and show it each frame with
/// `ui.add(&mut slider)`. The returned [`egui::Response`] reports
/// `changed()` whenever a drag moved a value (each frame while
/// continuous, otherwise once on release).
pub struct RangeSlider {
  model: RangeModel,
  style: SliderStyle,
  /// Report changes every frame while dragging instead of on release.
  continuous: bool,
  /// Resting mid-drag switches to scaled, finer movement.
  long_press_scales_touches: bool,
  /// Movement multiplier while fine tuning.
  touch_scale: f32,
  lower_handle_hidden: bool,
  upper_handle_hidden: bool,
  /// Minimum pixel distance kept between the drawn handle centers.
  minimum_range_offset: Option<f32>,
  gesture: GestureState,
  animation: AnimationState,
  /// Animation waiting for the next frame's clock, holding the old
  /// stored value to start from.
  queued_lower_animation: Option<f32>,
  queued_upper_animation: Option<f32>,
  /// Handle centers from the last frame, in screen coordinates.
  last_centers: Option<(Pos2, Pos2)>,
  /// Track geometry from the last frame, for synthetic touches.
  last_track: Option<TrackGeometry>,
}

impl Default for RangeSlider {
  fn default() -> Self {
    Self::new()
  }
}

impl RangeSlider {
  /// A slider over the domain `[0, 1]` with the full range selected.
  #[must_use]
  pub fn new() -> Self {
    Self {
      model: RangeModel::new(),
      style: SliderStyle::default(),
      continuous: true,
      long_press_scales_touches: false,
      touch_scale: 0.1,
      lower_handle_hidden: false,
      upper_handle_hidden: false,
      minimum_range_offset: None,
      gesture: GestureState::new(),
      animation: AnimationState::default(),
      queued_lower_animation: None,
      queued_upper_animation: None,
      last_centers: None,
      last_track: None,
    }
  }

  #[must_use]
  pub fn with_range(mut self, minimum: f32, maximum: f32) -> Self {
    self.model.set_bounds(minimum, maximum);
    self
  }

  #[must_use]
  pub fn with_values(mut self, lower: f32, upper: f32) -> Self {
    self.model.set_values(lower, upper);
    self
  }

  #[must_use]
  pub fn with_minimum_range(mut self, minimum_range: f32) -> Self {
    self.model.set_minimum_range(minimum_range);
    self
  }

  #[must_use]
  pub fn with_minimum_range_offset(mut self, offset: Option<f32>) -> Self {
    self.set_minimum_range_offset(offset);
    self
  }

  #[must_use]
  pub fn with_step_value(mut self, step: f32) -> Self {
    self.model.set_step_value(step);
    self
  }

  #[must_use]
  pub fn with_step_value_continuously(mut self, continuously: bool) -> Self {
    self.model.set_step_value_continuously(continuously);
    self
  }

  #[must_use]
  pub fn with_push_enabled(mut self, enabled: bool) -> Self {
    self.model.set_push_enabled(enabled);
    self
  }

  #[must_use]
  pub fn with_continuous(mut self, continuous: bool) -> Self {
    self.continuous = continuous;
    self
  }

  #[must_use]
  pub fn with_long_press_scales_touches(mut self, enabled: bool) -> Self {
    self.long_press_scales_touches = enabled;
    self
  }

  #[must_use]
  pub fn with_touch_scale(mut self, scale: f32) -> Self {
    self.set_touch_scale(scale);
    self
  }

  #[must_use]
  pub fn with_style(mut self, style: SliderStyle) -> Self {
    self.style = style;
    self
  }

  #[must_use]
  pub fn minimum_value(&self) -> f32 {
    self.model.minimum_value()
  }

  #[must_use]
  pub fn maximum_value(&self) -> f32 {
    self.model.maximum_value()
  }

  #[must_use]
  pub fn minimum_range(&self) -> f32 {
    self.model.minimum_range()
  }

  #[must_use]
  pub fn step_value(&self) -> f32 {
    self.model.step_value()
  }

  #[must_use]
  pub fn step_value_continuously(&self) -> bool {
    self.model.step_value_continuously()
  }

  #[must_use]
  pub fn lower_maximum_value(&self) -> Option<f32> {
    self.model.lower_maximum_value()
  }

  #[must_use]
  pub fn upper_minimum_value(&self) -> Option<f32> {
    self.model.upper_minimum_value()
  }

  #[must_use]
  pub fn push_enabled(&self) -> bool {
    self.model.push_enabled()
  }

  #[must_use]
  pub fn lower_value(&self) -> f32 {
    self.model.lower_value()
  }

  #[must_use]
  pub fn upper_value(&self) -> f32 {
    self.model.upper_value()
  }

  #[must_use]
  pub fn value(&self, handle: Handle) -> f32 {
    self.model.value(handle)
  }

  /// The lower value currently exceeds the upper value.
  #[must_use]
  pub fn crossed_over(&self) -> bool {
    self.model.crossed_over()
  }

  #[must_use]
  pub fn continuous(&self) -> bool {
    self.continuous
  }

  #[must_use]
  pub fn long_press_scales_touches(&self) -> bool {
    self.long_press_scales_touches
  }

  #[must_use]
  pub fn touch_scale(&self) -> f32 {
    self.touch_scale
  }

  #[must_use]
  pub fn lower_handle_hidden(&self) -> bool {
    self.lower_handle_hidden
  }

  #[must_use]
  pub fn upper_handle_hidden(&self) -> bool {
    self.upper_handle_hidden
  }

  #[must_use]
  pub fn minimum_range_offset(&self) -> Option<f32> {
    self.minimum_range_offset
  }

  /// Screen position of the lower handle center in the last frame,
  /// following any running animation.
  #[must_use]
  pub fn lower_center(&self) -> Option<Pos2> {
    self.last_centers.map(|(lower, _)| lower)
  }

  /// Screen position of the upper handle center in the last frame.
  #[must_use]
  pub fn upper_center(&self) -> Option<Pos2> {
    self.last_centers.map(|(_, upper)| upper)
  }

  /// A long press armed fine tuning for the current drag.
  #[must_use]
  pub fn touch_scaling_active(&self) -> bool {
    self.gesture.scaling_active()
  }

  /// The handle currently being dragged, if any.
  #[must_use]
  pub fn active_handle(&self) -> Option<Handle> {
    self.gesture.tracking()
  }

  #[must_use]
  pub fn style(&self) -> &SliderStyle {
    &self.style
  }

  pub fn style_mut(&mut self) -> &mut SliderStyle {
    &mut self.style
  }

  pub fn set_minimum_value(&mut self, value: f32) {
    self.model.set_minimum_value(value);
  }

  pub fn set_maximum_value(&mut self, value: f32) {
    self.model.set_maximum_value(value);
  }

  pub fn set_bounds(&mut self, minimum: f32, maximum: f32) {
    self.model.set_bounds(minimum, maximum);
  }

  pub fn set_minimum_range(&mut self, minimum_range: f32) {
    self.model.set_minimum_range(minimum_range);
  }

  pub fn set_step_value(&mut self, step: f32) {
    self.model.set_step_value(step);
  }

  pub fn set_step_value_continuously(&mut self, continuously: bool) {
    self.model.set_step_value_continuously(continuously);
  }

  pub fn set_lower_maximum_value(&mut self, value: Option<f32>) {
    self.model.set_lower_maximum_value(value);
  }

  pub fn set_upper_minimum_value(&mut self, value: Option<f32>) {
    self.model.set_upper_minimum_value(value);
  }

  pub fn set_push_enabled(&mut self, enabled: bool) {
    self.model.set_push_enabled(enabled);
  }

  pub fn set_continuous(&mut self, continuous: bool) {
    self.continuous = continuous;
  }

  pub fn set_long_press_scales_touches(&mut self, enabled: bool) {
    self.long_press_scales_touches = enabled;
  }

  pub fn set_touch_scale(&mut self, scale: f32) {
    if scale <= 0.0 {
      warn!("touch scale {scale} is not positive, using the minimum");
    }
    self.touch_scale = scale.max(MIN_TOUCH_SCALE);
  }

  pub fn set_lower_handle_hidden(&mut self, hidden: bool) {
    self.lower_handle_hidden = hidden;
  }

  pub fn set_upper_handle_hidden(&mut self, hidden: bool) {
    self.upper_handle_hidden = hidden;
  }

  pub fn set_minimum_range_offset(&mut self, offset: Option<f32>) {
    match offset {
      Some(value) if value < 0.0 => {
        warn!("minimum range offset {value} is negative, ignoring it");
        self.minimum_range_offset = None;
      }
      other => self.minimum_range_offset = other,
    }
  }

  /// Set the lower value, optionally animating the handle to it. The
  /// stored value updates immediately either way.
  pub fn set_lower_value(&mut self, value: f32, animated: bool) {
    self.apply_values(|model| model.set_value(Handle::Lower, value), animated);
  }

  /// Set the upper value, optionally animating the handle to it.
  pub fn set_upper_value(&mut self, value: f32, animated: bool) {
    self.apply_values(|model| model.set_value(Handle::Upper, value), animated);
  }

  /// Set both values, optionally animating the handles to them.
  pub fn set_values(&mut self, lower: f32, upper: f32, animated: bool) {
    self.apply_values(|model| model.set_values(lower, upper), animated);
  }

  /// Drive the slider with a synthetic touch, bypassing `egui` input.
  /// Positions are in the screen space of the last shown frame, so the
  /// slider must have been shown at least once. Returns true when the
  /// touch changed a value that the change policy reports.
  pub fn handle_touch(&mut self, touch: TouchInput) -> bool {
    let Some(track) = self.last_track else {
      return false;
    };
    let config = self.interaction_config();
    let outcome = self
      .gesture
      .handle_event(touch, &mut self.model, &track, &config);
    if outcome.began {
      self.animation.cancel();
      self.queued_lower_animation = None;
      self.queued_upper_animation = None;
    }
    outcome.changed
  }

  #[allow(clippy::float_cmp)]
  fn apply_values(&mut self, apply: impl FnOnce(&mut RangeModel), animated: bool) {
    let before = (self.model.lower_value(), self.model.upper_value());
    apply(&mut self.model);
    let lower_changed = self.model.lower_value() != before.0;
    let upper_changed = self.model.upper_value() != before.1;
    if animated {
      if lower_changed {
        self.queued_lower_animation = Some(before.0);
      }
      if upper_changed {
        self.queued_upper_animation = Some(before.1);
      }
    } else {
      if lower_changed {
        self.animation.cancel_lower();
        self.queued_lower_animation = None;
      }
      if upper_changed {
        self.animation.cancel_upper();
        self.queued_upper_animation = None;
      }
    }
  }

  /// Animated setters queue their start until a frame provides the
  /// clock, so a mid-flight retarget can take off from the currently
  /// displayed value.
  fn start_queued_animations(&mut self, now: f64) {
    if let Some(old_stored) = self.queued_lower_animation.take() {
      let from = self.animation.display_lower(old_stored, now);
      self
        .animation
        .animate_lower(from, self.model.lower_value(), now);
    }
    if let Some(old_stored) = self.queued_upper_animation.take() {
      let from = self.animation.display_upper(old_stored, now);
      self
        .animation
        .animate_upper(from, self.model.upper_value(), now);
    }
  }

  fn interaction_config(&self) -> InteractionConfig {
    InteractionConfig {
      continuous: self.continuous,
      long_press_scales_touches: self.long_press_scales_touches,
      touch_scale: self.touch_scale,
      long_press_duration: self.style.long_press_duration,
      long_press_jitter: self.style.long_press_jitter,
      hit_radius: self.style.handle_radius + self.style.hit_radius_margin,
      lower_handle_hidden: self.lower_handle_hidden,
      upper_handle_hidden: self.upper_handle_hidden,
    }
  }

  fn pointer_events(response: &Response, ui: &Ui, now: f64) -> Vec<TouchInput> {
    let mut events = Vec::new();
    let pointer_pos = response
      .interact_pointer_pos()
      .or_else(|| ui.input(|i| i.pointer.latest_pos()));
    if response.drag_started() {
      if let Some(pos) = pointer_pos {
        events.push(TouchInput::down(pos, now));
      }
    } else if response.dragged() {
      if let Some(pos) = pointer_pos {
        events.push(TouchInput::move_to(pos, now));
      }
    }
    if response.drag_stopped() {
      events.push(TouchInput::up(pointer_pos.unwrap_or(Pos2::ZERO), now));
    }
    events
  }

  fn paint(&self, ui: &Ui, track: &TrackGeometry, centers: (Pos2, Pos2)) {
    let half_track = self.style.track_height / 2.0;
    let rounding = half_track;
    let background_rect = Rect::from_min_max(
      Pos2::new(track.span_min_x(), track.center_y() - half_track),
      Pos2::new(track.span_max_x(), track.center_y() + half_track),
    );
    if let Some(texture) = self.style.images.track_background {
      ui.painter().image(
        texture.id,
        background_rect,
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
      );
    } else {
      ui.painter()
        .rect_filled(background_rect, rounding, track_background_color(ui));
      ui.painter().rect_stroke(
        background_rect,
        rounding,
        egui::Stroke::new(1.0, track_border_color(ui)),
        egui::epaint::StrokeKind::Outside,
      );
    }

    let (lower_center, upper_center) = centers;
    let fill_rect = Rect::from_min_max(
      Pos2::new(lower_center.x.min(upper_center.x), background_rect.min.y),
      Pos2::new(lower_center.x.max(upper_center.x), background_rect.max.y),
    );
    let crossed = self.model.crossed_over();
    let fill_texture = if crossed {
      self
        .style
        .images
        .track_crossed_over
        .or(self.style.images.track)
    } else {
      self.style.images.track
    };
    if let Some(texture) = fill_texture {
      ui.painter().image(
        texture.id,
        fill_rect,
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
      );
    } else {
      let color = if crossed {
        track_crossed_over_color(ui)
      } else {
        track_fill_color(ui)
      };
      ui.painter().rect_filled(fill_rect, rounding, color);
    }

    if self.gesture.scaling_active()
      && let Some(handle) = self.gesture.tracking()
    {
      let center = match handle {
        Handle::Lower => lower_center,
        Handle::Upper => upper_center,
      };
      if let Some(texture) = self.style.images.scaling_highlight {
        ui.painter().image(
          texture.id,
          Rect::from_center_size(center, texture.size),
          Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
          Color32::WHITE,
        );
      } else {
        ui.painter().circle_filled(
          center,
          self.style.handle_radius * SCALING_HALO_FACTOR,
          scaling_halo_color(ui),
        );
      }
    }

    if !self.lower_handle_hidden {
      self.paint_handle(ui, Handle::Lower, lower_center);
    }
    if !self.upper_handle_hidden {
      self.paint_handle(ui, Handle::Upper, upper_center);
    }
  }

  fn paint_handle(&self, ui: &Ui, handle: Handle, center: Pos2) {
    let highlighted = self.gesture.tracking() == Some(handle);
    let state = if highlighted {
      HandleVisualState::Highlighted
    } else {
      HandleVisualState::Normal
    };
    if let Some(texture) = self.style.images.handle(handle, state) {
      ui.painter().image(
        texture.id,
        Rect::from_center_size(center, texture.size),
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
      );
    } else {
      let (fill, stroke) = handle_visuals(ui, highlighted);
      ui.painter()
        .circle_filled(center, self.style.handle_radius, fill);
      ui.painter()
        .circle_stroke(center, self.style.handle_radius, stroke);
    }
  }
}

impl Widget for &mut RangeSlider {
  fn ui(self, ui: &mut Ui) -> Response {
    let height = (self.style.handle_radius * 2.0).max(self.style.track_height) + VERTICAL_PADDING;
    let width = ui.available_width().max(MIN_WIDTH);
    let (rect, mut response) = ui.allocate_exact_size(Vec2::new(width, height), Sense::drag());
    let now = ui.input(|i| i.time);

    self.start_queued_animations(now);

    let track = TrackGeometry::new(
      rect,
      self.style.handle_radius,
      self.model.minimum_value(),
      self.model.maximum_value(),
      self.minimum_range_offset,
    );
    self.last_track = Some(track);
    let config = self.interaction_config();

    for touch in RangeSlider::pointer_events(&response, ui, now) {
      let outcome = self
        .gesture
        .handle_event(touch, &mut self.model, &track, &config);
      if outcome.began {
        // A touch takes over the handle, dropping any animation.
        self.animation.cancel();
        self.queued_lower_animation = None;
        self.queued_upper_animation = None;
      }
      if outcome.changed {
        response.mark_changed();
      }
    }
    self.gesture.refresh_scaling(now, &config);

    if self.animation.advance(now) {
      ui.ctx().request_repaint();
    }
    if config.long_press_scales_touches
      && self.gesture.tracking().is_some()
      && !self.gesture.scaling_active()
    {
      // A resting press produces no input events, so keep frames
      // coming until the long press can arm.
      ui.ctx().request_repaint();
    }

    let display_lower = self.animation.display_lower(self.model.lower_value(), now);
    let display_upper = self.animation.display_upper(self.model.upper_value(), now);
    let centers = track.handle_centers(display_lower, display_upper);
    self.last_centers = Some(centers);

    if ui.is_rect_visible(rect) {
      self.paint(ui, &track, centers);
    }
    response
  }
}
