// Animation timing
const ANIMATION_SECONDS: f64 = 0.25;

/// Eased interpolation of one handle's drawn position toward a target value.
///
/// The stored slider value is assigned immediately by the animated setters;
/// only the drawn handle trails behind until the animation finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleAnimation {
  from: f32,
  to: f32,
  start_time: f64,
  duration: f64,
}

impl HandleAnimation {
  #[must_use]
  pub fn new(from: f32, to: f32, start_time: f64) -> Self {
    Self {
      from,
      to,
      start_time,
      duration: ANIMATION_SECONDS,
    }
  }

  /// Displayed value at the given time, eased with smoothstep.
  #[must_use]
  pub fn value_at(&self, now: f64) -> f32 {
    if self.duration <= 0.0 {
      return self.to;
    }
    let progress = ((now - self.start_time) / self.duration).clamp(0.0, 1.0);
    let eased = progress * progress * (3.0 - 2.0 * progress);
    #[allow(clippy::cast_possible_truncation)]
    let eased = eased as f32;
    self.from + (self.to - self.from) * eased
  }

  #[must_use]
  pub fn finished(&self, now: f64) -> bool {
    now - self.start_time >= self.duration
  }
}

/// Animation slots for both handles.
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
  lower: Option<HandleAnimation>,
  upper: Option<HandleAnimation>,
}

impl AnimationState {
  pub fn animate_lower(&mut self, from: f32, to: f32, now: f64) {
    self.lower = Some(HandleAnimation::new(from, to, now));
  }

  pub fn animate_upper(&mut self, from: f32, to: f32, now: f64) {
    self.upper = Some(HandleAnimation::new(from, to, now));
  }

  /// Displayed lower value, falling back to the stored value.
  #[must_use]
  pub fn display_lower(&self, stored: f32, now: f64) -> f32 {
    self.lower.map_or(stored, |animation| animation.value_at(now))
  }

  /// Displayed upper value, falling back to the stored value.
  #[must_use]
  pub fn display_upper(&self, stored: f32, now: f64) -> f32 {
    self.upper.map_or(stored, |animation| animation.value_at(now))
  }

  /// Drop finished animations. Returns true while any is still running.
  pub fn advance(&mut self, now: f64) -> bool {
    if self.lower.is_some_and(|animation| animation.finished(now)) {
      self.lower = None;
    }
    if self.upper.is_some_and(|animation| animation.finished(now)) {
      self.upper = None;
    }
    self.active()
  }

  /// Stop both animations, snapping the display to the stored values.
  pub fn cancel(&mut self) {
    self.lower = None;
    self.upper = None;
  }

  pub fn cancel_lower(&mut self) {
    self.lower = None;
  }

  pub fn cancel_upper(&mut self) {
    self.upper = None;
  }

  #[must_use]
  pub fn active(&self) -> bool {
    self.lower.is_some() || self.upper.is_some()
  }
}
