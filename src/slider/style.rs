use std::collections::HashMap;

use egui::load::SizedTexture;

use super::model::Handle;

/// Visual state of a handle, used to pick its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleVisualState {
  Normal,
  Highlighted,
}

/// Optional textures drawn instead of the painted default look.
#[derive(Debug, Clone, Default)]
pub struct SliderImages {
  handles: HashMap<(Handle, HandleVisualState), SizedTexture>,
  /// Stretched over the selected range.
  pub track: Option<SizedTexture>,
  /// Stretched over the selected range while crossed over.
  pub track_crossed_over: Option<SizedTexture>,
  /// Stretched over the whole track.
  pub track_background: Option<SizedTexture>,
  /// Drawn centered behind the active handle while fine-tuning is armed.
  pub scaling_highlight: Option<SizedTexture>,
}

impl SliderImages {
  /// Register the image for one handle in one visual state. Handle images
  /// are drawn centered at their native size.
  pub fn set_handle(&mut self, handle: Handle, state: HandleVisualState, texture: SizedTexture) {
    self.handles.insert((handle, state), texture);
  }

  /// Image for a handle, falling back from highlighted to normal.
  #[must_use]
  pub fn handle(&self, handle: Handle, state: HandleVisualState) -> Option<SizedTexture> {
    self
      .handles
      .get(&(handle, state))
      .copied()
      .or_else(|| self.handles.get(&(handle, HandleVisualState::Normal)).copied())
  }
}

/// Layout and timing configuration for the slider.
#[derive(Debug, Clone)]
pub struct SliderStyle {
  /// Radius of the painted default handle.
  pub handle_radius: f32,
  /// Thickness of the track line.
  pub track_height: f32,
  /// Extra grab margin around a handle beyond its radius.
  pub hit_radius_margin: f32,
  /// Rest time that arms fine-tuning, in seconds.
  pub long_press_duration: f64,
  /// Movement tolerance while resting, in pixels.
  pub long_press_jitter: f32,
  /// Optional textures replacing the painted look.
  pub images: SliderImages,
}

impl Default for SliderStyle {
  fn default() -> Self {
    Self {
      handle_radius: 9.0,
      track_height: 6.0,
      hit_radius_margin: 6.0,
      long_press_duration: 0.5,
      long_press_jitter: 8.0,
      images: SliderImages::default(),
    }
  }
}
