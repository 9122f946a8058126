/// Easing of handle positions for animated value changes.
mod animation;
/// Touch handling, from hit testing to long-press fine tuning.
mod gesture;
/// Value state and the clamping rules between the two handles.
mod model;
/// Colors, sizes and optional textures.
mod style;
/// Mapping between values and pixels on the track.
mod track;
/// The egui widget itself.
mod widget;

pub use gesture::{TouchInput, TouchPhase};
pub use model::Handle;
pub use style::{HandleVisualState, SliderImages, SliderStyle};
pub use widget::RangeSlider;
