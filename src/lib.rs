pub mod config;
pub mod slider;
pub use slider::{Handle, RangeSlider, SliderImages, SliderStyle};
