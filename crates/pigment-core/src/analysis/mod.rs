//! Whole-image measurements: channel histograms and color-depth probing.

pub mod depth;
pub mod histogram;

pub use depth::detect_color_depth;
pub use histogram::{Channel, Histogram};
