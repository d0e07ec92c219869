//! Device-independent color conversions for single-pixel sampling.

pub mod contrast;
pub mod sample;
pub mod space;

pub use contrast::{ContrastCheck, relative_luminance, wcag_contrast};
pub use sample::{ColorSample, contrast, sample_color};
pub use space::{Lab, Oklch, Xyz, rgb_to_oklch, rgb_to_xyz, xyz_to_lab};
