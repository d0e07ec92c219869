//! Eyedropper sampling: one pixel, every color representation.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::contrast::wcag_contrast;
use crate::color::space::{Lab, Oklch, Xyz, rgb_to_oklch, rgb_to_xyz, xyz_to_lab};
use crate::error::ValidationError;

/// Everything the color readout shows for a picked pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub rgb: [u8; 3],
    pub xyz: Xyz,
    pub lab: Lab,
    pub oklch: Oklch,
    pub position: (u32, u32),
    /// Lowercase `#rrggbb`.
    pub hex: String,
}

impl ColorSample {
    /// Build a sample from a color that did not come from a buffer.
    pub fn from_rgb(rgb: [u8; 3], position: (u32, u32)) -> Self {
        let [r, g, b] = rgb;
        let xyz = rgb_to_xyz(r, g, b);
        Self {
            rgb,
            xyz,
            lab: xyz_to_lab(xyz.x, xyz.y, xyz.z),
            oklch: rgb_to_oklch(r, g, b),
            position,
            hex: format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// Sample the pixel at `(x, y)`. Alpha is ignored.
pub fn sample_color(buffer: &PixelBuffer, x: u32, y: u32) -> Result<ColorSample, ValidationError> {
    let Some([r, g, b, _]) = buffer.pixel(x, y) else {
        return Err(ValidationError::OutOfBounds {
            x,
            y,
            width: buffer.width(),
            height: buffer.height(),
        });
    };
    Ok(ColorSample::from_rgb([r, g, b], (x, y)))
}

/// WCAG contrast ratio between two samples.
pub fn contrast(a: &ColorSample, b: &ColorSample) -> f64 {
    wcag_contrast(a.rgb, b.rgb)
}
