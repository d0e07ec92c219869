//! Nearest-neighbor and bilinear resizing.
//!
//! The bilinear path samples with a `(src - 1) / dest` step rather than
//! `src / dest`. Output is pinned to existing renders, so the step is kept
//! as is even though it drifts toward the top-left on upscales.

use serde::{Deserialize, Serialize};

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::error::ValidationError;

/// Resampling algorithm for [`resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeMethod {
    /// Pixel replication. Exact, blocky.
    Nearest,
    /// Four-tap linear blend.
    #[default]
    Bilinear,
}

impl ResizeMethod {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Nearest => "Nearest neighbor",
            Self::Bilinear => "Bilinear",
        }
    }
}

/// Check a resize target against `max_dimension` without allocating.
pub fn validate_dimensions(
    width: u32,
    height: u32,
    max_dimension: u32,
) -> Result<(), ValidationError> {
    if width == 0 || height == 0 {
        return Err(ValidationError::ZeroDimension { width, height });
    }
    if width > max_dimension || height > max_dimension {
        return Err(ValidationError::DimensionTooLarge {
            width,
            height,
            max: max_dimension,
        });
    }
    Ok(())
}

/// Validate the target size, then resample with `method`.
pub fn resize(
    src: &PixelBuffer,
    width: u32,
    height: u32,
    method: ResizeMethod,
    max_dimension: u32,
) -> Result<PixelBuffer, ValidationError> {
    validate_dimensions(width, height, max_dimension)?;
    tracing::debug!(
        from_width = src.width(),
        from_height = src.height(),
        width,
        height,
        method = method.label(),
        "resizing"
    );
    Ok(match method {
        ResizeMethod::Nearest => nearest_neighbor(src, width, height),
        ResizeMethod::Bilinear => bilinear(src, width, height),
    })
}

/// Nearest-neighbor resize. Samples `floor(x * src_w / dest_w)`.
///
/// An empty source or target yields a transparent buffer of the target size.
pub fn nearest_neighbor(src: &PixelBuffer, dest_width: u32, dest_height: u32) -> PixelBuffer {
    if src.is_empty() || dest_width == 0 || dest_height == 0 {
        return PixelBuffer::new(dest_width, dest_height);
    }

    let x_ratio = src.width() as f64 / dest_width as f64;
    let y_ratio = src.height() as f64 / dest_height as f64;

    let mut out = Vec::with_capacity(dest_width as usize * dest_height as usize * CHANNELS);
    for y in 0..dest_height {
        let sy = ((y as f64 * y_ratio) as u32).min(src.height() - 1);
        for x in 0..dest_width {
            let sx = ((x as f64 * x_ratio) as u32).min(src.width() - 1);
            out.extend_from_slice(&src.pixel_at(sx, sy));
        }
    }

    PixelBuffer::from_raw(dest_width, dest_height, out)
        .unwrap_or_else(|_| PixelBuffer::new(dest_width, dest_height))
}

/// Bilinear resize over all four channels, rounded to the nearest integer.
pub fn bilinear(src: &PixelBuffer, dest_width: u32, dest_height: u32) -> PixelBuffer {
    if src.is_empty() || dest_width == 0 || dest_height == 0 {
        return PixelBuffer::new(dest_width, dest_height);
    }

    let max_x = src.width() - 1;
    let max_y = src.height() - 1;
    let x_ratio = max_x as f64 / dest_width as f64;
    let y_ratio = max_y as f64 / dest_height as f64;

    let mut out = Vec::with_capacity(dest_width as usize * dest_height as usize * CHANNELS);
    for y in 0..dest_height {
        let sy = y as f64 * y_ratio;
        let y1 = sy.floor() as u32;
        let y2 = (y1 + 1).min(max_y);
        let wy = sy - y1 as f64;

        for x in 0..dest_width {
            let sx = x as f64 * x_ratio;
            let x1 = sx.floor() as u32;
            let x2 = (x1 + 1).min(max_x);
            let wx = sx - x1 as f64;

            let p11 = src.pixel_at(x1, y1);
            let p21 = src.pixel_at(x2, y1);
            let p12 = src.pixel_at(x1, y2);
            let p22 = src.pixel_at(x2, y2);

            for c in 0..CHANNELS {
                let top = p11[c] as f64 + (p21[c] as f64 - p11[c] as f64) * wx;
                let bottom = p12[c] as f64 + (p22[c] as f64 - p12[c] as f64) * wx;
                let value = top + (bottom - top) * wy;
                out.push(value.round() as u8);
            }
        }
    }

    PixelBuffer::from_raw(dest_width, dest_height, out)
        .unwrap_or_else(|_| PixelBuffer::new(dest_width, dest_height))
}
