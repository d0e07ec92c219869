//! Flatten an ordered layer stack into one RGBA buffer.
//!
//! # Algorithm
//! 1. Canvas size: the largest `floor(dim * scale)` per axis over every layer
//!    that has a buffer. All layers are anchored at the top-left corner.
//!    Layers whose scaled size exceeds the dimension limit are left out.
//! 2. Bottom to top, skip hidden and empty layers; bilinearly resample each
//!    remaining layer to its scaled size when `scale != 1`.
//! 3. Blend each source pixel over the accumulator with the W3C general
//!    formula, using `alpha * opacity` as the source alpha:
//!    `co = as(1 - ab)Cs + as ab B(Cb, Cs) + (1 - as) ab Cb`,
//!    `ao = as + ab(1 - as)`.
//!
//! The accumulator holds straight (non-premultiplied) `f32` RGBA, so a single
//! opaque Normal layer at scale 1 reproduces its source bytes exactly.
//!
//! # Complexity
//! O(layers * canvas pixels), plus the resample cost for scaled layers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::blend::BlendMode;
use super::layer::Layer;
use crate::buffer::{CHANNELS, PixelBuffer};
use crate::config::DEFAULT_MAX_DIMENSION;
use crate::resample;

/// Output of a composite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    /// The flattened canvas, at layer resolution.
    pub image: PixelBuffer,
    /// Size the presentation layer should display `image` at.
    pub display_size: DisplaySize,
}

/// On-screen size implied by the global zoom. The compositor never resamples
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    /// `round(dim * global_scale)`. Non-positive or non-finite zoom falls
    /// back to the canvas size.
    pub fn for_canvas(width: u32, height: u32, global_scale: f32) -> Self {
        if !global_scale.is_finite() || global_scale <= 0.0 {
            return Self { width, height };
        }
        Self {
            width: (width as f32 * global_scale).round() as u32,
            height: (height as f32 * global_scale).round() as u32,
        }
    }
}

/// Composite `layers` (index 0 at the bottom) with the default dimension
/// limit.
///
/// A stack with no buffers at all produces a 0x0 image.
pub fn composite(layers: &[Layer], global_scale: f32) -> Composition {
    composite_within(layers, global_scale, DEFAULT_MAX_DIMENSION)
}

/// [`composite`] with an explicit limit: any layer whose scaled size exceeds
/// `max_dimension` on either axis is skipped with a warning.
pub fn composite_within(layers: &[Layer], global_scale: f32, max_dimension: u32) -> Composition {
    let (width, height) = canvas_size(layers, max_dimension);
    let mut acc = vec![[0.0f32; 4]; width as usize * height as usize];

    for layer in layers.iter().filter(|l| l.is_visible()) {
        let (Some(buffer), Some((lw, lh))) = (layer.buffer(), layer.scaled_dimensions()) else {
            continue;
        };
        if lw > max_dimension || lh > max_dimension {
            tracing::warn!(
                id = %layer.id(),
                width = lw,
                height = lh,
                max = max_dimension,
                "layer too large to composite, skipped"
            );
            continue;
        }
        if lw == 0 || lh == 0 || layer.opacity() == 0.0 {
            continue;
        }

        let drawn: Cow<'_, PixelBuffer> = if (lw, lh) == buffer.dimensions() {
            Cow::Borrowed(buffer)
        } else {
            Cow::Owned(resample::bilinear(buffer, lw, lh))
        };

        blend_layer(&mut acc, width, &drawn, layer.opacity(), layer.blend_mode());
    }

    let mut out = Vec::with_capacity(acc.len() * CHANNELS);
    for px in &acc {
        out.extend(px.iter().map(|&c| to_byte(c)));
    }
    let image = PixelBuffer::from_raw(width, height, out)
        .unwrap_or_else(|_| PixelBuffer::new(width, height));

    tracing::debug!(
        layers = layers.len(),
        width,
        height,
        "composited layer stack"
    );

    Composition {
        image,
        display_size: DisplaySize::for_canvas(width, height, global_scale),
    }
}

/// Bounding box of every layer that has a buffer, visible or not, ignoring
/// layers larger than `max_dimension`.
pub fn canvas_size(layers: &[Layer], max_dimension: u32) -> (u32, u32) {
    layers
        .iter()
        .filter_map(Layer::scaled_dimensions)
        .filter(|&(lw, lh)| lw <= max_dimension && lh <= max_dimension)
        .fold((0, 0), |(w, h), (lw, lh)| (w.max(lw), h.max(lh)))
}

fn blend_layer(
    acc: &mut [[f32; 4]],
    canvas_width: u32,
    src: &PixelBuffer,
    opacity: f32,
    mode: BlendMode,
) {
    for y in 0..src.height() {
        let row = y as usize * canvas_width as usize;
        for x in 0..src.width() {
            let [r, g, b, a] = src.pixel_at(x, y);
            let alpha_s = a as f32 / 255.0 * opacity;
            if alpha_s == 0.0 {
                continue;
            }
            let dst = &mut acc[row + x as usize];
            *dst = blend_pixel(*dst, [r, g, b], alpha_s, mode);
        }
    }
}

/// One source pixel over one straight-alpha backdrop pixel.
fn blend_pixel(backdrop: [f32; 4], src: [u8; 3], alpha_s: f32, mode: BlendMode) -> [f32; 4] {
    let alpha_b = backdrop[3];
    let alpha_o = alpha_s + alpha_b * (1.0 - alpha_s);

    let mut out = [0.0, 0.0, 0.0, alpha_o];
    for c in 0..3 {
        let cs = src[c] as f32 / 255.0;
        let cb = backdrop[c];
        let premultiplied = alpha_s * (1.0 - alpha_b) * cs
            + alpha_s * alpha_b * mode.blend(cb, cs)
            + (1.0 - alpha_s) * alpha_b * cb;
        out[c] = premultiplied / alpha_o;
    }
    out
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
