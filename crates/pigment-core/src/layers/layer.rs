//! A single layer and its thumbnail.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::blend::BlendMode;
use crate::buffer::PixelBuffer;
use crate::error::ValidationError;
use crate::resample;

/// Stable layer identifier. Ids are never reused within a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(u64);

impl LayerId {
    /// The mandatory bottom layer created from the loaded image.
    pub const BASE: Self = Self(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_base(self) -> bool {
        self.0 == Self::BASE.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_base() {
            f.write_str("base-layer")
        } else {
            write!(f, "layer-{}", self.0)
        }
    }
}

/// What a layer was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    #[default]
    Image,
    Color,
}

/// Initial content for a new layer.
#[derive(Debug, Clone)]
pub enum LayerSource {
    /// No pixels yet. The compositor skips the layer until one is assigned.
    Empty,
    Image(PixelBuffer),
    /// Solid fill of the configured color-layer size.
    Color([u8; 4]),
}

/// One entry of a [`super::LayerStack`].
///
/// The buffer is shared behind an `Arc` and swapped wholesale on edit; it is
/// never written in place.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    name: String,
    buffer: Option<Arc<PixelBuffer>>,
    thumbnail: Option<PixelBuffer>,
    visible: bool,
    opacity: f32,
    blend_mode: BlendMode,
    scale: f32,
    kind: LayerKind,
    color: Option<[u8; 4]>,
}

impl Layer {
    /// Visible, opaque, Normal-mode layer at scale 1.
    pub fn new(
        id: LayerId,
        name: impl Into<String>,
        buffer: Option<PixelBuffer>,
        thumbnail_size: u32,
    ) -> Self {
        let buffer = buffer.map(Arc::new);
        let thumbnail = buffer.as_deref().and_then(|b| make_thumbnail(b, thumbnail_size));
        Self {
            id,
            name: name.into(),
            buffer,
            thumbnail,
            visible: true,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            scale: 1.0,
            kind: LayerKind::Image,
            color: None,
        }
    }

    /// Solid-color layer of `width x height`.
    pub fn solid(
        id: LayerId,
        name: impl Into<String>,
        rgba: [u8; 4],
        width: u32,
        height: u32,
        thumbnail_size: u32,
    ) -> Self {
        let buffer = PixelBuffer::filled(width, height, rgba);
        let mut layer = Self::new(id, name, Some(buffer), thumbnail_size);
        layer.kind = LayerKind::Color;
        layer.color = Some(rgba);
        layer
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_deref()
    }

    /// Cheap handle to the current buffer, for handing to a worker.
    pub fn shared_buffer(&self) -> Option<Arc<PixelBuffer>> {
        self.buffer.clone()
    }

    pub fn thumbnail(&self) -> Option<&PixelBuffer> {
        self.thumbnail.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamped to `[0, 1]`. NaN is treated as fully transparent.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the draw scale.
    ///
    /// Rejects a scale that is not positive and finite, or one that would
    /// draw the current buffer larger than `max_dimension` on either axis.
    pub fn set_scale(&mut self, scale: f32, max_dimension: u32) -> Result<(), ValidationError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ValidationError::InvalidArgument("layer scale must be positive and finite"));
        }
        if let Some(buffer) = self.buffer() {
            let (width, height) = scale_dimensions(buffer.dimensions(), scale);
            if width > max_dimension || height > max_dimension {
                return Err(ValidationError::DimensionTooLarge {
                    width,
                    height,
                    max: max_dimension,
                });
            }
        }
        self.scale = scale;
        Ok(())
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Fill color of a [`LayerKind::Color`] layer.
    pub fn color(&self) -> Option<[u8; 4]> {
        self.color
    }

    /// Size this layer occupies on the canvas: `floor(dim * scale)`.
    pub fn scaled_dimensions(&self) -> Option<(u32, u32)> {
        self.buffer().map(|b| scale_dimensions(b.dimensions(), self.scale))
    }

    pub(crate) fn replace_buffer(&mut self, buffer: Arc<PixelBuffer>, thumbnail_size: u32) {
        self.thumbnail = make_thumbnail(&buffer, thumbnail_size);
        self.buffer = Some(buffer);
    }

    pub(crate) fn clear_buffer(&mut self) {
        self.buffer = None;
        self.thumbnail = None;
    }
}

/// `floor(dim * scale)`, saturating at `u32::MAX`.
fn scale_dimensions((width, height): (u32, u32), scale: f32) -> (u32, u32) {
    let scaled = |dim: u32| (dim as f64 * scale as f64).floor() as u32;
    (scaled(width), scaled(height))
}

/// Square preview of `buffer`, stretched to `size x size` and flattened over
/// opaque white. `None` for empty buffers.
pub fn make_thumbnail(buffer: &PixelBuffer, size: u32) -> Option<PixelBuffer> {
    if buffer.is_empty() || size == 0 {
        return None;
    }
    let small = resample::bilinear(buffer, size, size);
    let flat: Vec<u8> = small
        .as_rgba()
        .iter()
        .flat_map(|&[r, g, b, a]| {
            let over_white = |c: u8| {
                let mixed = c as u32 * a as u32 + 255 * (255 - a as u32);
                (mixed as f32 / 255.0).round() as u8
            };
            [over_white(r), over_white(g), over_white(b), 255]
        })
        .collect();
    PixelBuffer::from_raw(size, size, flat).ok()
}
