//! The shared pixel container every engine operation consumes and produces.

use std::fmt;

use crate::error::ValidationError;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Width/height-tagged interleaved RGBA8 buffer, row-major, no padding.
///
/// The byte length is always `width * height * 4`; the fields are private so
/// that invariant cannot be broken from outside. Operations never resize a
/// buffer in place: anything that changes dimensions allocates a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    /// Buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = byte_len(width, height) / CHANNELS;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self { width, height, pixels }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(byte_len(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    /// Wrap existing RGBA bytes, checking the length invariant.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ValidationError> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(ValidationError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Convert a decoded `image` crate buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Copy into an `image` crate buffer for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel_at(x, y))
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Raw interleaved bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixels viewed as `[r, g, b, a]` groups.
    pub fn as_rgba(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Consume the buffer and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixel_at(x, y))
    }

    /// Byte offset of the pixel at `(x, y)`. Caller guarantees bounds.
    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    #[inline]
    pub(crate) fn pixel_at(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Byte length of a `width x height` RGBA buffer.
pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_has_expected_length() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.pixels().len(), 24);
        assert!(buf.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BufferLength {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_pixel_lookup_is_row_major() {
        let buf = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(buf.pixel(2, 1), Some([2, 1, 0, 255]));
        assert_eq!(buf.pixel(3, 0), None);
        assert_eq!(buf.as_rgba()[5], [2, 1, 0, 255]);
    }

    #[test]
    fn test_rgba_image_conversion_preserves_pixels() {
        let buf = PixelBuffer::from_fn(4, 3, |x, y| [x as u8 * 10, y as u8 * 20, 7, 200]);
        let img = buf.to_rgba_image();
        assert_eq!(PixelBuffer::from_rgba_image(img), buf);
    }

    #[test]
    fn test_filled_repeats_color() {
        let buf = PixelBuffer::filled(2, 2, [1, 2, 3, 4]);
        assert!(buf.as_rgba().iter().all(|px| *px == [1, 2, 3, 4]));
    }
}
