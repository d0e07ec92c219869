//! GrayBit-7: 7-bit grayscale with an optional 1-bit mask per pixel.
//!
//! ```text
//! offset  size  field
//! 0..4    4     magic "GB7" 0x1D (used for sniffing, not validated)
//! 4       1     version, must be 1
//! 5       1     flags, bit 0 = has mask
//! 6..8    2     width, big-endian
//! 8..10   2     height, big-endian
//! 10..12  2     reserved
//! 12..    w*h   one byte per pixel: bits 0-6 gray, bit 7 mask
//! ```

use crate::buffer::PixelBuffer;
use crate::error::{FormatError, ValidationError};

/// Header length; the payload starts here.
pub const HEADER_LEN: usize = 12;
/// The only supported format version.
pub const VERSION: u8 = 1;
/// Magic bytes that identify a GrayBit-7 stream. Written by [`encode`] and
/// sniffed by [`super::ImageFormat::detect`]; [`decode`] ignores them.
pub const MAGIC: [u8; 4] = [0x47, 0x42, 0x37, 0x1D];

/// Whether `bytes` start with [`MAGIC`].
pub fn has_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&MAGIC)
}

const FLAG_HAS_MASK: u8 = 0b1;
const GRAY_BITS: u8 = 0x7F;
const MASK_BIT: u8 = 0x80;

/// A decoded GrayBit-7 file. Read-only after decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBit7Image {
    pub version: u8,
    pub has_mask: bool,
    pub width: u16,
    pub height: u16,
    pub buffer: PixelBuffer,
}

impl GrayBit7Image {
    /// Reported bit depth: 8 with a mask plane, 7 without.
    pub fn depth(&self) -> u8 {
        if self.has_mask { 8 } else { 7 }
    }
}

/// Expand a 7-bit gray value to 8 bits, replicating the top bit into the
/// new LSB so that 127 maps to 255.
#[inline]
pub const fn expand_gray(g: u8) -> u8 {
    let g = g & GRAY_BITS;
    (g << 1) | ((g >> 6) & 1)
}

/// Decode a GrayBit-7 byte stream into an RGBA buffer.
pub fn decode(bytes: &[u8]) -> Result<GrayBit7Image, FormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::TooSmall { len: bytes.len() });
    }

    let version = bytes[4];
    if version != VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }

    let has_mask = bytes[5] & FLAG_HAS_MASK != 0;
    let width = u16::from_be_bytes([bytes[6], bytes[7]]);
    let height = u16::from_be_bytes([bytes[8], bytes[9]]);

    let count = width as usize * height as usize;
    let expected = HEADER_LEN + count;
    if bytes.len() < expected {
        return Err(FormatError::TruncatedPayload {
            expected,
            actual: bytes.len(),
        });
    }

    let payload = &bytes[HEADER_LEN..expected];
    let mut pixels = Vec::with_capacity(count * 4);
    for &byte in payload {
        let value = expand_gray(byte);
        let visible = !has_mask || byte & MASK_BIT != 0;
        let alpha = if visible { 255 } else { 0 };
        pixels.extend_from_slice(&[value, value, value, alpha]);
    }

    tracing::debug!(width, height, has_mask, "decoded GrayBit-7 image");

    Ok(GrayBit7Image {
        version,
        has_mask,
        width,
        height,
        buffer: PixelBuffer::from_raw(width as u32, height as u32, pixels)
            .map_err(|_| FormatError::TruncatedPayload {
                expected,
                actual: bytes.len(),
            })?,
    })
}

/// Encode a buffer as GrayBit-7.
///
/// The gray sample is taken from the red channel (`r >> 1`). With
/// `has_mask`, pixels with alpha >= 128 set the mask bit.
pub fn encode(buffer: &PixelBuffer, has_mask: bool) -> Result<Vec<u8>, ValidationError> {
    let (width, height) = buffer.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ValidationError::DimensionTooLarge {
            width,
            height,
            max: u16::MAX as u32,
        });
    };

    let mut out = Vec::with_capacity(HEADER_LEN + buffer.as_rgba().len());
    out.extend_from_slice(&MAGIC);
    out.push(VERSION);
    out.push(if has_mask { FLAG_HAS_MASK } else { 0 });
    out.extend_from_slice(&w.to_be_bytes());
    out.extend_from_slice(&h.to_be_bytes());
    out.extend_from_slice(&[0, 0]);

    for px in buffer.as_rgba() {
        let mut byte = px[0] >> 1;
        if has_mask && px[3] >= 128 {
            byte |= MASK_BIT;
        }
        out.push(byte);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: u8, flags: u8, width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[4] = version;
        bytes[5] = flags;
        bytes[6..8].copy_from_slice(&width.to_be_bytes());
        bytes[8..10].copy_from_slice(&height.to_be_bytes());
        bytes
    }

    #[test]
    fn test_expand_gray_known_values() {
        assert_eq!(expand_gray(0), 0);
        assert_eq!(expand_gray(127), 255);
        assert_eq!(expand_gray(64), 129);
        assert_eq!(expand_gray(63), 126);
    }

    #[test]
    fn test_expand_gray_law_holds_for_all_inputs() {
        for g in 0..=127u8 {
            assert_eq!(expand_gray(g), (g << 1) | ((g >> 6) & 1));
        }
    }

    #[test]
    fn test_decode_too_small() {
        let err = decode(&[0u8; 11]).unwrap_err();
        assert!(matches!(err, FormatError::TooSmall { len: 11 }));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let err = decode(&header(2, 0, 1, 1)).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_decode_truncated_payload() {
        let mut bytes = header(1, 0, 2, 2);
        bytes.extend_from_slice(&[0, 0, 0]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedPayload {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_decode_without_mask_is_opaque() {
        let mut bytes = header(1, 0, 2, 1);
        // Mask bit set on the second pixel must be ignored.
        bytes.extend_from_slice(&[127, 0x80 | 64]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.depth(), 7);
        assert_eq!(img.buffer.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(img.buffer.pixel(1, 0), Some([129, 129, 129, 255]));
    }

    #[test]
    fn test_decode_with_mask_controls_alpha() {
        let mut bytes = header(1, 1, 2, 1);
        bytes.extend_from_slice(&[0x80 | 10, 10]);
        let img = decode(&bytes).unwrap();
        assert!(img.has_mask);
        assert_eq!(img.depth(), 8);
        assert_eq!(img.buffer.pixel(0, 0), Some([20, 20, 20, 255]));
        assert_eq!(img.buffer.pixel(1, 0), Some([20, 20, 20, 0]));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut bytes = header(1, 0, 1, 1);
        bytes.extend_from_slice(&[5, 99, 99]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.buffer.dimensions(), (1, 1));
    }

    #[test]
    fn test_round_trip_through_encoder() {
        for (w, h) in [(1u32, 1u32), (7, 3), (64, 64)] {
            let buf = PixelBuffer::from_fn(w, h, |x, y| {
                let v = expand_gray(((x * 31 + y * 17) % 128) as u8);
                [v, v, v, 255]
            });
            let bytes = encode(&buf, false).unwrap();
            let img = decode(&bytes).unwrap();
            assert_eq!(img.depth(), 7);
            assert_eq!(img.buffer, buf);
        }
    }

    #[test]
    fn test_round_trip_preserves_mask() {
        let buf = PixelBuffer::from_fn(4, 4, |x, y| {
            let v = expand_gray((x * 8 + y) as u8);
            [v, v, v, if (x + y) % 2 == 0 { 255 } else { 0 }]
        });
        let img = decode(&encode(&buf, true).unwrap()).unwrap();
        assert_eq!(img.depth(), 8);
        assert_eq!(img.buffer, buf);
    }

    #[test]
    fn test_encode_rejects_oversized_buffer() {
        let buf = PixelBuffer::new(70_000, 0);
        assert!(encode(&buf, false).is_err());
    }
}
