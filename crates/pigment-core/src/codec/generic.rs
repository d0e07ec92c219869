//! Decoding of common formats (PNG, JPEG, ...) through the `image` crate.

use crate::buffer::PixelBuffer;
use crate::error::FormatError;

/// Decode any format the `image` crate recognises into RGBA8.
pub fn decode_generic_image(bytes: &[u8]) -> Result<PixelBuffer, FormatError> {
    let img = image::load_from_memory(bytes)?;
    let buffer = PixelBuffer::from_rgba_image(img.to_rgba8());
    tracing::debug!(
        width = buffer.width(),
        height = buffer.height(),
        "decoded generic image"
    );
    Ok(buffer)
}

/// Encode a buffer as PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, FormatError> {
    let mut out = std::io::Cursor::new(Vec::new());
    buffer
        .to_rgba_image()
        .write_to(&mut out, image::ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip() {
        let buf =
            PixelBuffer::from_fn(5, 4, |x, y| [x as u8 * 40, y as u8 * 60, 90, 255 - x as u8]);
        let bytes = encode_png(&buf).unwrap();
        assert_eq!(decode_generic_image(&bytes).unwrap(), buf);
    }

    #[test]
    fn test_garbage_is_a_format_error() {
        let err = decode_generic_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, FormatError::Generic(_)));
    }
}
