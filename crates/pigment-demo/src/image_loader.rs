//! Image loading for the demo application.

use std::path::Path;

use pigment_core::{FormatError, ImageFormat, ImageInfo, PixelBuffer, decode_image};

/// Load an image from disk.
///
/// Files starting with the GrayBit-7 magic go through the GrayBit-7 codec
/// whatever their name. A `.gb7` extension is honoured for files without the
/// magic. Everything else is handed to the generic decoder (PNG, JPEG and the
/// other formats `image` supports).
pub fn load_image(path: &Path) -> Result<(PixelBuffer, ImageInfo), ImageLoadError> {
    let bytes = std::fs::read(path)?;

    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(ImageFormat::from_extension)
        .unwrap_or(ImageFormat::Generic);
    let format = match ImageFormat::detect(&bytes) {
        ImageFormat::GrayBit7 => ImageFormat::GrayBit7,
        ImageFormat::Generic => by_extension,
    };
    let (buffer, info) = decode_image(&bytes, format).map_err(ImageLoadError::Decode)?;

    tracing::info!(
        path = %path.display(),
        format = info.format.label(),
        width = info.width,
        height = info.height,
        depth = info.depth,
        bytes = info.byte_len,
        "loaded image"
    );
    Ok((buffer, info))
}

/// Errors that can occur during image loading.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to decode image: {0}")]
    Decode(FormatError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_image(Path::new("/nonexistent/input.gb7")).unwrap_err();
        assert!(matches!(err, ImageLoadError::Io(_)));
    }

    #[test]
    fn test_graybit7_magic_wins_over_extension() {
        let dir = std::env::temp_dir().join(format!("pigment-loader-magic-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("renamed.png");
        let src = PixelBuffer::filled(2, 2, [0, 0, 0, 255]);
        std::fs::write(&path, pigment_core::codec::graybit7::encode(&src, false).unwrap()).unwrap();

        let (buffer, info) = load_image(&path).unwrap();
        assert_eq!(info.format, ImageFormat::GrayBit7);
        assert_eq!(info.depth, 7);
        assert_eq!(buffer, src);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_graybit7_extension_uses_codec() {
        let dir = std::env::temp_dir().join(format!("pigment-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.gb7");
        let src = PixelBuffer::filled(3, 2, [254, 0, 0, 255]);
        let bytes = pigment_core::codec::graybit7::encode(&src, false).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let (buffer, info) = load_image(&path).unwrap();
        assert_eq!(info.format, ImageFormat::GrayBit7);
        assert_eq!(buffer.pixel(0, 0), Some([255, 255, 255, 255]));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
