//! Image decoding: the GrayBit-7 codec plus generic formats.

pub mod generic;
pub mod graybit7;

use serde::{Deserialize, Serialize};

use crate::analysis::depth::detect_color_depth;
use crate::buffer::PixelBuffer;
use crate::error::FormatError;

pub use generic::{decode_generic_image, encode_png};
pub use graybit7::{GrayBit7Image, decode as decode_graybit7};

/// Source format of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Proprietary 7-bit grayscale with optional mask.
    GrayBit7,
    /// Anything the `image` crate can decode.
    Generic,
}

impl ImageFormat {
    /// Sniff the format from the leading bytes: the GrayBit-7 magic, or
    /// [`ImageFormat::Generic`] for anything else.
    pub fn detect(bytes: &[u8]) -> Self {
        if graybit7::has_magic(bytes) {
            Self::GrayBit7
        } else {
            Self::Generic
        }
    }

    /// Pick a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("gb7") {
            Self::GrayBit7
        } else {
            Self::Generic
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::GrayBit7 => "GrayBit-7",
            Self::Generic => "Generic",
        }
    }
}

/// Metadata reported alongside a decoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub format: ImageFormat,
    /// Size of the encoded input in bytes.
    pub byte_len: usize,
    pub width: u32,
    pub height: u32,
    /// Bits per pixel: 7 or 8 for GrayBit-7, 8/24/32 for generic images.
    pub depth: u8,
}

/// Decode `bytes` as `format`, returning the pixels and their metadata.
pub fn decode_image(
    bytes: &[u8],
    format: ImageFormat,
) -> Result<(PixelBuffer, ImageInfo), FormatError> {
    let (buffer, depth) = match format {
        ImageFormat::GrayBit7 => {
            let img = graybit7::decode(bytes)?;
            let depth = img.depth();
            (img.buffer, depth)
        }
        ImageFormat::Generic => {
            let buffer = generic::decode_generic_image(bytes)?;
            let depth = detect_color_depth(&buffer);
            (buffer, depth)
        }
    };

    let info = ImageInfo {
        format,
        byte_len: bytes.len(),
        width: buffer.width(),
        height: buffer.height(),
        depth,
    };
    Ok((buffer, info))
}
