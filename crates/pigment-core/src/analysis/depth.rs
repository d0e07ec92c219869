//! Color-depth detection for generically decoded images.

use crate::buffer::PixelBuffer;

/// Edge of the top-left block that is inspected.
const PROBE_SIZE: u32 = 10;

/// Estimate the bit depth from the top-left 10x10 block.
///
/// Any translucent pixel gives 32, an all-gray block gives 8, anything else
/// 24. An empty buffer reports 0.
pub fn detect_color_depth(buffer: &PixelBuffer) -> u8 {
    if buffer.is_empty() {
        return 0;
    }

    let w = buffer.width().min(PROBE_SIZE);
    let h = buffer.height().min(PROBE_SIZE);

    let mut has_alpha = false;
    let mut grayscale = true;
    for y in 0..h {
        for x in 0..w {
            let [r, g, b, a] = buffer.pixel_at(x, y);
            if a < 255 {
                has_alpha = true;
            }
            if !(r == g && g == b) {
                grayscale = false;
            }
        }
    }

    if has_alpha {
        32
    } else if grayscale {
        8
    } else {
        24
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_classification() {
        assert_eq!(detect_color_depth(&PixelBuffer::new(0, 0)), 0);
        assert_eq!(detect_color_depth(&PixelBuffer::filled(3, 3, [5, 5, 5, 255])), 8);
        assert_eq!(detect_color_depth(&PixelBuffer::filled(3, 3, [5, 6, 5, 255])), 24);
        assert_eq!(detect_color_depth(&PixelBuffer::filled(3, 3, [5, 5, 5, 254])), 32);
    }

    #[test]
    fn test_depth_only_checks_top_left_block() {
        // Color lives outside the 10x10 sampling window.
        let buf = PixelBuffer::from_fn(20, 20, |x, y| {
            if x >= 10 || y >= 10 { [255, 0, 0, 255] } else { [9, 9, 9, 255] }
        });
        assert_eq!(detect_color_depth(&buf), 8);
    }
}
