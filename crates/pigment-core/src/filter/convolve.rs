//! Direct 3x3 convolution over the RGB channels.
//!
//! Border pixels are copied through untouched and alpha is never filtered.
//! Results are clamped to `0..=255` and rounded half-to-even.
//!
//! # Complexity
//! O(width × height × 9) per channel; large images belong on the
//! [`worker`](super::worker).

use std::sync::atomic::{AtomicBool, Ordering};

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::filter::kernel::Kernel;

/// Convolve `src` with `kernel`, returning a new buffer.
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let never = AtomicBool::new(false);
    // Only a set flag aborts, so this always yields a buffer.
    convolve_cancellable(src, kernel, &never).unwrap_or_else(|| src.clone())
}

/// Convolution that checks `cancel` before each row. Returns `None` once the
/// flag is observed set.
pub(crate) fn convolve_cancellable(
    src: &PixelBuffer,
    kernel: &Kernel,
    cancel: &AtomicBool,
) -> Option<PixelBuffer> {
    let (width, height) = src.dimensions();
    let data = src.pixels();
    let mut out = data.to_vec();

    if width < 3 || height < 3 {
        return PixelBuffer::from_raw(width, height, out).ok();
    }

    let weights = kernel.weights();
    let normalize = kernel.normalization();
    let stride = width as usize * CHANNELS;

    for y in 1..height as usize - 1 {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        for x in 1..width as usize - 1 {
            for c in 0..3 {
                let mut acc = 0.0_f64;
                for ky in 0..3 {
                    let row = (y + ky - 1) * stride;
                    for kx in 0..3 {
                        let idx = row + (x + kx - 1) * CHANNELS + c;
                        acc += data[idx] as f64 * weights[ky * 3 + kx];
                    }
                }
                let value = (acc / normalize).clamp(0.0, 255.0);
                out[y * stride + x * CHANNELS + c] = value.round_ties_even() as u8;
            }
        }
    }

    PixelBuffer::from_raw(width, height, out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            let v = (x * 73 + y * 151) % 256;
            [v as u8, (v * 3 % 256) as u8, (255 - v) as u8, (x * 9 % 256) as u8]
        })
    }

    #[test]
    fn test_identity_kernel_is_a_no_op() {
        let src = noise(12, 9);
        assert_eq!(convolve(&src, &Kernel::IDENTITY), src);
    }

    #[test]
    fn test_box_blur_on_flat_image_is_a_no_op() {
        let src = PixelBuffer::filled(8, 8, [37, 140, 222, 255]);
        assert_eq!(convolve(&src, &Kernel::BOX_BLUR), src);
        assert_eq!(convolve(&src, &Kernel::GAUSSIAN), src);
        assert_eq!(convolve(&src, &Kernel::SHARPEN), src);
    }

    #[test]
    fn test_borders_and_alpha_pass_through() {
        let src = noise(6, 5);
        let out = convolve(&src, &Kernel::PREWITT_Y);
        for y in 0..5 {
            for x in 0..6 {
                let a = src.pixel(x, y).unwrap();
                let b = out.pixel(x, y).unwrap();
                assert_eq!(a[3], b[3], "alpha at ({x}, {y})");
                if x == 0 || y == 0 || x == 5 || y == 4 {
                    assert_eq!(a, b, "border at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_edge_detector_runs_unnormalized_and_clamps() {
        // Vertical step: left column 0, right columns 100.
        let src = PixelBuffer::from_fn(3, 3, |x, _| {
            if x == 0 { [0, 0, 0, 255] } else { [100, 100, 100, 255] }
        });
        let out = convolve(&src, &Kernel::PREWITT_X);
        // (-0 + 100) * 3 = 300 -> clamped.
        assert_eq!(out.pixel(1, 1), Some([255, 255, 255, 255]));

        let flipped = Kernel([1.0, 0.0, -1.0, 1.0, 0.0, -1.0, 1.0, 0.0, -1.0]);
        let out = convolve(&src, &flipped);
        assert_eq!(out.pixel(1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_kernel_is_applied_row_major() {
        // Only the top-left weight is set, so the output copies the pixel
        // up and to the left.
        let mut w = [0.0; 9];
        w[0] = 1.0;
        let src = noise(5, 5);
        let out = convolve(&src, &Kernel(w));
        let up_left = src.pixel(1, 2).unwrap();
        let got = out.pixel(2, 3).unwrap();
        assert_eq!(&got[..3], &up_left[..3]);
    }

    #[test]
    fn test_rounds_half_to_even() {
        // Center 1, right neighbour 2, kernel averages the pair: 1.5 -> 2,
        // and 2.5 -> 2.
        let mut w = [0.0; 9];
        w[4] = 1.0;
        w[5] = 1.0;
        let src = PixelBuffer::from_fn(4, 3, |x, _| {
            let v = [1, 1, 2, 3][x as usize];
            [v, v, v, 255]
        });
        let out = convolve(&src, &Kernel(w));
        assert_eq!(out.pixel(1, 1).unwrap()[0], 2);
        assert_eq!(out.pixel(2, 1).unwrap()[0], 2);
    }

    #[test]
    fn test_tiny_images_are_copied() {
        let src = noise(2, 7);
        assert_eq!(convolve(&src, &Kernel::SHARPEN), src);
    }

    #[test]
    fn test_cancel_flag_aborts() {
        let flag = AtomicBool::new(true);
        assert!(convolve_cancellable(&noise(5, 5), &Kernel::BOX_BLUR, &flag).is_none());
    }
}
