//! WCAG 2.0 relative luminance and contrast ratio.

use serde::{Deserialize, Serialize};

/// Ratio below which a color pair fails WCAG AA for body text.
pub const WCAG_AA_THRESHOLD: f64 = 4.5;

#[inline]
fn linearize(channel: u8) -> f64 {
    let v = channel as f64 / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of an 8-bit sRGB color, in `0..=1`.
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// Contrast ratio between two colors, in `1..=21`. Order does not matter.
pub fn wcag_contrast(rgb1: [u8; 3], rgb2: [u8; 3]) -> f64 {
    let l1 = relative_luminance(rgb1[0], rgb1[1], rgb1[2]);
    let l2 = relative_luminance(rgb2[0], rgb2[1], rgb2[2]);
    (l1.max(l2) + 0.05) / (l1.min(l2) + 0.05)
}

/// A contrast ratio together with its pass/fail verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastCheck {
    pub ratio: f64,
    /// True when `ratio` is below the threshold it was checked against.
    pub warning: bool,
}

impl ContrastCheck {
    pub fn evaluate(rgb1: [u8; 3], rgb2: [u8; 3], threshold: f64) -> Self {
        let ratio = wcag_contrast(rgb1, rgb2);
        Self {
            ratio,
            warning: ratio < threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_white_is_21() {
        let ratio = wcag_contrast([0, 0, 0], [255, 255, 255]);
        assert!((ratio - 21.0).abs() < 0.01);
    }

    #[test]
    fn test_contrast_is_symmetric() {
        let a = [200, 30, 90];
        let b = [10, 120, 240];
        assert_eq!(wcag_contrast(a, b), wcag_contrast(b, a));
    }

    #[test]
    fn test_identical_colors_have_ratio_one() {
        assert!((wcag_contrast([77, 77, 77], [77, 77, 77]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_luminance_endpoints() {
        assert_eq!(relative_luminance(0, 0, 0), 0.0);
        assert!((relative_luminance(255, 255, 255) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_check_flags_low_contrast() {
        let gray_on_gray =
            ContrastCheck::evaluate([120, 120, 120], [150, 150, 150], WCAG_AA_THRESHOLD);
        assert!(gray_on_gray.warning);
        let black_on_white = ContrastCheck::evaluate([0, 0, 0], [255, 255, 255], WCAG_AA_THRESHOLD);
        assert!(!black_on_white.warning);
    }
}
