//! Tone curves: piecewise-linear control points baked to a 256-entry LUT.
//!
//! # Algorithm
//! Points are stably sorted by input. Each consecutive pair fills its
//! inclusive input range by linear interpolation; later pairs overwrite the
//! shared endpoint. Inputs outside the first/last point are held flat.
//!
//! # Complexity
//! - Bake: O(N log N + 256)
//! - Apply: O(pixels)

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::ValidationError;

/// One curve control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub input: u8,
    pub output: u8,
}

impl CurvePoint {
    pub const fn new(input: u8, output: u8) -> Self {
        Self { input, output }
    }
}

/// The default curve: a straight line from black to white.
pub const IDENTITY_CURVE: [CurvePoint; 2] = [CurvePoint::new(0, 0), CurvePoint::new(255, 255)];

/// A 256-entry byte lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lut(pub [u8; 256]);

impl Lut {
    /// `lut[x] == x` for every x.
    pub fn identity() -> Self {
        Self(std::array::from_fn(|i| i as u8))
    }

    #[inline]
    pub fn map(&self, value: u8) -> u8 {
        self.0[value as usize]
    }

    pub fn as_slice(&self) -> &[u8; 256] {
        &self.0
    }
}

impl Default for Lut {
    fn default() -> Self {
        Self::identity()
    }
}

/// Bake control points into a LUT.
///
/// Needs at least two points. When several points share an input, the one
/// that comes last in `points` decides the output at that input.
pub fn build_lut(points: &[CurvePoint]) -> Result<Lut, ValidationError> {
    if points.len() < 2 {
        return Err(ValidationError::InvalidArgument(
            "a curve needs at least two control points",
        ));
    }

    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.input);

    let mut lut = [0u8; 256];

    for pair in sorted.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let range = end.input - start.input;
        if range == 0 {
            lut[end.input as usize] = end.output;
            continue;
        }
        let rise = end.output as f64 - start.output as f64;
        for x in start.input..=end.input {
            let t = (x - start.input) as f64 / range as f64;
            lut[x as usize] = (start.output as f64 + t * rise).round() as u8;
        }
    }

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    for entry in &mut lut[..first.input as usize] {
        *entry = first.output;
    }
    for entry in &mut lut[last.input as usize..] {
        *entry = last.output;
    }

    Ok(Lut(lut))
}

/// Map R, G and B of every pixel through `lut`; alpha is copied.
pub fn apply_lut(buffer: &PixelBuffer, lut: &Lut) -> PixelBuffer {
    let mut out = Vec::with_capacity(buffer.pixels().len());
    for &[r, g, b, a] in buffer.as_rgba() {
        out.extend_from_slice(&[lut.map(r), lut.map(g), lut.map(b), a]);
    }
    PixelBuffer::from_raw(buffer.width(), buffer.height(), out)
        .unwrap_or_else(|_| buffer.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_curve_bakes_identity_lut() {
        let lut = build_lut(&IDENTITY_CURVE).unwrap();
        for x in 0..=255u8 {
            assert_eq!(lut.map(x), x);
        }
        assert_eq!(lut, Lut::identity());
    }

    #[test]
    fn test_flat_extrapolation() {
        let lut = build_lut(&[CurvePoint::new(50, 50), CurvePoint::new(200, 200)]).unwrap();
        assert!(lut.0[..50].iter().all(|&v| v == 50));
        assert!(lut.0[201..].iter().all(|&v| v == 200));
        assert_eq!(lut.map(125), 125);
    }

    #[test]
    fn test_points_are_sorted_first() {
        let lut = build_lut(&[CurvePoint::new(255, 0), CurvePoint::new(0, 255)]).unwrap();
        assert_eq!(lut.map(0), 255);
        assert_eq!(lut.map(255), 0);
        assert_eq!(lut.map(127), 128);
    }

    #[test]
    fn test_interpolation_rounds() {
        let lut = build_lut(&[CurvePoint::new(0, 0), CurvePoint::new(3, 1)]).unwrap();
        assert_eq!(&lut.0[..4], &[0, 0, 1, 1]);
        assert!(lut.0[4..].iter().all(|&v| v == 1));
    }

    #[test]
    fn test_three_point_curve() {
        let lut = build_lut(&[
            CurvePoint::new(0, 0),
            CurvePoint::new(128, 200),
            CurvePoint::new(255, 255),
        ])
        .unwrap();
        assert_eq!(lut.map(64), 100);
        assert_eq!(lut.map(128), 200);
        assert_eq!(lut.map(255), 255);
    }

    #[test]
    fn test_duplicate_input_later_point_wins() {
        let lut = build_lut(&[
            CurvePoint::new(0, 0),
            CurvePoint::new(100, 10),
            CurvePoint::new(100, 200),
            CurvePoint::new(255, 255),
        ])
        .unwrap();
        assert_eq!(lut.map(100), 200);
        assert_eq!(lut.map(99), 10);
        assert_eq!(lut.map(101), 200);
    }

    #[test]
    fn test_too_few_points() {
        assert!(build_lut(&[]).is_err());
        assert!(build_lut(&[CurvePoint::new(3, 3)]).is_err());
    }

    #[test]
    fn test_apply_lut_leaves_alpha() {
        let invert = build_lut(&[CurvePoint::new(0, 255), CurvePoint::new(255, 0)]).unwrap();
        let src = PixelBuffer::from_fn(3, 2, |x, y| [x as u8 * 50, y as u8 * 80, 255, 17]);
        let out = apply_lut(&src, &invert);
        assert_eq!(out.pixel(2, 1), Some([155, 175, 0, 17]));
        assert_eq!(out.dimensions(), src.dimensions());
    }
}
