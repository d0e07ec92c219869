//! Separable blend modes.
//!
//! Each mode maps a normalized backdrop channel `cb` and source channel `cs`
//! to a mixed channel value. Alpha handling lives in the compositor.
//!
//! # Reference
//! W3C Compositing and Blending Level 1, section 5.3.

use serde::{Deserialize, Serialize};

/// How a layer's color combines with the canvas beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
}

impl BlendMode {
    pub fn all() -> &'static [Self] {
        const ALL: [BlendMode; 4] = [
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
        ];
        &ALL
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Multiply => "Multiply",
            Self::Screen => "Screen",
            Self::Overlay => "Overlay",
        }
    }

    /// Mix one channel. Inputs and output are in `[0, 1]`.
    #[inline]
    pub fn blend(self, cb: f32, cs: f32) -> f32 {
        match self {
            Self::Normal => cs,
            Self::Multiply => multiply(cb, cs),
            Self::Screen => screen(cb, cs),
            Self::Overlay => overlay(cb, cs),
        }
    }
}

#[inline]
fn multiply(cb: f32, cs: f32) -> f32 {
    cb * cs
}

#[inline]
fn screen(cb: f32, cs: f32) -> f32 {
    1.0 - (1.0 - cb) * (1.0 - cs)
}

/// Hard light with the operands swapped: the backdrop picks the branch.
#[inline]
fn overlay(cb: f32, cs: f32) -> f32 {
    if cb < 0.5 {
        2.0 * cb * cs
    } else {
        1.0 - 2.0 * (1.0 - cb) * (1.0 - cs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_normal_takes_source() {
        assert_eq!(BlendMode::Normal.blend(0.2, 0.7), 0.7);
    }

    #[test]
    fn test_multiply_and_screen_are_duals() {
        for &(cb, cs) in &[(0.0, 0.5), (0.3, 0.6), (1.0, 0.25)] {
            let m = BlendMode::Multiply.blend(cb, cs);
            let s = BlendMode::Screen.blend(1.0 - cb, 1.0 - cs);
            assert!((m - (1.0 - s)).abs() < EPSILON);
        }
    }

    #[test]
    fn test_white_and_black_identities() {
        assert!((BlendMode::Multiply.blend(1.0, 0.4) - 0.4).abs() < EPSILON);
        assert!((BlendMode::Screen.blend(0.0, 0.4) - 0.4).abs() < EPSILON);
    }

    #[test]
    fn test_overlay_branches_on_backdrop() {
        assert!((BlendMode::Overlay.blend(0.25, 0.5) - 0.25).abs() < EPSILON);
        assert!((BlendMode::Overlay.blend(0.75, 0.5) - 0.75).abs() < EPSILON);
        // Both branches agree at the midpoint.
        assert!((BlendMode::Overlay.blend(0.5, 0.8) - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&BlendMode::Overlay).unwrap();
        assert_eq!(json, "\"overlay\"");
        assert_eq!(BlendMode::all().len(), 4);
    }
}
