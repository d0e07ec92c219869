//! sRGB → CIE XYZ → CIE Lab, plus the HSL-based "OKLCH" readout.
//!
//! # Reference
//! - IEC 61966-2-1 (sRGB transfer)
//! - CIE 15:2004 (XYZ → L*a*b*)

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// sRGB (D65) → XYZ. Columns of the usual row-major matrix
/// `[0.4124 0.3576 0.1805; 0.2126 0.7152 0.0722; 0.0193 0.1192 0.9505]`.
const SRGB_TO_XYZ: DMat3 = DMat3::from_cols(
    DVec3::new(0.4124, 0.2126, 0.0193),
    DVec3::new(0.3576, 0.7152, 0.1192),
    DVec3::new(0.1805, 0.0722, 0.9505),
);

/// D65 reference white, Y normalised to 100.
const D65_WHITE: DVec3 = DVec3::new(95.047, 100.0, 108.883);

/// CIE ε, written as the classic 0.008856 approximation.
const LAB_EPSILON: f64 = 0.008856;
/// Slope of the linear segment near black (≈ κ / 116).
const LAB_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// CIE XYZ tristimulus values, Y in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L*a*b* under D65.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Lightness / chroma / hue readout.
///
/// These are HSL lightness (0..1), HSL saturation (0..1) and HSL hue in
/// degrees, not true OKLab-derived values. Kept for output parity with
/// existing color readouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// sRGB decode of one 8-bit channel to linear `0..=1`.
#[inline]
fn srgb_to_linear(channel: u8) -> f64 {
    let v = channel as f64 / 255.0;
    if v > 0.04045 {
        ((v + 0.055) / 1.055).powf(2.4)
    } else {
        v / 12.92
    }
}

/// Convert 8-bit sRGB to XYZ (D65, Y scaled to 100).
pub fn rgb_to_xyz(r: u8, g: u8, b: u8) -> Xyz {
    let linear = DVec3::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)) * 100.0;
    let xyz = SRGB_TO_XYZ * linear;
    Xyz {
        x: xyz.x,
        y: xyz.y,
        z: xyz.z,
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_SLOPE * t + LAB_OFFSET
    }
}

/// Convert XYZ (Y scaled to 100) to L*a*b* relative to D65.
pub fn xyz_to_lab(x: f64, y: f64, z: f64) -> Lab {
    let n = DVec3::new(x, y, z) / D65_WHITE;
    let (fx, fy, fz) = (lab_f(n.x), lab_f(n.y), lab_f(n.z));
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// HSL-derived lightness/chroma/hue triple (see [`Oklch`]).
pub fn rgb_to_oklch(r: u8, g: u8, b: u8) -> Oklch {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Oklch { l, c: 0.0, h: 0.0 };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Oklch {
        l,
        c: s,
        h: h / 6.0 * 360.0,
    }
}
