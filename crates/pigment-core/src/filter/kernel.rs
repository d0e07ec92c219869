//! Convolution kernels and the named presets exposed to the UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A 3x3 kernel in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kernel(pub [f64; 9]);

impl Kernel {
    pub const IDENTITY: Self = Self([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    pub const SHARPEN: Self = Self([0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0]);
    pub const GAUSSIAN: Self = Self([1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0]);
    pub const BOX_BLUR: Self = Self([1.0; 9]);
    pub const PREWITT_X: Self = Self([-1.0, 0.0, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0]);
    pub const PREWITT_Y: Self = Self([-1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

    /// Build a kernel from user-entered weights, rejecting NaN and infinities.
    pub fn new(weights: [f64; 9]) -> Result<Self, ValidationError> {
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ValidationError::InvalidArgument("kernel weights must be finite"));
        }
        Ok(Self(weights))
    }

    /// Divisor applied to each weighted sum: the sum of the weights, or 1
    /// when they cancel out (edge detectors run unnormalized).
    pub fn normalization(&self) -> f64 {
        let sum: f64 = self.0.iter().sum();
        if sum == 0.0 { 1.0 } else { sum }
    }

    /// Weights as a row-major slice.
    pub fn weights(&self) -> &[f64; 9] {
        &self.0
    }

    /// Look up a preset by its UI name, e.g. `"boxBlur"`.
    pub fn preset(name: &str) -> Option<Self> {
        name.parse::<KernelPreset>().ok().map(|p| p.kernel())
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The preset kernels, addressable by their UI names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KernelPreset {
    Identity,
    Sharpen,
    Gaussian,
    BoxBlur,
    PrewittX,
    PrewittY,
}

impl KernelPreset {
    pub fn all() -> &'static [Self] {
        const ALL: [KernelPreset; 6] = [
            KernelPreset::Identity,
            KernelPreset::Sharpen,
            KernelPreset::Gaussian,
            KernelPreset::BoxBlur,
            KernelPreset::PrewittX,
            KernelPreset::PrewittY,
        ];
        &ALL
    }

    /// Stable identifier used in configs and on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Sharpen => "sharpen",
            Self::Gaussian => "gaussian",
            Self::BoxBlur => "boxBlur",
            Self::PrewittX => "prewittX",
            Self::PrewittY => "prewittY",
        }
    }

    /// Human-readable label for menus.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Sharpen => "Sharpen",
            Self::Gaussian => "Gaussian blur (3x3)",
            Self::BoxBlur => "Box blur",
            Self::PrewittX => "Prewitt operator (X)",
            Self::PrewittY => "Prewitt operator (Y)",
        }
    }

    pub const fn kernel(&self) -> Kernel {
        match self {
            Self::Identity => Kernel::IDENTITY,
            Self::Sharpen => Kernel::SHARPEN,
            Self::Gaussian => Kernel::GAUSSIAN,
            Self::BoxBlur => Kernel::BOX_BLUR,
            Self::PrewittX => Kernel::PREWITT_X,
            Self::PrewittY => Kernel::PREWITT_Y,
        }
    }
}

impl fmt::Display for KernelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or(ValidationError::InvalidArgument("unknown kernel preset"))
    }
}
