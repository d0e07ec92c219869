//! Engine policy limits.

use serde::{Deserialize, Serialize};

/// Default maximum number of layers in a stack, base layer included.
const DEFAULT_MAX_LAYERS: usize = 5;
/// Default upper bound for resize targets and layer canvases, per axis.
pub const DEFAULT_MAX_DIMENSION: u32 = 10_000;
/// Default WCAG ratio below which a pick pair is flagged.
const DEFAULT_CONTRAST_THRESHOLD: f64 = 4.5;
/// Default thumbnail edge length.
const DEFAULT_THUMBNAIL_SIZE: u32 = 50;
/// Default size of solid-color layers.
const DEFAULT_COLOR_LAYER_WIDTH: u32 = 800;
const DEFAULT_COLOR_LAYER_HEIGHT: u32 = 600;

/// Policy constants shared by the layer stack, resampler and color readout.
///
/// Fields missing from a serialized config fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of layers, base layer included.
    pub max_layers: usize,
    /// Largest accepted resize target per axis.
    pub max_dimension: u32,
    /// WCAG contrast ratio below which a warning is raised.
    pub contrast_warning_threshold: f64,
    /// Edge length of layer thumbnails.
    pub thumbnail_size: u32,
    /// Width of buffers created for solid-color layers.
    pub color_layer_width: u32,
    /// Height of buffers created for solid-color layers.
    pub color_layer_height: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_layers: std::env::var("PIGMENT_MAX_LAYERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_LAYERS),
            max_dimension: std::env::var("PIGMENT_MAX_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_DIMENSION),
            contrast_warning_threshold: DEFAULT_CONTRAST_THRESHOLD,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            color_layer_width: DEFAULT_COLOR_LAYER_WIDTH,
            color_layer_height: DEFAULT_COLOR_LAYER_HEIGHT,
        }
    }
}

impl EngineConfig {
    /// Built-in defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            max_layers: DEFAULT_MAX_LAYERS,
            max_dimension: DEFAULT_MAX_DIMENSION,
            contrast_warning_threshold: DEFAULT_CONTRAST_THRESHOLD,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            color_layer_width: DEFAULT_COLOR_LAYER_WIDTH,
            color_layer_height: DEFAULT_COLOR_LAYER_HEIGHT,
        }
    }

    /// Parse a JSON config. Absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
