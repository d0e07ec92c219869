//! Runtime configuration for the demo.

use std::path::PathBuf;

use pigment_core::EngineConfig;
use serde::{Deserialize, Serialize};

/// Default display zoom.
const DEFAULT_GLOBAL_SCALE: f32 = 1.0;
/// Default tracing filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime configuration for the Pigment demo.
///
/// Loaded from the JSON file named by `PIGMENT_CONFIG` when set; missing
/// fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Engine policy limits.
    pub engine: EngineConfig,
    /// Display zoom reported alongside the composite.
    pub global_scale: f32,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            global_scale: std::env::var("PIGMENT_ZOOM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_GLOBAL_SCALE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DemoConfig {
    /// Read `PIGMENT_CONFIG` if set, otherwise use defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os("PIGMENT_CONFIG") {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
