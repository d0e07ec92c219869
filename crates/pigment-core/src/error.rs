//! Error types for every engine entry point.
//!
//! Each failure family gets its own enum so callers can match on exactly the
//! errors an operation can produce. [`EngineError`] folds them together for
//! callers that just want to propagate with `?`.

use crate::layers::LayerId;

/// Decode-time failures. No partial image is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("file too small: {len} bytes, need at least 12")]
    TooSmall { len: usize },
    #[error("unsupported GrayBit-7 version: {0}")]
    UnsupportedVersion(u8),
    #[error("truncated payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },
    #[error("failed to decode image: {0}")]
    Generic(#[from] image::ImageError),
}

/// Caller-input precondition violations, rejected before any allocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("dimensions {width}x{height} exceed the {max}px limit")]
    DimensionTooLarge { width: u32, height: u32, max: u32 },
    #[error("pixel data has {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("point ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
    #[error("invalid parameter: {0}")]
    InvalidArgument(&'static str),
}

/// Layer-stack failures. `LimitReached` is the resource-limit error: the
/// stack is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("layer limit reached ({limit})")]
    LimitReached { limit: usize },
    #[error("no layer with id {0}")]
    NotFound(LayerId),
    #[error("the base layer cannot be removed or emptied")]
    BaseLayerProtected,
    #[error("layer {0} has no image")]
    Empty(LayerId),
    #[error("edit transaction for layer {0} is no longer valid")]
    StaleTransaction(LayerId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Background convolution failures.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("failed to spawn convolution worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("convolution was cancelled")]
    Cancelled,
    #[error("convolution worker exited without a result")]
    WorkerLost,
}

/// Why a background edit was not committed.
#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    /// The job failed and the layer was restored.
    #[error(transparent)]
    Filter(FilterError),
    #[error(transparent)]
    Layer(LayerError),
}

/// Umbrella error for callers that mix engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Layer(#[from] LayerError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl From<SettleError> for EngineError {
    fn from(err: SettleError) -> Self {
        match err {
            SettleError::Filter(e) => Self::Filter(e),
            SettleError::Layer(e) => Self::Layer(e),
        }
    }
}
