//! Pigment Core: the image-processing engine.
//!
//! Pixel-level algorithms over owned RGBA8 buffers: the GrayBit-7 codec,
//! generic decode, resampling, 3x3 convolution (with a background worker),
//! tone curves, color-space readouts and layer compositing. No UI, windowing
//! or GPU dependencies.
//!
//! Every operation takes an immutable [`PixelBuffer`] and returns a new one.
//! Layer edits replace a layer's buffer wholesale through [`LayerStack`] or a
//! [`LayerEdit`] transaction.

pub mod analysis;
pub mod buffer;
pub mod codec;
pub mod color;
pub mod config;
pub mod curves;
pub mod error;
pub mod filter;
pub mod layers;
pub mod resample;

// Re-exports for convenience.
pub use buffer::PixelBuffer;
pub use codec::{
    ImageFormat, ImageInfo, decode_generic_image, decode_graybit7, decode_image, encode_png,
};
pub use color::{ColorSample, ContrastCheck, sample_color, wcag_contrast};
pub use config::EngineConfig;
pub use curves::{CurvePoint, Lut, apply_lut, build_lut};
pub use error::{EngineError, FilterError, FormatError, LayerError, SettleError, ValidationError};
pub use filter::{ConvolutionJob, Kernel, KernelPreset, convolve, spawn_convolution};
pub use layers::{
    BlendMode, Composition, Layer, LayerEdit, LayerId, LayerSource, LayerStack, composite,
};
pub use resample::{ResizeMethod, resize};
