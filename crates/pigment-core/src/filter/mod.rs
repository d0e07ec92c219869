//! 3x3 spatial convolution and its background worker.

pub mod convolve;
pub mod kernel;
pub mod worker;

pub use convolve::convolve;
pub use kernel::{Kernel, KernelPreset};
pub use worker::{CancelHandle, ConvolutionJob, spawn_convolution};
