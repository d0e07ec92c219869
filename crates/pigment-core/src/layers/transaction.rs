//! Snapshot/commit/rollback around a single-layer edit.
//!
//! A [`LayerEdit`] records the layer's buffer when the edit starts. Previews
//! swap candidate buffers in, [`LayerEdit::commit`] keeps the final one and
//! [`LayerEdit::rollback`] puts the snapshot back. Dropping an edit without
//! committing leaves whatever preview is installed, so callers that may be
//! cancelled should roll back explicitly.

use std::sync::Arc;

use super::layer::LayerId;
use super::stack::LayerStack;
use crate::buffer::PixelBuffer;
use crate::curves::{CurvePoint, apply_lut, build_lut};
use crate::error::{FilterError, LayerError, SettleError};
use crate::filter::{ConvolutionJob, Kernel, spawn_convolution};

#[derive(Debug)]
#[must_use = "an edit must be committed or rolled back"]
pub struct LayerEdit {
    layer: LayerId,
    snapshot: Arc<PixelBuffer>,
}

impl LayerEdit {
    /// Start editing `id`. The layer must have a buffer.
    pub fn begin(stack: &LayerStack, id: LayerId) -> Result<Self, LayerError> {
        let layer = stack.get(id).ok_or(LayerError::NotFound(id))?;
        let snapshot = layer.shared_buffer().ok_or(LayerError::Empty(id))?;
        tracing::debug!(%id, "began layer edit");
        Ok(Self { layer: id, snapshot })
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// The pre-edit buffer. Every candidate should be derived from this,
    /// not from the currently previewed buffer.
    pub fn source(&self) -> Arc<PixelBuffer> {
        Arc::clone(&self.snapshot)
    }

    /// Run `kernel` over the snapshot on a background thread.
    pub fn spawn_convolution(&self, kernel: Kernel) -> Result<ConvolutionJob, FilterError> {
        spawn_convolution(self.source(), kernel)
    }

    /// Apply a tone curve to the snapshot.
    pub fn curve(&self, points: &[CurvePoint]) -> Result<PixelBuffer, LayerError> {
        let lut = build_lut(points)?;
        Ok(apply_lut(&self.snapshot, &lut))
    }

    /// Show `candidate` in the stack without ending the edit.
    pub fn preview(
        &self,
        stack: &mut LayerStack,
        candidate: impl Into<Arc<PixelBuffer>>,
    ) -> Result<(), LayerError> {
        self.install(stack, candidate.into())
    }

    /// Restore the snapshot while keeping the edit open, e.g. when a preview
    /// toggle is switched off.
    pub fn clear_preview(&self, stack: &mut LayerStack) -> Result<(), LayerError> {
        self.install(stack, self.source())
    }

    /// Install `result` as the layer's buffer and end the edit.
    pub fn commit(
        self,
        stack: &mut LayerStack,
        result: impl Into<Arc<PixelBuffer>>,
    ) -> Result<(), LayerError> {
        self.install(stack, result.into())?;
        tracing::info!(id = %self.layer, "committed layer edit");
        Ok(())
    }

    /// Restore the snapshot and end the edit.
    pub fn rollback(self, stack: &mut LayerStack) -> Result<(), LayerError> {
        self.install(stack, self.source())?;
        tracing::info!(id = %self.layer, "rolled back layer edit");
        Ok(())
    }

    /// Finish with the outcome of a background job: commit on success,
    /// roll back on cancellation or worker failure. The job error is
    /// returned after the rollback.
    pub fn settle(
        self,
        stack: &mut LayerStack,
        outcome: Result<PixelBuffer, FilterError>,
    ) -> Result<(), SettleError> {
        match outcome {
            Ok(buffer) => self.commit(stack, buffer).map_err(SettleError::Layer),
            Err(err) => {
                tracing::warn!(
                    id = %self.layer,
                    error = %err,
                    "background edit failed, restoring layer"
                );
                self.rollback(stack).map_err(SettleError::Layer)?;
                Err(SettleError::Filter(err))
            }
        }
    }

    fn install(&self, stack: &mut LayerStack, buffer: Arc<PixelBuffer>) -> Result<(), LayerError> {
        if stack.get(self.layer).is_none() {
            return Err(LayerError::StaleTransaction(self.layer));
        }
        stack.replace_buffer(self.layer, buffer)
    }
}
