//! The ordered layer store.
//!
//! Index 0 is the bottom of the stack. The base layer starts there but can be
//! reordered like any other layer; it is found by [`LayerId::BASE`], never by
//! position. Every mutation goes through [`LayerStack`] so the layer cap, the
//! base-layer protection and the active-layer cursor stay consistent.

use std::sync::Arc;

use parking_lot::RwLock;

use super::blend::BlendMode;
use super::composite::{Composition, composite_within};
use super::layer::{Layer, LayerId, LayerKind, LayerSource};
use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::error::LayerError;

const BASE_LAYER_NAME: &str = "Base layer";
const IMAGE_LAYER_NAME: &str = "New layer";
const COLOR_LAYER_NAME: &str = "Color layer";

/// Layer stack shared between an interactive thread and workers.
pub type SharedLayerStack = Arc<RwLock<LayerStack>>;

#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: u64,
    active: LayerId,
    config: EngineConfig,
}

impl LayerStack {
    /// New stack holding only the base layer built from `base`.
    pub fn new(base: PixelBuffer, config: EngineConfig) -> Self {
        let base = Layer::new(LayerId::BASE, BASE_LAYER_NAME, Some(base), config.thumbnail_size);
        Self {
            layers: vec![base],
            next_id: LayerId::BASE.get() + 1,
            active: LayerId::BASE,
            config,
        }
    }

    /// Wrap the stack for sharing.
    pub fn into_shared(self) -> SharedLayerStack {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false: the base layer cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// The base layer, wherever it sits in the stack.
    pub fn base(&self) -> &Layer {
        self.get(LayerId::BASE).unwrap_or_else(|| &self.layers[0])
    }

    /// Id of the layer edits target by default.
    pub fn active(&self) -> LayerId {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        self.get(self.active).unwrap_or_else(|| self.base())
    }

    pub fn set_active(&mut self, id: LayerId) -> Result<(), LayerError> {
        self.index(id)?;
        self.active = id;
        Ok(())
    }

    /// Push a new layer on top and make it active.
    ///
    /// Fails with [`LayerError::LimitReached`] once the stack holds
    /// `max_layers` layers; the stack is left unchanged.
    pub fn add_layer(&mut self, source: LayerSource) -> Result<LayerId, LayerError> {
        let limit = self.config.max_layers;
        if self.layers.len() >= limit {
            tracing::warn!(limit, "layer limit reached, add rejected");
            return Err(LayerError::LimitReached { limit });
        }

        let id = LayerId::new(self.next_id);
        let thumb = self.config.thumbnail_size;
        let layer = match source {
            LayerSource::Empty => Layer::new(id, IMAGE_LAYER_NAME, None, thumb),
            LayerSource::Image(buffer) => Layer::new(id, IMAGE_LAYER_NAME, Some(buffer), thumb),
            LayerSource::Color(rgba) => Layer::solid(
                id,
                COLOR_LAYER_NAME,
                rgba,
                self.config.color_layer_width,
                self.config.color_layer_height,
                thumb,
            ),
        };
        self.next_id += 1;

        tracing::info!(%id, kind = ?layer.kind(), "added layer");
        self.layers.push(layer);
        self.active = id;
        Ok(id)
    }

    /// Remove a layer. The base layer is protected. If the removed layer was
    /// active the cursor falls back to the base layer.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer, LayerError> {
        if id.is_base() {
            tracing::warn!("refusing to remove the base layer");
            return Err(LayerError::BaseLayerProtected);
        }
        let index = self.index(id)?;
        let removed = self.layers.remove(index);
        if self.active == id {
            self.active = LayerId::BASE;
        }
        tracing::info!(%id, "removed layer");
        Ok(removed)
    }

    /// Swap with the layer above. No-op at the top.
    pub fn move_up(&mut self, id: LayerId) -> Result<(), LayerError> {
        let index = self.index(id)?;
        if index + 1 < self.layers.len() {
            self.layers.swap(index, index + 1);
        }
        Ok(())
    }

    /// Swap with the layer below. No-op at the bottom.
    pub fn move_down(&mut self, id: LayerId) -> Result<(), LayerError> {
        let index = self.index(id)?;
        if index > 0 {
            self.layers.swap(index, index - 1);
        }
        Ok(())
    }

    pub fn rename(&mut self, id: LayerId, name: impl Into<String>) -> Result<(), LayerError> {
        self.layer_mut(id)?.set_name(name);
        Ok(())
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> Result<(), LayerError> {
        self.layer_mut(id)?.set_visible(visible);
        Ok(())
    }

    /// Flip visibility and return the new state.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Result<bool, LayerError> {
        let layer = self.layer_mut(id)?;
        let visible = !layer.is_visible();
        layer.set_visible(visible);
        Ok(visible)
    }

    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) -> Result<(), LayerError> {
        self.layer_mut(id)?.set_opacity(opacity);
        Ok(())
    }

    pub fn set_blend_mode(&mut self, id: LayerId, mode: BlendMode) -> Result<(), LayerError> {
        self.layer_mut(id)?.set_blend_mode(mode);
        Ok(())
    }

    /// Fails with [`ValidationError::DimensionTooLarge`] when the scaled
    /// layer would exceed `max_dimension`.
    ///
    /// [`ValidationError::DimensionTooLarge`]: crate::error::ValidationError::DimensionTooLarge
    pub fn set_scale(&mut self, id: LayerId, scale: f32) -> Result<(), LayerError> {
        let max = self.config.max_dimension;
        self.layer_mut(id)?.set_scale(scale, max)?;
        Ok(())
    }

    /// Swap in a new buffer and refresh the thumbnail.
    ///
    /// The base layer rejects an empty (0-pixel) buffer.
    pub fn replace_buffer(
        &mut self,
        id: LayerId,
        buffer: impl Into<Arc<PixelBuffer>>,
    ) -> Result<(), LayerError> {
        let buffer = buffer.into();
        if id.is_base() && buffer.is_empty() {
            return Err(LayerError::BaseLayerProtected);
        }
        let thumb = self.config.thumbnail_size;
        let layer = self.layer_mut(id)?;
        tracing::debug!(
            %id,
            width = buffer.width(),
            height = buffer.height(),
            "replacing layer buffer"
        );
        layer.replace_buffer(buffer, thumb);
        Ok(())
    }

    /// Drop a layer's pixels. Not allowed on the base layer.
    pub fn clear_buffer(&mut self, id: LayerId) -> Result<(), LayerError> {
        if id.is_base() {
            return Err(LayerError::BaseLayerProtected);
        }
        self.layer_mut(id)?.clear_buffer();
        Ok(())
    }

    /// Number of solid-color layers.
    pub fn color_layer_count(&self) -> usize {
        self.layers.iter().filter(|l| l.kind() == LayerKind::Color).count()
    }

    /// Flatten the stack within the configured dimension limit. See
    /// [`composite_within`].
    pub fn composite(&self, global_scale: f32) -> Composition {
        composite_within(&self.layers, global_scale, self.config.max_dimension)
    }

    fn index(&self, id: LayerId) -> Result<usize, LayerError> {
        self.position(id).ok_or(LayerError::NotFound(id))
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, LayerError> {
        let index = self.index(id)?;
        Ok(&mut self.layers[index])
    }
}
