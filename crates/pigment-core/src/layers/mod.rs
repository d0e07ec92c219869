//! Layer model, stack management, compositing and edit transactions.

pub mod blend;
pub mod composite;
pub mod layer;
pub mod stack;
pub mod transaction;

pub use blend::BlendMode;
pub use composite::{Composition, DisplaySize, canvas_size, composite, composite_within};
pub use layer::{Layer, LayerId, LayerKind, LayerSource, make_thumbnail};
pub use stack::{LayerStack, SharedLayerStack};
pub use transaction::LayerEdit;
