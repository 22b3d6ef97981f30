//! Layered layout of an explored neighborhood.
//!
//! Layout runs in two steps: [`layer::organize`] groups explored nodes into
//! ordered columns, then [`placement::LayoutPlacer`] turns those columns into a
//! positioned [`Diagram`](linkmap_core::canvas::Diagram).

pub mod layer;
pub mod placement;

pub use layer::{Layer, LayerKind, LayerStack, organize};
pub use placement::{LayoutPlacer, SEED_NODE_ID};
