//! Layer organization.
//!
//! Explored nodes are grouped into columns ("layers") by the direction that
//! discovered them and their distance from the seed. Backlink layers come
//! first, deepest level leftmost, followed by forward layers, shallowest level
//! first:
//!
//! ```text
//!   backlink L2 | backlink L1 | (seed) | forward L1 | forward L2
//! ```
//!
//! The seed itself is not part of any layer. Its column is implied by
//! [`LayerStack::center_index`], the position where backlink layers end and
//! forward layers begin.

use log::debug;

use linkmap_core::document::DocumentRef;

use crate::explore::GraphNode;

/// The direction class shared by every node of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Documents that link towards the seed; drawn left of it.
    Backlink,
    /// Documents the seed links towards; drawn right of it.
    Forward,
}

/// A column of nodes at the same level and direction class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    kind: LayerKind,
    level: usize,
    nodes: Vec<GraphNode>,
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Nodes in display order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Ordered layers plus the implied position of the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerStack {
    layers: Vec<Layer>,
    center_index: usize,
}

impl LayerStack {
    /// Layers from left to right, the seed excluded.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of backlink layers, i.e. the index of the first forward layer.
    pub fn center_index(&self) -> usize {
        self.center_index
    }

    /// Signed column distance between layer `index` and the seed column.
    ///
    /// Backlink layers get negative offsets ending at `-1`; forward layers get
    /// positive offsets starting at `1`.
    pub fn column_offset(&self, index: usize) -> isize {
        let offset = index as isize - self.center_index as isize;
        if index < self.center_index {
            offset
        } else {
            offset + 1
        }
    }

    /// Total number of nodes across all layers.
    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }
}

/// Partitions explored nodes into ordered layers.
///
/// Every node except the seed lands in exactly one layer. Layers are sorted
/// with [`DocumentRef::display_cmp`], and empty levels are skipped.
pub fn organize(seed: &DocumentRef, nodes: &[GraphNode]) -> LayerStack {
    let candidates: Vec<&GraphNode> = nodes
        .iter()
        .filter(|node| node.document() != seed)
        .collect();

    let max_level = |is_backlink: bool| {
        candidates
            .iter()
            .filter(|node| node.is_backlink() == is_backlink)
            .map(|node| node.level())
            .max()
            .unwrap_or(0)
    };

    let mut backlink: Vec<Vec<GraphNode>> = vec![Vec::new(); max_level(true) + 1];
    let mut forward: Vec<Vec<GraphNode>> = vec![Vec::new(); max_level(false) + 1];

    for node in candidates {
        let sequence = if node.is_backlink() {
            &mut backlink
        } else {
            &mut forward
        };
        sequence[node.level()].push(node.clone());
    }

    let into_layer = |kind: LayerKind, level: usize, mut nodes: Vec<GraphNode>| {
        nodes.sort_by(|a, b| a.document().display_cmp(b.document()));
        Layer { kind, level, nodes }
    };

    // Level 0 only ever holds the seed, which is placed separately.
    let mut layers: Vec<Layer> = backlink
        .into_iter()
        .enumerate()
        .skip(1)
        .rev()
        .filter(|(_, nodes)| !nodes.is_empty())
        .map(|(level, nodes)| into_layer(LayerKind::Backlink, level, nodes))
        .collect();
    let center_index = layers.len();

    layers.extend(
        forward
            .into_iter()
            .enumerate()
            .skip(1)
            .filter(|(_, nodes)| !nodes.is_empty())
            .map(|(level, nodes)| into_layer(LayerKind::Forward, level, nodes)),
    );

    debug!(
        layers = layers.len(),
        center_index,
        seed = seed.as_str();
        "Organized layers"
    );

    LayerStack {
        layers,
        center_index,
    }
}
