//! Coordinate assignment for a freshly built canvas.
//!
//! The seed sits at the canvas center. Every layer becomes a column one
//! `horizontal_spacing` away from its neighbor, and nodes inside a column are
//! stacked `vertical_spacing` apart, centered on the canvas' vertical center.
//! Placement is a pure function of its inputs: node and edge ids are derived
//! from positions in the layer stack, never generated randomly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, trace};

use linkmap_core::{
    canvas::{Diagram, DiagramEdge, DiagramNode},
    document::DocumentRef,
    geometry::Point,
};

use crate::{config::LayoutConfig, explore::ConnectionSet, layout::layer::LayerStack};

/// Id of the node showing the seed document.
pub const SEED_NODE_ID: &str = "root";

/// Returns the y-coordinates of `count` nodes stacked `spacing` apart and
/// centered on `center`.
pub(crate) fn centered_offsets(center: f32, count: usize, spacing: f32) -> Vec<f32> {
    let span = count.saturating_sub(1) as f32 * spacing;
    let first = center - span / 2.0;
    (0..count).map(|i| first + i as f32 * spacing).collect()
}

/// Places layered nodes on a canvas.
pub struct LayoutPlacer<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LayoutPlacer<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Builds a diagram for `seed` and its layers, stamped with `timestamp`.
    ///
    /// Edges are derived from `connections`. Links whose endpoints were not
    /// placed are dropped silently; that is expected whenever a link leads
    /// outside the explored neighborhood.
    pub fn place(
        &self,
        seed: &DocumentRef,
        stack: &LayerStack,
        connections: &ConnectionSet,
        timestamp: DateTime<Utc>,
    ) -> Diagram {
        let center = self.config.canvas_center();
        let size = self.config.node_size();

        let mut nodes = Vec::with_capacity(stack.node_count() + 1);
        nodes.push(DiagramNode::new(SEED_NODE_ID, seed.clone(), center, size));

        for (layer_idx, layer) in stack.layers().iter().enumerate() {
            let x = center.x()
                + stack.column_offset(layer_idx) as f32 * self.config.horizontal_spacing();
            let ys = centered_offsets(center.y(), layer.len(), self.config.vertical_spacing());

            for (node_idx, (node, y)) in layer.nodes().iter().zip(ys).enumerate() {
                trace!(
                    document = node.document().as_str(),
                    x,
                    y;
                    "Placed node"
                );
                nodes.push(DiagramNode::new(
                    format!("node-{layer_idx}-{node_idx}"),
                    node.document().clone(),
                    Point::new(x, y),
                    size,
                ));
            }
        }

        let ids: HashMap<&DocumentRef, &str> = nodes
            .iter()
            .map(|node| (node.document(), node.id()))
            .collect();

        let edges: Vec<DiagramEdge> = connections
            .iter()
            .filter_map(|(source, target)| match (ids.get(source), ids.get(target)) {
                (Some(&from), Some(&to)) if from != to => Some((from, to)),
                _ => None,
            })
            .enumerate()
            .map(|(idx, (from, to))| DiagramEdge::new(format!("edge-{idx}"), from, to))
            .collect();

        debug!(nodes = nodes.len(), edges = edges.len(); "Placed diagram");

        let mut diagram = Diagram::new(timestamp);
        diagram.append(nodes, edges, timestamp);
        diagram
    }
}
