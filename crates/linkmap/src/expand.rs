//! Incremental growth of an existing canvas.
//!
//! [`DiagramExpander`] adds the links of one focus document to a diagram
//! without touching anything already placed. New nodes go into the column one
//! `horizontal_spacing` left or right of the focus node and are packed around
//! the nodes already occupying that column.
//!
//! # Placement
//!
//! For every new document, in input order:
//!
//! 1. The ideal slot centers all new nodes on the focus node, `vertical_spacing`
//!    apart, exactly like a freshly laid out column.
//! 2. If the ideal slot conflicts with an occupant, the slot just above that
//!    occupant is tried, then the slot just below it.
//! 3. Otherwise the first gap between consecutive occupants that is tall
//!    enough receives the node, centered in the gap.
//! 4. Otherwise the node is appended below the lowest occupant.
//!
//! Two nodes conflict when their bounds, padded by [`VERTICAL_BUFFER`] above
//! and below, overlap vertically. A node occupies the target column when its
//! center is within `node_width + `[`COLUMN_TOLERANCE`] of the column, since
//! repeated expansions may leave columns slightly misaligned. Nodes placed
//! earlier in the same expansion occupy the column too, so a single expansion
//! never overlaps itself.

use std::{cmp::Ordering, collections::HashSet};

use chrono::{DateTime, Utc};
use log::{debug, info, trace};
use rand::Rng;

use linkmap_core::{
    canvas::{Diagram, DiagramEdge, DiagramNode},
    document::DocumentRef,
    geometry::{Bounds, Insets, Point, Size},
};

use crate::{config::LayoutConfig, index::LinkIndex, layout::placement::centered_offsets};

/// Extra horizontal distance, beyond one node width, within which a node
/// still counts as part of the target column.
pub const COLUMN_TOLERANCE: f32 = 100.0;

/// Padding added above and below every node when testing for conflicts.
pub const VERTICAL_BUFFER: f32 = 20.0;

/// The side of the focus node that receives new nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpandDirection {
    /// Backlinks, placed left of the focus node.
    Left,
    /// Forward links, placed right of the focus node.
    Right,
}

impl ExpandDirection {
    /// Both directions, left first.
    pub const ALL: [ExpandDirection; 2] = [ExpandDirection::Left, ExpandDirection::Right];

    /// Queries `index` for the links that grow a diagram in this direction.
    pub fn links(
        self,
        index: &(impl LinkIndex + ?Sized),
        document: &DocumentRef,
    ) -> Vec<DocumentRef> {
        match self {
            ExpandDirection::Left => index.backlinks(document),
            ExpandDirection::Right => index.forward_links(document),
        }
    }

    fn sign(self) -> f32 {
        match self {
            ExpandDirection::Left => -1.0,
            ExpandDirection::Right => 1.0,
        }
    }
}

/// Why an expansion had nothing to add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The focus document has no node in the diagram.
    FocusNotInDiagram,
    /// Every link is already shown in the diagram.
    NoNewLinks,
}

/// Nodes and edges to append to a diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramDelta {
    added_nodes: Vec<DiagramNode>,
    added_edges: Vec<DiagramEdge>,
}

impl DiagramDelta {
    pub fn added_nodes(&self) -> &[DiagramNode] {
        &self.added_nodes
    }

    pub fn added_edges(&self) -> &[DiagramEdge] {
        &self.added_edges
    }

    /// Appends the delta to `diagram` and stamps its modification time.
    pub fn merge_into(self, diagram: &mut Diagram, modified: DateTime<Utc>) {
        diagram.append(self.added_nodes, self.added_edges, modified);
    }
}

/// Result of a single expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpandOutcome {
    Expanded(DiagramDelta),
    NoOp(NoOpReason),
}

impl ExpandOutcome {
    /// Number of nodes the expansion adds.
    pub fn added_node_count(&self) -> usize {
        match self {
            ExpandOutcome::Expanded(delta) => delta.added_nodes().len(),
            ExpandOutcome::NoOp(_) => 0,
        }
    }
}

/// Computes expansions of existing diagrams.
pub struct DiagramExpander<'a> {
    config: &'a LayoutConfig,
}

impl<'a> DiagramExpander<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Computes the nodes and edges that show `new_links` next to `focus`.
    ///
    /// Links already shown in `diagram` are filtered out, as are repeated
    /// entries of `new_links`. The diagram itself is not modified; merge the
    /// returned delta with [`DiagramDelta::merge_into`].
    pub fn expand(
        &self,
        diagram: &Diagram,
        focus: &DocumentRef,
        direction: ExpandDirection,
        new_links: &[DocumentRef],
    ) -> ExpandOutcome {
        let Some(focus_node) = diagram.node_for_document(focus) else {
            info!(focus = focus.as_str(); "Focus document is not in the diagram");
            return ExpandOutcome::NoOp(NoOpReason::FocusNotInDiagram);
        };

        let mut seen = HashSet::new();
        let pending: Vec<&DocumentRef> = new_links
            .iter()
            .filter(|document| !diagram.contains_document(document) && seen.insert(*document))
            .collect();

        if pending.is_empty() {
            info!(focus = focus.as_str(), direction:?; "No new links to add");
            return ExpandOutcome::NoOp(NoOpReason::NoNewLinks);
        }

        let size = self.config.node_size();
        let spacing = self.config.vertical_spacing();
        let target_x = focus_node.x() + direction.sign() * self.config.horizontal_spacing();
        let mut column = Column::collect(
            diagram,
            target_x,
            self.config.node_width() + COLUMN_TOLERANCE,
        );
        let mut ids = IdAllocator::new(diagram);

        let ideal_ys = centered_offsets(focus_node.y(), pending.len(), spacing);
        let mut delta = DiagramDelta::default();

        for (document, ideal_y) in pending.into_iter().zip(ideal_ys) {
            let y = column.find_slot(ideal_y, size.height(), spacing);
            column.occupy(y, size.height());
            trace!(document = document.as_str(), ideal_y, y; "Placed expanded node");

            let node = DiagramNode::new(
                ids.next_id(),
                document.clone(),
                Point::new(target_x, y),
                size,
            );
            let (from, to) = match direction {
                ExpandDirection::Left => (node.id(), focus_node.id()),
                ExpandDirection::Right => (focus_node.id(), node.id()),
            };
            delta.added_edges.push(DiagramEdge::new(ids.next_id(), from, to));
            delta.added_nodes.push(node);
        }

        debug!(
            focus = focus.as_str(),
            direction:?,
            added = delta.added_nodes.len();
            "Expansion computed"
        );

        ExpandOutcome::Expanded(delta)
    }
}

/// A vertical extent occupied in the target column.
#[derive(Debug, Clone, Copy)]
struct Slot {
    y: f32,
    height: f32,
}

impl Slot {
    fn padded_bounds(self) -> Bounds {
        Point::new(0.0, self.y)
            .to_bounds(Size::new(0.0, self.height))
            .add_padding(Insets::vertical(VERTICAL_BUFFER))
    }

    fn top(self) -> f32 {
        self.y - self.height / 2.0
    }

    fn bottom(self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Occupants of the target column, kept sorted by y.
#[derive(Debug)]
struct Column {
    slots: Vec<Slot>,
}

impl Column {
    fn collect(diagram: &Diagram, target_x: f32, tolerance: f32) -> Self {
        let mut column = Self { slots: Vec::new() };
        for node in diagram.nodes() {
            if (node.x() - target_x).abs() <= tolerance {
                column.occupy(node.y(), node.height());
            }
        }
        column
    }

    fn occupy(&mut self, y: f32, height: f32) {
        let idx = self
            .slots
            .partition_point(|slot| slot.y.partial_cmp(&y) == Some(Ordering::Less));
        self.slots.insert(idx, Slot { y, height });
    }

    fn conflict(&self, y: f32, height: f32) -> Option<Slot> {
        let candidate = Slot { y, height }.padded_bounds();
        self.slots
            .iter()
            .copied()
            .find(|slot| slot.padded_bounds().overlaps_vertically(&candidate))
    }

    fn find_slot(&self, ideal_y: f32, height: f32, spacing: f32) -> f32 {
        let Some(blocker) = self.conflict(ideal_y, height) else {
            return ideal_y;
        };

        let above = blocker.y - height - spacing;
        if self.conflict(above, height).is_none() {
            return above;
        }

        let below = blocker.y + height + spacing;
        if self.conflict(below, height).is_none() {
            return below;
        }

        self.find_gap(height, spacing)
            .unwrap_or_else(|| self.append_below(height, spacing))
    }

    fn find_gap(&self, height: f32, spacing: f32) -> Option<f32> {
        self.slots.windows(2).find_map(|pair| {
            let (upper, lower) = (pair[0], pair[1]);
            let free = lower.top() - upper.bottom() - 2.0 * spacing;
            if free < height {
                return None;
            }
            let y = (upper.bottom() + lower.top()) / 2.0;
            self.conflict(y, height).is_none().then_some(y)
        })
    }

    fn append_below(&self, height: f32, spacing: f32) -> f32 {
        let step = height + spacing;
        let lowest = self
            .slots
            .iter()
            .map(|slot| slot.y)
            .fold(f32::NEG_INFINITY, f32::max);

        let mut y = lowest + step;
        while self.conflict(y, height).is_some() {
            y += step;
        }
        y
    }
}

/// Mints node and edge ids unused by a diagram.
struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    fn new(diagram: &Diagram) -> Self {
        let taken = diagram
            .nodes()
            .iter()
            .map(|node| node.id().to_string())
            .chain(diagram.edges().iter().map(|edge| edge.id().to_string()))
            .collect();
        Self { taken }
    }

    /// Returns a fresh id of 16 lowercase hex digits.
    fn next_id(&mut self) -> String {
        let mut rng = rand::rng();
        loop {
            let id = format!("{:016x}", rng.random::<u64>());
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }
}
