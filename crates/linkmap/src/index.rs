//! Link index abstraction and an in-memory implementation.
//!
//! The layout engine never resolves links itself. It asks a [`LinkIndex`]
//! which documents a document links to and which documents link to it. Hosts
//! implement the trait over whatever metadata cache they have;
//! [`MemoryLinkIndex`] is a ready-made implementation over a `petgraph`
//! directed graph.

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use linkmap_core::document::DocumentRef;

/// Read-only view of the links between documents.
///
/// Implementations must return only existing, resolvable documents; links to
/// missing documents are filtered here, never by the layout engine. An
/// unknown document simply has no links.
pub trait LinkIndex {
    /// Documents that `document` links to.
    fn forward_links(&self, document: &DocumentRef) -> Vec<DocumentRef>;

    /// Documents that link to `document`.
    fn backlinks(&self, document: &DocumentRef) -> Vec<DocumentRef>;

    /// Returns `true` if `document` exists in the index.
    fn contains(&self, document: &DocumentRef) -> bool;
}

impl<T: LinkIndex + ?Sized> LinkIndex for &T {
    fn forward_links(&self, document: &DocumentRef) -> Vec<DocumentRef> {
        (**self).forward_links(document)
    }

    fn backlinks(&self, document: &DocumentRef) -> Vec<DocumentRef> {
        (**self).backlinks(document)
    }

    fn contains(&self, document: &DocumentRef) -> bool {
        (**self).contains(document)
    }
}

/// A [`LinkIndex`] backed by an in-memory directed graph.
///
/// Links are reported in the order they were added. Adding the same link
/// twice has no effect.
///
/// # Examples
///
/// ```
/// use linkmap::{LinkIndex, MemoryLinkIndex};
/// use linkmap::document::DocumentRef;
///
/// let mut index = MemoryLinkIndex::new();
/// index.add_link("a.md", "b.md");
///
/// let a = DocumentRef::new("a.md");
/// let b = DocumentRef::new("b.md");
/// assert_eq!(index.forward_links(&a), vec![b.clone()]);
/// assert_eq!(index.backlinks(&b), vec![a]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryLinkIndex {
    graph: DiGraph<DocumentRef, ()>,
    indices: HashMap<DocumentRef, NodeIndex>,
}

impl MemoryLinkIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document, returning its graph index.
    ///
    /// Registering an existing document is a no-op.
    pub fn add_document(&mut self, document: impl Into<DocumentRef>) -> NodeIndex {
        let document = document.into();
        if let Some(&idx) = self.indices.get(&document) {
            return idx;
        }
        let idx = self.graph.add_node(document.clone());
        self.indices.insert(document, idx);
        idx
    }

    /// Records that `source` links to `target`, registering both documents.
    pub fn add_link(&mut self, source: impl Into<DocumentRef>, target: impl Into<DocumentRef>) {
        let source = self.add_document(source);
        let target = self.add_document(target);
        self.graph.update_edge(source, target, ());
    }

    /// Returns an iterator over all registered documents in registration order.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentRef> {
        self.graph.node_weights()
    }

    /// Returns the number of registered documents.
    pub fn document_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct links.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn neighbors(&self, document: &DocumentRef, direction: Direction) -> Vec<DocumentRef> {
        let Some(&idx) = self.indices.get(document) else {
            return Vec::new();
        };

        // petgraph walks adjacency lists newest-first; edge ids restore insertion order.
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|edge| edge.id());

        edges
            .into_iter()
            .map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                self.graph[other].clone()
            })
            .collect()
    }
}

impl LinkIndex for MemoryLinkIndex {
    fn forward_links(&self, document: &DocumentRef) -> Vec<DocumentRef> {
        self.neighbors(document, Direction::Outgoing)
    }

    fn backlinks(&self, document: &DocumentRef) -> Vec<DocumentRef> {
        self.neighbors(document, Direction::Incoming)
    }

    fn contains(&self, document: &DocumentRef) -> bool {
        self.indices.contains_key(document)
    }
}
