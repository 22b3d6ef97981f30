//! Bounded bidirectional traversal of the link graph.
//!
//! [`GraphExplorer`] walks outwards from a seed document, following forward
//! links and backlinks up to a depth bound. It produces the set of reached
//! documents, each tagged with the depth at which it was first discovered and
//! the direction that discovered it, plus every link seen along the way.
//!
//! # Discovery rules
//!
//! - The walk is depth-first: a newly discovered document is expanded before
//!   its siblings.
//! - For every document, forward links are processed before backlinks. When
//!   both directions could reach the same document, the forward link wins.
//! - A document is expanded at most once. The visited set only grows and the
//!   depth is bounded, so cyclic link graphs always terminate.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use linkmap_core::document::DocumentRef;

use crate::index::LinkIndex;

/// A document reached by exploration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphNode {
    document: DocumentRef,
    level: usize,
    is_backlink: bool,
}

impl GraphNode {
    /// Creates a node discovered at `level` through a forward link or a backlink.
    pub fn new(document: DocumentRef, level: usize, is_backlink: bool) -> Self {
        Self {
            document,
            level,
            is_backlink,
        }
    }

    /// Creates the node for the seed document: level 0, not a backlink.
    pub fn seed(document: DocumentRef) -> Self {
        Self::new(document, 0, false)
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    /// Number of link hops between the seed and this document.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns `true` if the document was discovered by following a backlink.
    pub fn is_backlink(&self) -> bool {
        self.is_backlink
    }
}

/// Directed links between documents with set semantics.
///
/// A link always points from the linking document to the linked one, whether
/// it was discovered as a forward link or as a backlink. Self-links are never
/// stored and duplicates collapse. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSet {
    links: IndexMap<DocumentRef, IndexSet<DocumentRef>>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `source` links to `target`.
    ///
    /// Returns `false` if the link was a self-link or already present.
    pub fn insert(&mut self, source: DocumentRef, target: DocumentRef) -> bool {
        if source == target {
            return false;
        }
        self.links.entry(source).or_default().insert(target)
    }

    /// Returns `true` if `source` is recorded as linking to `target`.
    pub fn contains(&self, source: &DocumentRef, target: &DocumentRef) -> bool {
        self.links
            .get(source)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Returns the documents `source` links to.
    pub fn targets<'a>(
        &'a self,
        source: &DocumentRef,
    ) -> impl Iterator<Item = &'a DocumentRef> + use<'a> {
        self.links.get(source).into_iter().flatten()
    }

    /// Returns every `(source, target)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentRef, &DocumentRef)> {
        self.links
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |target| (source, target)))
    }

    /// Returns the number of distinct links.
    pub fn len(&self) -> usize {
        self.links.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The result of exploring the neighborhood of a seed document.
#[derive(Debug, Clone)]
pub struct Exploration {
    nodes: Vec<GraphNode>,
    connections: ConnectionSet,
}

impl Exploration {
    /// All reached documents in discovery order; the seed comes first.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Every link seen while exploring.
    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    /// Splits the exploration into its nodes and connections.
    pub fn into_parts(self) -> (Vec<GraphNode>, ConnectionSet) {
        (self.nodes, self.connections)
    }
}

/// Explores a [`LinkIndex`] from a seed document up to a depth bound.
pub struct GraphExplorer<'a, I: LinkIndex + ?Sized> {
    index: &'a I,
    max_depth: usize,
}

impl<'a, I: LinkIndex + ?Sized> GraphExplorer<'a, I> {
    /// Creates an explorer that follows links at most `max_depth` hops.
    pub fn new(index: &'a I, max_depth: usize) -> Self {
        Self { index, max_depth }
    }

    /// Explores the neighborhood of `seed`.
    ///
    /// The returned node list starts with the seed and never contains the
    /// same document twice.
    pub fn explore(&self, seed: &DocumentRef) -> Exploration {
        let mut walk = Walk {
            index: self.index,
            max_depth: self.max_depth,
            visited: HashSet::from([seed.clone()]),
            nodes: vec![GraphNode::seed(seed.clone())],
            connections: ConnectionSet::new(),
        };
        walk.visit(seed, 0);

        debug!(
            seed = seed.as_str(),
            max_depth = self.max_depth,
            nodes = walk.nodes.len(),
            connections = walk.connections.len();
            "Exploration finished"
        );

        Exploration {
            nodes: walk.nodes,
            connections: walk.connections,
        }
    }
}

/// Mutable state of a single exploration.
struct Walk<'a, I: LinkIndex + ?Sized> {
    index: &'a I,
    max_depth: usize,
    visited: HashSet<DocumentRef>,
    nodes: Vec<GraphNode>,
    connections: ConnectionSet,
}

impl<I: LinkIndex + ?Sized> Walk<'_, I> {
    fn visit(&mut self, document: &DocumentRef, depth: usize) {
        if depth >= self.max_depth {
            return;
        }

        for target in self.index.forward_links(document) {
            self.connections.insert(document.clone(), target.clone());
            self.discover(target, depth + 1, false);
        }

        for source in self.index.backlinks(document) {
            self.connections.insert(source.clone(), document.clone());
            self.discover(source, depth + 1, true);
        }
    }

    fn discover(&mut self, document: DocumentRef, level: usize, is_backlink: bool) {
        if !self.visited.insert(document.clone()) {
            return;
        }

        trace!(document = document.as_str(), level, is_backlink; "Discovered document");
        self.nodes.push(GraphNode::new(document.clone(), level, is_backlink));
        self.visit(&document, level);
    }
}

#[cfg(test)]
mod tests {
    use crate::index::MemoryLinkIndex;

    use super::*;

    fn doc(id: &str) -> DocumentRef {
        DocumentRef::new(id)
    }

    fn explore(index: &MemoryLinkIndex, seed: &str, max_depth: usize) -> Exploration {
        GraphExplorer::new(index, max_depth).explore(&doc(seed))
    }

    #[test]
    fn test_single_forward_link() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("A", "B");

        let exploration = explore(&index, "A", 1);

        assert_eq!(
            exploration.nodes(),
            &[
                GraphNode::new(doc("A"), 0, false),
                GraphNode::new(doc("B"), 1, false),
            ]
        );
        assert_eq!(exploration.connections().len(), 1);
        assert!(exploration.connections().contains(&doc("A"), &doc("B")));
    }

    #[test]
    fn test_depth_zero_yields_only_seed() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("A", "B");
        index.add_link("C", "A");

        let exploration = explore(&index, "A", 0);

        assert_eq!(exploration.nodes(), &[GraphNode::seed(doc("A"))]);
        assert!(exploration.connections().is_empty());
    }

    #[test]
    fn test_backlink_edges_point_to_linked_document() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("C", "A");

        let exploration = explore(&index, "A", 1);

        assert_eq!(exploration.nodes()[1], GraphNode::new(doc("C"), 1, true));
        assert!(exploration.connections().contains(&doc("C"), &doc("A")));
        assert!(!exploration.connections().contains(&doc("A"), &doc("C")));
    }

    #[test]
    fn test_forward_link_wins_on_mutual_links() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("A", "B");
        index.add_link("B", "A");

        let exploration = explore(&index, "A", 2);

        assert_eq!(exploration.nodes().len(), 2);
        assert_eq!(exploration.nodes()[1], GraphNode::new(doc("B"), 1, false));
        assert!(exploration.connections().contains(&doc("A"), &doc("B")));
        assert!(exploration.connections().contains(&doc("B"), &doc("A")));
    }

    #[test]
    fn test_traversal_is_depth_first() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("A", "B");
        index.add_link("A", "C");
        index.add_link("B", "C");

        let exploration = explore(&index, "A", 2);

        // C is reached through B before A's own link to C is processed.
        assert_eq!(
            exploration.nodes(),
            &[
                GraphNode::seed(doc("A")),
                GraphNode::new(doc("B"), 1, false),
                GraphNode::new(doc("C"), 2, false),
            ]
        );
        assert_eq!(exploration.connections().len(), 3);
    }

    #[test]
    fn test_cycles_terminate() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("A", "B");
        index.add_link("B", "C");
        index.add_link("C", "A");

        let exploration = explore(&index, "A", 10);

        assert_eq!(exploration.nodes().len(), 3);
        assert_eq!(exploration.connections().len(), 3);
    }

    #[test]
    fn test_self_links_are_not_recorded() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("A", "A");
        index.add_link("A", "B");

        let exploration = explore(&index, "A", 1);

        assert_eq!(exploration.nodes().len(), 2);
        assert!(!exploration.connections().contains(&doc("A"), &doc("A")));
    }

    #[test]
    fn test_edges_to_frontier_are_recorded() {
        let mut index = MemoryLinkIndex::new();
        index.add_link("A", "B");
        index.add_link("B", "C");

        let exploration = explore(&index, "A", 1);

        // B is at the depth bound, so its own links are never queried.
        assert_eq!(exploration.nodes().len(), 2);
        assert!(!exploration.connections().contains(&doc("B"), &doc("C")));
    }

    #[test]
    fn test_unknown_seed_yields_only_seed() {
        let index = MemoryLinkIndex::new();
        let exploration = explore(&index, "ghost", 3);
        assert_eq!(exploration.nodes(), &[GraphNode::seed(doc("ghost"))]);
    }

    #[test]
    fn test_connection_set_semantics() {
        let mut set = ConnectionSet::new();
        assert!(set.insert(doc("a"), doc("b")));
        assert!(!set.insert(doc("a"), doc("b")));
        assert!(!set.insert(doc("a"), doc("a")));
        assert!(set.insert(doc("a"), doc("c")));

        assert_eq!(set.len(), 2);
        assert_eq!(set.targets(&doc("a")).collect::<Vec<_>>(), vec![&doc("b"), &doc("c")]);
        assert_eq!(set.targets(&doc("z")).count(), 0);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![(&doc("a"), &doc("b")), (&doc("a"), &doc("c"))]
        );
    }
}
