//! The persisted canvas model.
//!
//! A [`Diagram`] is what an external viewer renders: positioned
//! [`DiagramNode`]s, each showing one document, and [`DiagramEdge`]s joining
//! them by node id. The serde representation of these types *is* the on-disk
//! JSON format, so field names follow the viewer's camelCase convention.
//!
//! Diagrams only ever grow. Nodes and edges are appended through
//! [`Diagram::append`]; nothing in this crate removes them.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    document::DocumentRef,
    geometry::{Point, Size},
};

/// The side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
    Left,
}

/// A positioned node showing a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    id: String,
    document: DocumentRef,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl DiagramNode {
    /// Creates a node centered on `center`.
    pub fn new(id: impl Into<String>, document: DocumentRef, center: Point, size: Size) -> Self {
        Self {
            id: id.into(),
            document,
            x: center.x(),
            y: center.y(),
            width: size.width(),
            height: size.height(),
        }
    }

    /// Returns the node id, unique within its diagram.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the document shown by this node.
    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

/// A directed connection between two nodes.
///
/// Edges are drawn left to right: they leave the source from its right side
/// and enter the target from its left side, whatever the logical direction of
/// the link they represent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEdge {
    id: String,
    from_node: String,
    from_side: Side,
    to_node: String,
    to_side: Side,
}

impl DiagramEdge {
    /// Creates an edge from the right side of `from_node` to the left side of `to_node`.
    pub fn new(
        id: impl Into<String>,
        from_node: impl Into<String>,
        to_node: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_node: from_node.into(),
            from_side: Side::Right,
            to_node: to_node.into(),
            to_side: Side::Left,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the source node.
    pub fn from_node(&self) -> &str {
        &self.from_node
    }

    pub fn from_side(&self) -> Side {
        self.from_side
    }

    /// Returns the id of the target node.
    pub fn to_node(&self) -> &str {
        &self.to_node
    }

    pub fn to_side(&self) -> Side {
        self.to_side
    }
}

/// Creation and modification timestamps of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramMeta {
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl DiagramMeta {
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}

/// Structural problems found by [`Diagram::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    #[error("document `{0}` appears in more than one node")]
    DuplicateDocument(DocumentRef),

    #[error("edge `{edge}` refers to missing node `{node}`")]
    DanglingEdge { edge: String, node: String },
}

/// A persisted node-link canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    nodes: Vec<DiagramNode>,
    #[serde(default)]
    edges: Vec<DiagramEdge>,
    meta: DiagramMeta,
}

impl Diagram {
    /// Creates an empty diagram created and modified at `timestamp`.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            meta: DiagramMeta {
                created: timestamp,
                modified: timestamp,
            },
        }
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn meta(&self) -> &DiagramMeta {
        &self.meta
    }

    /// Returns the node showing `document`, if any.
    pub fn node_for_document(&self, document: &DocumentRef) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.document() == document)
    }

    /// Returns `true` if some node already shows `document`.
    pub fn contains_document(&self, document: &DocumentRef) -> bool {
        self.node_for_document(document).is_some()
    }

    /// Returns the node with the given id, if any.
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Appends nodes and edges and stamps the modification time.
    ///
    /// The caller is responsible for keeping the diagram invariants; use
    /// [`Diagram::validate`] to check them.
    pub fn append(
        &mut self,
        nodes: impl IntoIterator<Item = DiagramNode>,
        edges: impl IntoIterator<Item = DiagramEdge>,
        modified: DateTime<Utc>,
    ) {
        self.nodes.extend(nodes);
        self.edges.extend(edges);
        self.meta.modified = modified;
    }

    /// Checks node id uniqueness, document uniqueness and edge endpoints.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`DiagramError`].
    pub fn validate(&self) -> Result<(), DiagramError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        let mut documents = HashSet::with_capacity(self.nodes.len());

        for node in &self.nodes {
            if !ids.insert(node.id()) {
                return Err(DiagramError::DuplicateNodeId(node.id().to_string()));
            }
            if !documents.insert(node.document()) {
                return Err(DiagramError::DuplicateDocument(node.document().clone()));
            }
        }

        for edge in &self.edges {
            for endpoint in [edge.from_node(), edge.to_node()] {
                if !ids.contains(endpoint) {
                    return Err(DiagramError::DanglingEdge {
                        edge: edge.id().to_string(),
                        node: endpoint.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn timestamp(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn node(id: &str, doc: &str, y: f32) -> DiagramNode {
        DiagramNode::new(
            id,
            DocumentRef::new(doc),
            Point::new(0.0, y),
            Size::new(100.0, 40.0),
        )
    }

    #[test]
    fn test_edge_is_drawn_left_to_right() {
        let edge = DiagramEdge::new("e", "a", "b");
        assert_eq!(edge.from_side(), Side::Right);
        assert_eq!(edge.to_side(), Side::Left);
    }

    #[test]
    fn test_only_horizontal_sides_are_accepted() {
        assert_eq!(serde_json::from_str::<Side>(r#""left""#).unwrap(), Side::Left);
        assert!(serde_json::from_str::<Side>(r#""top""#).is_err());
    }

    #[test]
    fn test_append_updates_modified_only() {
        let mut diagram = Diagram::new(timestamp(10));
        diagram.append(
            [node("a", "a.md", 0.0), node("b", "b.md", 100.0)],
            [DiagramEdge::new("e", "a", "b")],
            timestamp(20),
        );

        assert_eq!(diagram.nodes().len(), 2);
        assert_eq!(diagram.edges().len(), 1);
        assert_eq!(diagram.meta().created(), timestamp(10));
        assert_eq!(diagram.meta().modified(), timestamp(20));
        assert!(diagram.validate().is_ok());
    }

    #[test]
    fn test_lookup_by_document_and_id() {
        let mut diagram = Diagram::new(timestamp(0));
        diagram.append([node("a", "a.md", 0.0)], [], timestamp(0));

        assert!(diagram.contains_document(&DocumentRef::new("a.md")));
        assert!(!diagram.contains_document(&DocumentRef::new("b.md")));
        assert_eq!(diagram.node("a").map(DiagramNode::id), Some("a"));
        assert!(diagram.node("missing").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_documents() {
        let mut diagram = Diagram::new(timestamp(0));
        diagram.append([node("a", "x.md", 0.0), node("b", "x.md", 50.0)], [], timestamp(0));

        assert_eq!(
            diagram.validate(),
            Err(DiagramError::DuplicateDocument(DocumentRef::new("x.md")))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut diagram = Diagram::new(timestamp(0));
        diagram.append([node("a", "x.md", 0.0), node("a", "y.md", 50.0)], [], timestamp(0));

        assert_eq!(
            diagram.validate(),
            Err(DiagramError::DuplicateNodeId("a".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_dangling_edges() {
        let mut diagram = Diagram::new(timestamp(0));
        diagram.append(
            [node("a", "x.md", 0.0)],
            [DiagramEdge::new("e", "a", "ghost")],
            timestamp(0),
        );

        assert_eq!(
            diagram.validate(),
            Err(DiagramError::DanglingEdge {
                edge: "e".to_string(),
                node: "ghost".to_string(),
            })
        );
    }

    #[test]
    fn test_json_shape_matches_viewer_format() {
        let mut diagram = Diagram::new(timestamp(0));
        diagram.append(
            [node("a", "a.md", 0.0), node("b", "b.md", 50.0)],
            [DiagramEdge::new("e", "a", "b")],
            timestamp(60),
        );

        let value = serde_json::to_value(&diagram).unwrap();
        assert_eq!(value["nodes"][0]["document"], "a.md");
        assert_eq!(value["nodes"][1]["y"], 50.0);
        assert_eq!(value["edges"][0]["fromNode"], "a");
        assert_eq!(value["edges"][0]["fromSide"], "right");
        assert_eq!(value["edges"][0]["toNode"], "b");
        assert_eq!(value["edges"][0]["toSide"], "left");
        assert_eq!(value["meta"]["created"], "1970-01-01T00:00:00Z");
        assert_eq!(value["meta"]["modified"], "1970-01-01T00:01:00Z");
    }

    #[test]
    fn test_json_roundtrip_preserves_nodes_and_edges() {
        let mut diagram = Diagram::new(timestamp(1_700_000_000));
        diagram.append(
            [node("a", "dir/a.md", -12.5), node("b", "b.md", 300.0)],
            [DiagramEdge::new("e1", "b", "a")],
            timestamp(1_700_000_100),
        );

        let json = serde_json::to_string_pretty(&diagram).unwrap();
        let parsed: Diagram = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, diagram);
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let json = r#"{ "meta": { "created": "2024-01-01T00:00:00Z", "modified": "2024-01-01T00:00:00Z" } }"#;
        let diagram: Diagram = serde_json::from_str(json).unwrap();
        assert!(diagram.nodes().is_empty());
        assert!(diagram.edges().is_empty());
    }
}
