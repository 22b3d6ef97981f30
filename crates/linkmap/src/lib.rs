//! Linkmap - node-link canvases of a document's link neighborhood.
//!
//! Linkmap explores the documents linked from and to a seed document, lays
//! them out in deterministic columns (backlinks to the left, forward links to
//! the right) and later grows the resulting canvas one focus document at a
//! time without disturbing what is already placed.
//!
//! The pipeline for a fresh canvas is
//! [`GraphExplorer`] → [`layout::organize`] → [`LayoutPlacer`]; incremental
//! growth goes through [`DiagramExpander`]. [`CanvasBuilder`] wires these
//! together for hosts.

pub mod config;
pub mod expand;
pub mod explore;
pub mod index;
pub mod layout;
pub mod naming;
pub mod store;

mod error;

pub use linkmap_core::{canvas, document, geometry};

pub use error::LinkmapError;
pub use expand::{DiagramDelta, DiagramExpander, ExpandDirection, ExpandOutcome, NoOpReason};
pub use explore::{ConnectionSet, Exploration, GraphExplorer, GraphNode};
pub use index::{LinkIndex, MemoryLinkIndex};
pub use layout::{LayoutPlacer, SEED_NODE_ID};
pub use store::{DiagramStore, FsDiagramStore};

use std::path::Path;

use chrono::Utc;
use log::{debug, info, trace};

use canvas::{Diagram, DiagramNode};
use config::AppConfig;
use document::DocumentRef;

/// Builder for creating and growing link neighborhood canvases.
///
/// # Examples
///
/// ```rust
/// use linkmap::{CanvasBuilder, ExpandDirection, MemoryLinkIndex};
/// use linkmap::document::DocumentRef;
///
/// let mut index = MemoryLinkIndex::new();
/// index.add_link("A.md", "B.md");
/// index.add_link("B.md", "C.md");
///
/// let builder = CanvasBuilder::default();
/// let seed = DocumentRef::new("A.md");
///
/// // Build with the default exploration depth of two hops
/// let mut diagram = builder.build(&index, &seed).expect("Failed to build");
/// assert_eq!(diagram.nodes().len(), 3);
///
/// // Nothing new to the right of B: C is already shown
/// let added = builder
///     .expand(&mut diagram, &index, &DocumentRef::new("B.md"), ExpandDirection::Right)
///     .expect("Failed to expand");
/// assert_eq!(added, 0);
/// ```
#[derive(Debug, Default)]
pub struct CanvasBuilder {
    config: AppConfig,
}

impl CanvasBuilder {
    /// Create a new canvas builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration used by this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build a canvas of the link neighborhood of `seed` from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`LinkmapError::NotFound`] if `seed` is not in the index and
    /// [`LinkmapError::Config`] if the layout configuration is unusable.
    pub fn build(
        &self,
        index: &(impl LinkIndex + ?Sized),
        seed: &DocumentRef,
    ) -> Result<Diagram, LinkmapError> {
        self.validate()?;
        if !index.contains(seed) {
            return Err(LinkmapError::NotFound(format!("document `{seed}`")));
        }

        let max_depth = self.config.explore().max_depth();
        info!(seed = seed.as_str(), max_depth; "Building canvas");

        let exploration = GraphExplorer::new(index, max_depth).explore(seed);
        let (nodes, connections) = exploration.into_parts();

        let stack = layout::organize(seed, &nodes);
        debug!(layers = stack.layers().len(); "Layers organized");

        let diagram = LayoutPlacer::new(self.config.layout()).place(
            seed,
            &stack,
            &connections,
            Utc::now(),
        );
        trace!(diagram:?; "Built canvas");

        info!(
            nodes = diagram.nodes().len(),
            edges = diagram.edges().len();
            "Canvas built"
        );
        Ok(diagram)
    }

    /// Expand `diagram` in place with the links of `focus` in one direction.
    ///
    /// Backlinks are added for [`ExpandDirection::Left`], forward links for
    /// [`ExpandDirection::Right`]. Documents already shown are skipped, so
    /// repeating an expansion is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`LinkmapError::NotFound`] if `focus` is not in the index. A
    /// focus document without a node in the diagram adds nothing instead.
    ///
    /// Returns the number of nodes added.
    pub fn expand(
        &self,
        diagram: &mut Diagram,
        index: &(impl LinkIndex + ?Sized),
        focus: &DocumentRef,
        direction: ExpandDirection,
    ) -> Result<usize, LinkmapError> {
        self.validate()?;
        if !index.contains(focus) {
            return Err(LinkmapError::NotFound(format!("document `{focus}`")));
        }

        let links = direction.links(index, focus);
        let outcome =
            DiagramExpander::new(self.config.layout()).expand(diagram, focus, direction, &links);

        let delta = match outcome {
            ExpandOutcome::Expanded(delta) => delta,
            ExpandOutcome::NoOp(reason) => {
                info!(focus = focus.as_str(), direction:?, reason:?; "Nothing to expand");
                return Ok(0);
            }
        };

        let added = delta.added_nodes().len();
        delta.merge_into(diagram, Utc::now());
        info!(focus = focus.as_str(), direction:?, added; "Canvas expanded");
        Ok(added)
    }

    /// Grow `diagram` by one level in every direction.
    ///
    /// Every node present when the call starts is expanded left and right in
    /// turn, each expansion seeing the nodes added by the previous ones.
    /// Nodes whose document is unknown to the index are skipped.
    ///
    /// Returns the number of nodes added.
    pub fn grow(
        &self,
        diagram: &mut Diagram,
        index: &(impl LinkIndex + ?Sized),
    ) -> Result<usize, LinkmapError> {
        self.validate()?;

        let documents: Vec<DocumentRef> = diagram
            .nodes()
            .iter()
            .map(|node| node.document().clone())
            .filter(|document| index.contains(document))
            .collect();

        let mut added = 0;
        for document in &documents {
            for direction in ExpandDirection::ALL {
                added += self.expand(diagram, index, document, direction)?;
            }
        }

        info!(expanded = documents.len(), added; "Canvas grown by one level");
        Ok(added)
    }

    /// Expand the diagram stored at `path` and write it back.
    ///
    /// This is one read-modify-write transaction; callers must not run two
    /// of them against the same path concurrently. When `focus` is `None`,
    /// the focus document is recovered from the file name (see
    /// [`naming::source_name_for`]).
    ///
    /// Nothing is written when every direction is a no-op. Returns the number
    /// of nodes added.
    pub fn expand_stored(
        &self,
        store: &(impl DiagramStore + ?Sized),
        path: &Path,
        index: &(impl LinkIndex + ?Sized),
        focus: Option<&DocumentRef>,
        directions: &[ExpandDirection],
    ) -> Result<usize, LinkmapError> {
        let mut diagram = store.read(path)?;

        let focus = match focus {
            Some(focus) => focus.clone(),
            None => focus_from_path(&diagram, path)?,
        };

        let mut added = 0;
        for &direction in directions {
            added += self.expand(&mut diagram, index, &focus, direction)?;
        }

        if added > 0 {
            store.write(path, &diagram)?;
        } else {
            info!(path = path.display().to_string(); "Nothing to add, diagram left untouched");
        }
        Ok(added)
    }

    fn validate(&self) -> Result<(), LinkmapError> {
        self.config.layout().validate().map_err(LinkmapError::Config)
    }
}

/// Finds the node a canvas was built for from the canvas file name.
fn focus_from_path(diagram: &Diagram, path: &Path) -> Result<DocumentRef, LinkmapError> {
    let name = naming::source_name_for(path).ok_or_else(|| {
        LinkmapError::NotFound(format!(
            "source document name in `{}`; expected `<name>{}`",
            path.display(),
            naming::CANVAS_SUFFIX
        ))
    })?;

    let matches: Vec<&DiagramNode> = diagram
        .nodes()
        .iter()
        .filter(|node| node.document().display_name() == name)
        .collect();
    // Another folder may hold a document named like the seed
    matches
        .iter()
        .find(|node| node.id() == SEED_NODE_ID)
        .or(matches.first())
        .map(|node| node.document().clone())
        .ok_or_else(|| LinkmapError::NotFound(format!("node for document `{name}`")))
}
