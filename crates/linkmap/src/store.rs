//! Diagram persistence.
//!
//! [`DiagramStore`] is the seam between the layout engine and wherever
//! diagrams live. [`FsDiagramStore`] keeps them as pretty-printed JSON files
//! and replaces files atomically, so a crash mid-write never leaves a
//! truncated diagram behind.

use std::{fs, io::Write, path::Path};

use log::{debug, info};
use tempfile::NamedTempFile;

use linkmap_core::canvas::Diagram;

use crate::error::LinkmapError;

/// Reads and writes diagrams by path.
pub trait DiagramStore {
    /// Loads the diagram stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkmapError::NotFound`] if nothing is stored at `path`,
    /// [`LinkmapError::Parse`] if the content is not a diagram and
    /// [`LinkmapError::InvalidDiagram`] if it breaks diagram invariants.
    fn read(&self, path: &Path) -> Result<Diagram, LinkmapError>;

    /// Stores `diagram` at `path`, replacing any previous content.
    fn write(&self, path: &Path, diagram: &Diagram) -> Result<(), LinkmapError>;

    /// Returns `true` if a diagram is stored at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Serializes a diagram the way it is persisted: JSON with 2-space indentation.
pub fn to_json(diagram: &Diagram) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(diagram)
}

/// Parses a persisted diagram and checks its invariants.
///
/// `path` is only used for error reporting.
pub fn from_json(path: &Path, content: &str) -> Result<Diagram, LinkmapError> {
    let diagram: Diagram =
        serde_json::from_str(content).map_err(|err| LinkmapError::new_parse_error(path, err))?;
    diagram
        .validate()
        .map_err(|source| LinkmapError::InvalidDiagram {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(diagram)
}

/// A [`DiagramStore`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDiagramStore;

impl FsDiagramStore {
    pub fn new() -> Self {
        Self
    }
}

impl DiagramStore for FsDiagramStore {
    fn read(&self, path: &Path) -> Result<Diagram, LinkmapError> {
        if !path.exists() {
            return Err(LinkmapError::NotFound(format!(
                "diagram `{}`",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let diagram = from_json(path, &content)?;

        debug!(
            path = path.display().to_string(),
            nodes = diagram.nodes().len(),
            edges = diagram.edges().len();
            "Diagram loaded"
        );
        Ok(diagram)
    }

    fn write(&self, path: &Path, diagram: &Diagram) -> Result<(), LinkmapError> {
        let json = to_json(diagram).map_err(|err| LinkmapError::Io(err.into()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.persist(path).map_err(|err| LinkmapError::Io(err.error))?;

        info!(path = path.display().to_string(); "Diagram written");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use linkmap_core::{
        canvas::{DiagramEdge, DiagramNode},
        document::DocumentRef,
        geometry::{Point, Size},
    };

    use super::*;

    fn sample() -> Diagram {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut diagram = Diagram::new(ts);
        diagram.append(
            [
                DiagramNode::new(
                    "root",
                    DocumentRef::new("A.md"),
                    Point::new(1000.0, 600.0),
                    Size::new(250.0, 60.0),
                ),
                DiagramNode::new(
                    "n1",
                    DocumentRef::new("B.md"),
                    Point::new(1400.0, 600.0),
                    Size::new(250.0, 60.0),
                ),
            ],
            [DiagramEdge::new("e1", "root", "n1")],
            ts,
        );
        diagram
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/A_canvas.canvas");
        let store = FsDiagramStore::new();

        assert!(!store.exists(&path));
        store.write(&path, &sample()).unwrap();
        assert!(store.exists(&path));

        assert_eq!(store.read(&path).unwrap(), sample());
    }

    #[test]
    fn test_written_json_uses_two_space_indentation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("A_canvas.canvas");
        FsDiagramStore::new().write(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n  \"nodes\": [\n    {"));
        assert!(content.contains("\"fromNode\": \"root\""));
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("A_canvas.canvas");
        let store = FsDiagramStore::new();

        store.write(&path, &sample()).unwrap();
        let empty = Diagram::new(Utc.timestamp_opt(0, 0).unwrap());
        store.write(&path, &empty).unwrap();

        assert!(store.read(&path).unwrap().nodes().is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = FsDiagramStore::new()
            .read(&dir.path().join("missing.canvas"))
            .unwrap_err();
        assert!(matches!(err, LinkmapError::NotFound(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.canvas");
        fs::write(&path, "{ not json").unwrap();

        let err = FsDiagramStore::new().read(&path).unwrap_err();
        assert!(matches!(err, LinkmapError::Parse { .. }));
    }

    #[test]
    fn test_dangling_edge_is_invalid() {
        let json = r#"{
            "nodes": [],
            "edges": [{ "id": "e", "fromNode": "a", "fromSide": "right", "toNode": "b", "toSide": "left" }],
            "meta": { "created": "2024-01-01T00:00:00Z", "modified": "2024-01-01T00:00:00Z" }
        }"#;

        let err = from_json(Path::new("x.canvas"), json).unwrap_err();
        assert!(matches!(err, LinkmapError::InvalidDiagram { .. }));
    }
}
