//! File naming convention linking documents to their canvases.
//!
//! The canvas of `notes/Rust.md` is stored next to it as
//! `notes/Rust_canvas.canvas`. When a canvas is expanded later without any
//! other metadata, the convention is read backwards to find the document the
//! canvas was built for.

use std::path::{Path, PathBuf};

use linkmap_core::document::DocumentRef;

/// Suffix appended to a document name to form its canvas name.
pub const CANVAS_SUFFIX: &str = "_canvas";

/// File extension of canvas files.
pub const CANVAS_EXTENSION: &str = "canvas";

/// Returns the canvas path for `document`, relative to the same root the
/// document identifier is relative to.
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use linkmap::{document::DocumentRef, naming::diagram_path_for};
/// let path = diagram_path_for(&DocumentRef::new("notes/Rust.md"));
/// assert_eq!(path, PathBuf::from("notes/Rust_canvas.canvas"));
/// ```
pub fn diagram_path_for(document: &DocumentRef) -> PathBuf {
    let file_name = format!(
        "{}{CANVAS_SUFFIX}.{CANVAS_EXTENSION}",
        document.display_name()
    );
    match Path::new(document.as_str()).parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Recovers the source document name from a canvas path.
///
/// Returns `None` if the file name does not follow the `<name>_canvas`
/// convention.
///
/// # Examples
///
/// ```
/// # use std::path::Path;
/// # use linkmap::naming::source_name_for;
/// assert_eq!(source_name_for(Path::new("notes/Rust_canvas.canvas")), Some("Rust"));
/// assert_eq!(source_name_for(Path::new("notes/Rust.canvas")), None);
/// ```
pub fn source_name_for(path: &Path) -> Option<&str> {
    path.file_stem()?
        .to_str()?
        .strip_suffix(CANVAS_SUFFIX)
        .filter(|name| !name.is_empty())
}
