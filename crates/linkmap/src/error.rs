//! Error types for linkmap operations.
//!
//! This module provides the main error type [`LinkmapError`]. Operations that
//! simply have nothing to do are not errors; expansion reports them through
//! [`crate::ExpandOutcome::NoOp`].

use std::{io, path::PathBuf};

use thiserror::Error;

use linkmap_core::canvas::DiagramError;

/// The main error type for linkmap operations.
#[derive(Debug, Error)]
pub enum LinkmapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse diagram `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid diagram `{}`: {source}", path.display())]
    InvalidDiagram { path: PathBuf, source: DiagramError },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LinkmapError {
    /// Create a new `Parse` error for the diagram stored at `path`.
    pub fn new_parse_error(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
