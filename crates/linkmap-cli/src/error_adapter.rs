//! Error adapter for converting LinkmapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use linkmap::LinkmapError;

/// Adapter rendering a [`LinkmapError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a LinkmapError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            LinkmapError::Io(_) => "linkmap::io",
            LinkmapError::Parse { .. } => "linkmap::parse",
            LinkmapError::InvalidDiagram { .. } => "linkmap::invalid_diagram",
            LinkmapError::NotFound(_) => "linkmap::not_found",
            LinkmapError::Config(_) => "linkmap::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            LinkmapError::Parse { .. } | LinkmapError::InvalidDiagram { .. } => {
                "the canvas file may have been edited by hand; rebuild it with `linkmap build`"
            }
            LinkmapError::NotFound(_) => {
                "documents are named by vault-relative path (`notes/Topic.md`) or by a unique file name (`Topic`)"
            }
            LinkmapError::Io(_) | LinkmapError::Config(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
