//! Linkmap Core Types
//!
//! This crate provides the foundational types shared by the linkmap layout
//! engine and its hosts:
//!
//! - **Documents**: Opaque document identifiers ([`document::DocumentRef`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Canvas**: The persisted node-link diagram ([`canvas`] module)

pub mod canvas;
pub mod document;
pub mod geometry;
