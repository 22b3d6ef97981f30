//! Configuration types for canvas building.
//!
//! All types implement [`serde::Deserialize`] with per-field defaults, so a
//! configuration file only needs to mention the values it overrides.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and exploration settings.
//! - [`LayoutConfig`] - Canvas size, node size and spacing used for placement and expansion.
//! - [`ExploreConfig`] - How far the link neighborhood is explored.
//!
//! # Example
//!
//! ```
//! # use linkmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.explore().max_depth(), 2);
//! assert!(config.layout().validate().is_ok());
//! ```

use serde::Deserialize;

use linkmap_core::geometry::{Point, Size};

/// Top-level configuration combining layout and exploration settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Exploration configuration section.
    #[serde(default)]
    explore: ExploreConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, explore: ExploreConfig) -> Self {
        Self { layout, explore }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the exploration configuration.
    pub fn explore(&self) -> &ExploreConfig {
        &self.explore
    }
}

/// Geometry of a canvas: its nominal size, the size of every node and the
/// distances between columns and rows.
///
/// `horizontal_spacing` is the distance between the centers of adjacent
/// columns. `vertical_spacing` is the distance between the centers of
/// adjacent nodes inside a freshly laid out column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    canvas_width: f32,
    canvas_height: f32,
    node_width: f32,
    node_height: f32,
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 2000.0,
            canvas_height: 1200.0,
            node_width: 250.0,
            node_height: 60.0,
            horizontal_spacing: 400.0,
            vertical_spacing: 100.0,
        }
    }
}

impl LayoutConfig {
    /// Sets the nominal canvas size.
    pub fn with_canvas_size(mut self, width: f32, height: f32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Sets the size given to every node.
    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Sets the distance between column centers.
    pub fn with_horizontal_spacing(mut self, spacing: f32) -> Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Sets the distance between node centers within a column.
    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas_height
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    /// Returns the size given to every node.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Returns the center of the canvas, where the seed node is placed.
    pub fn canvas_center(&self) -> Point {
        Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }

    /// Checks that every dimension is a finite, usable value.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("horizontal_spacing", self.horizontal_spacing),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("`{name}` must be a positive number, got {value}"));
            }
        }

        let non_negative = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("vertical_spacing", self.vertical_spacing),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("`{name}` must not be negative, got {value}"));
            }
        }

        Ok(())
    }
}

/// Controls the bounded traversal of the link graph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    max_depth: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self { max_depth: 2 }
    }
}

impl ExploreConfig {
    /// Creates an exploration config with the given depth bound.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Returns how many link hops away from the seed are explored.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
