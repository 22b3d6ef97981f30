//! Geometric primitives for canvas layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Canvases use a screen coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Node positions are the *center* of the node, so a node at `(x, y)` with
//! size `(w, h)` covers `x - w/2 ..= x + w/2` horizontally.

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use linkmap_core::geometry::Point;
/// let p = Point::new(10.0, 5.0);
/// assert_eq!(p.x(), 10.0);
/// assert_eq!(p.y(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Converts a point and size into a bounds rectangle centered on the point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Expands the bounds by adding insets.
    ///
    /// This decreases the minimum coordinates by left/top insets and increases
    /// the maximum coordinates by right/bottom insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Returns `true` if the vertical extents of both bounds overlap.
    ///
    /// Touching edges do not count as an overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// # use linkmap_core::geometry::{Bounds, Point, Size};
    /// let size = Size::new(100.0, 50.0);
    /// let a = Bounds::new_from_center(Point::new(0.0, 0.0), size);
    /// let b = Bounds::new_from_center(Point::new(500.0, 40.0), size);
    /// let c = Bounds::new_from_center(Point::new(0.0, 50.0), size);
    ///
    /// assert!(a.overlaps_vertically(&b));
    /// assert!(!a.overlaps_vertically(&c));
    /// ```
    pub fn overlaps_vertically(&self, other: &Self) -> bool {
        self.min_y < other.max_y && other.min_y < self.max_y
    }
}

/// Represents spacing around an element with potentially different values
/// for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates insets with individual values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates insets that only pad the top and bottom sides
    pub fn vertical(value: f32) -> Self {
        Self::new(value, 0.0, value, 0.0)
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_bounds_from_center() {
        let bounds = Point::new(100.0, 50.0).to_bounds(Size::new(40.0, 20.0));
        assert_approx_eq!(f32, bounds.min_x(), 80.0);
        assert_approx_eq!(f32, bounds.max_x(), 120.0);
        assert_approx_eq!(f32, bounds.min_y(), 40.0);
        assert_approx_eq!(f32, bounds.max_y(), 60.0);
    }

    #[test]
    fn test_vertical_padding_grows_height_only() {
        let bounds = Point::new(0.0, 0.0).to_bounds(Size::new(40.0, 20.0));
        let padded = bounds.add_padding(Insets::vertical(20.0));
        assert_approx_eq!(f32, padded.width(), 40.0);
        assert_approx_eq!(f32, padded.height(), 60.0);
    }

    #[test]
    fn test_overlap_ignores_horizontal_position() {
        let size = Size::new(10.0, 10.0);
        let a = Point::new(0.0, 0.0).to_bounds(size);
        let b = Point::new(1000.0, 5.0).to_bounds(size);
        assert!(a.overlaps_vertically(&b));
        assert!(b.overlaps_vertically(&a));
    }

    #[test]
    fn test_touching_bounds_do_not_overlap() {
        let size = Size::new(10.0, 10.0);
        let a = Point::new(0.0, 0.0).to_bounds(size);
        let b = Point::new(0.0, 10.0).to_bounds(size);
        assert!(!a.overlaps_vertically(&b));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Point::new(x, y).to_bounds(Size::new(w, h)))
    }

    /// Vertical overlap is symmetric.
    fn check_overlap_is_symmetric(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.overlaps_vertically(&b), b.overlaps_vertically(&a));
        Ok(())
    }

    /// Padding never turns an overlap into a non-overlap.
    fn check_padding_preserves_overlap(
        a: Bounds,
        b: Bounds,
        pad: f32,
    ) -> Result<(), TestCaseError> {
        if a.overlaps_vertically(&b) {
            let padded = a.add_padding(Insets::vertical(pad));
            prop_assert!(padded.overlaps_vertically(&b));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
            check_overlap_is_symmetric(a, b)?;
        }

        #[test]
        fn padding_preserves_overlap(a in bounds_strategy(), b in bounds_strategy(), pad in 0.0f32..100.0) {
            check_padding_preserves_overlap(a, b, pad)?;
        }
    }
}
