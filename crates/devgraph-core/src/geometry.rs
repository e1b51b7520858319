//! Geometric primitives for device placement and arrow anchoring.
//!
//! This module provides the small set of geometric types used by devgraph
//! to position devices on the diagram area and to anchor arrow endpoints on
//! device borders.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`intersect_border`] - Where a ray from a box center leaves the box
//!
//! # Coordinate System
//!
//! devgraph uses the coordinate system of the rendering surface:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the diagram area at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use log::trace;

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use devgraph_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
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

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Offsets this point by a size, e.g. to go from a top-left corner to the
    /// bottom-right corner of a box.
    pub fn add_size(self, size: Size) -> Self {
        Self {
            x: self.x + size.width,
            y: self.y + size.height,
        }
    }

    /// Offsets this point backwards by a size
    pub fn sub_size(self, size: Size) -> Self {
        Self {
            x: self.x - size.width,
            y: self.y - size.height,
        }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
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

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Returns true if both width and height are strictly positive
    pub fn is_positive(self) -> bool {
        self.width > 0.0 && self.height > 0.0
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
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
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

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns true if `other` lies entirely inside these bounds (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// # use devgraph_core::geometry::{Bounds, Point, Size};
    /// let area = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
    /// let inside = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(90.0, 50.0));
    /// let overlapping = Bounds::new_from_top_left(Point::new(60.0, 10.0), Size::new(50.0, 50.0));
    ///
    /// assert!(area.contains_bounds(inside));
    /// assert!(!area.contains_bounds(overlapping));
    /// ```
    pub fn contains_bounds(self, other: Bounds) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Clamps a top-left position so that a box of `size` placed there stays
    /// inside these bounds. Boxes larger than the bounds are pinned to the
    /// minimum corner.
    pub fn clamp_top_left(self, top_left: Point, size: Size) -> Point {
        let max_x = (self.max_x - size.width).max(self.min_x);
        let max_y = (self.max_y - size.height).max(self.min_y);
        Point::new(
            top_left.x.clamp(self.min_x, max_x),
            top_left.y.clamp(self.min_y, max_y),
        )
    }
}

/// Sign of `value`, with zero mapping to zero.
///
/// [`f32::signum`] returns `1.0` for `+0.0`, which would push a degenerate
/// target (equal to the center) onto the border.
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Finds where the ray from `center` towards `target` leaves the rectangle
/// with the given half extents.
///
/// Vertical rays (`dx == 0`) exit straight through the top or bottom edge.
/// Otherwise the slope decides: when `|slope| * half_width >= half_height`
/// the ray exits through the top/bottom edge, else through the left/right
/// edge. Exact corner slopes resolve to the top/bottom edge.
///
/// A target equal to the center yields the center.
///
/// # Examples
///
/// ```
/// # use devgraph_core::geometry::{Point, intersect_border};
/// let center = Point::new(0.0, 0.0);
///
/// assert_eq!(intersect_border(center, 10.0, 10.0, Point::new(100.0, 0.0)), Point::new(10.0, 0.0));
/// assert_eq!(intersect_border(center, 10.0, 10.0, Point::new(0.0, 100.0)), Point::new(0.0, 10.0));
/// assert_eq!(intersect_border(center, 10.0, 10.0, Point::new(100.0, 100.0)), Point::new(10.0, 10.0));
/// ```
pub fn intersect_border(center: Point, half_width: f32, half_height: f32, target: Point) -> Point {
    let dx = target.x - center.x;
    let dy = target.y - center.y;

    if dx == 0.0 {
        return Point::new(center.x, center.y + sign(dy) * half_height);
    }

    let slope = dy / dx;
    let intersection = if slope.abs() * half_width >= half_height {
        // Top or bottom edge
        Point::new(
            center.x + sign(dy) * half_height / slope,
            center.y + sign(dy) * half_height,
        )
    } else {
        // Left or right edge
        Point::new(
            center.x + sign(dx) * half_width,
            center.y + sign(dx) * half_width * slope,
        )
    };

    trace!(
        dx = dx,
        dy = dy,
        x = intersection.x,
        y = intersection.y;
        "Computed border intersection"
    );

    intersection
}
