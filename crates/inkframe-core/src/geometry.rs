//! Geometric primitives for scene compilation.
//!
//! This module provides the fundamental geometric types used throughout inkframe
//! for positioning primitives, measuring composites and routing connectors.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or offset) in scene space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! inkframe uses the same coordinate system as SVG and Excalidraw:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Bounded shapes are positioned by their top-left corner. Paths (lines,
//! arrows, freehand strokes) are positioned by their origin and carry their
//! vertices as offsets from that origin.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, ErrorKind};

/// A 2D point representing a position or an offset in scene space.
///
/// Serialised as a two-element array `[x, y]`, the form path vertices take in
/// the frame IR and in compiled scenes.
///
/// # Examples
///
/// ```
/// # use inkframe_core::geometry::Point;
/// let origin = Point::new(100.0, 50.0);
/// let offset = Point::new(10.0, -5.0);
///
/// let moved = origin.add_point(offset);
/// assert_eq!(moved.x(), 110.0);
/// assert_eq!(moved.y(), 45.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
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

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
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

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Returns a new point with absolute values of both coordinates
    pub fn abs(self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
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

    /// Returns true if either dimension is zero
    pub fn is_degenerate(self) -> bool {
        self.width == 0.0 || self.height == 0.0
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

    /// Computes the tightest bounds enclosing `origin + offset` for every offset.
    ///
    /// An empty offset list yields a zero-sized bounds at `origin`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inkframe_core::geometry::{Bounds, Point};
    /// let offsets = [Point::new(0.0, 0.0), Point::new(-20.0, 30.0), Point::new(40.0, 10.0)];
    /// let bounds = Bounds::from_offsets(Point::new(100.0, 100.0), &offsets);
    ///
    /// assert_eq!(bounds.min_x(), 80.0);
    /// assert_eq!(bounds.max_x(), 140.0);
    /// assert_eq!(bounds.height(), 30.0);
    /// ```
    pub fn from_offsets(origin: Point, offsets: &[Point]) -> Self {
        let mut bounds = Self::new_from_top_left(origin, Size::default());
        for offset in offsets {
            let p = origin.add_point(*offset);
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        bounds
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

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inkframe_core::geometry::{Bounds, Point, Size};
    /// let lid = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let body = Bounds::new_from_top_left(Point::new(0.0, 15.0), Size::new(100.0, 80.0));
    ///
    /// let silhouette = lid.merge(&body);
    /// assert_eq!(silhouette.min_y(), 0.0);
    /// assert_eq!(silhouette.height(), 95.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}

/// Ensures that every coordinate is finite.
///
/// `what` names the offending input in the error detail.
pub fn ensure_finite(what: &str, values: &[f32]) -> Result<(), CompileError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(CompileError::new(
            ErrorKind::MalformedGeometry,
            format!("{what} has a non-finite coordinate"),
        ))
    }
}

/// Ensures that a size is finite and non-negative.
pub fn ensure_size(what: &str, size: Size) -> Result<(), CompileError> {
    ensure_finite(what, &[size.width, size.height])?;
    if size.width < 0.0 || size.height < 0.0 {
        return Err(CompileError::new(
            ErrorKind::MalformedGeometry,
            format!(
                "{what} has a negative size ({} x {})",
                size.width, size.height
            ),
        ));
    }
    Ok(())
}
