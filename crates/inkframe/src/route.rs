//! The connector router.
//!
//! # Overview
//!
//! A connector between two placed elements leaves its source through the side
//! facing the target and enters the target through the opposite side:
//!
//! 1. Compare the centres of both elements. The axis with the larger
//!    separation is the dominant axis; near ties (within the relative
//!    tolerance) go horizontal, following the left-to-right convention.
//! 2. Exit through the side facing the target along that axis, enter through
//!    the opposite side. Anchors are side midpoints.
//! 3. Connect the anchors with a direct segment, or with a Manhattan path
//!    that bends twice at the midline of the dominant axis.
//!
//! Elements are looked up in an [`ElementIndex`]. A composite's request id
//! resolves to the bounds of its whole silhouette; ids of single parts
//! resolve to the part.

use std::collections::HashMap;

use log::debug;

use inkframe_core::{
    error::{CompileError, ErrorKind},
    geometry::{Bounds, Point},
    primitive::{Primitive, Side},
};

use crate::config::RoutingConfig;

/// Axis along which two elements are mostly separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Picks the dominant axis of the separation `delta`.
    ///
    /// `| |dx| - |dy| | <= tolerance * max(|dx|, |dy|)` is a tie and routes
    /// horizontally.
    pub fn dominant(delta: Point, tolerance: f32) -> Self {
        let distance = delta.abs();
        let larger = distance.x().max(distance.y());
        if (distance.x() - distance.y()).abs() <= tolerance * larger || distance.x() > distance.y() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

/// Bounds of every placed element, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    elements: HashMap<String, Bounds>,
    groups: HashMap<String, Bounds>,
}

impl ElementIndex {
    /// Indexes placed elements.
    ///
    /// # Errors
    ///
    /// Returns `MalformedGeometry` if any element has non-finite geometry.
    pub fn from_elements<'a, S: 'a>(
        elements: impl IntoIterator<Item = &'a Primitive<S>>,
    ) -> Result<Self, CompileError> {
        let mut index = Self::default();
        for element in elements {
            let bounds = element.bounds()?;
            index.elements.insert(element.id().to_string(), bounds);
            if let Some(group) = element.group_id() {
                index
                    .groups
                    .entry(group.to_string())
                    .and_modify(|union| *union = union.merge(&bounds))
                    .or_insert(bounds);
            }
        }
        Ok(index)
    }

    /// Returns the bounds an id resolves to.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` if no placed element has that id.
    pub fn lookup(&self, id: &str) -> Result<Bounds, CompileError> {
        self.groups
            .get(id)
            .or_else(|| self.elements.get(id))
            .copied()
            .ok_or_else(|| {
                CompileError::new(
                    ErrorKind::UnresolvedReference,
                    format!("no element with id `{id}` has been placed"),
                )
            })
    }
}

/// A routed connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    start: Point,
    start_side: Side,
    end: Point,
    end_side: Side,
    points: Vec<Point>,
}

impl Route {
    /// Returns the anchor on the source element; the path origin.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Returns the side of the source element the connector leaves through.
    pub fn start_side(&self) -> Side {
        self.start_side
    }

    /// Returns the anchor on the target element.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Returns the side of the target element the connector enters through.
    pub fn end_side(&self) -> Side {
        self.end_side
    }

    /// Returns the path as offsets from [`Route::start`], starting at (0, 0).
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Computes anchors and paths for connectors.
#[derive(Debug, Clone, Copy)]
pub struct Router {
    tie_tolerance: f32,
}

impl Router {
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            tie_tolerance: config.tie_tolerance(),
        }
    }

    /// Routes a connector between two placed elements.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedReference` if either id is not in `index`.
    pub fn route(
        &self,
        index: &ElementIndex,
        from: &str,
        to: &str,
        elbowed: bool,
    ) -> Result<Route, CompileError> {
        let source = index.lookup(from)?;
        let target = index.lookup(to)?;
        let route = self.route_between(source, target, elbowed);
        debug!(
            from,
            to,
            start_side = route.start_side.to_string(),
            end_side = route.end_side.to_string(),
            elbowed;
            "Routed connector"
        );
        Ok(route)
    }

    /// Routes a connector between two boxes.
    pub fn route_between(&self, source: Bounds, target: Bounds, elbowed: bool) -> Route {
        let delta = target.center().sub_point(source.center());
        let axis = Axis::dominant(delta, self.tie_tolerance);

        let start_side = match axis {
            Axis::Horizontal if delta.x() >= 0.0 => Side::Right,
            Axis::Horizontal => Side::Left,
            Axis::Vertical if delta.y() >= 0.0 => Side::Bottom,
            Axis::Vertical => Side::Top,
        };
        let end_side = start_side.opposite();

        let start = start_side.anchor_on(source);
        let end = end_side.anchor_on(target);
        let offset = end.sub_point(start);

        let points = if elbowed {
            elbow(offset, axis)
        } else {
            vec![Point::default(), offset]
        };

        Route {
            start,
            start_side,
            end,
            end_side,
            points,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(&RoutingConfig::default())
    }
}

/// Manhattan path from (0, 0) to `offset` that departs and arrives along
/// `axis`, bending at the midline between the anchors.
fn elbow(offset: Point, axis: Axis) -> Vec<Point> {
    let (dx, dy) = (offset.x(), offset.y());
    let path = match axis {
        Axis::Horizontal => {
            let mx = dx / 2.0;
            [
                Point::default(),
                Point::new(mx, 0.0),
                Point::new(mx, dy),
                offset,
            ]
        }
        Axis::Vertical => {
            let my = dy / 2.0;
            [
                Point::default(),
                Point::new(0.0, my),
                Point::new(dx, my),
                offset,
            ]
        }
    };

    let mut points: Vec<Point> = Vec::with_capacity(path.len());
    for point in path {
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use inkframe_core::{
        geometry::Size,
        primitive::{Draft, PrimitiveKind},
    };

    use super::*;

    fn rect(x: f32, y: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(100.0, 50.0))
    }

    #[test]
    fn test_left_to_right_scenario() {
        let route = Router::default().route_between(rect(100.0, 100.0), rect(500.0, 100.0), false);

        assert_eq!(route.start_side(), Side::Right);
        assert_eq!(route.end_side(), Side::Left);
        assert_eq!(route.start(), Point::new(200.0, 125.0));
        assert_eq!(route.end(), Point::new(500.0, 125.0));
        assert_eq!(route.points(), &[Point::new(0.0, 0.0), Point::new(300.0, 0.0)]);
    }

    #[test]
    fn test_vertical_separation_uses_top_and_bottom() {
        let router = Router::default();

        let down = router.route_between(rect(0.0, 0.0), rect(20.0, 300.0), false);
        assert_eq!((down.start_side(), down.end_side()), (Side::Bottom, Side::Top));

        let up = router.route_between(rect(0.0, 300.0), rect(20.0, 0.0), false);
        assert_eq!((up.start_side(), up.end_side()), (Side::Top, Side::Bottom));
    }

    #[test]
    fn test_right_to_left() {
        let route = Router::default().route_between(rect(500.0, 0.0), rect(0.0, 40.0), false);
        assert_eq!((route.start_side(), route.end_side()), (Side::Left, Side::Right));
    }

    #[test]
    fn test_near_tie_prefers_horizontal() {
        // Centres 200 apart horizontally and 205 apart vertically.
        let route = Router::default().route_between(rect(0.0, 0.0), rect(200.0, 205.0), false);
        assert_eq!(route.start_side(), Side::Right);

        let strict = Router::new(&RoutingConfig::new(0.0).unwrap());
        let route = strict.route_between(rect(0.0, 0.0), rect(200.0, 205.0), false);
        assert_eq!(route.start_side(), Side::Bottom);
    }

    #[test]
    fn test_coincident_centres_route_right_to_left() {
        let route = Router::default().route_between(rect(0.0, 0.0), rect(0.0, 0.0), false);
        assert_eq!((route.start_side(), route.end_side()), (Side::Right, Side::Left));
    }

    #[test]
    fn test_elbowed_horizontal_path() {
        let route = Router::default().route_between(rect(0.0, 0.0), rect(400.0, 100.0), true);

        assert_eq!(
            route.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(150.0, 0.0),
                Point::new(150.0, 100.0),
                Point::new(300.0, 100.0),
            ]
        );
    }

    #[test]
    fn test_elbowed_vertical_path() {
        let route = Router::default().route_between(rect(0.0, 0.0), rect(60.0, 400.0), true);
        let points = route.points();

        assert_eq!(points.len(), 4);
        // Leaves straight down and arrives straight down.
        assert_approx_eq!(f32, points[1].x(), 0.0);
        assert_approx_eq!(f32, points[2].y(), points[1].y());
        assert_approx_eq!(f32, points[3].x(), points[2].x());
    }

    #[test]
    fn test_elbowed_aligned_path_has_no_duplicate_points() {
        let route = Router::default().route_between(rect(0.0, 0.0), rect(400.0, 0.0), true);
        assert_eq!(route.points().len(), 3);
    }

    #[test]
    fn test_unresolved_reference() {
        let placed = [Draft::bounded(
            "a",
            PrimitiveKind::Rectangle,
            Point::default(),
            Size::new(10.0, 10.0),
        )];
        let index = ElementIndex::from_elements(&placed).unwrap();

        let err = Router::default().route(&index, "a", "z", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
        assert!(err.detail().contains("`z`"));
    }

    #[test]
    fn test_group_resolves_to_silhouette() {
        let placed = [
            Draft::bounded(
                "db",
                PrimitiveKind::Rectangle,
                Point::new(0.0, 10.0),
                Size::new(100.0, 90.0),
            )
            .with_group("db"),
            Draft::bounded(
                "db__lid",
                PrimitiveKind::Ellipse,
                Point::new(0.0, 0.0),
                Size::new(100.0, 20.0),
            )
            .with_group("db"),
        ];
        let index = ElementIndex::from_elements(&placed).unwrap();

        let silhouette = index.lookup("db").unwrap();
        assert_approx_eq!(f32, silhouette.min_y(), 0.0);
        assert_approx_eq!(f32, silhouette.max_y(), 100.0);

        let lid = index.lookup("db__lid").unwrap();
        assert_approx_eq!(f32, lid.height(), 20.0);
    }
}
