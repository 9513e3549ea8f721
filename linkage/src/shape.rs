//! The geometry contract connectors and locators consume, and its
//! implementation for the drawing's own shapes.

use crate::geometry::chop::{chop_ellipse, chop_polyline, chop_rect};
use crate::geometry::flatten::flatten_path;
use crate::geometry::tolerance::DEFAULT_FLATTEN_TOL;
use crate::model::{Point, Rect, Shape, ShapeKind};

pub trait Geometry {
    /// Number of addressable path nodes; zero for simple shapes.
    fn node_count(&self) -> usize;
    /// Coordinate `coord` of node `index`. Callers check `index < node_count()`;
    /// an unknown selector yields the origin.
    fn point_at(&self, index: usize, coord: i32) -> Point;
    fn bounds(&self) -> Rect;
    /// Flattened path polyline (closing point included for closed paths).
    /// Empty for shapes without a path.
    fn polyline(&self) -> Vec<Point>;
    /// Where the segment from `toward` to `reference` first meets the outline.
    /// Falls back to `reference` when it never does.
    fn boundary_crossing(&self, reference: Point, toward: Point) -> Point;
}

/// A shape seen through a flattening tolerance.
#[derive(Clone, Copy, Debug)]
pub struct ShapeView<'a> {
    pub shape: &'a Shape,
    pub flatten_tol: f32,
}

impl Shape {
    pub fn view(&self, flatten_tol: f32) -> ShapeView<'_> {
        ShapeView { shape: self, flatten_tol }
    }
}

impl Geometry for ShapeView<'_> {
    fn node_count(&self) -> usize {
        self.shape.path_nodes().len()
    }

    fn point_at(&self, index: usize, coord: i32) -> Point {
        self.shape
            .path_nodes()
            .get(index)
            .and_then(|n| n.coord(coord))
            .unwrap_or(Point::ORIGIN)
    }

    fn bounds(&self) -> Rect {
        match &self.shape.kind {
            ShapeKind::Rect { bounds } | ShapeKind::Ellipse { bounds } => *bounds,
            ShapeKind::Path { nodes, closed } => {
                Rect::from_points(flatten_path(nodes, *closed, self.flatten_tol)).unwrap_or_default()
            }
        }
    }

    fn polyline(&self) -> Vec<Point> {
        match &self.shape.kind {
            ShapeKind::Path { nodes, closed } => flatten_path(nodes, *closed, self.flatten_tol),
            _ => Vec::new(),
        }
    }

    fn boundary_crossing(&self, reference: Point, toward: Point) -> Point {
        let hit = match &self.shape.kind {
            ShapeKind::Rect { bounds } => chop_rect(bounds, reference, toward),
            ShapeKind::Ellipse { bounds } => chop_ellipse(bounds, reference, toward),
            ShapeKind::Path { nodes, closed } => {
                let pts = flatten_path(nodes, *closed, self.flatten_tol);
                // flatten_path already repeats the first point on closed paths
                chop_polyline(&pts, false, reference, toward)
            }
        };
        hit.unwrap_or(reference)
    }
}

impl Geometry for Shape {
    fn node_count(&self) -> usize {
        self.view(DEFAULT_FLATTEN_TOL).node_count()
    }
    fn point_at(&self, index: usize, coord: i32) -> Point {
        self.view(DEFAULT_FLATTEN_TOL).point_at(index, coord)
    }
    fn bounds(&self) -> Rect {
        self.view(DEFAULT_FLATTEN_TOL).bounds()
    }
    fn polyline(&self) -> Vec<Point> {
        self.view(DEFAULT_FLATTEN_TOL).polyline()
    }
    fn boundary_crossing(&self, reference: Point, toward: Point) -> Point {
        self.view(DEFAULT_FLATTEN_TOL).boundary_crossing(reference, toward)
    }
}
