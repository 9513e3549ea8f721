use crate::locator::Locator;
use crate::model::{Point, ShapeId};
use crate::shape::Geometry;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Edges end exactly on the locator point.
    #[default]
    Locator,
    /// Edges end where they cross the owner's outline on the way to the locator point.
    Chop,
}

/// A locator bound to the shape that owns it. The owner is held by id; the
/// drawing resolves it on every query so the point always tracks the shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub owner: ShapeId,
    pub locator: Locator,
    #[serde(default)]
    pub kind: ConnectorKind,
}

impl Connector {
    pub fn new(owner: ShapeId, locator: Locator) -> Self {
        Connector {
            owner,
            locator,
            kind: ConnectorKind::Locator,
        }
    }

    pub fn chop(owner: ShapeId, locator: Locator) -> Self {
        Connector {
            owner,
            locator,
            kind: ConnectorKind::Chop,
        }
    }

    /// Box/ellipse style connector: aims at the center, stops at the outline.
    pub fn chop_center(owner: ShapeId) -> Self {
        Connector::chop(owner, Locator::center())
    }

    /// Current anchor point on `shape`; recomputed on every call.
    pub fn resolve<G: Geometry + ?Sized>(&self, shape: &G) -> Point {
        self.locator.compute(shape)
    }

    /// Anchor point as seen by an edge arriving from `from`.
    pub fn resolve_chopped<G: Geometry + ?Sized>(&self, shape: &G, from: Point) -> Point {
        let reference = self.resolve(shape);
        match self.kind {
            ConnectorKind::Locator => reference,
            ConnectorKind::Chop => shape.boundary_crossing(reference, from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PathNode, Rect, Shape};

    #[test]
    fn resolve_follows_shape_changes() {
        let mut s = Shape::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let c = Connector::new(0, Locator::center());
        assert_eq!(c.resolve(&s), Point::new(5.0, 5.0));
        s.translate(10.0, 0.0);
        assert_eq!(c.resolve(&s), Point::new(15.0, 5.0));
    }

    #[test]
    fn plain_connector_ignores_direction() {
        let s = Shape::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let c = Connector::new(0, Locator::center());
        assert_eq!(c.resolve_chopped(&s, Point::new(-50.0, 5.0)), Point::new(5.0, 5.0));
    }

    #[test]
    fn chop_stops_at_outline() {
        let s = Shape::rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let c = Connector::chop_center(0);
        let p = c.resolve_chopped(&s, Point::new(-50.0, 5.0));
        assert!(p.distance(Point::new(0.0, 5.0)) < 1e-3, "{:?}", p);
        // from inside there is nothing to cross
        assert_eq!(c.resolve_chopped(&s, Point::new(6.0, 5.0)), Point::new(5.0, 5.0));
    }

    #[test]
    fn chop_on_closed_path() {
        let s = Shape::path(
            vec![
                PathNode::corner(Point::new(0.0, 0.0)),
                PathNode::corner(Point::new(20.0, 0.0)),
                PathNode::corner(Point::new(20.0, 20.0)),
                PathNode::corner(Point::new(0.0, 20.0)),
            ],
            true,
        );
        let c = Connector::chop_center(0);
        let p = c.resolve_chopped(&s, Point::new(10.0, 100.0));
        assert!(p.distance(Point::new(10.0, 20.0)) < 1e-3, "{:?}", p);
    }
}
