//! Locating strategies: each variant turns a shape's current geometry into an
//! anchor point. `compute` is total; anything it cannot resolve degrades to
//! the origin so a stale reference never aborts rendering.

use crate::attributes::{AttrValue, AttributeMap, Field};
use crate::error::AttrError;
use crate::geometry::math::point_along;
use crate::geometry::tolerance::clamp01;
use crate::model::Point;
use crate::shape::Geometry;
use serde::{Deserialize, Serialize};

pub const RELATIVE_X: Field<f32> = Field::new("relativeX", 0.0);
pub const RELATIVE_Y: Field<f32> = Field::new("relativeY", 0.0);
pub const OFFSET_X: Field<f32> = Field::new("offsetX", 0.0);
pub const OFFSET_Y: Field<f32> = Field::new("offsetY", 0.0);
pub const INDEX: Field<i32> = Field::new("index", 0);
pub const COORD_SELECTOR: Field<i32> = Field::new("coordSelector", 0);
pub const FRACTION: Field<f32> = Field::new("fraction", 0.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Locator {
    /// Proportional position inside the bounds, `(0,0)` top-left, `(1,1)` bottom-right.
    Relative { rx: f32, ry: f32 },
    /// Fixed offset from the bounds' top-left corner.
    Offset { dx: f32, dy: f32 },
    /// A coordinate of one path node: selector 0 main, 1/2 control points.
    PathNode { index: i32, coord: i32 },
    /// Point at a fraction of the path's arc length.
    PathFraction { fraction: f32 },
}

impl Default for Locator {
    fn default() -> Self {
        Locator::center()
    }
}

impl Locator {
    pub fn relative(rx: f32, ry: f32) -> Self {
        Locator::Relative { rx, ry }
    }
    pub fn center() -> Self {
        Locator::relative(0.5, 0.5)
    }
    pub fn north() -> Self {
        Locator::relative(0.5, 0.0)
    }
    pub fn south() -> Self {
        Locator::relative(0.5, 1.0)
    }
    pub fn east() -> Self {
        Locator::relative(1.0, 0.5)
    }
    pub fn west() -> Self {
        Locator::relative(0.0, 0.5)
    }
    pub fn north_east() -> Self {
        Locator::relative(1.0, 0.0)
    }
    pub fn north_west() -> Self {
        Locator::relative(0.0, 0.0)
    }
    pub fn south_east() -> Self {
        Locator::relative(1.0, 1.0)
    }
    pub fn south_west() -> Self {
        Locator::relative(0.0, 1.0)
    }

    pub fn offset(dx: f32, dy: f32) -> Self {
        Locator::Offset { dx, dy }
    }

    /// Main point of node `index`.
    pub fn path_node(index: i32) -> Self {
        Locator::PathNode { index, coord: 0 }
    }

    /// Coordinate `coord` of node `index`; both fields are kept as given.
    pub fn path_node_coord(index: i32, coord: i32) -> Self {
        Locator::PathNode { index, coord }
    }

    pub fn path_fraction(fraction: f32) -> Self {
        Locator::PathFraction { fraction }
    }

    pub fn compute<G: Geometry + ?Sized>(&self, shape: &G) -> Point {
        match *self {
            Locator::Relative { rx, ry } => {
                let b = shape.bounds();
                Point::new(b.x + rx * b.w, b.y + ry * b.h)
            }
            Locator::Offset { dx, dy } => shape.bounds().top_left().offset(dx, dy),
            Locator::PathNode { index, coord } => {
                if index < 0 || index as usize >= shape.node_count() {
                    tracing::trace!(index, nodes = shape.node_count(), "path node locator out of range");
                    return Point::ORIGIN;
                }
                shape.point_at(index as usize, coord)
            }
            Locator::PathFraction { fraction } => {
                let f = if fraction.is_finite() { clamp01(fraction) } else { 0.0 };
                point_along(&shape.polyline(), f).unwrap_or(Point::ORIGIN)
            }
        }
    }

    /// False when any float field is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match *self {
            Locator::Relative { rx: a, ry: b } | Locator::Offset { dx: a, dy: b } => a.is_finite() && b.is_finite(),
            Locator::PathNode { .. } => true,
            Locator::PathFraction { fraction } => fraction.is_finite(),
        }
    }

    /// Element name used when the locator is persisted.
    pub fn element_name(&self) -> &'static str {
        match self {
            Locator::Relative { .. } => "relativeLocator",
            Locator::Offset { .. } => "offsetLocator",
            Locator::PathNode { .. } => "pathNodeLocator",
            Locator::PathFraction { .. } => "pathFractionLocator",
        }
    }

    /// A locator of the named kind with every field at its declared default.
    pub fn from_element_name(name: &str) -> Option<Self> {
        Some(match name {
            "relativeLocator" => Locator::relative(RELATIVE_X.default, RELATIVE_Y.default),
            "offsetLocator" => Locator::offset(OFFSET_X.default, OFFSET_Y.default),
            "pathNodeLocator" => Locator::path_node_coord(INDEX.default, COORD_SELECTOR.default),
            "pathFractionLocator" => Locator::path_fraction(FRACTION.default),
            _ => return None,
        })
    }

    /// Attribute pairs in declaration order, defaults omitted.
    pub fn write_attributes(&self) -> Vec<(String, AttrValue)> {
        let mut out = Vec::new();
        match *self {
            Locator::Relative { rx, ry } => {
                RELATIVE_X.write(&mut out, rx);
                RELATIVE_Y.write(&mut out, ry);
            }
            Locator::Offset { dx, dy } => {
                OFFSET_X.write(&mut out, dx);
                OFFSET_Y.write(&mut out, dy);
            }
            Locator::PathNode { index, coord } => {
                INDEX.write(&mut out, index);
                COORD_SELECTOR.write(&mut out, coord);
            }
            Locator::PathFraction { fraction } => {
                FRACTION.write(&mut out, fraction);
            }
        }
        out
    }

    /// Restore this variant's fields; missing or malformed values take the default.
    pub fn read_attributes(&mut self, map: &AttributeMap) {
        match self {
            Locator::Relative { rx, ry } => {
                *rx = RELATIVE_X.read(map);
                *ry = RELATIVE_Y.read(map);
            }
            Locator::Offset { dx, dy } => {
                *dx = OFFSET_X.read(map);
                *dy = OFFSET_Y.read(map);
            }
            Locator::PathNode { index, coord } => {
                *index = INDEX.read(map);
                *coord = COORD_SELECTOR.read(map);
            }
            Locator::PathFraction { fraction } => {
                *fraction = FRACTION.read(map);
            }
        }
    }

    /// Like [`read_attributes`](Self::read_attributes) but malformed values are
    /// reported. On error `self` is left untouched.
    pub fn read_attributes_strict(&mut self, map: &AttributeMap) -> Result<(), AttrError> {
        let next = match self {
            Locator::Relative { .. } => Locator::Relative {
                rx: RELATIVE_X.read_strict(map)?,
                ry: RELATIVE_Y.read_strict(map)?,
            },
            Locator::Offset { .. } => Locator::Offset {
                dx: OFFSET_X.read_strict(map)?,
                dy: OFFSET_Y.read_strict(map)?,
            },
            Locator::PathNode { .. } => Locator::PathNode {
                index: INDEX.read_strict(map)?,
                coord: COORD_SELECTOR.read_strict(map)?,
            },
            Locator::PathFraction { .. } => Locator::PathFraction {
                fraction: FRACTION.read_strict(map)?,
            },
        };
        *self = next;
        Ok(())
    }
}
