use crate::connector::Connector;
use crate::geometry::math::direction;
use crate::model::{EdgeId, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    Unconnected,
    /// One slot filled during an interactive connection gesture.
    PartiallyConnected,
    Connected,
    /// Torn down; `reset_edge` makes it reusable.
    Disconnected,
}

/// What an edge means, which decides what it may connect and what
/// connecting it registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRole {
    /// Any two distinct shapes; nothing is registered.
    #[default]
    Plain,
    /// Precedence between two tasks, tracked in the dependency graph.
    Dependency,
}

/// Arrow head drawn at an edge end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrowTip {
    /// Half-opening angle in radians.
    pub angle: f32,
    pub outer_radius: f32,
    pub inner_radius: f32,
}

impl Default for ArrowTip {
    fn default() -> Self {
        ArrowTip {
            angle: 0.35,
            outer_radius: 12.0,
            inner_radius: 11.3,
        }
    }
}

impl ArrowTip {
    /// Outline `[tip, left barb, inner notch, right barb]` for an arrow ending
    /// at `tip` and coming from `from`. Collapses onto `tip` when the two coincide.
    pub fn outline(&self, tip: Point, from: Point) -> [Point; 4] {
        let Some((ux, uy)) = direction(tip, from) else {
            return [tip; 4];
        };
        let base = uy.atan2(ux);
        let at = |angle: f32, r: f32| Point::new(tip.x + r * angle.cos(), tip.y + r * angle.sin());
        [
            tip,
            at(base + self.angle, self.outer_radius),
            at(base, self.inner_radius),
            at(base - self.angle, self.outer_radius),
        ]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub start: Option<ArrowTip>,
    pub end: Option<ArrowTip>,
}

impl Decoration {
    pub fn end_arrow() -> Self {
        Decoration {
            start: None,
            end: Some(ArrowTip::default()),
        }
    }
}

/// An edge between two connectors. Geometry is never cached here; the
/// drawing re-resolves both ends on request.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionEdge {
    pub(crate) id: EdgeId,
    pub(crate) start: Option<Connector>,
    pub(crate) end: Option<Connector>,
    pub(crate) role: EdgeRole,
    pub(crate) state: EdgeState,
    pub decoration: Decoration,
}

impl ConnectionEdge {
    pub(crate) fn new(id: EdgeId, role: EdgeRole) -> Self {
        let decoration = match role {
            EdgeRole::Dependency => Decoration::end_arrow(),
            EdgeRole::Plain => Decoration::default(),
        };
        ConnectionEdge {
            id,
            start: None,
            end: None,
            role,
            state: EdgeState::Unconnected,
            decoration,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }
    pub fn start(&self) -> Option<&Connector> {
        self.start.as_ref()
    }
    pub fn end(&self) -> Option<&Connector> {
        self.end.as_ref()
    }
    pub fn role(&self) -> EdgeRole {
        self.role
    }
    pub fn state(&self) -> EdgeState {
        self.state
    }
    pub fn is_connected(&self) -> bool {
        self.state == EdgeState::Connected
    }

    /// Whether either slot is owned by `shape`.
    pub fn touches(&self, shape: crate::model::ShapeId) -> bool {
        self.start.map_or(false, |c| c.owner == shape) || self.end.map_or(false, |c| c.owner == shape)
    }

    pub(crate) fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.state = EdgeState::Disconnected;
    }
}
