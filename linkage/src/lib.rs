pub mod attributes;
pub mod connector;
pub mod dependency;
pub mod edge;
pub mod error;
pub mod locator;
pub mod model;
pub mod shape;
pub mod geometry {
    pub mod chop;
    pub mod flatten;
    pub mod intersect;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod schedule;
}
mod json;

pub use connector::{Connector, ConnectorKind};
pub use dependency::DependencyTracker;
pub use edge::{ArrowTip, ConnectionEdge, Decoration, EdgeRole, EdgeState};
pub use error::{AttrError, ConnectError};
pub use locator::Locator;
pub use model::{EdgeId, PathNode, Point, Rect, Shape, ShapeId, ShapeKind, ShapeRole, Task};
pub use shape::{Geometry, ShapeView};

use geometry::tolerance::{valid_tolerance, DEFAULT_FLATTEN_TOL};

/// Owns every shape and edge of one drawing. Shapes and edges are addressed
/// by id (their slot index); removed slots stay empty so ids are never reused.
///
/// All structural mutation goes through `&mut self`, so one writer at a time
/// is enforced by the borrow checker; geometry queries take `&self`.
pub struct Drawing {
    pub(crate) shapes: Vec<Option<Shape>>,       // id is index
    pub(crate) edges: Vec<Option<ConnectionEdge>>, // id is index
    pub(crate) tracker: DependencyTracker,
    pub(crate) flatten_tol: f32,
    pub(crate) geom_ver: u64,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawing {
    pub fn new() -> Self {
        Drawing {
            shapes: Vec::new(),
            edges: Vec::new(),
            tracker: DependencyTracker::new(),
            flatten_tol: DEFAULT_FLATTEN_TOL,
            geom_ver: 1,
        }
    }

    /// Monotonic version; bumps on every geometry or connectivity change.
    pub fn geom_version(&self) -> u64 {
        self.geom_ver
    }

    fn bump(&mut self) {
        self.geom_ver = self.geom_ver.wrapping_add(1);
    }

    pub fn flatten_tolerance(&self) -> f32 {
        self.flatten_tol
    }

    pub fn set_flatten_tolerance(&mut self, tol: f32) -> bool {
        if !valid_tolerance(tol) {
            return false;
        }
        if tol != self.flatten_tol {
            self.flatten_tol = tol;
            self.bump();
        }
        true
    }

    pub fn tracker(&self) -> &DependencyTracker {
        &self.tracker
    }

    // Shapes
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = self.shapes.len() as ShapeId;
        self.shapes.push(Some(shape));
        self.bump();
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id as usize).and_then(|s| s.as_ref())
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id as usize).and_then(|s| s.as_mut())
    }

    /// The shape as seen by locators, with this drawing's flattening tolerance.
    pub fn shape_view(&self, id: ShapeId) -> Option<ShapeView<'_>> {
        self.shape(id).map(|s| s.view(self.flatten_tol))
    }

    pub fn shape_count(&self) -> u32 {
        self.shapes.iter().filter(|s| s.is_some()).count() as u32
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i as ShapeId))
            .collect()
    }

    pub fn move_shape(&mut self, id: ShapeId, dx: f32, dy: f32) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        match self.shape_mut(id) {
            Some(s) => s.translate(dx, dy),
            None => return false,
        }
        self.bump();
        true
    }

    pub fn set_path_node(&mut self, id: ShapeId, index: usize, node: PathNode) -> bool {
        let Some(slot) = self
            .shape_mut(id)
            .and_then(|s| s.path_nodes_mut())
            .and_then(|nodes| nodes.get_mut(index))
        else {
            return false;
        };
        *slot = node;
        self.bump();
        true
    }

    /// Insert before `index`; `index == len` appends.
    pub fn insert_path_node(&mut self, id: ShapeId, index: usize, node: PathNode) -> bool {
        let Some(nodes) = self.shape_mut(id).and_then(|s| s.path_nodes_mut()) else {
            return false;
        };
        if index > nodes.len() || nodes.len() >= geometry::limits::MAX_PATH_NODES_PER_SHAPE {
            return false;
        }
        nodes.insert(index, node);
        self.bump();
        true
    }

    /// Locators pointing past the new end degrade to the origin.
    pub fn remove_path_node(&mut self, id: ShapeId, index: usize) -> bool {
        let Some(nodes) = self.shape_mut(id).and_then(|s| s.path_nodes_mut()) else {
            return false;
        };
        if index >= nodes.len() {
            return false;
        }
        nodes.remove(index);
        self.bump();
        true
    }

    /// Replace a shape's role. Dropping the task role disconnects the shape's
    /// dependency edges first, since only tasks may hold them.
    pub fn set_role(&mut self, id: ShapeId, role: ShapeRole) -> bool {
        if self.shape(id).is_none() {
            return false;
        }
        if !matches!(role, ShapeRole::Task(_)) {
            for eid in self.tracker.incident_edges(id) {
                self.disconnect(eid);
            }
        }
        if let Some(s) = self.shape_mut(id) {
            s.role = role;
        }
        self.bump();
        true
    }

    /// Remove a shape, first disconnecting every edge that has a connector on
    /// it. Returns the ids of those edges, which stay in the drawing as
    /// `Disconnected`.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Vec<EdgeId>> {
        self.shape(id)?;
        let attached = self.edges_of(id);
        for &eid in &attached {
            self.force_disconnect(eid);
        }
        if let Some(slot) = self.shapes.get_mut(id as usize) {
            *slot = None;
        }
        tracing::debug!(shape = id, edges = attached.len(), "shape removed");
        self.bump();
        Some(attached)
    }

    /// Edges with a connector owned by `shape`, in any state.
    pub fn edges_of(&self, shape: ShapeId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .flatten()
            .filter(|e| e.touches(shape))
            .map(|e| e.id)
            .collect()
    }

    // Edges
    pub fn add_edge(&mut self, role: EdgeRole) -> EdgeId {
        let id = self.edges.len() as EdgeId;
        self.edges.push(Some(ConnectionEdge::new(id, role)));
        id
    }

    pub fn edge(&self, id: EdgeId) -> Option<&ConnectionEdge> {
        self.edges.get(id as usize).and_then(|e| e.as_ref())
    }

    fn edge_mut(&mut self, id: EdgeId) -> Option<&mut ConnectionEdge> {
        self.edges.get_mut(id as usize).and_then(|e| e.as_mut())
    }

    pub fn edge_state(&self, id: EdgeId) -> Option<EdgeState> {
        self.edge(id).map(|e| e.state)
    }

    pub fn set_edge_decoration(&mut self, id: EdgeId, decoration: Decoration) -> bool {
        match self.edge_mut(id) {
            Some(e) => {
                e.decoration = decoration;
                true
            }
            None => false,
        }
    }

    pub fn edge_count(&self) -> u32 {
        self.edges.iter().filter(|e| e.is_some()).count() as u32
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().flatten().map(|e| e.id).collect()
    }

    /// Fill the start slot during a connection gesture. Filling the second
    /// slot connects the edge; a refused connect leaves the slot as it was.
    pub fn set_start(&mut self, id: EdgeId, connector: Connector) -> bool {
        self.fill_slot(id, connector, true).is_ok()
    }

    /// Fill the end slot during a connection gesture. See [`Drawing::set_start`].
    pub fn set_end(&mut self, id: EdgeId, connector: Connector) -> bool {
        self.fill_slot(id, connector, false).is_ok()
    }

    /// `set_start` reporting the resulting state or why it was refused.
    pub fn fill_start(&mut self, id: EdgeId, connector: Connector) -> Result<EdgeState, ConnectError> {
        self.fill_slot(id, connector, true)
    }

    pub fn fill_end(&mut self, id: EdgeId, connector: Connector) -> Result<EdgeState, ConnectError> {
        self.fill_slot(id, connector, false)
    }

    fn fill_slot(&mut self, id: EdgeId, connector: Connector, start: bool) -> Result<EdgeState, ConnectError> {
        let edge = self.edge(id).ok_or(ConnectError::MissingEdge(id))?;
        if edge.state == EdgeState::Connected {
            return Err(ConnectError::AlreadyConnected(id));
        }
        if self.shape(connector.owner).is_none() {
            return Err(ConnectError::MissingShape(connector.owner));
        }
        if !connector.locator.is_finite() {
            return Err(ConnectError::NonFiniteLocator(connector.owner));
        }
        let other = if start { edge.end } else { edge.start };
        if let Some(other) = other {
            let (s, e) = if start { (connector, other) } else { (other, connector) };
            self.connect(id, s, e)?;
            return Ok(EdgeState::Connected);
        }
        let edge = self.edge_mut(id).ok_or(ConnectError::MissingEdge(id))?;
        if start {
            edge.start = Some(connector);
        } else {
            edge.end = Some(connector);
        }
        edge.state = EdgeState::PartiallyConnected;
        self.bump();
        Ok(EdgeState::PartiallyConnected)
    }

    /// Run every check `connect` would, without touching anything.
    pub fn check_connect(&self, id: EdgeId, start: &Connector, end: &Connector) -> Result<(), ConnectError> {
        let edge = self.edge(id).ok_or(ConnectError::MissingEdge(id))?;
        if edge.state == EdgeState::Connected {
            return Err(ConnectError::AlreadyConnected(id));
        }
        let a = self.shape(start.owner).ok_or(ConnectError::MissingShape(start.owner))?;
        let b = self.shape(end.owner).ok_or(ConnectError::MissingShape(end.owner))?;
        for c in [start, end] {
            if !c.locator.is_finite() {
                return Err(ConnectError::NonFiniteLocator(c.owner));
            }
        }
        if start.owner == end.owner {
            return Err(ConnectError::SameOwner(start.owner));
        }
        match edge.role {
            EdgeRole::Plain => Ok(()),
            EdgeRole::Dependency => {
                if !a.is_dependency_participant() {
                    return Err(ConnectError::NotParticipant(start.owner));
                }
                if !b.is_dependency_participant() {
                    return Err(ConnectError::NotParticipant(end.owner));
                }
                let (from, to) = (start.owner, end.owner);
                if self.tracker.has_direct_edge(from, to) {
                    return Err(ConnectError::Duplicate { from, to });
                }
                if self.tracker.is_reachable(to, from) {
                    return Err(ConnectError::Cycle { from, to });
                }
                Ok(())
            }
        }
    }

    /// Connect `id` from `start` to `end`. On error nothing changes.
    pub fn connect(&mut self, id: EdgeId, start: Connector, end: Connector) -> Result<(), ConnectError> {
        if let Err(e) = self.check_connect(id, &start, &end) {
            tracing::debug!(edge = id, error = %e, "connect rejected");
            return Err(e);
        }
        let role = match self.edge_mut(id) {
            Some(edge) => {
                edge.start = Some(start);
                edge.end = Some(end);
                edge.state = EdgeState::Connected;
                edge.role
            }
            None => return Err(ConnectError::MissingEdge(id)),
        };
        self.on_connect(id, role, &start, &end);
        tracing::debug!(edge = id, from = start.owner, to = end.owner, "connected");
        self.bump();
        Ok(())
    }

    pub fn try_connect(&mut self, id: EdgeId, start: Connector, end: Connector) -> bool {
        self.connect(id, start, end).is_ok()
    }

    /// Connect using whatever the gesture left in the two slots. Since filling
    /// the second slot already connects, this mostly reports `Incomplete`.
    pub fn complete_connection(&mut self, id: EdgeId) -> Result<(), ConnectError> {
        let edge = self.edge(id).ok_or(ConnectError::MissingEdge(id))?;
        match (edge.start, edge.end) {
            (Some(s), Some(e)) => self.connect(id, s, e),
            (None, _) | (_, None) => Err(ConnectError::Incomplete(id)),
        }
    }

    fn on_connect(&mut self, id: EdgeId, role: EdgeRole, start: &Connector, end: &Connector) {
        if role == EdgeRole::Dependency {
            self.tracker.register_edge(id, start.owner, end.owner);
        }
    }

    fn on_disconnect(&mut self, id: EdgeId, role: EdgeRole) {
        if role == EdgeRole::Dependency {
            self.tracker.unregister_edge(id);
        }
    }

    /// Tear down a connected or half-built edge. No-op on an edge that holds
    /// nothing. Returns false only for an unknown id.
    pub fn disconnect(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.edge(id) else {
            return false;
        };
        if matches!(edge.state, EdgeState::Unconnected | EdgeState::Disconnected) {
            return true;
        }
        self.force_disconnect(id);
        true
    }

    fn force_disconnect(&mut self, id: EdgeId) {
        let Some(edge) = self.edge_mut(id) else {
            return;
        };
        let was_connected = edge.state == EdgeState::Connected;
        let role = edge.role;
        edge.clear();
        if was_connected {
            self.on_disconnect(id, role);
        }
        tracing::debug!(edge = id, "disconnected");
        self.bump();
    }

    /// Make a `Disconnected` (or half-built) edge `Unconnected` again.
    pub fn reset_edge(&mut self, id: EdgeId) -> bool {
        match self.edge(id).map(|e| e.state) {
            Some(EdgeState::Connected) | None => false,
            Some(_) => {
                if let Some(edge) = self.edge_mut(id) {
                    edge.start = None;
                    edge.end = None;
                    edge.state = EdgeState::Unconnected;
                }
                true
            }
        }
    }

    /// Disconnect, then drop the edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        if !self.disconnect(id) {
            return false;
        }
        if let Some(slot) = self.edges.get_mut(id as usize) {
            *slot = None;
        }
        self.bump();
        true
    }

    // Geometry
    /// Current anchor of `connector`. An owner that no longer exists resolves
    /// to the origin; removal disconnects edges first, so this only happens for
    /// connectors held outside the drawing.
    pub fn resolve_connector(&self, connector: &Connector) -> Point {
        match self.shape_view(connector.owner) {
            Some(view) => connector.resolve(&view),
            None => {
                tracing::warn!(owner = connector.owner, "connector owner missing");
                Point::ORIGIN
            }
        }
    }

    pub fn resolve_connector_chopped(&self, connector: &Connector, from: Point) -> Point {
        match self.shape_view(connector.owner) {
            Some(view) => connector.resolve_chopped(&view, from),
            None => {
                tracing::warn!(owner = connector.owner, "connector owner missing");
                Point::ORIGIN
            }
        }
    }

    /// Rendered end points of an edge: each end chopped against the other
    /// end's reference point. A missing slot gives `None`; a lone slot gives
    /// its unchopped point.
    pub fn resolve_geometry(&self, id: EdgeId) -> (Option<Point>, Option<Point>) {
        let Some(edge) = self.edge(id) else {
            return (None, None);
        };
        match (edge.start, edge.end) {
            (Some(s), Some(e)) => {
                let s_ref = self.resolve_connector(&s);
                let e_ref = self.resolve_connector(&e);
                (
                    Some(self.resolve_connector_chopped(&s, e_ref)),
                    Some(self.resolve_connector_chopped(&e, s_ref)),
                )
            }
            (s, e) => (
                s.map(|c| self.resolve_connector(&c)),
                e.map(|c| self.resolve_connector(&c)),
            ),
        }
    }

    /// Arrow outlines for the decorated ends of a fully resolved edge.
    pub fn decoration_outlines(&self, id: EdgeId) -> Vec<[Point; 4]> {
        let Some(edge) = self.edge(id) else {
            return Vec::new();
        };
        let (Some(s), Some(e)) = self.resolve_geometry(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if let Some(tip) = edge.decoration.start {
            out.push(tip.outline(s, e));
        }
        if let Some(tip) = edge.decoration.end {
            out.push(tip.outline(e, s));
        }
        out
    }

    /// Whether a dependency `source -> target` could be added right now.
    pub fn can_add_dependency(&self, source: ShapeId, target: ShapeId) -> bool {
        let participant = |id| self.shape(id).map_or(false, Shape::is_dependency_participant);
        source != target && participant(source) && participant(target) && self.tracker.can_add_edge(source, target)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.edges.clear();
        self.tracker.clear();
        self.bump();
    }

    // JSON
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }
    pub fn from_json_value(&mut self, v: serde_json::Value) -> bool {
        json::from_json_impl(self, v)
    }
    pub fn from_json_value_strict(&mut self, v: serde_json::Value) -> Result<bool, (&'static str, String)> {
        json::from_json_impl_strict(self, v)
    }
}
