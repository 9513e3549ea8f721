use crate::attributes::{to_map, AttributeMap};
use crate::connector::{Connector, ConnectorKind};
use crate::edge::{ConnectionEdge, Decoration, EdgeRole, EdgeState};
use crate::geometry::limits;
use crate::geometry::tolerance::{valid_tolerance, DEFAULT_FLATTEN_TOL};
use crate::locator::Locator;
use crate::model::{PathNode, Point, Rect, Shape, ShapeKind, ShapeRole};
use crate::Drawing;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DOC_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct LocatorDoc {
    #[serde(rename = "type")]
    element: String,
    #[serde(default)]
    attrs: AttributeMap,
}

#[derive(Serialize, Deserialize)]
struct ConnectorDoc {
    owner: u32,
    #[serde(default)]
    kind: ConnectorKind,
    locator: LocatorDoc,
}

impl ConnectorDoc {
    fn from_connector(c: &Connector) -> Self {
        ConnectorDoc {
            owner: c.owner,
            kind: c.kind,
            locator: LocatorDoc {
                element: c.locator.element_name().to_string(),
                attrs: to_map(c.locator.write_attributes()),
            },
        }
    }
}

pub fn to_json_impl(d: &Drawing) -> Value {
    #[derive(Serialize)]
    struct ShapeSer<'a> {
        id: u32,
        #[serde(flatten)]
        shape: &'a Shape,
    }
    #[derive(Serialize)]
    struct EdgeSer {
        id: u32,
        role: EdgeRole,
        state: EdgeState,
        start: Option<ConnectorDoc>,
        end: Option<ConnectorDoc>,
        decoration: Decoration,
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        version: u32,
        flatten_tol: f32,
        shapes: Vec<ShapeSer<'a>>,
        edges: Vec<EdgeSer>,
    }
    let shapes = d
        .shapes
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_ref().map(|shape| ShapeSer { id: i as u32, shape }))
        .collect();
    let edges = d
        .edges
        .iter()
        .flatten()
        .map(|e| EdgeSer {
            id: e.id,
            role: e.role,
            state: e.state,
            start: e.start.as_ref().map(ConnectorDoc::from_connector),
            end: e.end.as_ref().map(ConnectorDoc::from_connector),
            decoration: e.decoration,
        })
        .collect();
    let doc = Doc {
        version: DOC_VERSION,
        flatten_tol: d.flatten_tol,
        shapes,
        edges,
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

#[derive(Deserialize)]
struct ShapeDe {
    id: u32,
    #[serde(flatten)]
    shape: Shape,
}

#[derive(Deserialize)]
struct EdgeDe {
    id: u32,
    #[serde(default)]
    role: EdgeRole,
    /// Absent in older documents: two filled slots then mean connected.
    state: Option<EdgeState>,
    start: Option<ConnectorDoc>,
    end: Option<ConnectorDoc>,
    decoration: Option<Decoration>,
}

#[derive(Deserialize)]
struct DocDe {
    version: Option<u32>,
    flatten_tol: Option<f32>,
    shapes: Vec<ShapeDe>,
    #[serde(default)]
    edges: Vec<EdgeDe>,
}

type LoadError = (&'static str, String);

fn check_point(p: &Point) -> bool {
    limits::in_coord_bounds(p.x) && limits::in_coord_bounds(p.y)
}

fn check_rect(r: &Rect) -> bool {
    check_point(&Point::new(r.x, r.y))
        && limits::in_coord_bounds(r.w)
        && limits::in_coord_bounds(r.h)
        && r.w >= 0.0
        && r.h >= 0.0
}

fn check_shape(s: &Shape, path_total: &mut usize) -> Result<(), LoadError> {
    match &s.kind {
        ShapeKind::Rect { bounds } | ShapeKind::Ellipse { bounds } => {
            if !check_rect(bounds) {
                return Err(("out_of_range", "shape bounds out of range".into()));
            }
        }
        ShapeKind::Path { nodes, .. } => {
            if nodes.len() > limits::MAX_PATH_NODES_PER_SHAPE {
                return Err(("limit", "too many path nodes in one shape".into()));
            }
            *path_total += nodes.len();
            if *path_total > limits::MAX_PATH_NODES_TOTAL {
                return Err(("limit", "too many path nodes".into()));
            }
            let ok = nodes
                .iter()
                .all(|n: &PathNode| check_point(&n.main) && check_point(&n.c1) && check_point(&n.c2));
            if !ok {
                return Err(("out_of_range", "path node out of range".into()));
            }
        }
    }
    if let ShapeRole::Task(t) = &s.role {
        if !limits::in_duration_bounds(t.duration) {
            return Err(("out_of_range", format!("task '{}' has an invalid duration", t.name)));
        }
    }
    Ok(())
}

fn locator_from_doc(doc: &LocatorDoc, strict: bool) -> Result<Locator, LoadError> {
    let Some(mut loc) = Locator::from_element_name(&doc.element) else {
        return Err(("invalid_locator", format!("unknown locator type '{}'", doc.element)));
    };
    if strict {
        loc.read_attributes_strict(&doc.attrs)
            .map_err(|e| ("invalid_attribute", e.to_string()))?;
    } else {
        loc.read_attributes(&doc.attrs);
    }
    Ok(loc)
}

fn connector_from_doc(d: &Drawing, doc: &ConnectorDoc, strict: bool) -> Result<Connector, LoadError> {
    if d.shape(doc.owner).is_none() {
        return Err(("invalid_id", format!("connector owner {} does not exist", doc.owner)));
    }
    let locator = locator_from_doc(&doc.locator, strict)?;
    Ok(Connector {
        owner: doc.owner,
        locator,
        kind: doc.kind,
    })
}

/// Build a fresh drawing from `v`. Lenient mode drops bad connectors and
/// leaves edges it cannot reconnect unconnected; strict mode fails instead.
fn build(v: Value, strict: bool) -> Result<Drawing, LoadError> {
    let doc: DocDe = serde_json::from_value(v).map_err(|e| ("parse", e.to_string()))?;
    if let Some(ver) = doc.version {
        if ver > DOC_VERSION {
            return Err(("version", format!("unsupported document version {}", ver)));
        }
    }
    if doc.shapes.len() > limits::MAX_SHAPES || doc.edges.len() > limits::MAX_EDGES {
        return Err(("limit", "document too large".into()));
    }
    let mut path_total = 0usize;
    for s in &doc.shapes {
        check_shape(&s.shape, &mut path_total)?;
    }

    let mut d = Drawing::new();
    d.flatten_tol = doc
        .flatten_tol
        .filter(|t| valid_tolerance(*t))
        .unwrap_or(DEFAULT_FLATTEN_TOL);
    let max_shape = doc.shapes.iter().map(|s| s.id as usize + 1).max().unwrap_or(0);
    let max_edge = doc.edges.iter().map(|e| e.id as usize + 1).max().unwrap_or(0);
    if max_shape > limits::MAX_SHAPES || max_edge > limits::MAX_EDGES {
        return Err(("limit", "id out of range".into()));
    }
    d.shapes = vec![None; max_shape];
    d.edges = vec![None; max_edge];
    for s in doc.shapes {
        if d.shapes[s.id as usize].is_some() {
            return Err(("duplicate_id", format!("shape {} appears twice", s.id)));
        }
        d.shapes[s.id as usize] = Some(s.shape);
    }

    let mut edges = doc.edges;
    edges.sort_by_key(|e| e.id);
    for e in &edges {
        if d.edges[e.id as usize].is_some() {
            return Err(("duplicate_id", format!("edge {} appears twice", e.id)));
        }
        let mut edge = ConnectionEdge::new(e.id, e.role);
        if let Some(dec) = e.decoration {
            edge.decoration = dec;
        }
        d.edges[e.id as usize] = Some(edge);
    }

    for e in &edges {
        let slot = |c: &Option<ConnectorDoc>| -> Result<Option<Connector>, LoadError> {
            match c {
                None => Ok(None),
                Some(doc) => match connector_from_doc(&d, doc, strict) {
                    Ok(c) => Ok(Some(c)),
                    Err(err) if strict => Err(err),
                    Err(err) => {
                        tracing::warn!(edge = e.id, code = err.0, "dropping connector: {}", err.1);
                        Ok(None)
                    }
                },
            }
        };
        let start = slot(&e.start)?;
        let end = slot(&e.end)?;
        let state = e.state.unwrap_or(match (start, end) {
            (Some(_), Some(_)) => EdgeState::Connected,
            (None, None) => EdgeState::Unconnected,
            _ => EdgeState::PartiallyConnected,
        });
        let filled = usize::from(start.is_some()) + usize::from(end.is_some());
        let consistent = match state {
            EdgeState::Connected => filled == 2,
            EdgeState::PartiallyConnected => filled == 1,
            EdgeState::Unconnected | EdgeState::Disconnected => filled == 0,
        };
        if !consistent {
            if strict {
                return Err(("invalid_state", format!("edge {} is {:?} with {} filled slots", e.id, state, filled)));
            }
            tracing::warn!(edge = e.id, ?state, filled, "edge state does not match its slots");
        }
        match (state, start, end) {
            (EdgeState::Connected, Some(s), Some(t)) => {
                if let Err(err) = d.connect(e.id, s, t) {
                    if strict {
                        return Err((err.code(), err.to_string()));
                    }
                    tracing::warn!(edge = e.id, error = %err, "edge loaded unconnected");
                }
            }
            (EdgeState::Disconnected, _, _) => {
                if let Some(edge) = d.edge_mut(e.id) {
                    edge.clear();
                }
            }
            // A half-built edge keeps one slot; a stray second slot is dropped
            // rather than turned into a connection.
            (_, Some(s), _) => {
                d.set_start(e.id, s);
            }
            (_, None, Some(t)) => {
                d.set_end(e.id, t);
            }
            (_, None, None) => {}
        }
    }
    Ok(d)
}

fn install(g: &mut Drawing, loaded: Drawing) {
    let ver = g.geom_ver;
    *g = loaded;
    g.geom_ver = ver.wrapping_add(1);
}

pub fn from_json_impl(g: &mut Drawing, v: Value) -> bool {
    match build(v, false) {
        Ok(d) => {
            install(g, d);
            true
        }
        Err((code, msg)) => {
            tracing::warn!(code, "document rejected: {}", msg);
            false
        }
    }
}

pub fn from_json_impl_strict(g: &mut Drawing, v: Value) -> Result<bool, (&'static str, String)> {
    let d = build(v, true)?;
    install(g, d);
    Ok(true)
}
