use crate::error;
use crate::interop::{arr_f32, arr_points, arr_u32, new_obj, point_or_null, set_kv};
use crate::Drawing;
use js_sys::Float32Array;
use linkage::attributes::{AttrValue, AttributeMap};
use linkage::geometry::limits;
use linkage::{ArrowTip, Connector, EdgeRole, EdgeState, Geometry, Locator, PathNode, Point, Rect, Shape, ShapeRole, Task};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn role_from_u8(role: u8) -> Option<EdgeRole> {
    match role {
        0 => Some(EdgeRole::Plain),
        1 => Some(EdgeRole::Dependency),
        _ => None,
    }
}

fn state_name(s: EdgeState) -> &'static str {
    match s {
        EdgeState::Unconnected => "unconnected",
        EdgeState::PartiallyConnected => "partially_connected",
        EdgeState::Connected => "connected",
        EdgeState::Disconnected => "disconnected",
    }
}

fn check_finite(params: &[(&str, f32)]) -> Result<(), JsValue> {
    for (name, v) in params {
        if !v.is_finite() {
            return Err(error::non_finite(name));
        }
        if !limits::in_coord_bounds(*v) {
            return Err(error::out_of_range(name, limits::COORD_MIN, limits::COORD_MAX, *v));
        }
    }
    Ok(())
}

/// Locator from a plain object such as `{ type: "pathNodeLocator", index: 2 }`.
/// `undefined` and `null` give the center locator.
fn locator_from_js(v: JsValue, strict: bool) -> Result<Locator, JsValue> {
    if v.is_undefined() || v.is_null() {
        return Ok(Locator::default());
    }
    let map: AttributeMap =
        serde_wasm_bindgen::from_value(v).map_err(|e| error::invalid_locator(e.to_string()))?;
    let name = match map.get("type") {
        Some(AttrValue::Text(s)) => s.clone(),
        _ => return Err(error::invalid_locator("locator needs a 'type' name")),
    };
    let mut loc = Locator::from_element_name(&name)
        .ok_or_else(|| error::invalid_locator(format!("unknown locator type '{}'", name)))?;
    if strict {
        loc.read_attributes_strict(&map).map_err(|e| error::attribute(&e))?;
    } else {
        loc.read_attributes(&map);
    }
    Ok(loc)
}

fn connector_from_js(owner: u32, locator: JsValue, chop: bool, strict: bool) -> Result<Connector, JsValue> {
    let locator = locator_from_js(locator, strict)?;
    Ok(if chop {
        Connector::chop(owner, locator)
    } else {
        Connector::new(owner, locator)
    })
}

/// Flat `[main.x, main.y, c1.x, c1.y, c2.x, c2.y, ...]`, six floats per node.
fn path_nodes_from(coords: &[f32]) -> Vec<PathNode> {
    coords
        .chunks_exact(6)
        .map(|c| PathNode {
            main: Point::new(c[0], c[1]),
            c1: Point::new(c[2], c[3]),
            c2: Point::new(c[4], c[5]),
        })
        .collect()
}

#[wasm_bindgen]
impl Drawing {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Drawing {
        crate::Drawing::rs_new()
    }
    pub fn geom_version(&self) -> u64 {
        self.rs_geom_version()
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    // Shapes
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> u32 {
        self.inner.add_shape(Shape::rect(Rect::new(x, y, w, h)))
    }
    pub fn add_rect_res(&mut self, x: f32, y: f32, w: f32, h: f32) -> JsValue {
        if let Err(e) = check_finite(&[("x", x), ("y", y), ("w", w), ("h", h)]) {
            return e;
        }
        error::ok(JsValue::from_f64(self.add_rect(x, y, w, h) as f64))
    }
    pub fn add_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32) -> u32 {
        self.inner.add_shape(Shape::ellipse(Rect::new(x, y, w, h)))
    }
    pub fn add_ellipse_res(&mut self, x: f32, y: f32, w: f32, h: f32) -> JsValue {
        if let Err(e) = check_finite(&[("x", x), ("y", y), ("w", w), ("h", h)]) {
            return e;
        }
        error::ok(JsValue::from_f64(self.add_ellipse(x, y, w, h) as f64))
    }
    pub fn add_path(&mut self, coords: &Float32Array, closed: bool) -> u32 {
        let nodes = path_nodes_from(&coords.to_vec());
        self.inner.add_shape(Shape::path(nodes, closed))
    }
    pub fn add_path_res(&mut self, coords: &Float32Array, closed: bool) -> JsValue {
        let v = coords.to_vec();
        if v.len() % 6 != 0 {
            return error::invalid_length("coords", 6, v.len() as u32);
        }
        if v.len() / 6 > limits::MAX_PATH_NODES_PER_SHAPE {
            return error::err("limit", "too many path nodes in one shape", None);
        }
        if v.iter().any(|c| !c.is_finite()) {
            return error::non_finite("coords");
        }
        let id = self.inner.add_shape(Shape::path(path_nodes_from(&v), closed));
        error::ok(JsValue::from_f64(id as f64))
    }
    pub fn add_task(&mut self, x: f32, y: f32, w: f32, h: f32, name: &str, duration: f32) -> u32 {
        self.inner
            .add_shape(Shape::task(Rect::new(x, y, w, h), Task::new(name, duration)))
    }
    pub fn add_task_res(&mut self, x: f32, y: f32, w: f32, h: f32, name: &str, duration: f32) -> JsValue {
        if let Err(e) = check_finite(&[("x", x), ("y", y), ("w", w), ("h", h)]) {
            return e;
        }
        if !limits::in_duration_bounds(duration) {
            return error::out_of_range("duration", 0.0, limits::DURATION_MAX, duration);
        }
        error::ok(JsValue::from_f64(self.add_task(x, y, w, h, name, duration) as f64))
    }
    /// Make a shape a task, or a plain shape again when `name` is undefined.
    pub fn set_task(&mut self, id: u32, name: Option<String>, duration: f32) -> bool {
        let role = match name {
            Some(n) => ShapeRole::Task(Task::new(n, duration)),
            None => ShapeRole::Plain,
        };
        self.inner.set_role(id, role)
    }
    /// `node` is six floats: main, incoming control, outgoing control.
    pub fn set_path_node(&mut self, id: u32, index: u32, node: &Float32Array) -> bool {
        match path_nodes_from(&node.to_vec()).first() {
            Some(n) => self.inner.set_path_node(id, index as usize, *n),
            None => false,
        }
    }
    pub fn insert_path_node(&mut self, id: u32, index: u32, node: &Float32Array) -> bool {
        match path_nodes_from(&node.to_vec()).first() {
            Some(n) => self.inner.insert_path_node(id, index as usize, *n),
            None => false,
        }
    }
    pub fn remove_path_node(&mut self, id: u32, index: u32) -> bool {
        self.inner.remove_path_node(id, index as usize)
    }
    pub fn set_end_arrow(&mut self, edge: u32, on: bool) -> bool {
        let Some(e) = self.inner.edge(edge) else {
            return false;
        };
        let mut decoration = e.decoration;
        decoration.end = if on { Some(ArrowTip::default()) } else { None };
        self.inner.set_edge_decoration(edge, decoration)
    }
    pub fn move_shape(&mut self, id: u32, dx: f32, dy: f32) -> bool {
        self.inner.move_shape(id, dx, dy)
    }
    pub fn move_shape_res(&mut self, id: u32, dx: f32, dy: f32) -> JsValue {
        if let Err(e) = check_finite(&[("dx", dx), ("dy", dy)]) {
            return e;
        }
        if self.inner.shape(id).is_none() {
            return error::invalid_id("shape", id);
        }
        error::ok(JsValue::from_bool(self.inner.move_shape(id, dx, dy)))
    }
    /// Ids of the edges the removal disconnected, or null for an unknown shape.
    pub fn remove_shape(&mut self, id: u32) -> JsValue {
        match self.inner.remove_shape(id) {
            Some(edges) => arr_u32(&edges).into(),
            None => JsValue::NULL,
        }
    }
    pub fn remove_shape_res(&mut self, id: u32) -> JsValue {
        if self.inner.shape(id).is_none() {
            return error::invalid_id("shape", id);
        }
        error::ok(self.remove_shape(id))
    }
    pub fn shape_count(&self) -> u32 {
        self.inner.shape_count()
    }
    pub fn shape_ids(&self) -> js_sys::Uint32Array {
        arr_u32(&self.inner.shape_ids())
    }
    pub fn shape_bounds(&self, id: u32) -> JsValue {
        match self.inner.shape_view(id) {
            Some(v) => {
                let b = v.bounds();
                arr_f32(&[b.x, b.y, b.w, b.h]).into()
            }
            None => JsValue::NULL,
        }
    }

    // Edges
    pub fn add_edge(&mut self, role: u8) -> Option<u32> {
        role_from_u8(role).map(|r| self.inner.add_edge(r))
    }
    pub fn add_edge_res(&mut self, role: u8) -> JsValue {
        match self.add_edge(role) {
            Some(id) => error::ok(JsValue::from_f64(id as f64)),
            None => error::invalid_role(role),
        }
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count()
    }
    pub fn edge_ids(&self) -> js_sys::Uint32Array {
        arr_u32(&self.inner.edge_ids())
    }
    pub fn edge_state(&self, id: u32) -> Option<String> {
        self.inner.edge_state(id).map(|s| state_name(s).to_string())
    }

    pub fn set_start(&mut self, edge: u32, owner: u32, locator: JsValue, chop: bool) -> bool {
        match connector_from_js(owner, locator, chop, false) {
            Ok(c) => self.inner.set_start(edge, c),
            Err(_) => false,
        }
    }
    pub fn set_end(&mut self, edge: u32, owner: u32, locator: JsValue, chop: bool) -> bool {
        match connector_from_js(owner, locator, chop, false) {
            Ok(c) => self.inner.set_end(edge, c),
            Err(_) => false,
        }
    }
    pub fn set_start_res(&mut self, edge: u32, owner: u32, locator: JsValue, chop: bool) -> JsValue {
        self.set_slot_res(edge, owner, locator, chop, true)
    }
    pub fn set_end_res(&mut self, edge: u32, owner: u32, locator: JsValue, chop: bool) -> JsValue {
        self.set_slot_res(edge, owner, locator, chop, false)
    }
    pub fn complete_connection(&mut self, edge: u32) -> bool {
        self.inner.complete_connection(edge).is_ok()
    }
    pub fn complete_connection_res(&mut self, edge: u32) -> JsValue {
        match self.inner.complete_connection(edge) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::connect(&e),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn connect(
        &mut self,
        edge: u32,
        start_owner: u32,
        start_locator: JsValue,
        start_chop: bool,
        end_owner: u32,
        end_locator: JsValue,
        end_chop: bool,
    ) -> bool {
        let start = connector_from_js(start_owner, start_locator, start_chop, false);
        let end = connector_from_js(end_owner, end_locator, end_chop, false);
        match (start, end) {
            (Ok(s), Ok(e)) => self.inner.try_connect(edge, s, e),
            _ => false,
        }
    }
    #[allow(clippy::too_many_arguments)]
    pub fn connect_res(
        &mut self,
        edge: u32,
        start_owner: u32,
        start_locator: JsValue,
        start_chop: bool,
        end_owner: u32,
        end_locator: JsValue,
        end_chop: bool,
    ) -> JsValue {
        let start = match connector_from_js(start_owner, start_locator, start_chop, true) {
            Ok(c) => c,
            Err(e) => return e,
        };
        let end = match connector_from_js(end_owner, end_locator, end_chop, true) {
            Ok(c) => c,
            Err(e) => return e,
        };
        match self.inner.connect(edge, start, end) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::connect(&e),
        }
    }
    pub fn disconnect(&mut self, edge: u32) -> bool {
        self.inner.disconnect(edge)
    }
    pub fn disconnect_res(&mut self, edge: u32) -> JsValue {
        if self.inner.edge(edge).is_none() {
            return error::invalid_id("edge", edge);
        }
        error::ok(JsValue::from_bool(self.inner.disconnect(edge)))
    }
    pub fn reset_edge(&mut self, edge: u32) -> bool {
        self.inner.reset_edge(edge)
    }
    pub fn remove_edge(&mut self, edge: u32) -> bool {
        self.inner.remove_edge(edge)
    }
    pub fn remove_edge_res(&mut self, edge: u32) -> JsValue {
        if self.inner.edge(edge).is_none() {
            return error::invalid_id("edge", edge);
        }
        error::ok(JsValue::from_bool(self.inner.remove_edge(edge)))
    }

    /// `{ start, end }`, each `[x, y]` or null for an empty slot.
    pub fn resolve_geometry(&self, edge: u32) -> JsValue {
        if self.inner.edge(edge).is_none() {
            return JsValue::NULL;
        }
        let (s, e) = self.inner.resolve_geometry(edge);
        let obj = new_obj();
        set_kv(&obj, "start", &point_or_null(s));
        set_kv(&obj, "end", &point_or_null(e));
        obj.into()
    }
    pub fn resolve_geometry_res(&self, edge: u32) -> JsValue {
        if self.inner.edge(edge).is_none() {
            return error::invalid_id("edge", edge);
        }
        error::ok(self.resolve_geometry(edge))
    }
    /// Eight floats per arrow: tip, left barb, notch, right barb.
    pub fn decoration_outlines(&self, edge: u32) -> Float32Array {
        let pts: Vec<Point> = self
            .inner
            .decoration_outlines(edge)
            .into_iter()
            .flatten()
            .collect();
        arr_points(&pts)
    }

    // Dependencies
    pub fn can_add_dependency(&self, source: u32, target: u32) -> bool {
        self.inner.can_add_dependency(source, target)
    }
    pub fn predecessors(&self, task: u32) -> js_sys::Uint32Array {
        arr_u32(&self.inner.tracker().predecessors(task))
    }
    pub fn successors(&self, task: u32) -> js_sys::Uint32Array {
        arr_u32(&self.inner.tracker().successors(task))
    }
    pub fn topological_order(&self) -> js_sys::Uint32Array {
        arr_u32(&self.inner.tracker().topological_order())
    }
    pub fn schedule(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.schedule()).unwrap_or(JsValue::NULL)
    }

    // Settings + JSON
    pub fn flatten_tolerance(&self) -> f32 {
        self.inner.flatten_tolerance()
    }
    pub fn set_flatten_tolerance(&mut self, tol: f32) -> bool {
        self.inner.set_flatten_tolerance(tol)
    }
    pub fn set_flatten_tolerance_res(&mut self, tol: f32) -> JsValue {
        if !tol.is_finite() {
            return error::non_finite("tol");
        }
        if !self.inner.set_flatten_tolerance(tol) {
            return error::out_of_range("tol", 0.0, f32::INFINITY, tol);
        }
        error::ok(JsValue::TRUE)
    }
    pub fn to_json(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.to_json_value()).unwrap_or(JsValue::NULL)
    }
    pub fn from_json(&mut self, v: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => self.inner.from_json_value(val),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!("from_json: {}", e)));
                false
            }
        }
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => match self.inner.from_json_value_strict(val) {
                Ok(ok) => error::ok(JsValue::from_bool(ok)),
                Err((code, msg)) => error::err(code, msg, None),
            },
            Err(e) => error::err("json_parse", format!("{}", e), None),
        }
    }
}

impl Drawing {
    fn set_slot_res(&mut self, edge: u32, owner: u32, locator: JsValue, chop: bool, start: bool) -> JsValue {
        let c = match connector_from_js(owner, locator, chop, true) {
            Ok(c) => c,
            Err(e) => return e,
        };
        let filled = if start {
            self.inner.fill_start(edge, c)
        } else {
            self.inner.fill_end(edge, c)
        };
        match filled {
            Ok(state) => error::ok(JsValue::from_str(state_name(state))),
            Err(e) => error::connect(&e),
        }
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}
