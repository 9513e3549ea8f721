use crate::interop::{new_obj, set_kv};
use linkage::{AttrError, ConnectError};
use wasm_bindgen::JsValue;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f32, max: f32, got: f32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min as f64));
    set_kv(&d, "max", &JsValue::from_f64(max as f64));
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_role(got: u8) -> JsValue {
    let d = new_obj();
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("invalid_role", "role must be 0:Plain, 1:Dependency", Some(d.into()))
}

#[inline]
pub fn invalid_length(param: &str, multiple_of: u32, got: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "multiple_of", &JsValue::from_f64(multiple_of as f64));
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("invalid_length", format!("length of '{}' must be a multiple of {}", param, multiple_of), Some(d.into()))
}

pub fn invalid_locator(message: impl Into<String>) -> JsValue {
    err("invalid_locator", message, None)
}

pub fn attribute(e: &AttrError) -> JsValue {
    err("invalid_attribute", e.to_string(), None)
}

/// Connection refusals keep the core error's code so callers can branch on it.
pub fn connect(e: &ConnectError) -> JsValue {
    let d = new_obj();
    match e {
        ConnectError::Duplicate { from, to } | ConnectError::Cycle { from, to } => {
            set_kv(&d, "from", &JsValue::from_f64(*from as f64));
            set_kv(&d, "to", &JsValue::from_f64(*to as f64));
        }
        ConnectError::MissingEdge(id)
        | ConnectError::AlreadyConnected(id)
        | ConnectError::Incomplete(id) => set_kv(&d, "edge", &JsValue::from_f64(*id as f64)),
        ConnectError::MissingShape(id)
        | ConnectError::NonFiniteLocator(id)
        | ConnectError::NotParticipant(id)
        | ConnectError::SameOwner(id) => {
            set_kv(&d, "shape", &JsValue::from_f64(*id as f64))
        }
    }
    err(e.code(), e.to_string(), Some(d.into()))
}
