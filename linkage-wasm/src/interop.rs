use js_sys::{Float32Array, Object, Reflect, Uint32Array};
use linkage::Point;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object {
    Object::new()
}
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice);
    arr
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice);
    arr
}
/// `[x, y]` pairs flattened in order.
pub fn arr_points(points: &[Point]) -> Float32Array {
    let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    arr_f32(&flat)
}
pub fn point_or_null(p: Option<Point>) -> JsValue {
    match p {
        Some(p) => arr_points(&[p]).into(),
        None => JsValue::NULL,
    }
}
