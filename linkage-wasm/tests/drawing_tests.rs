use js_sys::{Array, Float32Array, Reflect};
use linkage_wasm::Drawing;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn chopped_dependency_geometry() {
    let mut d = Drawing::new();
    let a = d.add_task(0.0, 0.0, 40.0, 20.0, "a", 2.0);
    let b = d.add_task(100.0, 0.0, 40.0, 20.0, "b", 3.0);
    let e = d.add_edge(1).unwrap();
    assert!(d.connect(e, a, JsValue::UNDEFINED, true, b, JsValue::UNDEFINED, true));

    let g = d.resolve_geometry(e);
    let start = Float32Array::from(Reflect::get(&g, &JsValue::from_str("start")).unwrap()).to_vec();
    let end = Float32Array::from(Reflect::get(&g, &JsValue::from_str("end")).unwrap()).to_vec();
    assert_eq!(start, vec![40.0, 10.0]);
    assert_eq!(end, vec![100.0, 10.0]);
    assert_eq!(d.decoration_outlines(e).length(), 8);
    assert_eq!(d.successors(a).to_vec(), vec![b]);
    assert_eq!(d.topological_order().to_vec(), vec![a, b]);
}

#[wasm_bindgen_test]
fn remove_shape_lists_detached_edges() {
    let mut d = Drawing::new();
    let a = d.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = d.add_rect(50.0, 0.0, 10.0, 10.0);
    let e = d.add_edge(0).unwrap();
    assert!(d.connect(e, a, JsValue::NULL, false, b, JsValue::NULL, false));
    let detached = js_sys::Uint32Array::from(d.remove_shape(a)).to_vec();
    assert_eq!(detached, vec![e]);
    assert_eq!(d.edge_state(e).as_deref(), Some("disconnected"));
    assert!(d.remove_shape(a).is_null());
}

#[wasm_bindgen_test]
fn json_round_trip_and_schedule() {
    let mut d = Drawing::new();
    let a = d.add_task(0.0, 0.0, 40.0, 20.0, "a", 2.0);
    let b = d.add_task(100.0, 0.0, 40.0, 20.0, "b", 3.0);
    let e = d.add_edge(1).unwrap();
    assert!(d.connect(e, a, JsValue::NULL, true, b, JsValue::NULL, true));
    let json = d.to_json();

    let mut back = Drawing::new();
    assert!(back.from_json(json));
    assert_eq!(back.edge_state(e).as_deref(), Some("connected"));
    let s = back.schedule();
    let makespan = Reflect::get(&s, &JsValue::from_str("makespan")).unwrap();
    assert_eq!(makespan.as_f64(), Some(5.0));
    let critical = Array::from(&Reflect::get(&s, &JsValue::from_str("critical_path")).unwrap());
    assert_eq!(critical.length(), 2);
}
