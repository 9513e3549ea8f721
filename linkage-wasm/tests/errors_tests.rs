use js_sys::{Object, Reflect};
use linkage_wasm::Drawing;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn locator(kind: &str, pairs: &[(&str, f64)]) -> JsValue {
    let o = Object::new();
    let _ = Reflect::set(&o, &JsValue::from_str("type"), &JsValue::from_str(kind));
    for (k, v) in pairs {
        let _ = Reflect::set(&o, &JsValue::from_str(k), &JsValue::from_f64(*v));
    }
    o.into()
}

#[wasm_bindgen_test]
fn invalid_ids_and_values_return_typed_errors() {
    let mut d = Drawing::new();
    let ver = d.geom_version();
    assert!(is_err(&d.move_shape_res(12345, 1.0, 0.0), "invalid_id"));
    assert!(is_err(&d.remove_edge_res(9999), "invalid_id"));
    assert!(is_err(&d.add_rect_res(f32::NAN, 0.0, 1.0, 1.0), "non_finite"));
    assert!(is_err(&d.add_rect_res(1.0e9, 0.0, 1.0, 1.0), "out_of_range"));
    assert!(is_err(&d.add_task_res(0.0, 0.0, 1.0, 1.0, "t", -1.0), "out_of_range"));
    assert!(is_err(&d.add_edge_res(7), "invalid_role"));
    assert!(is_err(&d.set_flatten_tolerance_res(-0.1), "out_of_range"));
    assert_eq!(d.geom_version(), ver, "state mutated on error");
}

#[wasm_bindgen_test]
fn connect_refusals_carry_codes() {
    let mut d = Drawing::new();
    let a = d.add_task(0.0, 0.0, 40.0, 20.0, "a", 1.0);
    let b = d.add_task(100.0, 0.0, 40.0, 20.0, "b", 1.0);
    let plain = d.add_rect(0.0, 100.0, 10.0, 10.0);
    let e0 = d.add_edge(1).unwrap();
    let e1 = d.add_edge(1).unwrap();
    let e2 = d.add_edge(1).unwrap();
    let c = JsValue::UNDEFINED;

    let ok = d.connect_res(e0, a, c.clone(), true, b, c.clone(), true);
    assert_eq!(Reflect::get(&ok, &JsValue::from_str("ok")).unwrap().as_bool(), Some(true));
    assert_eq!(d.edge_state(e0).as_deref(), Some("connected"));
    let ver = d.geom_version();
    assert!(is_err(&d.connect_res(e1, b, c.clone(), true, a, c.clone(), true), "cycle"));
    assert!(is_err(&d.connect_res(e1, a, c.clone(), true, b, c.clone(), true), "duplicate"));
    assert!(is_err(&d.connect_res(e1, a, c.clone(), true, plain, c.clone(), true), "not_participant"));
    assert!(is_err(&d.connect_res(e0, a, c.clone(), true, b, c.clone(), true), "already_connected"));
    assert!(is_err(&d.complete_connection_res(e2), "incomplete"));
    assert_eq!(d.geom_version(), ver);
    assert_eq!(d.edge_state(e1).as_deref(), Some("unconnected"));
}

#[wasm_bindgen_test]
fn locator_objects_are_validated() {
    let mut d = Drawing::new();
    let a = d.add_rect(0.0, 0.0, 10.0, 10.0);
    let b = d.add_rect(50.0, 0.0, 10.0, 10.0);
    let e = d.add_edge(0).unwrap();
    let unknown = locator("spiralLocator", &[]);
    assert!(is_err(&d.set_start_res(e, a, unknown, false), "invalid_locator"));
    let bad = locator("pathNodeLocator", &[("index", 1.5)]);
    assert!(is_err(&d.set_start_res(e, a, bad, false), "invalid_attribute"));
    let rel = locator("relativeLocator", &[("relativeX", 1.0), ("relativeY", 0.5)]);
    assert!(!is_err(&d.set_start_res(e, a, rel, false), "invalid_locator"));
    assert_eq!(d.edge_state(e).as_deref(), Some("partially_connected"));
    assert!(is_err(&d.set_end_res(e, 999, JsValue::NULL, false), "invalid_id"));
    assert!(d.set_end(e, b, JsValue::NULL, false));
    assert_eq!(d.edge_state(e).as_deref(), Some("connected"));
    assert!(!d.complete_connection(e));
}

#[wasm_bindgen_test]
fn non_scalar_locator_fields_read_as_defaults() {
    let mut d = Drawing::new();
    let a = d.add_rect(0.0, 0.0, 10.0, 10.0);
    let e = d.add_edge(0).unwrap();
    let o = Object::new();
    let _ = Reflect::set(&o, &JsValue::from_str("type"), &JsValue::from_str("pathNodeLocator"));
    let _ = Reflect::set(&o, &JsValue::from_str("index"), &JsValue::NULL);
    let loc: JsValue = o.into();
    assert!(is_err(&d.set_start_res(e, a, loc.clone(), false), "invalid_attribute"));
    assert!(d.set_start(e, a, loc, false));
    assert!(is_err(&d.set_end_res(e, a, locator("offsetLocator", &[("offsetX", f64::NAN)]), false), "invalid_attribute"));
}

#[wasm_bindgen_test]
fn json_res_reports_load_errors() {
    let mut d = Drawing::new();
    assert!(is_err(&d.from_json_res(JsValue::from_str("nope")), "parse"));
}
