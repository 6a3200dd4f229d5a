use wasm_bindgen::prelude::*;
use js_sys::Object;
use floorplan::SceneError;
use crate::interop::set_kv;

pub fn ok(v: JsValue) -> JsValue {
    let o = Object::new();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = Object::new();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = Object::new();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// Same envelope as [`err`], keyed by the core error's stable code.
pub fn scene(e: &SceneError) -> JsValue {
    let data = match e {
        SceneError::LimitExceeded { what, limit } => {
            let d = Object::new();
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "limit", &JsValue::from_f64(*limit as f64));
            Some(d.into())
        }
        SceneError::NonFinite(param) => {
            let d = Object::new();
            set_kv(&d, "param", &JsValue::from_str(param));
            Some(d.into())
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = Object::new(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = Object::new();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_enum(param: &str, got: u8, expected: &'static str) -> JsValue {
    let d = Object::new();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("invalid_enum", format!("{} must be {}", param, expected), Some(d.into()))
}
