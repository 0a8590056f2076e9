//! Small `Reflect` helpers for objects that have no typed binding.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

#[inline]
pub fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

#[inline]
pub fn get_f64(target: &JsValue, key: &str) -> Option<f64> {
    get(target, key).ok().and_then(|v| v.as_f64())
}

#[inline]
pub fn get_string(target: &JsValue, key: &str) -> Option<String> {
    get(target, key).ok().and_then(|v| v.as_string())
}

#[inline]
pub fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

pub fn has_function(target: &JsValue, key: &str) -> bool {
    get(target, key).map(|v| v.is_function()).unwrap_or(false)
}

/// Call `target[method](...args)`.
pub fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let f: Function = get(target, method)?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("`{method}` is not a function")))?;
    let args: Array = args.iter().collect();
    f.apply(target, &args)
}

/// `new target[ctor](...args)`.
pub fn construct(target: &JsValue, ctor: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let f: Function = get(target, ctor)?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("`{ctor}` is not a constructor")))?;
    let args: Array = args.iter().collect();
    Reflect::construct(&f, &args)
}

/// A property of the global object, e.g. `RNBO` or `JZZ`.
pub fn global(name: &str) -> Result<JsValue, JsValue> {
    let value = get(&js_sys::global(), name)?;
    if value.is_undefined() {
        return Err(JsValue::from_str(&format!("`{name}` is not loaded")));
    }
    Ok(value)
}

/// Render a JS error for logs and alerts.
pub fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(message) = get_string(value, "message") {
        return message;
    }
    format!("{:?}", value)
}
