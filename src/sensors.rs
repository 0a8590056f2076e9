//! Browser sensor adapters: motion, orientation and geolocation.

use crate::{dom, js, AppState};
use glam::DVec3;
use js_sys::{Object, Promise};
use mobrave_core::{
    heading_from, orientation_from_euler, MotionSample, Permission, PermissionProbe,
    GEOLOCATION_UNSUPPORTED, MOTION_DENIED, ORIENTATION_DENIED,
};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

fn probe(event_type: &str) -> PermissionProbe {
    match js::global(event_type) {
        Err(_) => PermissionProbe::Unavailable,
        Ok(ctor) if js::has_function(&ctor, "requestPermission") => PermissionProbe::Prompt,
        Ok(_) => PermissionProbe::Implicit,
    }
}

/// Ask for access to `event_type` and call `granted` with the answer.
///
/// `requestPermission` is called synchronously so it still counts as part
/// of the user gesture; only the answer is awaited.
fn request_permission(event_type: &'static str, granted: impl FnOnce(Permission) + 'static) {
    let probe = probe(event_type);
    if let Some(answer) = probe.immediate() {
        granted(answer);
        return;
    }
    let request =
        js::global(event_type).and_then(|ctor| js::call(&ctor, "requestPermission", &[]));
    let promise = match request {
        Ok(p) => Promise::resolve(&p),
        Err(e) => {
            log::warn!("[sensors] {}.requestPermission: {}", event_type, js::describe(&e));
            granted(Permission::Denied);
            return;
        }
    };
    spawn_local(async move {
        let answer = match JsFuture::from(promise).await {
            Ok(v) => Permission::from_response(&v.as_string().unwrap_or_default()),
            Err(e) => {
                log::warn!("[sensors] {} permission: {}", event_type, js::describe(&e));
                Permission::Denied
            }
        };
        granted(answer);
    });
}

fn vec_of(a: Option<web::DeviceAcceleration>) -> Option<DVec3> {
    let a = a?;
    let (x, y, z) = (a.x(), a.y(), a.z());
    if x.is_none() && y.is_none() && z.is_none() {
        return None;
    }
    Some(DVec3::new(x.unwrap_or(0.0), y.unwrap_or(0.0), z.unwrap_or(0.0)))
}

fn notify(state: &AppState) {
    let snapshot = state.sensors.borrow().clone();
    if let Ok(mut listeners) = state.sensor_listeners.try_borrow_mut() {
        listeners.notify(&snapshot);
    }
}

fn on_motion(state: &AppState, ev: web::DeviceMotionEvent) {
    let sample = MotionSample {
        acceleration: vec_of(ev.acceleration()),
        including_gravity: vec_of(ev.acceleration_including_gravity()),
    };
    if let Some(accel) = sample.reading() {
        state.sensors.borrow_mut().apply_motion(accel);
    }
    if let Some(input) = sample.step_input() {
        if let Some(count) = state.steps.borrow_mut().update(input) {
            state.sensors.borrow_mut().apply_steps(count);
        }
    }
    notify(state);
}

fn on_orientation(state: &AppState, ev: web::DeviceOrientationEvent) {
    let rotation = orientation_from_euler(
        ev.alpha().unwrap_or(0.0),
        ev.beta().unwrap_or(0.0),
        ev.gamma().unwrap_or(0.0),
    );
    state.sensors.borrow_mut().apply_orientation(rotation);
    notify(state);
}

fn on_position(state: &AppState, position: JsValue) {
    let heading = js::get(&position, "coords")
        .ok()
        .and_then(|coords| js::get(&coords, "heading").ok())
        .and_then(|h| h.as_f64());
    state.sensors.borrow_mut().apply_heading(heading_from(heading));
    notify(state);
}

fn listen_motion(state: Rc<AppState>) {
    request_permission("DeviceMotionEvent", move |answer| {
        if !answer.is_granted() {
            log::error!("{}", MOTION_DENIED);
            dom::alert(MOTION_DENIED);
            return;
        }
        let Some(w) = web::window() else { return };
        dom::add_listener::<web::DeviceMotionEvent>(&w, "devicemotion", move |ev| {
            on_motion(&state, ev)
        });
        log::info!("[sensors] devicemotion listening");
    });
}

fn listen_orientation(state: Rc<AppState>) {
    request_permission("DeviceOrientationEvent", move |answer| {
        if !answer.is_granted() {
            log::error!("{}", ORIENTATION_DENIED);
            dom::alert(ORIENTATION_DENIED);
            return;
        }
        let Some(w) = web::window() else { return };
        dom::add_listener::<web::DeviceOrientationEvent>(&w, "deviceorientation", move |ev| {
            on_orientation(&state, ev)
        });
        log::info!("[sensors] deviceorientation listening");
    });
}

fn watch_position(state: Rc<AppState>) -> Result<(), JsValue> {
    let geolocation = web::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .navigator()
        .geolocation()?;

    let settings = state.config.geolocation;
    let options = Object::new();
    js::set(&options, "enableHighAccuracy", &settings.enable_high_accuracy.into())?;
    js::set(&options, "maximumAge", &settings.maximum_age_ms.into())?;
    js::set(&options, "timeout", &settings.timeout_ms.into())?;

    let success = Closure::wrap(Box::new(move |position: JsValue| {
        on_position(&state, position)
    }) as Box<dyn FnMut(JsValue)>);
    let failure = Closure::wrap(Box::new(|err: JsValue| {
        log::warn!("[sensors] geolocation: {}", js::describe(&err));
    }) as Box<dyn FnMut(JsValue)>);

    geolocation.watch_position_with_error_callback_and_options(
        success.as_ref().unchecked_ref(),
        Some(failure.as_ref().unchecked_ref()),
        options.unchecked_ref::<web::PositionOptions>(),
    )?;
    success.forget();
    failure.forget();
    log::info!("[sensors] geolocation watching");
    Ok(())
}

/// Start every sensor. Runs inside the play-button gesture.
pub fn start(state: Rc<AppState>) {
    listen_motion(state.clone());
    listen_orientation(state.clone());
    if let Err(e) = watch_position(state) {
        log::error!("{}: {}", GEOLOCATION_UNSUPPORTED, js::describe(&e));
    }
}
