use crate::{js, AppState};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

/// Keep the screen awake while playing. Requested once; failure only logs.
pub fn request(state: &AppState) {
    if state.wake_lock_requested.replace(true) {
        return;
    }
    let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
        return;
    };
    let wake_lock = js::get(&navigator, "wakeLock").unwrap_or(JsValue::UNDEFINED);
    if wake_lock.is_undefined() {
        log::warn!("[wakelock] not supported by this browser");
        return;
    }
    let request = match js::call(&wake_lock, "request", &[JsValue::from_str("screen")]) {
        Ok(p) => Promise::resolve(&p),
        Err(e) => {
            log::warn!("[wakelock] {}", js::describe(&e));
            return;
        }
    };
    spawn_local(async move {
        match JsFuture::from(request).await {
            Ok(sentinel) => {
                log::info!("[wakelock] screen wake lock active");
                let released = Closure::wrap(Box::new(|| {
                    log::info!("[wakelock] screen wake lock released");
                }) as Box<dyn FnMut()>);
                _ = js::call(
                    &sentinel,
                    "addEventListener",
                    &[JsValue::from_str("release"), released.as_ref().clone()],
                );
                released.forget();
            }
            Err(e) => log::warn!("[wakelock] {}", js::describe(&e)),
        }
    });
}
