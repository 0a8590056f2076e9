//! Bindings to the MOBRave WASM engine module and the latent exchange with RNBO.

use crate::constants::WORKLET_CREATED_CALLBACK;
use crate::rnbo;
use crate::tracking::WebSpawner;
use crate::{js, AppState};
use js_sys::{Float32Array, Promise};
use mobrave_core::{wait_both, EngineMetrics, Settler, Spawner, LATENTS_IN_TAG};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    /// Emscripten factory for the engine module.
    #[wasm_bindgen(js_name = MOBRave)]
    fn mobrave_factory() -> JsValue;

    #[derive(Clone, Debug)]
    pub type Engine;

    #[wasm_bindgen(method, js_name = setCurrentModel)]
    pub fn set_current_model(this: &Engine, weights: &JsValue);

    #[wasm_bindgen(method, js_name = setLatentsCallback)]
    pub fn set_latents_callback(this: &Engine, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = setBypassed)]
    pub fn set_bypassed(this: &Engine, bypassed: bool);

    #[wasm_bindgen(method, js_name = getMetrics)]
    fn get_metrics_raw(this: &Engine) -> JsValue;

    #[wasm_bindgen(method, js_name = emscriptenRegisterAudioObject)]
    fn register_audio_object(this: &Engine, object: &JsValue) -> JsValue;

    #[wasm_bindgen(method, js_name = createWasmAudioThread)]
    fn create_wasm_audio_thread(this: &Engine, context: &JsValue);

    #[wasm_bindgen(method, getter, js_name = HEAPF32)]
    fn heap_f32(this: &Engine) -> Float32Array;
}

impl Engine {
    pub fn metrics(&self) -> EngineMetrics {
        let raw = self.get_metrics_raw();
        EngineMetrics::from_lookup(|name| js::get_f64(&raw, name))
    }

    /// Hand the audio context to the engine and start its worklet thread.
    ///
    /// Must stay synchronous: it runs inside the play-button gesture.
    pub fn start_audio_thread(&self, ctx: &web::AudioContext) {
        let handle = self.register_audio_object(ctx);
        self.create_wasm_audio_thread(&handle);
        log::info!("[engine] audio thread requested");
    }
}

/// Start instantiating the engine module.
pub async fn load() -> Result<Engine, JsValue> {
    log::info!("Loading WASM module...");
    let module = JsFuture::from(Promise::resolve(&mobrave_factory())).await?;
    log::info!("Finished loading MOBRave WASM instance");
    Ok(module.unchecked_into())
}

/// Expose the global callback the engine invokes once its worklet node exists.
///
/// The engine calls it from its own runtime, so the worklet tracker is
/// settled through a [`Settler`] rather than directly.
pub fn install_worklet_callback(settler: Settler<web::AudioNode, JsValue>) {
    let callback = Closure::wrap(Box::new(move |node: JsValue| {
        log::info!("[engine] worklet node created");
        if node.is_undefined() || node.is_null() {
            settler.reject(JsValue::from_str("engine reported an empty worklet node"));
        } else {
            settler.resolve(node.unchecked_into());
        }
    }) as Box<dyn FnMut(JsValue)>);
    if let Some(w) = web::window() {
        _ = js::set(&w, WORKLET_CREATED_CALLBACK, callback.as_ref());
    }
    callback.forget();
}

/// Load the model weights into the engine once both are available.
pub async fn load_model(state: Rc<AppState>) -> anyhow::Result<()> {
    let (engine, weights) = wait_both(&state.engine, &state.weights)
        .await
        .map_err(|e| anyhow::anyhow!("model load failed: {}", js::describe(e.inner())))?;
    log::info!("Loading Model Weights...");
    engine.set_current_model(&weights);
    state.model_loaded.set(true);
    log::info!("Loading Model Weights... Done");
    Ok(())
}

/// Connect the engine's latents to the device in both directions.
pub fn wire_latents(state: &Rc<AppState>, engine: &Engine, device: &rnbo::Device) {
    let inbound = state.clone();
    device.on_message(move |tag, payload| {
        if let Ok(mut latents) = inbound.latents.try_borrow_mut() {
            latents.receive(&tag, &payload);
        }
    });

    let outbound = state.clone();
    let engine_cb = engine.clone();
    let device_cb = device.clone();
    let callback = Closure::wrap(Box::new(move |ptr: u32, count: u32| {
        let heap = engine_cb.heap_f32();
        let view = Float32Array::new_with_byte_offset_and_length(&heap.buffer(), ptr, count);
        let mut values = view.to_vec();

        device_cb.send_message(LATENTS_IN_TAG, &values);

        let written = match outbound.latents.try_borrow() {
            Ok(latents) => latents.merge_into(&mut values),
            Err(_) => 0,
        };
        if written > 0 {
            view.subarray(0, written as u32)
                .copy_from(&values[..written]);
        }
    }) as Box<dyn FnMut(u32, u32)>);
    engine.set_latents_callback(callback.as_ref().unchecked_ref());
    callback.forget();
    log::info!("[engine] latent exchange wired");
}

/// Register the context with the engine from a task once it has loaded.
pub fn defer_registration(state: Rc<AppState>, ctx: web::AudioContext) {
    WebSpawner.spawn(Box::pin(async move {
        match state.engine.wait().await {
            Ok(engine) => engine.start_audio_thread(&ctx),
            Err(e) => log::error!(
                "[engine] cannot start audio thread: {}",
                js::describe(e.inner())
            ),
        }
    }));
}
