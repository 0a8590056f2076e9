//! Bindings to the RNBO device runtime.

use crate::constants::RNBO_MIDI_PORT;
use crate::{engine, js, ui, AppState};
use js_sys::{Array, Object};
use mobrave_core::{ParamBindings, ParamDesc, ParamSink, SensorReadings};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type Device;

    #[wasm_bindgen(method, getter)]
    pub fn node(this: &Device) -> web::AudioNode;

    #[wasm_bindgen(method, getter)]
    fn parameters(this: &Device) -> Array;

    #[wasm_bindgen(method, getter, js_name = numParameters)]
    pub fn num_parameters(this: &Device) -> u32;

    #[wasm_bindgen(method, getter, js_name = parametersById)]
    fn parameters_by_id(this: &Device) -> js_sys::Map;

    #[wasm_bindgen(method, getter, js_name = messageEvent)]
    fn message_event(this: &Device) -> EventSubject;

    #[wasm_bindgen(method, getter, js_name = parameterChangeEvent)]
    fn parameter_change_event(this: &Device) -> EventSubject;

    #[wasm_bindgen(method, js_name = scheduleEvent)]
    fn schedule_event(this: &Device, event: &JsValue);

    type EventSubject;

    #[wasm_bindgen(method)]
    fn subscribe(this: &EventSubject, handler: &js_sys::Function) -> JsValue;

    #[derive(Clone, Debug)]
    pub type Parameter;

    #[wasm_bindgen(method, getter)]
    pub fn id(this: &Parameter) -> String;

    #[wasm_bindgen(method, getter)]
    pub fn name(this: &Parameter) -> String;

    #[wasm_bindgen(method, getter)]
    pub fn min(this: &Parameter) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn max(this: &Parameter) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn steps(this: &Parameter) -> u32;

    #[wasm_bindgen(method, getter)]
    pub fn value(this: &Parameter) -> f64;

    #[wasm_bindgen(method, setter, js_name = value)]
    fn set_value_js(this: &Parameter, value: f64);
}

impl ParamSink for Parameter {
    fn set_value(&self, value: f64) {
        self.set_value_js(value);
    }
}

impl Parameter {
    pub fn desc(&self) -> ParamDesc {
        ParamDesc::new(
            self.id(),
            self.name(),
            self.min(),
            self.max(),
            self.steps(),
            self.value(),
        )
    }
}

const SENSOR_LISTENER_ID: &str = "rnbo.params";

fn rnbo() -> Result<JsValue, JsValue> {
    js::global("RNBO")
}

fn time_now() -> JsValue {
    rnbo()
        .and_then(|r| js::get(&r, "TimeNow"))
        .unwrap_or_else(|_| JsValue::from_f64(0.0))
}

impl Device {
    pub fn params(&self) -> Vec<Parameter> {
        self.parameters()
            .iter()
            .map(|p| p.unchecked_into::<Parameter>())
            .collect()
    }

    pub fn param(&self, id: &str) -> Option<Parameter> {
        let p = self.parameters_by_id().get(&JsValue::from_str(id));
        (!p.is_undefined() && !p.is_null()).then(|| p.unchecked_into())
    }

    /// Subscribe to outgoing messages as `(tag, numeric payload)`.
    pub fn on_message(&self, mut handler: impl FnMut(String, Vec<f32>) + 'static) {
        let closure = Closure::wrap(Box::new(move |ev: JsValue| {
            let Some(tag) = js::get_string(&ev, "tag") else {
                return;
            };
            let payload = js::get(&ev, "payload").unwrap_or(JsValue::UNDEFINED);
            let values = if Array::is_array(&payload) {
                Array::from(&payload)
                    .iter()
                    .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                    .collect()
            } else {
                payload.as_f64().map(|v| vec![v as f32]).unwrap_or_default()
            };
            handler(tag, values);
        }) as Box<dyn FnMut(JsValue)>);
        self.message_event()
            .subscribe(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn on_parameter_change(&self, mut handler: impl FnMut(Parameter) + 'static) {
        let closure = Closure::wrap(Box::new(move |param: JsValue| {
            handler(param.unchecked_into());
        }) as Box<dyn FnMut(JsValue)>);
        self.parameter_change_event()
            .subscribe(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn send_message(&self, tag: &str, values: &[f32]) {
        let payload: Array = values.iter().map(|v| JsValue::from_f64(*v as f64)).collect();
        let event = rnbo().and_then(|r| {
            js::construct(
                &r,
                "MessageEvent",
                &[time_now(), JsValue::from_str(tag), payload.into()],
            )
        });
        match event {
            Ok(event) => self.schedule_event(&event),
            Err(e) => log::error!("[rnbo] message event: {}", js::describe(&e)),
        }
    }

    pub fn send_midi(&self, bytes: &[u8]) {
        let data: Array = bytes.iter().map(|b| JsValue::from(*b)).collect();
        let event = rnbo().and_then(|r| {
            js::construct(
                &r,
                "MIDIEvent",
                &[time_now(), JsValue::from(RNBO_MIDI_PORT), data.into()],
            )
        });
        match event {
            Ok(event) => self.schedule_event(&event),
            Err(e) => log::error!("[rnbo] midi event: {}", js::describe(&e)),
        }
    }
}

async fn create_device(ctx: &web::AudioContext, patcher: &JsValue) -> Result<Device, JsValue> {
    let options = Object::new();
    js::set(&options, "context", ctx)?;
    js::set(&options, "patcher", patcher)?;
    let promise = js::call(&rnbo()?, "createDevice", &[options.into()])?;
    let device = JsFuture::from(js_sys::Promise::resolve(&promise)).await?;
    Ok(device.unchecked_into())
}

async fn build_device(state: &Rc<AppState>) -> Result<Device, JsValue> {
    let patcher = state.patcher.wait().await.map_err(|e| e.into_inner())?;
    let ctx = state.audio_context.wait().await.map_err(|e| e.into_inner())?;

    let device = create_device(&ctx, &patcher).await?;
    log::info!("[rnbo] device created: {} parameters", device.num_parameters());
    ui::make_sliders(state, &device);

    let engine = state.engine.wait().await.map_err(|e| e.into_inner())?;
    engine::wire_latents(state, &engine, &device);

    let bindings = ParamBindings::from_lookup(|id| device.param(id));
    log::info!("[rnbo] {} sensor parameters bound", bindings.bound_count());
    state
        .sensor_listeners
        .borrow_mut()
        .add(SENSOR_LISTENER_ID, move |readings: &SensorReadings| {
            if let Some(accel) = readings.accel {
                bindings.apply_accel(accel);
            }
            if let Some(rotation) = readings.rotation {
                bindings.apply_rotation(rotation);
            }
            bindings.apply_heading(readings.heading);
            bindings.apply_step_count(readings.step_count);
        });

    Ok(device)
}

/// Create the device and settle the device tracker with the result.
pub async fn setup_device(state: Rc<AppState>) {
    match build_device(&state).await {
        Ok(device) => {
            state.device.resolve(device);
        }
        Err(e) => {
            let message = format!("Couldn't create the RNBO device: {}", js::describe(&e));
            log::error!("{}", message);
            crate::dom::alert(&message);
            state.device.reject(e);
        }
    }
}
