use crate::constants::{DEVICE_SETUP_DELAY_MS, PLAY_BUTTON_ID};
use crate::{dom, engine, js, midi, rnbo, sensors, wakelock, AppState};
use mobrave_core::{plan, GestureContext, GestureStep, AUDIO_CONTEXT_FAILED};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Create an `AudioContext`, falling back to the prefixed Safari constructor.
pub fn create_audio_context() -> Result<web::AudioContext, JsValue> {
    match web::AudioContext::new() {
        Ok(ctx) => Ok(ctx),
        Err(e) => {
            log::warn!("[audio] AudioContext unavailable: {}", js::describe(&e));
            let ctx = js::construct(&js_sys::global(), "webkitAudioContext", &[])?;
            Ok(ctx.unchecked_into())
        }
    }
}

pub fn state_label(ctx: &web::AudioContext) -> &'static str {
    match ctx.state() {
        web::AudioContextState::Suspended => "suspended",
        web::AudioContextState::Running => "running",
        web::AudioContextState::Closed => "closed",
        _ => "unknown",
    }
}

fn gesture_context(state: &AppState) -> GestureContext {
    let ctx = state.audio_context.value();
    GestureContext {
        audio_context_created: state.audio_context.is_settled(),
        audio_context_failed: state.audio_context.is_rejected(),
        engine_ready: state.engine.is_resolved(),
        sensors_started: state.sensors_started.get(),
        audio_running: ctx
            .map(|c| c.state() == web::AudioContextState::Running)
            .unwrap_or(false),
    }
}

/// Play-button handler.
///
/// Runs synchronously inside the click: nothing here may await, otherwise
/// Safari hands out a context that never produces sound.
pub fn toggle_audio(state: &Rc<AppState>) {
    let context = gesture_context(state);
    if context.audio_context_failed {
        log::error!("[audio] AudioContext failed earlier, reload the page to retry");
        dom::alert(AUDIO_CONTEXT_FAILED);
        return;
    }
    let plan = plan(&context);
    log::debug!("[audio] gesture plan: {:?}", plan.steps);

    for step in &plan.steps {
        match step {
            GestureStep::CreateAudioContext => match create_audio_context() {
                Ok(ctx) => {
                    if !state.audio_context.resolve(ctx) {
                        log::error!("[audio] AudioContext already settled, new context dropped");
                        return;
                    }
                    log::info!("[audio] AudioContext created");
                }
                Err(e) => {
                    let message = format!("Couldn't create an AudioContext: {}", js::describe(&e));
                    log::error!("{}", message);
                    dom::alert(&message);
                    state.audio_context.reject(e);
                    return;
                }
            },
            GestureStep::SuspendAudioContext => {
                if let Some(ctx) = state.audio_context.value() {
                    _ = ctx.suspend();
                }
            }
            GestureStep::RegisterWithEngine => {
                if let (Some(engine), Some(ctx)) =
                    (state.engine.value(), state.audio_context.value())
                {
                    engine.start_audio_thread(&ctx);
                }
            }
            GestureStep::DeferEngineRegistration => {
                if let Some(ctx) = state.audio_context.value() {
                    log::info!("[audio] engine still loading, registration deferred");
                    engine::defer_registration(state.clone(), ctx);
                }
            }
            GestureStep::ScheduleDeviceSetup => {
                let state = state.clone();
                dom::set_timeout(DEVICE_SETUP_DELAY_MS, move || {
                    spawn_local(rnbo::setup_device(state))
                });
            }
            GestureStep::StartSensors => {
                state.sensors_started.set(true);
                sensors::start(state.clone());
            }
            GestureStep::Resume => {
                if let Some(ctx) = state.audio_context.value() {
                    _ = ctx.resume();
                }
                midi::set_playing(state, true);
                wakelock::request(state);
            }
            GestureStep::Suspend => {
                if let Some(ctx) = state.audio_context.value() {
                    _ = ctx.suspend();
                }
                midi::set_playing(state, false);
            }
        }
    }

    if let Some(document) = dom::window_document() {
        dom::set_text(&document, PLAY_BUTTON_ID, plan.button_label());
    }
}

/// Connect worklet → RNBO device → speakers once all three exist.
pub async fn route(state: Rc<AppState>) {
    let routed = async {
        let worklet = state.worklet.wait().await.map_err(|e| e.into_inner())?;
        let device = state.device.wait().await.map_err(|e| e.into_inner())?;
        let ctx = state.audio_context.wait().await.map_err(|e| e.into_inner())?;
        let node = device.node();
        worklet.connect_with_audio_node(&node)?;
        node.connect_with_audio_node(&ctx.destination())?;
        Ok::<_, JsValue>(())
    };
    match routed.await {
        Ok(()) => log::info!("[audio] worklet -> rnbo -> destination"),
        Err(e) => log::error!("[audio] routing failed: {}", js::describe(&e)),
    }
}
