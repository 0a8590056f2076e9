use crate::{audio, dom, midi, overlay, ui, AppState};
use mobrave_core::{shortcut_for_key, Shortcut};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn is_text_entry(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        .map(|input| input.type_() != "range")
        .unwrap_or(false)
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, state: &Rc<AppState>) {
    // Typing into a parameter box must not trigger shortcuts.
    if is_text_entry(ev) {
        return;
    }
    let Some(shortcut) = shortcut_for_key(&ev.key()) else {
        return;
    };
    match shortcut {
        Shortcut::TogglePlay => {
            audio::toggle_audio(state);
            ev.prevent_default();
        }
        Shortcut::ToggleBypass => {
            let bypassed = !state.bypassed.get();
            match state.engine.value() {
                Some(engine) => {
                    engine.set_bypassed(bypassed);
                    state.bypassed.set(bypassed);
                    log::info!("[keys] bypassed={}", bypassed);
                }
                None => log::warn!("[keys] engine not loaded, bypass ignored"),
            }
        }
        Shortcut::ToggleMidi => {
            midi::toggle(state);
            log::info!("[keys] midi toggled");
        }
        Shortcut::ToggleDebug => {
            if let Some(document) = dom::window_document() {
                overlay::toggle_debug_panel(&document);
            }
        }
        Shortcut::ResetParameters => ui::reset_parameters(state),
    }
}

pub fn wire_global_keydown(state: &Rc<AppState>) {
    let Some(window) = web::window() else {
        return;
    };
    let state = state.clone();
    dom::add_listener::<web::KeyboardEvent>(&window, "keydown", move |ev| {
        handle_global_keydown(&ev, &state)
    });
}
