//! Parameter sliders, buttons and the debug tables.

use crate::constants::{
    METRICS_TBODY_ID, NO_PARAM_LABEL_ID, PLAY_BUTTON_ID, RESET_BUTTON_ID, SENSORS_TBODY_ID,
    SETTINGS_BUTTON_ID, SLIDERS_CONTAINER_ID,
};
use crate::rnbo::{Device, Parameter};
use crate::{audio, dom, overlay, AppState};
use fnv::FnvHashMap;
use mobrave_core::{
    display_value, fmt2, readiness_rows, ParamDesc, ParamSink, ParameterSet, SliderSync,
    SliderUpdate,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

struct SliderRow {
    slider: web::HtmlInputElement,
    text: web::HtmlInputElement,
    sync: Rc<RefCell<SliderSync>>,
}

impl SliderRow {
    fn apply(&self, update: &SliderUpdate) {
        if let Some(v) = update.slider {
            self.slider.set_value(&v.to_string());
        }
        self.text.set_value(&update.text);
    }
}

fn input(document: &web::Document, kind: &str) -> Result<web::HtmlInputElement, JsValue> {
    let el: web::HtmlInputElement = document.create_element("input")?.dyn_into()?;
    el.set_type(kind);
    Ok(el)
}

fn make_slider(
    document: &web::Document,
    container: &web::Element,
    state: &Rc<AppState>,
    param: Parameter,
    desc: &ParamDesc,
) -> Result<SliderRow, JsValue> {
    let row = document.create_element("div")?;
    _ = row.set_attribute("class", "param-slider-row");

    let label = document.create_element("label")?;
    label.set_text_content(Some(&desc.name));
    _ = label.set_attribute("for", &desc.id);

    let slider = input(document, "range")?;
    slider.set_id(&desc.id);
    slider.set_min(&desc.min.to_string());
    slider.set_max(&desc.max.to_string());
    slider.set_step(&desc.slider_step().to_string());
    slider.set_value(&desc.value.to_string());

    let text = input(document, "text")?;
    text.set_value(&desc.display());

    row.append_child(&label)?;
    row.append_child(&slider)?;
    row.append_child(&text)?;
    container.append_child(&row)?;

    let sync = Rc::new(RefCell::new(SliderSync::default()));

    let drag = sync.clone();
    dom::add_listener::<web::Event>(&slider, "pointerdown", move |_| {
        drag.borrow_mut().begin_drag();
    });

    {
        let sync = sync.clone();
        let param = param.clone();
        let slider_cb = slider.clone();
        let text_cb = text.clone();
        dom::add_listener::<web::Event>(&slider, "pointerup", move |_| {
            let update = sync.borrow_mut().end_drag(param.value());
            if let Some(v) = update.slider {
                slider_cb.set_value(&v.to_string());
            }
            text_cb.set_value(&update.text);
        });
    }

    {
        let param = param.clone();
        let state = state.clone();
        let id = desc.id.clone();
        let slider_cb = slider.clone();
        let text_cb = text.clone();
        dom::add_listener::<web::Event>(&slider, "input", move |_| {
            let value = slider_cb.value_as_number();
            if value.is_nan() {
                return;
            }
            param.set_value(value);
            state.params.borrow_mut().set_value(&id, value);
            text_cb.set_value(&display_value(value));
        });
    }

    {
        let desc = desc.clone();
        let slider_cb = slider.clone();
        let text_cb = text.clone();
        dom::add_listener::<web::KeyboardEvent>(&text, "keydown", move |ev| {
            if ev.key() != "Enter" {
                return;
            }
            match desc.parse_entry(&text_cb.value()) {
                Some(value) => {
                    param.set_value(value);
                    slider_cb.set_value(&value.to_string());
                    text_cb.set_value(&display_value(value));
                }
                None => text_cb.set_value(&display_value(param.value())),
            }
        });
    }

    Ok(SliderRow { slider, text, sync })
}

/// Build one slider row per top-level parameter and keep them in sync.
pub fn make_sliders(state: &Rc<AppState>, device: &Device) {
    let Some(document) = dom::window_document() else {
        return;
    };
    let Some(container) = document.get_element_by_id(SLIDERS_CONTAINER_ID) else {
        log::error!("Couldn't find element with id: {}", SLIDERS_CONTAINER_ID);
        return;
    };

    let params = device.params();
    *state.params.borrow_mut() = ParameterSet::new(params.iter().map(|p| p.desc()).collect());
    if !params.is_empty() {
        if let Some(label) = document.get_element_by_id(NO_PARAM_LABEL_ID) {
            label.remove();
        }
    }

    let mut rows: FnvHashMap<String, SliderRow> = FnvHashMap::default();
    for param in params {
        let desc = param.desc();
        // Subpatcher parameters have ids like "sub/param".
        if !desc.is_top_level() {
            continue;
        }
        match make_slider(&document, &container, state, param, &desc) {
            Ok(row) => {
                rows.insert(desc.id, row);
            }
            Err(e) => log::warn!("[ui] slider for {}: {:?}", desc.id, e),
        }
    }
    log::info!("[ui] {} parameter sliders", rows.len());

    let state = state.clone();
    device.on_parameter_change(move |param| {
        let id = param.id();
        let value = param.value();
        if let Ok(mut params) = state.params.try_borrow_mut() {
            params.set_value(&id, value);
        }
        if let Some(row) = rows.get(&id) {
            let update = row.sync.borrow().on_param_changed(value);
            row.apply(&update);
        }
    });
}

/// Put every parameter back to the value it had when the device loaded.
pub fn reset_parameters(state: &AppState) {
    let Some(device) = state.device.value() else {
        log::warn!("[ui] no device yet, nothing to reset");
        return;
    };
    let changed = state.params.borrow_mut().reset_all();
    for (id, value) in &changed {
        if let Some(param) = device.param(id) {
            param.set_value(*value);
        }
    }
    log::info!("[ui] reset {} parameters", changed.len());
}

pub fn wire_buttons(document: &web::Document, state: &Rc<AppState>) {
    let play = state.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || audio::toggle_audio(&play));

    let reset = state.clone();
    dom::add_click_listener(document, RESET_BUTTON_ID, move || reset_parameters(&reset));

    dom::add_click_listener(document, SETTINGS_BUTTON_ID, || {
        if let Some(document) = dom::window_document() {
            overlay::toggle_debug_panel(&document);
        }
    });
}

fn metrics_rows(state: &AppState) -> Vec<(String, String)> {
    let mut rows = vec![
        (
            "audioContext.state".to_string(),
            state
                .audio_context
                .value()
                .map(|ctx| audio::state_label(&ctx))
                .unwrap_or("none")
                .to_string(),
        ),
        (
            "uptime".to_string(),
            fmt2(state.started_at.elapsed().as_secs_f64()),
        ),
    ];
    rows.extend(readiness_rows(&[
        ("engine", state.engine.state()),
        ("weights", state.weights.state()),
        ("patcher", state.patcher.state()),
        ("audioContext", state.audio_context.state()),
        ("worklet", state.worklet.state()),
        ("device", state.device.state()),
        ("midi", state.midi.state()),
    ]));
    if state.model_loaded.get() {
        if let Some(engine) = state.engine.value() {
            rows.extend(engine.metrics().rows());
        }
    }
    rows.push(("bypassed".to_string(), state.bypassed.get().to_string()));
    rows
}

/// Periodically redraw the metrics and sensor tables. Only polls; never waits.
pub fn start_metrics(state: &Rc<AppState>) {
    let state = state.clone();
    dom::set_interval(state.config.metrics_interval_ms, move || {
        let Some(document) = dom::window_document() else {
            return;
        };
        dom::fill_table(&document, METRICS_TBODY_ID, &metrics_rows(&state));
        dom::fill_table(&document, SENSORS_TBODY_ID, &state.sensors.borrow().rows());
        overlay::update_loading(&document, &state.download.borrow());
    });
}
