use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn add_listener<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) -> bool {
    match document.get_element_by_id(element_id) {
        Some(el) => {
            add_listener::<web::Event>(&el, "click", move |_| handler());
            true
        }
        None => {
            log::error!("Couldn't find element with id: {}", element_id);
            false
        }
    }
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

/// Replace the rows of a `<tbody>` with label/value pairs.
pub fn fill_table(document: &web::Document, tbody_id: &str, rows: &[(String, String)]) {
    let Some(tbody) = document.get_element_by_id(tbody_id) else {
        return;
    };
    tbody.set_text_content(Some(""));
    for (label, value) in rows {
        let Ok(tr) = document.create_element("tr") else {
            return;
        };
        if let Ok(td) = document.create_element("td") {
            _ = td.set_attribute("style", "text-align: right");
            td.set_text_content(Some(label));
            _ = tr.append_child(&td);
        }
        if let Ok(td) = document.create_element("td") {
            td.set_text_content(Some(value));
            _ = tr.append_child(&td);
        }
        _ = tbody.append_child(&tr);
    }
}

pub fn alert(message: &str) {
    if let Some(w) = web::window() {
        _ = w.alert_with_message(message);
    }
}

/// Run `f` every `interval_ms` for the lifetime of the page.
pub fn set_interval(interval_ms: u32, f: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
    if let Some(w) = web::window() {
        _ = w.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms as i32,
        );
    }
    closure.forget();
}

/// Run `f` once after `delay_ms`, outside the current call stack.
pub fn set_timeout(delay_ms: i32, f: impl FnOnce() + 'static) {
    let closure = Closure::once(f);
    if let Some(w) = web::window() {
        _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        );
    }
    closure.forget();
}

/// Query-string pairs of the current page.
pub fn query_pairs() -> Vec<(String, String)> {
    let Some(search) = web::window().and_then(|w| w.location().search().ok()) else {
        return Vec::new();
    };
    let Ok(params) = web::UrlSearchParams::new_with_str(&search) else {
        return Vec::new();
    };
    mobrave_core::AppConfig::OVERRIDE_KEYS
        .iter()
        .filter_map(|key| params.get(key).map(|v| (key.to_string(), v)))
        .collect()
}
