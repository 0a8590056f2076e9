use crate::constants::{DEBUG_PANEL_ID, LOADING_OVERLAY_ID, LOADING_TEXT_ID};
use mobrave_core::DownloadProgress;
use web_sys as web;

const HIDDEN_CLASS: &str = "hidden";

fn set_hidden(el: &web::Element, hidden: bool) {
    let classes = el.class_list();
    if hidden {
        _ = classes.add_1(HIDDEN_CLASS);
        _ = el.set_attribute("style", "display:none");
    } else {
        _ = classes.remove_1(HIDDEN_CLASS);
        _ = el.remove_attribute("style");
    }
}

fn hidden(el: &web::Element) -> bool {
    el.class_list().contains(HIDDEN_CLASS)
        || el
            .get_attribute("style")
            .is_some_and(|s| s.contains("display:none"))
}

pub fn toggle_debug_panel(document: &web::Document) {
    if let Some(panel) = document.get_element_by_id(DEBUG_PANEL_ID) {
        let now_hidden = !hidden(&panel);
        set_hidden(&panel, now_hidden);
        log::info!("[ui] debug panel {}", if now_hidden { "hidden" } else { "shown" });
    }
}

/// Show "LOADING... n%" until the weights are in, then hide the overlay.
pub fn update_loading(document: &web::Document, progress: &DownloadProgress) {
    let Some(overlay) = document.get_element_by_id(LOADING_OVERLAY_ID) else {
        return;
    };
    if progress.done {
        if !hidden(&overlay) {
            set_hidden(&overlay, true);
        }
        return;
    }
    if let Some(text) = document.get_element_by_id(LOADING_TEXT_ID) {
        text.set_text_content(Some(&format!("LOADING... {}%", progress.percent())));
    }
}
