//! `log` backend that writes to the browser console and mirrors into the page.

use crate::constants::CONSOLE_OUTPUT_ID;
use crate::dom;
use log::{Level, Log, Metadata, Record};
use mobrave_core::ConsoleMirror;
use std::cell::RefCell;

thread_local! {
    static MIRROR: RefCell<ConsoleMirror> = RefCell::new(ConsoleMirror::default());
}

struct MirrorLogger {
    level: Level,
}

static LOGGER: MirrorLogger = MirrorLogger { level: Level::Info };

impl Log for MirrorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        console_log::log(record);
        mirror(&format!("{}", record.args()));
    }

    fn flush(&self) {}
}

fn mirror(message: &str) {
    let Some(document) = dom::window_document() else {
        return;
    };
    let Some(output) = document.get_element_by_id(CONSOLE_OUTPUT_ID) else {
        return;
    };
    // Re-entrant log calls are dropped.
    let updated = MIRROR.with(|m| {
        m.try_borrow_mut().ok().map(|mut m| {
            m.push(message);
            m.html().to_string()
        })
    });
    if let Some(html) = updated {
        output.set_inner_html(&html);
        output.set_scroll_top(output.scroll_height());
    }
}

/// Install the logger; the console cap comes from the page config.
pub fn init(console_cap: usize) {
    MIRROR.with(|m| {
        if let Ok(mut m) = m.try_borrow_mut() {
            *m = ConsoleMirror::new(console_cap);
        }
    });
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOGGER.level.to_level_filter());
    }
}
