// Host-side tests for parameter descriptors, slider sync and sensor bindings.

use mobrave_core::glam::DVec3;
use mobrave_core::{
    display_value, ParamBindings, ParamDesc, ParamSink, ParameterSet, SliderSync,
    ACCEL_PARAM_IDS, HEADING_PARAM_ID, STEP_COUNT_PARAM_ID,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
struct Recorder {
    id: &'static str,
    writes: Rc<RefCell<Vec<(&'static str, f64)>>>,
}

impl ParamSink for Recorder {
    fn set_value(&self, value: f64) {
        self.writes.borrow_mut().push((self.id, value));
    }
}

fn gain() -> ParamDesc {
    ParamDesc::new("gain", "Gain", 0.0, 2.0, 0, 1.0)
}

#[test]
fn slider_step_for_stepped_and_continuous() {
    let stepped = ParamDesc::new("mode", "Mode", 0.0, 4.0, 5, 0.0);
    assert_eq!(stepped.slider_step(), 1.0);
    assert_eq!(gain().slider_step(), 0.002);
    let two = ParamDesc::new("toggle", "Toggle", 0.0, 1.0, 2, 0.0);
    assert_eq!(two.slider_step(), 1.0);
    let one = ParamDesc::new("one", "One", 0.0, 10.0, 1, 0.0);
    assert_eq!(one.slider_step(), 0.01);
}

#[test]
fn display_uses_one_decimal() {
    assert_eq!(gain().display(), "1.0");
    assert_eq!(display_value(0.26), "0.3");
    assert_eq!(display_value(-3.0), "-3.0");
}

#[test]
fn parse_entry_clamps_and_rejects() {
    let p = gain();
    assert_eq!(p.parse_entry("1.5"), Some(1.5));
    assert_eq!(p.parse_entry("  0.5 "), Some(0.5));
    assert_eq!(p.parse_entry("7"), Some(2.0));
    assert_eq!(p.parse_entry("-1"), Some(0.0));
    assert_eq!(p.parse_entry("abc"), None);
    assert_eq!(p.parse_entry("1.5x"), None);
    assert_eq!(p.parse_entry(""), None);
    assert_eq!(p.parse_entry("NaN"), None);
}

#[test]
fn top_level_excludes_subpatcher_params() {
    assert!(gain().is_top_level());
    assert!(!ParamDesc::new("poly/voice", "Voice", 0.0, 1.0, 0, 0.0).is_top_level());
    let set = ParameterSet::new(vec![
        gain(),
        ParamDesc::new("poly/voice", "Voice", 0.0, 1.0, 0, 0.0),
    ]);
    let ids: Vec<&str> = set.top_level().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["gain"]);
    assert_eq!(set.len(), 2);
}

#[test]
fn slider_sync_suppresses_slider_while_dragging() {
    let mut sync = SliderSync::default();
    let idle = sync.on_param_changed(0.74);
    assert_eq!(idle.slider, Some(0.74));
    assert_eq!(idle.text, "0.7");

    sync.begin_drag();
    assert!(sync.is_dragging());
    let during = sync.on_param_changed(1.24);
    assert_eq!(during.slider, None);
    assert_eq!(during.text, "1.2");

    let released = sync.end_drag(1.3);
    assert!(!sync.is_dragging());
    assert_eq!(released.slider, Some(1.3));
    assert_eq!(released.text, "1.3");
}

#[test]
fn bindings_write_only_bound_params() {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let available = [ACCEL_PARAM_IDS[0], ACCEL_PARAM_IDS[2], STEP_COUNT_PARAM_ID];
    let bindings = ParamBindings::from_lookup(|id| {
        available
            .iter()
            .find(|a| **a == id)
            .map(|a| Recorder {
                id: *a,
                writes: writes.clone(),
            })
    });
    assert_eq!(bindings.bound_count(), 3);

    bindings.apply_accel(DVec3::new(1.0, 2.0, 3.0));
    bindings.apply_rotation(DVec3::splat(9.0));
    bindings.apply_heading(Some(180.0));
    bindings.apply_step_count(4);

    assert_eq!(
        *writes.borrow(),
        vec![
            ("param.accel.x", 1.0),
            ("param.accel.z", 3.0),
            ("param.stepCount", 4.0)
        ]
    );
}

#[test]
fn heading_binding_skips_unknown_heading() {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let bindings = ParamBindings::from_lookup(|id| {
        (id == HEADING_PARAM_ID).then(|| Recorder {
            id: HEADING_PARAM_ID,
            writes: writes.clone(),
        })
    });
    bindings.apply_heading(None);
    bindings.apply_heading(Some(0.0));
    assert_eq!(*writes.borrow(), vec![("param.heading", 0.0)]);
}

#[test]
fn reset_all_returns_only_moved_params() {
    let mut set = ParameterSet::new(vec![
        gain(),
        ParamDesc::new("cutoff", "Cutoff", 20.0, 20000.0, 0, 440.0),
    ]);
    assert!(set.set_value("gain", 1.7));
    assert!(!set.set_value("missing", 1.0));
    assert_eq!(set.get("gain").map(|p| p.value), Some(1.7));

    let changed = set.reset_all();
    assert_eq!(changed, vec![("gain".to_string(), 1.0)]);
    assert_eq!(set.get("gain").map(|p| p.value), Some(1.0));
    assert!(set.reset_all().is_empty());
}
