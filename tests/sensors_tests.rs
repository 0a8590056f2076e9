// Host-side tests for sensor processing.

use mobrave_core::glam::DVec3;
use mobrave_core::{
    heading_from, orientation_from_euler, GeolocationSettings, Listeners, MotionSample,
    Permission, PermissionProbe, SensorReadings, StepCounter, DEFAULT_STEP_THRESHOLD,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn step_counter_counts_large_jumps_only() {
    let mut steps = StepCounter::default();
    assert_eq!(steps.threshold(), DEFAULT_STEP_THRESHOLD);

    // 4 + 4 + 4 = 12 from the origin: exactly the threshold counts.
    assert_eq!(steps.update(DVec3::new(4.0, -4.0, 4.0)), Some(1));
    // Small wobble around the same point.
    assert_eq!(steps.update(DVec3::new(4.5, -4.0, 3.5)), None);
    // The previous sample is always replaced, so the delta is from (4.5,-4,3.5).
    assert_eq!(steps.update(DVec3::new(-4.0, 0.0, 3.5)), Some(2));
    assert_eq!(steps.count(), 2);
}

#[test]
fn step_counter_uses_sum_of_absolute_axis_changes() {
    let mut steps = StepCounter::new(10.0);
    // Euclidean length would be ~8.66; the axis sum is 15.
    assert_eq!(steps.update(DVec3::splat(5.0)), Some(1));
    assert_eq!(steps.update(DVec3::splat(2.0)), None);
}

#[test]
fn step_counter_reset_and_threshold() {
    let mut steps = StepCounter::new(100.0);
    assert_eq!(steps.update(DVec3::new(20.0, 20.0, 20.0)), None);
    steps.set_threshold(1.0);
    assert_eq!(steps.update(DVec3::ZERO), Some(1));
    steps.reset();
    assert_eq!(steps.count(), 0);
    assert_eq!(steps.update(DVec3::X * 2.0), Some(1));
}

#[test]
fn orientation_axes_follow_beta_gamma_alpha() {
    let v = orientation_from_euler(10.0, 20.0, 30.0);
    assert_eq!(v, DVec3::new(20.0, 30.0, 10.0));
}

#[test]
fn motion_sample_prefers_the_right_reading() {
    let linear = DVec3::new(0.1, 0.2, 0.3);
    let gravity = DVec3::new(0.1, 9.8, 0.3);
    let both = MotionSample {
        acceleration: Some(linear),
        including_gravity: Some(gravity),
    };
    assert_eq!(both.reading(), Some(linear));
    assert_eq!(both.step_input(), Some(gravity));

    let only_gravity = MotionSample {
        acceleration: None,
        including_gravity: Some(gravity),
    };
    assert_eq!(only_gravity.reading(), Some(gravity));
    assert_eq!(MotionSample::default().step_input(), None);
}

#[test]
fn permission_probe_answers() {
    assert_eq!(PermissionProbe::Unavailable.immediate(), Some(Permission::Denied));
    assert_eq!(PermissionProbe::Implicit.immediate(), Some(Permission::Granted));
    assert_eq!(PermissionProbe::Prompt.immediate(), None);
    assert!(Permission::from_response("granted").is_granted());
    assert!(!Permission::from_response("denied").is_granted());
    assert!(!Permission::from_response("").is_granted());
}

#[test]
fn geolocation_defaults() {
    let g = GeolocationSettings::default();
    assert!(g.enable_high_accuracy);
    assert_eq!(g.maximum_age_ms, 1000);
    assert_eq!(g.timeout_ms, 5000);
}

#[test]
fn heading_zero_is_a_real_heading() {
    assert_eq!(heading_from(Some(0.0)), Some(0.0));
    assert_eq!(heading_from(Some(f64::NAN)), None);
    assert_eq!(heading_from(None), None);
}

#[test]
fn readings_rows_show_null_until_known() {
    let mut r = SensorReadings::default();
    let rows = r.rows();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0], ("accel.x".to_string(), "null".to_string()));
    assert_eq!(rows[6], ("heading".to_string(), "null".to_string()));
    assert_eq!(rows[7], ("stepCount".to_string(), "0.00".to_string()));

    r.apply_motion(DVec3::new(1.0, -2.5, 0.125));
    r.apply_orientation(DVec3::new(90.0, 0.0, 45.0));
    r.apply_heading(Some(270.0));
    r.apply_steps(3);
    let rows = r.rows();
    let labels: Vec<&str> = rows.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "accel.x",
            "accel.y",
            "accel.z",
            "rotation.x",
            "rotation.y",
            "rotation.z",
            "heading",
            "stepCount"
        ]
    );
    assert_eq!(rows[1].1, "-2.50");
    assert_eq!(rows[3].1, "90.00");
    assert_eq!(rows[6].1, "270.00");
    assert_eq!(rows[7].1, "3.00");
}

#[test]
fn listeners_add_replace_remove() {
    let hits = Rc::new(RefCell::new(Vec::new()));
    let mut listeners: Listeners<u32> = Listeners::new();
    assert!(listeners.is_empty());

    let h = hits.clone();
    listeners.add("table", move |v: &u32| h.borrow_mut().push(("table", *v)));
    let h = hits.clone();
    listeners.add("params", move |v: &u32| h.borrow_mut().push(("params", *v)));
    let h = hits.clone();
    listeners.add("params", move |v: &u32| h.borrow_mut().push(("params2", *v)));
    assert_eq!(listeners.len(), 2);

    listeners.notify(&7);
    let mut seen = hits.borrow().clone();
    seen.sort();
    assert_eq!(seen, vec![("params2", 7), ("table", 7)]);

    assert!(listeners.remove("table"));
    assert!(!listeners.remove("table"));
    hits.borrow_mut().clear();
    listeners.notify(&8);
    assert_eq!(*hits.borrow(), vec![("params2", 8)]);
}
