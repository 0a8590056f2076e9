//! Device sensor processing that does not touch browser APIs.
//!
//! The web frontend turns `devicemotion`, `deviceorientation` and geolocation
//! callbacks into the plain values used here.

use crate::metrics::fmt2;
use fnv::FnvHashMap;
use glam::DVec3;

/// Acceleration delta (sum of absolute per-axis changes, m/s²) counted as a step.
pub const DEFAULT_STEP_THRESHOLD: f64 = 12.0;

pub const MOTION_DENIED: &str = "Could not access window.DeviceMotionEvent";
pub const ORIENTATION_DENIED: &str = "Could not access window.DeviceOrientationEvent";
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported by this browser";

/// Callbacks keyed by a caller-chosen id. Adding an existing id replaces it.
pub struct Listeners<A> {
    callbacks: FnvHashMap<String, Box<dyn FnMut(&A)>>,
}

impl<A> Default for Listeners<A> {
    fn default() -> Self {
        Self {
            callbacks: FnvHashMap::default(),
        }
    }
}

impl<A> Listeners<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: impl Into<String>, callback: impl FnMut(&A) + 'static) {
        self.callbacks.insert(id.into(), Box::new(callback));
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.callbacks.remove(id).is_some()
    }

    pub fn notify(&mut self, arg: &A) {
        for callback in self.callbacks.values_mut() {
            callback(arg);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// Counts steps from jumps in acceleration between consecutive samples.
#[derive(Clone, Debug)]
pub struct StepCounter {
    count: u32,
    threshold: f64,
    last: DVec3,
}

impl Default for StepCounter {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_THRESHOLD)
    }
}

impl StepCounter {
    pub fn new(threshold: f64) -> Self {
        Self {
            count: 0,
            threshold,
            last: DVec3::ZERO,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Feed one sample; returns the new count when it registered a step.
    pub fn update(&mut self, accel: DVec3) -> Option<u32> {
        let delta = (accel - self.last).abs().element_sum();
        self.last = accel;
        if delta >= self.threshold {
            self.count += 1;
            Some(self.count)
        } else {
            None
        }
    }
}

/// Map device Euler angles onto axes: x = beta, y = gamma, z = alpha.
#[inline]
pub fn orientation_from_euler(alpha: f64, beta: f64, gamma: f64) -> DVec3 {
    DVec3::new(beta, gamma, alpha)
}

/// Both acceleration readings a `devicemotion` event may carry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionSample {
    pub acceleration: Option<DVec3>,
    pub including_gravity: Option<DVec3>,
}

impl MotionSample {
    /// Reading shown and sent to the patch: gravity removed when available.
    pub fn reading(&self) -> Option<DVec3> {
        self.acceleration.or(self.including_gravity)
    }

    /// Input for the step counter: gravity included when available.
    pub fn step_input(&self) -> Option<DVec3> {
        self.including_gravity.or(self.acceleration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn from_response(response: &str) -> Self {
        if response == "granted" {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    pub fn is_granted(self) -> bool {
        self == Permission::Granted
    }
}

/// What the browser exposes for a sensor event type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionProbe {
    /// The event constructor does not exist.
    Unavailable,
    /// The event exists and needs no prompt.
    Implicit,
    /// The event has `requestPermission` (iOS Safari).
    Prompt,
}

impl PermissionProbe {
    /// The answer when no prompt is needed, `None` when one must be shown.
    pub fn immediate(self) -> Option<Permission> {
        match self {
            PermissionProbe::Unavailable => Some(Permission::Denied),
            PermissionProbe::Implicit => Some(Permission::Granted),
            PermissionProbe::Prompt => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeolocationSettings {
    pub enable_high_accuracy: bool,
    pub maximum_age_ms: u32,
    pub timeout_ms: u32,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            maximum_age_ms: 1000,
            timeout_ms: 5000,
        }
    }
}

/// Normalize a reported heading; browsers use null or NaN for "unknown".
#[inline]
pub fn heading_from(raw: Option<f64>) -> Option<f64> {
    raw.filter(|h| h.is_finite())
}

/// Latest value of every sensor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorReadings {
    pub accel: Option<DVec3>,
    pub rotation: Option<DVec3>,
    pub heading: Option<f64>,
    pub step_count: u32,
}

impl SensorReadings {
    pub fn apply_motion(&mut self, accel: DVec3) {
        self.accel = Some(accel);
    }

    pub fn apply_orientation(&mut self, rotation: DVec3) {
        self.rotation = Some(rotation);
    }

    pub fn apply_heading(&mut self, heading: Option<f64>) {
        self.heading = heading;
    }

    pub fn apply_steps(&mut self, count: u32) {
        self.step_count = count;
    }

    /// Label/value pairs for the sensors table.
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = Vec::with_capacity(8);
        push_axes(&mut rows, "accel", self.accel);
        push_axes(&mut rows, "rotation", self.rotation);
        rows.push((
            "heading".to_string(),
            self.heading.map(fmt2).unwrap_or_else(|| "null".to_string()),
        ));
        rows.push(("stepCount".to_string(), fmt2(self.step_count as f64)));
        rows
    }
}

fn push_axes(rows: &mut Vec<(String, String)>, name: &str, v: Option<DVec3>) {
    let values = match v {
        Some(v) => [fmt2(v.x), fmt2(v.y), fmt2(v.z)],
        None => ["null".to_string(), "null".to_string(), "null".to_string()],
    };
    for (axis, value) in ["x", "y", "z"].iter().zip(values) {
        rows.push((format!("{name}.{axis}"), value));
    }
}
