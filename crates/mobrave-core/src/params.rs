//! RNBO parameter descriptors and the slider/text-box logic around them.

use glam::DVec3;

pub const ACCEL_PARAM_IDS: [&str; 3] = ["param.accel.x", "param.accel.y", "param.accel.z"];
pub const ROTATION_PARAM_IDS: [&str; 3] =
    ["param.rotation.x", "param.rotation.y", "param.rotation.z"];
pub const HEADING_PARAM_ID: &str = "param.heading";
pub const STEP_COUNT_PARAM_ID: &str = "param.stepCount";

/// Resolution used for continuous parameters.
pub const CONTINUOUS_SLIDER_DIVISIONS: f64 = 1000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ParamDesc {
    pub id: String,
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub steps: u32,
    pub value: f64,
    /// Value at load time, restored by the reset button.
    pub initial: f64,
}

impl ParamDesc {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        min: f64,
        max: f64,
        steps: u32,
        value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min,
            max,
            steps,
            value,
            initial: value,
        }
    }

    /// Parameters that belong to subpatchers have a `/` in their id.
    pub fn is_top_level(&self) -> bool {
        !self.id.contains('/')
    }

    pub fn slider_step(&self) -> f64 {
        if self.steps > 1 {
            (self.max - self.min) / (self.steps - 1) as f64
        } else {
            (self.max - self.min) / CONTINUOUS_SLIDER_DIVISIONS
        }
    }

    pub fn display(&self) -> String {
        display_value(self.value)
    }

    /// Parse a value typed into the text box, clamped into range.
    ///
    /// `None` means the text was not a number and the box should be restored.
    pub fn parse_entry(&self, text: &str) -> Option<f64> {
        let parsed: f64 = text.trim().parse().ok()?;
        if parsed.is_nan() {
            return None;
        }
        Some(parsed.min(self.max).max(self.min))
    }
}

#[inline]
pub fn display_value(value: f64) -> String {
    format!("{value:.1}")
}

/// What the slider row should show after an event.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderUpdate {
    /// New slider position; `None` leaves the slider where the user has it.
    pub slider: Option<f64>,
    pub text: String,
}

/// Keeps device-driven parameter changes from fighting a slider drag.
#[derive(Clone, Copy, Debug, Default)]
pub struct SliderSync {
    dragging: bool,
}

impl SliderSync {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Drag released: snap the row to the parameter's actual value.
    pub fn end_drag(&mut self, value: f64) -> SliderUpdate {
        self.dragging = false;
        SliderUpdate {
            slider: Some(value),
            text: display_value(value),
        }
    }

    pub fn on_param_changed(&self, value: f64) -> SliderUpdate {
        SliderUpdate {
            slider: (!self.dragging).then_some(value),
            text: display_value(value),
        }
    }
}

/// Anything a parameter value can be written to.
pub trait ParamSink {
    fn set_value(&self, value: f64);
}

/// Optional device parameters driven by the sensors.
///
/// Patches are free to leave any of them out; writes to missing ones are dropped.
#[derive(Clone, Debug)]
pub struct ParamBindings<P> {
    pub accel: [Option<P>; 3],
    pub rotation: [Option<P>; 3],
    pub heading: Option<P>,
    pub step_count: Option<P>,
}

impl<P> Default for ParamBindings<P> {
    fn default() -> Self {
        Self {
            accel: [None, None, None],
            rotation: [None, None, None],
            heading: None,
            step_count: None,
        }
    }
}

impl<P: ParamSink> ParamBindings<P> {
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<P>) -> Self {
        Self {
            accel: ACCEL_PARAM_IDS.map(&mut lookup),
            rotation: ROTATION_PARAM_IDS.map(&mut lookup),
            heading: lookup(HEADING_PARAM_ID),
            step_count: lookup(STEP_COUNT_PARAM_ID),
        }
    }

    pub fn bound_count(&self) -> usize {
        self.accel.iter().filter(|p| p.is_some()).count()
            + self.rotation.iter().filter(|p| p.is_some()).count()
            + self.heading.is_some() as usize
            + self.step_count.is_some() as usize
    }

    pub fn apply_accel(&self, accel: DVec3) {
        write_axes(&self.accel, accel);
    }

    pub fn apply_rotation(&self, rotation: DVec3) {
        write_axes(&self.rotation, rotation);
    }

    pub fn apply_heading(&self, heading: Option<f64>) {
        if let (Some(param), Some(heading)) = (&self.heading, heading) {
            param.set_value(heading);
        }
    }

    pub fn apply_step_count(&self, count: u32) {
        if let Some(param) = &self.step_count {
            param.set_value(count as f64);
        }
    }
}

fn write_axes<P: ParamSink>(params: &[Option<P>; 3], v: DVec3) {
    for (param, value) in params.iter().zip(v.to_array()) {
        if let Some(param) = param {
            param.set_value(value);
        }
    }
}

/// Every parameter exposed by the loaded patch.
#[derive(Clone, Debug, Default)]
pub struct ParameterSet {
    params: Vec<ParamDesc>,
}

impl ParameterSet {
    pub fn new(params: Vec<ParamDesc>) -> Self {
        Self { params }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDesc> {
        self.params.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ParamDesc> {
        self.params.iter().find(|p| p.id == id)
    }

    pub fn top_level(&self) -> impl Iterator<Item = &ParamDesc> {
        self.params.iter().filter(|p| p.is_top_level())
    }

    /// Record a value change coming from the device.
    pub fn set_value(&mut self, id: &str, value: f64) -> bool {
        match self.params.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.value = value;
                true
            }
            None => false,
        }
    }

    /// `(id, initial)` for every parameter whose value moved.
    pub fn reset_all(&mut self) -> Vec<(String, f64)> {
        let mut changed = Vec::new();
        for p in &mut self.params {
            if p.value != p.initial {
                p.value = p.initial;
                changed.push((p.id.clone(), p.initial));
            }
        }
        changed
    }
}
