//! Planning for the play-button gesture.
//!
//! Safari hands out a broken `AudioContext` unless it is created during the
//! user gesture and the handler returns quickly. The handler therefore cannot
//! await anything; it decides what to do from facts that are already known
//! (mostly [`crate::Tracked::is_resolved`]) and defers the rest.

/// Shown when the play button is pressed after context creation failed.
pub const AUDIO_CONTEXT_FAILED: &str =
    "Audio could not be started on this page. Reload the page to try again.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureContext {
    /// The context tracker has settled, either way.
    pub audio_context_created: bool,
    /// Creating the context failed; the page has to be reloaded.
    pub audio_context_failed: bool,
    pub engine_ready: bool,
    pub sensors_started: bool,
    pub audio_running: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureStep {
    CreateAudioContext,
    SuspendAudioContext,
    /// Hand the context to the engine and start its audio thread right away.
    RegisterWithEngine,
    /// The engine is still loading; register from a task once it resolves.
    DeferEngineRegistration,
    /// Create the RNBO device from a zero-delay timer, outside the gesture.
    ScheduleDeviceSetup,
    StartSensors,
    Resume,
    Suspend,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GesturePlan {
    pub steps: Vec<GestureStep>,
}

impl GesturePlan {
    pub fn contains(&self, step: GestureStep) -> bool {
        self.steps.contains(&step)
    }

    /// Label the play button should show once the plan has run.
    pub fn button_label(&self) -> &'static str {
        match self.steps.last() {
            Some(GestureStep::Resume) => "Pause",
            _ => "Play",
        }
    }
}

pub fn plan(ctx: &GestureContext) -> GesturePlan {
    if ctx.audio_context_failed {
        return GesturePlan::default();
    }
    let mut steps = Vec::with_capacity(8);
    let fresh = !ctx.audio_context_created;

    if fresh {
        steps.push(GestureStep::CreateAudioContext);
        steps.push(GestureStep::SuspendAudioContext);
        steps.push(if ctx.engine_ready {
            GestureStep::RegisterWithEngine
        } else {
            GestureStep::DeferEngineRegistration
        });
        steps.push(GestureStep::ScheduleDeviceSetup);
    }

    if !ctx.sensors_started {
        steps.push(GestureStep::StartSensors);
    }

    // A context created a moment ago still reports its old state until the
    // suspend promise settles, so a fresh context always resumes.
    if fresh || !ctx.audio_running {
        steps.push(GestureStep::Resume);
    } else {
        steps.push(GestureStep::Suspend);
    }

    GesturePlan { steps }
}
