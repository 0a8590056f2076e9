// DOM element ids and page tuning shared by the web frontend.

// Controls
pub const PLAY_BUTTON_ID: &str = "playButton";
pub const RESET_BUTTON_ID: &str = "resetButton";
pub const SETTINGS_BUTTON_ID: &str = "settingsButton";

// Debug panel
pub const DEBUG_PANEL_ID: &str = "debug-panel";
pub const SLIDERS_CONTAINER_ID: &str = "rnbo-parameter-sliders";
pub const NO_PARAM_LABEL_ID: &str = "no-param-label";
pub const CONSOLE_OUTPUT_ID: &str = "console.output";
pub const METRICS_TBODY_ID: &str = "metrics.table.tbody";
pub const SENSORS_TBODY_ID: &str = "sensors.table.tbody";

// Loading indicator
pub const LOADING_OVERLAY_ID: &str = "loading-overlay";
pub const LOADING_TEXT_ID: &str = "loading-text";

// Global function the engine calls once its worklet node exists
pub const WORKLET_CREATED_CALLBACK: &str = "onAudioWorkletCreated";

// Virtual MIDI output port the player connects to
pub const MIDI_PORT_NAME: &str = "MOBRave MIDI";

// RNBO port used for MIDI events coming from the player
pub const RNBO_MIDI_PORT: u32 = 0;

// Delay before creating the RNBO device after the gesture (ms)
pub const DEVICE_SETUP_DELAY_MS: i32 = 0;
