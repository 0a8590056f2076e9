#![cfg(target_arch = "wasm32")]
use instant::Instant;
use js_sys::ArrayBuffer;
use mobrave_core::{
    AppConfig, DownloadProgress, LatentExchange, Listeners, MidiPlayer, ParameterSet,
    SensorReadings, Spawner, StepCounter, Tracked,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod engine;
mod events;
mod fetch;
mod js;
mod logger;
mod midi;
mod overlay;
mod rnbo;
mod sensors;
mod tracking;
mod ui;
mod wakelock;

use tracking::{track_future, WebSpawner};

/// Everything the page shares between callbacks.
pub struct AppState {
    pub config: AppConfig,

    pub engine: Tracked<engine::Engine, JsValue>,
    pub patcher: Tracked<JsValue, JsValue>,
    pub weights: Tracked<ArrayBuffer, JsValue>,
    pub audio_context: Tracked<web::AudioContext, JsValue>,
    pub worklet: Tracked<web::AudioNode, JsValue>,
    pub device: Tracked<rnbo::Device, JsValue>,
    pub midi: Tracked<(), JsValue>,

    pub sensors: RefCell<SensorReadings>,
    pub sensor_listeners: RefCell<Listeners<SensorReadings>>,
    pub steps: RefCell<StepCounter>,
    pub latents: RefCell<LatentExchange>,
    pub params: RefCell<ParameterSet>,
    pub midi_player: RefCell<MidiPlayer<midi::JzzTransport>>,
    pub download: Rc<RefCell<DownloadProgress>>,

    pub sensors_started: Cell<bool>,
    pub model_loaded: Cell<bool>,
    pub bypassed: Cell<bool>,
    pub wake_lock_requested: Cell<bool>,
    pub started_at: Instant,
}

impl AppState {
    /// Kick off every load that does not need a user gesture.
    fn new(config: AppConfig) -> Self {
        let engine = track_future(engine::load());

        let patcher_url = config.patcher_url.clone();
        let patcher = track_future(async move { fetch::fetch_json(&patcher_url).await });

        let download = Rc::new(RefCell::new(DownloadProgress::default()));
        let weights_url = config.weights_url.clone();
        let progress = download.clone();
        let weights = track_future(async move {
            fetch::fetch_with_progress(&weights_url, move |p| *progress.borrow_mut() = p).await
        });

        Self {
            steps: RefCell::new(StepCounter::new(config.step_threshold)),
            config,
            engine,
            patcher,
            weights,
            audio_context: Tracked::new(),
            worklet: Tracked::new(),
            device: Tracked::new(),
            midi: Tracked::new(),
            sensors: RefCell::new(SensorReadings::default()),
            sensor_listeners: RefCell::new(Listeners::new()),
            latents: RefCell::new(LatentExchange::new()),
            params: RefCell::new(ParameterSet::default()),
            midi_player: RefCell::new(MidiPlayer::new()),
            download,
            sensors_started: Cell::new(false),
            model_loaded: Cell::new(false),
            bypassed: Cell::new(false),
            wake_lock_requested: Cell::new(false),
            started_at: Instant::now(),
        }
    }
}

fn spawn_midi(state: &Rc<AppState>) {
    let state = state.clone();
    WebSpawner.spawn(Box::pin(async move {
        match midi::load(state.clone()).await {
            Ok(()) => {
                state.midi.resolve(());
            }
            Err(e) => {
                log::warn!("[midi] not available: {}", js::describe(&e));
                state.midi.reject(e);
            }
        }
    }));
}

async fn main(state: Rc<AppState>) {
    if let Err(e) = engine::load_model(state).await {
        let message = format!("{e:#}");
        log::error!("{}", message);
        dom::alert(&message);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let defaults = AppConfig::default();
    logger::init(defaults.console_cap_bytes);
    log::info!("mobrave-web starting");

    let pairs = dom::query_pairs();
    let config = defaults.with_overrides(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let state = Rc::new(AppState::new(config));
    engine::install_worklet_callback(state.worklet.settler(Rc::new(WebSpawner)));

    let document = dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
    ui::wire_buttons(&document, &state);
    ui::start_metrics(&state);
    events::wire_global_keydown(&state);

    spawn_midi(&state);
    spawn_local(audio::route(state.clone()));
    spawn_local(main(state));
    Ok(())
}
