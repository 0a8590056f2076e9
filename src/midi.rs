//! JZZ-backed MIDI file player feeding the RNBO device.

use crate::constants::MIDI_PORT_NAME;
use crate::{fetch, js, AppState};
use js_sys::{Array, Uint8Array};
use mobrave_core::{MidiManifest, Transport};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// A JZZ SMF player connected to a virtual output port.
pub struct JzzTransport {
    player: JsValue,
    port: JsValue,
}

impl JzzTransport {
    fn call(&self, target: &JsValue, method: &str, args: &[JsValue]) {
        if let Err(e) = js::call(target, method, args) {
            log::warn!("[midi] {}: {}", method, js::describe(&e));
        }
    }
}

impl Transport for JzzTransport {
    fn resume(&mut self) {
        self.call(&self.player, "resume", &[]);
    }

    fn pause(&mut self) {
        self.call(&self.player, "pause", &[]);
    }

    fn silence(&mut self) {
        self.call(&self.player, "sndOff", &[]);
    }

    fn stop(&mut self) {
        self.call(&self.player, "stop", &[]);
    }

    fn emit(&mut self, message: [u8; 3]) {
        let bytes: Array = message.iter().map(|b| JsValue::from(*b)).collect();
        self.call(&self.port, "send", &[bytes.into()]);
    }
}

/// Create the virtual port whose output is forwarded to the RNBO device.
fn open_port(state: &Rc<AppState>) -> Result<JsValue, JsValue> {
    let jzz = js::global("JZZ")?;
    let widget = js::call(&jzz, "Widget", &[])?;

    let target = state.clone();
    let forward = Closure::wrap(Box::new(move |msg: JsValue| {
        let Some(device) = target.device.value() else {
            return;
        };
        let bytes: Vec<u8> = Array::from(&msg)
            .iter()
            .filter_map(|b| b.as_f64())
            .map(|b| b as u8)
            .collect();
        if !bytes.is_empty() {
            device.send_midi(&bytes);
        }
    }) as Box<dyn FnMut(JsValue)>);
    js::set(&widget, "_receive", forward.as_ref())?;
    forward.forget();

    js::call(&jzz, "addMidiOut", &[JsValue::from_str(MIDI_PORT_NAME), widget])?;
    let engine = jzz
        .dyn_ref::<js_sys::Function>()
        .ok_or_else(|| JsValue::from_str("`JZZ` is not callable"))?
        .call0(&JsValue::NULL)?;
    js::call(&engine, "openMidiOut", &[JsValue::from_str(MIDI_PORT_NAME)])
}

fn smf_player(buffer: &js_sys::ArrayBuffer) -> Result<JsValue, JsValue> {
    let midi_ns = js::get(&js::global("JZZ")?, "MIDI")?;
    let data = Uint8Array::new(buffer);
    let smf = js::construct(&midi_ns, "SMF", &[data.into()])?;
    js::call(&smf, "player", &[])
}

/// Fetch the manifest and the first file it lists, then hand the player a transport.
pub async fn load(state: Rc<AppState>) -> Result<(), JsValue> {
    let url = state.config.midi_manifest_url.clone();
    let text = fetch::fetch_text(&url).await?;
    let mut manifest =
        MidiManifest::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    manifest.fixup(&url);
    let entry = manifest
        .first()
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .clone();

    let buffer = fetch::fetch_bytes(&entry.url).await?;
    let port = open_port(&state)?;
    let player = smf_player(&buffer)?;
    js::call(&player, "connect", &[port.clone()])?;
    if let Some(name) = &entry.name {
        log::info!("[midi] loaded {}", name);
    }

    let mut midi = state.midi_player.borrow_mut();
    let was_playing = midi.is_playing();
    midi.load(JzzTransport { player, port });
    if was_playing {
        midi.play();
    }
    Ok(())
}

/// Follow the audio toggle. Before a file is loaded only the state changes.
pub fn set_playing(state: &AppState, playing: bool) {
    let Ok(mut midi) = state.midi_player.try_borrow_mut() else {
        return;
    };
    if playing {
        midi.play();
    } else {
        midi.pause();
    }
}

pub fn toggle(state: &AppState) {
    let playing = state
        .midi_player
        .try_borrow()
        .map(|m| m.is_playing())
        .unwrap_or(false);
    set_playing(state, !playing);
}
