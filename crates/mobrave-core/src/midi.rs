//! MIDI file playback state and the manifest of bundled files.

use serde::Deserialize;

pub const MIDI_CHANNELS: u8 = 16;
pub const MIDI_NOTES: u8 = 128;

#[inline]
pub fn note_off(channel: u8, note: u8) -> [u8; 3] {
    [0x80 | (channel & 0x0f), note & 0x7f, 0]
}

/// Note-off for every note on every channel.
pub fn all_notes_off() -> impl Iterator<Item = [u8; 3]> {
    (0..MIDI_CHANNELS).flat_map(|c| (0..MIDI_NOTES).map(move |n| note_off(c, n)))
}

/// The sequencer actually producing MIDI events.
pub trait Transport {
    fn resume(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    /// Cut any sound the sequencer is still holding.
    fn silence(&mut self);
    /// Send a short message straight to the output port.
    fn emit(&mut self, message: [u8; 3]);
}

/// Play/pause/stop state around an optional [`Transport`].
///
/// Without a loaded file the transport calls are skipped but state changes
/// and callbacks still happen, so the UI stays consistent.
pub struct MidiPlayer<T> {
    transport: Option<T>,
    playing: bool,
    on_playing_changed: Option<Box<dyn FnMut(bool)>>,
}

impl<T> Default for MidiPlayer<T> {
    fn default() -> Self {
        Self {
            transport: None,
            playing: false,
            on_playing_changed: None,
        }
    }
}

impl<T: Transport> MidiPlayer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Some(transport),
            ..Self::default()
        }
    }

    pub fn load(&mut self, transport: T) {
        if let Some(old) = self.transport.as_mut() {
            old.stop();
        }
        self.transport = Some(transport);
        self.playing = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.transport.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    pub fn on_playing_changed(&mut self, callback: impl FnMut(bool) + 'static) {
        self.on_playing_changed = Some(Box::new(callback));
    }

    pub fn play(&mut self) {
        if let Some(t) = self.transport.as_mut() {
            t.resume();
        }
        self.set_playing(true);
    }

    /// Pause and silence anything still sounding.
    pub fn pause(&mut self) {
        if let Some(t) = self.transport.as_mut() {
            t.pause();
            t.silence();
            for message in all_notes_off() {
                t.emit(message);
            }
        }
        self.set_playing(false);
    }

    pub fn stop(&mut self) {
        if let Some(t) = self.transport.as_mut() {
            t.stop();
        }
        self.set_playing(false);
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        if let Some(cb) = self.on_playing_changed.as_mut() {
            cb(playing);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("invalid MIDI manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("MIDI manifest lists no files")]
    Empty,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MidiEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct MidiManifest {
    #[serde(default)]
    pub files: Vec<MidiEntry>,
}

impl MidiManifest {
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Make every url loadable from the page and give every entry a name.
    ///
    /// Relative urls are taken relative to the directory of `manifest_url`.
    pub fn fixup(&mut self, manifest_url: &str) {
        let base = match manifest_url.rfind('/') {
            Some(i) => &manifest_url[..=i],
            None => "",
        };
        for entry in &mut self.files {
            if !is_absolute(&entry.url) {
                entry.url = format!("{base}{}", entry.url);
            }
            if entry.name.as_deref().map_or(true, str::is_empty) {
                entry.name = Some(file_stem(&entry.url).to_string());
            }
        }
    }

    pub fn first(&self) -> Result<&MidiEntry, ManifestError> {
        self.files.first().ok_or(ManifestError::Empty)
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with('/') || url.contains("://") || url.starts_with("data:")
}

fn file_stem(url: &str) -> &str {
    let file = url.rsplit('/').next().unwrap_or(url);
    match file.rfind('.') {
        Some(0) | None => file,
        Some(i) => &file[..i],
    }
}
