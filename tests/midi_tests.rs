// Host-side tests for the MIDI player state machine and manifest handling.

use mobrave_core::{all_notes_off, note_off, ManifestError, MidiManifest, MidiPlayer, Transport};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct FakeTransport {
    calls: Rc<RefCell<Vec<String>>>,
    emitted: Rc<RefCell<Vec<[u8; 3]>>>,
}

impl Transport for FakeTransport {
    fn resume(&mut self) {
        self.calls.borrow_mut().push("resume".into());
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push("pause".into());
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push("stop".into());
    }

    fn silence(&mut self) {
        self.calls.borrow_mut().push("silence".into());
    }

    fn emit(&mut self, message: [u8; 3]) {
        self.emitted.borrow_mut().push(message);
    }
}

#[test]
fn note_off_masks_channel_and_note() {
    assert_eq!(note_off(0, 60), [0x80, 60, 0]);
    assert_eq!(note_off(15, 127), [0x8f, 127, 0]);
    assert_eq!(note_off(16, 128), [0x80, 0, 0]);
}

#[test]
fn all_notes_off_covers_every_channel_and_note() {
    let all: Vec<[u8; 3]> = all_notes_off().collect();
    assert_eq!(all.len(), 16 * 128);
    assert_eq!(all[0], [0x80, 0, 0]);
    assert_eq!(all[all.len() - 1], [0x8f, 127, 0]);
}

#[test]
fn pause_silences_every_note() {
    let transport = FakeTransport::default();
    let (calls, emitted) = (transport.calls.clone(), transport.emitted.clone());
    let mut player = MidiPlayer::with_transport(transport);

    player.play();
    assert!(player.is_playing());
    player.pause();
    assert!(!player.is_playing());

    assert_eq!(*calls.borrow(), vec!["resume", "pause", "silence"]);
    assert_eq!(emitted.borrow().len(), 2048);
}

#[test]
fn playing_callback_fires_on_every_call() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let seen = changes.clone();
    let mut player: MidiPlayer<FakeTransport> = MidiPlayer::new();
    player.on_playing_changed(move |playing| seen.borrow_mut().push(playing));

    player.play();
    player.play();
    player.pause();
    player.stop();
    assert_eq!(*changes.borrow(), vec![true, true, false, false]);
}

#[test]
fn unloaded_player_only_tracks_state() {
    let mut player: MidiPlayer<FakeTransport> = MidiPlayer::new();
    assert!(!player.is_loaded());
    player.play();
    assert!(player.is_playing());
    assert!(player.transport().is_none());
}

#[test]
fn loading_stops_the_previous_transport() {
    let first = FakeTransport::default();
    let first_calls = first.calls.clone();
    let mut player = MidiPlayer::with_transport(first);
    player.play();

    let second = FakeTransport::default();
    let second_calls = second.calls.clone();
    player.load(second);
    assert!(player.is_loaded());
    assert!(!player.is_playing());
    assert_eq!(*first_calls.borrow(), vec!["resume", "stop"]);
    assert!(second_calls.borrow().is_empty());
}

#[test]
fn manifest_fixup_resolves_relative_urls_and_names() {
    let mut m = MidiManifest::from_json(
        r#"{ "files": [
            { "url": "songs/intro.mid" },
            { "name": "", "url": "/abs/loop.midi" },
            { "name": "Remote", "url": "https://cdn.example.com/x.mid" }
        ] }"#,
    )
    .unwrap();
    m.fixup("/midi/manifest.json");

    assert_eq!(m.files[0].url, "/midi/songs/intro.mid");
    assert_eq!(m.files[0].name.as_deref(), Some("intro"));
    assert_eq!(m.files[1].url, "/abs/loop.midi");
    assert_eq!(m.files[1].name.as_deref(), Some("loop"));
    assert_eq!(m.files[2].url, "https://cdn.example.com/x.mid");
    assert_eq!(m.files[2].name.as_deref(), Some("Remote"));
    assert_eq!(m.first().unwrap().url, "/midi/songs/intro.mid");
}

#[test]
fn manifest_without_directory_keeps_relative_url() {
    let mut m = MidiManifest::from_json(r#"{"files":[{"url":"a.mid"}]}"#).unwrap();
    m.fixup("manifest.json");
    assert_eq!(m.files[0].url, "a.mid");
}

#[test]
fn manifest_errors() {
    assert!(matches!(
        MidiManifest::from_json("{}").unwrap().first(),
        Err(ManifestError::Empty)
    ));
    let err = MidiManifest::from_json("not json").unwrap_err();
    assert!(matches!(err, ManifestError::Json(_)));
    assert!(err.to_string().starts_with("invalid MIDI manifest"));
}
