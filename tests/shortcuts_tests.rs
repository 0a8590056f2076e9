// Host-side tests for keyboard shortcut mapping.

use mobrave_core::{shortcut_for_key, Shortcut};

#[test]
fn keys_map_to_shortcuts_case_insensitively() {
    assert_eq!(shortcut_for_key(" "), Some(Shortcut::TogglePlay));
    for (lower, upper, expected) in [
        ("b", "B", Shortcut::ToggleBypass),
        ("m", "M", Shortcut::ToggleMidi),
        ("d", "D", Shortcut::ToggleDebug),
        ("r", "R", Shortcut::ResetParameters),
    ] {
        assert_eq!(shortcut_for_key(lower), Some(expected));
        assert_eq!(shortcut_for_key(upper), Some(expected));
    }
}

#[test]
fn other_keys_do_nothing() {
    for key in ["a", "Enter", "Escape", "ArrowUp", "", "bb"] {
        assert_eq!(shortcut_for_key(key), None, "key {key:?}");
    }
}
