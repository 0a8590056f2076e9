#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// Space: same as the play button.
    TogglePlay,
    /// Toggle the engine's bypass.
    ToggleBypass,
    /// Start or pause MIDI playback.
    ToggleMidi,
    /// Show or hide the debug panel.
    ToggleDebug,
    /// Restore every parameter to its initial value.
    ResetParameters,
}

#[inline]
pub fn shortcut_for_key(key: &str) -> Option<Shortcut> {
    match key {
        " " => Some(Shortcut::TogglePlay),
        "b" | "B" => Some(Shortcut::ToggleBypass),
        "m" | "M" => Some(Shortcut::ToggleMidi),
        "d" | "D" => Some(Shortcut::ToggleDebug),
        "r" | "R" => Some(Shortcut::ResetParameters),
        _ => None,
    }
}
