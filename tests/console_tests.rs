// Host-side tests for the on-page console mirror.

use mobrave_core::{ConsoleMirror, DEFAULT_CONSOLE_CAP};

#[test]
fn lines_are_appended_with_breaks() {
    let mut c = ConsoleMirror::default();
    assert!(!c.push("Loading WASM module..."));
    assert!(!c.push("done"));
    assert_eq!(c.html(), "Loading WASM module...<br>done<br>");
}

#[test]
fn markup_is_escaped() {
    let mut c = ConsoleMirror::new(DEFAULT_CONSOLE_CAP);
    c.push("<b>a & b</b>");
    assert_eq!(c.html(), "&lt;b&gt;a &amp; b&lt;/b&gt;<br>");
}

#[test]
fn buffer_over_cap_is_cleared_before_append() {
    let mut c = ConsoleMirror::new(10);
    assert!(!c.push("0123456789"));
    // 14 bytes now, over the cap of 10.
    assert!(c.push("next"));
    assert_eq!(c.html(), "next<br>");
}

#[test]
fn buffer_at_cap_is_kept() {
    let mut c = ConsoleMirror::new(8);
    c.push("abcd");
    assert_eq!(c.html().len(), 8);
    assert!(!c.push("e"));
    assert_eq!(c.html(), "abcd<br>e<br>");
}
