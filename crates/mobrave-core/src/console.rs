/// Cap on the mirrored console text before it is cleared.
pub const DEFAULT_CONSOLE_CAP: usize = 64 * 1024;

/// HTML mirror of recent log lines for the on-page console panel.
#[derive(Clone, Debug)]
pub struct ConsoleMirror {
    cap: usize,
    html: String,
}

impl Default for ConsoleMirror {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE_CAP)
    }
}

impl ConsoleMirror {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            html: String::new(),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Append one line, clearing first if the buffer is over the cap.
    /// Returns `true` when the buffer was cleared.
    pub fn push(&mut self, message: &str) -> bool {
        let cleared = self.html.len() > self.cap;
        if cleared {
            self.html.clear();
        }
        for c in message.chars() {
            match c {
                '<' => self.html.push_str("&lt;"),
                '>' => self.html.push_str("&gt;"),
                '&' => self.html.push_str("&amp;"),
                c => self.html.push(c),
            }
        }
        self.html.push_str("<br>");
        cleared
    }
}
