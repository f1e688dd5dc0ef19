//! Text-mode chrome: renders the toolbar, tab strip and dialogs as lines.

use std::io::{self, BufRead, Write};

use skiff_engine::{Chrome, HistoryMenuItem, TabStripItem};

/// A [`Chrome`] writing to any text sink.
///
/// When `interactive`, acknowledgement dialogs block until a line is read
/// from stdin.
pub struct ConsoleChrome<W: Write> {
    out: W,
    interactive: bool,
    menu_len: usize,
    closed: bool,
}

impl<W: Write> ConsoleChrome<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out,
            interactive,
            menu_len: 0,
            closed: false,
        }
    }

    /// Number of entries in the last published history menu.
    #[cfg(test)]
    pub fn menu_len(&self) -> usize {
        self.menu_len
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Write one line. A broken terminal is not worth crashing the loop.
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            log::warn!("console write failed: {e}");
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Chrome for ConsoleChrome<W> {
    fn show(&mut self, title: &str, fullscreen: bool) {
        let mode = if fullscreen { "fullscreen" } else { "windowed" };
        self.line(&format!("== {title} ({mode}) == type 'help' for commands"));
    }

    fn set_address(&mut self, url: &str) {
        self.line(&format!("address: {url}"));
    }

    fn set_tabs(&mut self, tabs: &[TabStripItem]) {
        let strip: Vec<String> = tabs
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let marker = if t.active { "*" } else { " " };
                format!("{marker}[{}] {}", i + 1, t.label)
            })
            .collect();
        self.line(&format!("tabs: {}", strip.join("  ")));
    }

    fn set_history_menu(&mut self, items: &[HistoryMenuItem]) {
        self.menu_len = items.len();
    }

    fn acknowledge(&mut self, title: &str, message: &str) {
        self.line(&format!("[{title}] {message}"));
        if self.interactive {
            self.line("(press Enter)");
            if let Err(e) = self.out.flush() {
                log::warn!("console flush failed: {e}");
            }
            let mut buf = String::new();
            if let Err(e) = io::stdin().lock().read_line(&mut buf) {
                log::warn!("acknowledge: {e}");
            }
        }
    }

    fn close_window(&mut self) {
        self.closed = true;
        self.line("window closed");
    }
}
