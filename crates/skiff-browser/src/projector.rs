//! History log projection for the history menu.

use skiff_engine::HistoryMenuItem;

use crate::history::HistoryLog;

/// Default number of entries shown in the history menu.
pub const DEFAULT_MAX_COUNT: usize = 50;
/// Default number of title characters kept in a menu label.
pub const DEFAULT_LABEL_WIDTH: usize = 50;

/// Derives the bounded, newest-first history menu from a [`HistoryLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryProjector {
    pub max_count: usize,
    pub label_width: usize,
}

impl Default for HistoryProjector {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

impl HistoryProjector {
    pub fn new(max_count: usize, label_width: usize) -> Self {
        Self {
            max_count,
            label_width,
        }
    }

    /// The newest `max_count` entries, newest first, labelled
    /// `"<title truncated> - <timestamp>"`.
    pub fn project(&self, log: &HistoryLog) -> Vec<HistoryMenuItem> {
        log.entries()
            .iter()
            .rev()
            .take(self.max_count)
            .map(|entry| HistoryMenuItem {
                label: format!(
                    "{} - {}",
                    truncate_chars(entry.title(), self.label_width),
                    entry.timestamp_string()
                ),
                url: entry.url().to_string(),
            })
            .collect()
    }
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
