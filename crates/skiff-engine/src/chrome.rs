//! Window-system chrome abstraction.

use skiff_types::event::TabId;

/// One entry of the history menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMenuItem {
    pub label: String,
    pub url: String,
}

/// One tab as shown in the tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStripItem {
    pub tab: TabId,
    pub label: String,
    pub active: bool,
}

/// The widgets surrounding the views: toolbar, tab strip, menus, dialogs.
pub trait Chrome {
    /// Show the main window.
    fn show(&mut self, title: &str, fullscreen: bool);

    /// Replace the address bar text.
    fn set_address(&mut self, url: &str);

    /// Redraw the tab strip in order.
    fn set_tabs(&mut self, tabs: &[TabStripItem]);

    /// Rebuild the history menu. Items are newest first.
    fn set_history_menu(&mut self, items: &[HistoryMenuItem]);

    /// Show a modal message and block until the user dismisses it.
    fn acknowledge(&mut self, title: &str, message: &str);

    /// Close the main window, ending the session.
    fn close_window(&mut self);
}
