//! Tab registry: open views, the active-tab pointer, per-tab display state.

use skiff_engine::{TabStripItem, WebEngine, WebView};
use skiff_types::error::Result;
use skiff_types::event::TabId;

use crate::projector::truncate_chars;

/// Label shown for a tab whose page has no title.
pub const UNTITLED_LABEL: &str = "New Tab";

// -----------------------------------------------------------------------
// TabSession
// -----------------------------------------------------------------------

/// One open tab and the view it owns.
#[derive(Debug)]
pub struct TabSession<V> {
    id: TabId,
    view: V,
    displayed_address: String,
    displayed_title: String,
    /// URL whose failure notice is currently installed in the view.
    notice_for: Option<String>,
}

impl<V: WebView> TabSession<V> {
    fn new(id: TabId, view: V, address: &str) -> Self {
        Self {
            id,
            view,
            displayed_address: address.to_string(),
            displayed_title: UNTITLED_LABEL.to_string(),
            notice_for: None,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn displayed_address(&self) -> &str {
        &self.displayed_address
    }

    pub fn displayed_title(&self) -> &str {
        &self.displayed_title
    }

    pub fn set_displayed_address(&mut self, url: &str) {
        if self.notice_for.as_deref().is_some_and(|failed| failed != url) {
            self.notice_for = None;
        }
        self.displayed_address = url.to_string();
    }

    /// Re-read the view's title into the tab label.
    pub fn refresh_title(&mut self, width: usize) {
        let title = self.view.title();
        self.displayed_title = if title.is_empty() {
            UNTITLED_LABEL.to_string()
        } else {
            truncate_chars(&title, width).to_string()
        };
    }

    /// Whether a failure notice for `url` is installed.
    pub fn shows_notice_for(&self, url: &str) -> bool {
        self.notice_for.as_deref() == Some(url)
    }

    /// Replace the view's content with `html` as the notice for `url`.
    pub fn install_notice(&mut self, url: &str, html: &str) {
        self.notice_for = Some(url.to_string());
        self.view.set_html(html);
    }

    /// A user-initiated navigation supersedes any installed notice.
    pub fn begin_navigation(&mut self) {
        self.notice_for = None;
    }
}

// -----------------------------------------------------------------------
// TabRegistry
// -----------------------------------------------------------------------

/// Result of a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab was removed; at least one tab remains.
    Closed,
    /// The tab is the only one open. It was kept; the session must end.
    LastTab,
    /// No such tab.
    NotFound,
}

/// Ordered set of open tabs plus the active-tab pointer.
#[derive(Debug)]
pub struct TabRegistry<V> {
    tabs: Vec<TabSession<V>>,
    active: Option<TabId>,
    next_id: u64,
}

impl<V> Default for TabRegistry<V> {
    fn default() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
        }
    }
}

impl<V: WebView> TabRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view through `engine`, start loading `url`, append the tab
    /// and make it active.
    pub fn open<E>(&mut self, engine: &mut E, url: &str) -> Result<TabId>
    where
        E: WebEngine<View = V>,
    {
        let id = TabId(self.next_id);
        self.next_id += 1;

        let mut view = engine.create_view(id)?;
        view.load(url);
        self.tabs.push(TabSession::new(id, view, url));
        self.active = Some(id);
        log::info!("Opened {id} at {url} ({} open)", self.tabs.len());
        Ok(id)
    }

    /// Close `id`. The last remaining tab is never removed; the caller ends
    /// the session instead. Closing the active tab activates its right
    /// neighbour, or the left one when it was rightmost.
    pub fn close(&mut self, id: TabId) -> CloseOutcome {
        let Some(idx) = self.index_of(id) else {
            return CloseOutcome::NotFound;
        };
        if self.tabs.len() == 1 {
            return CloseOutcome::LastTab;
        }
        // Dropping the session tears down its view.
        self.tabs.remove(idx);
        if self.active == Some(id) {
            let neighbour = idx.min(self.tabs.len() - 1);
            self.active = Some(self.tabs[neighbour].id);
        }
        log::info!("Closed {id} ({} open)", self.tabs.len());
        CloseOutcome::Closed
    }

    /// Point the active-tab pointer at `id`. Returns false if unknown.
    pub fn activate(&mut self, id: TabId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn is_active(&self, id: TabId) -> bool {
        self.active == Some(id)
    }

    pub fn active(&self) -> Option<&TabSession<V>> {
        self.get(self.active?)
    }

    pub fn active_mut(&mut self) -> Option<&mut TabSession<V>> {
        let id = self.active?;
        self.get_mut(id)
    }

    pub fn get(&self, id: TabId) -> Option<&TabSession<V>> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut TabSession<V>> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// Tab at position `index` in strip order.
    pub fn id_at(&self, index: usize) -> Option<TabId> {
        self.tabs.get(index).map(|t| t.id)
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabSession<V>> {
        self.tabs.iter()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Tab strip contents in order.
    pub fn strip(&self) -> Vec<TabStripItem> {
        self.tabs
            .iter()
            .map(|t| TabStripItem {
                tab: t.id,
                label: t.displayed_title.clone(),
                active: self.active == Some(t.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockEngine, MockView, ViewCall};

    fn registry_with(n: usize) -> (MockEngine, TabRegistry<MockView>, Vec<TabId>) {
        let mut engine = MockEngine::new();
        let mut tabs = TabRegistry::new();
        let ids = (0..n)
            .map(|i| tabs.open(&mut engine, &format!("https://t{i}.com")).unwrap())
            .collect();
        (engine, tabs, ids)
    }

    #[test]
    fn open_loads_and_activates() {
        let (engine, tabs, ids) = registry_with(2);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.active_id(), Some(ids[1]));
        assert_eq!(engine.created, ids);

        let tab = tabs.get(ids[0]).unwrap();
        assert_eq!(tab.view().calls, [ViewCall::Load("https://t0.com".into())]);
        assert_eq!(tab.displayed_address(), "https://t0.com");
        assert_eq!(tab.displayed_title(), UNTITLED_LABEL);
    }

    #[test]
    fn ids_are_never_reused() {
        let (mut engine, mut tabs, ids) = registry_with(2);
        tabs.close(ids[1]);
        let fresh = tabs.open(&mut engine, "https://new.com").unwrap();
        assert!(!ids.contains(&fresh));
    }

    #[test]
    fn create_view_failure_leaves_registry_unchanged() {
        let (mut engine, mut tabs, ids) = registry_with(1);
        engine.fail_next_create = true;
        assert!(tabs.open(&mut engine, "https://x.com").is_err());
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs.active_id(), Some(ids[0]));
    }

    #[test]
    fn closing_last_tab_is_refused() {
        let (_engine, mut tabs, ids) = registry_with(1);
        assert_eq!(tabs.close(ids[0]), CloseOutcome::LastTab);
        assert_eq!(tabs.len(), 1);
    }

    #[test]
    fn closing_unknown_tab() {
        let (_engine, mut tabs, _) = registry_with(2);
        assert_eq!(tabs.close(TabId(999)), CloseOutcome::NotFound);
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn closing_active_selects_right_neighbour() {
        let (_engine, mut tabs, ids) = registry_with(3);
        tabs.activate(ids[1]);
        assert_eq!(tabs.close(ids[1]), CloseOutcome::Closed);
        assert_eq!(tabs.active_id(), Some(ids[2]));
    }

    #[test]
    fn closing_rightmost_active_selects_left_neighbour() {
        let (_engine, mut tabs, ids) = registry_with(3);
        assert_eq!(tabs.close(ids[2]), CloseOutcome::Closed);
        assert_eq!(tabs.active_id(), Some(ids[1]));
    }

    #[test]
    fn closing_inactive_keeps_active() {
        let (_engine, mut tabs, ids) = registry_with(3);
        tabs.close(ids[0]);
        assert_eq!(tabs.active_id(), Some(ids[2]));
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn activate_unknown_is_rejected() {
        let (_engine, mut tabs, ids) = registry_with(2);
        assert!(!tabs.activate(TabId(42)));
        assert_eq!(tabs.active_id(), Some(ids[1]));
        assert!(tabs.activate(ids[0]));
        assert!(tabs.is_active(ids[0]));
    }

    #[test]
    fn title_truncated_with_placeholder_fallback() {
        let (_engine, mut tabs, ids) = registry_with(1);
        let tab = tabs.get_mut(ids[0]).unwrap();

        tab.view_mut().title = "An extremely long page title indeed".into();
        tab.refresh_title(20);
        assert_eq!(tab.displayed_title(), "An extremely long pa");

        tab.view_mut().title = String::new();
        tab.refresh_title(20);
        assert_eq!(tab.displayed_title(), UNTITLED_LABEL);
    }

    #[test]
    fn notice_cleared_by_navigation_or_new_address() {
        let (_engine, mut tabs, ids) = registry_with(1);
        let tab = tabs.get_mut(ids[0]).unwrap();

        tab.install_notice("https://bad.invalid", "<p>notice</p>");
        assert!(tab.shows_notice_for("https://bad.invalid"));
        tab.set_displayed_address("https://bad.invalid");
        assert!(tab.shows_notice_for("https://bad.invalid"));
        tab.set_displayed_address("https://elsewhere.com");
        assert!(!tab.shows_notice_for("https://bad.invalid"));

        tab.install_notice("https://bad.invalid", "<p>notice</p>");
        tab.begin_navigation();
        assert!(!tab.shows_notice_for("https://bad.invalid"));
    }

    #[test]
    fn strip_marks_active() {
        let (_engine, tabs, ids) = registry_with(2);
        let strip = tabs.strip();
        assert_eq!(strip.len(), 2);
        assert_eq!(strip[0].tab, ids[0]);
        assert!(!strip[0].active);
        assert!(strip[1].active);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn close_leaves_one_fewer_and_valid_active(n in 2usize..12, pick in 0usize..12, act in 0usize..12) {
                let (_engine, mut tabs, ids) = registry_with(n);
                tabs.activate(ids[act % n]);
                let victim = ids[pick % n];

                prop_assert_eq!(tabs.close(victim), CloseOutcome::Closed);
                prop_assert_eq!(tabs.len(), n - 1);
                let active = tabs.active_id().unwrap();
                prop_assert!(tabs.get(active).is_some());
                prop_assert!(active != victim);
            }
        }
    }
}
