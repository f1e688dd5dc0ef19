//! Session shell: owns every piece of browser state and is the single
//! dispatch point for user intents and engine events.

use std::io;
use std::path::Path;

use skiff_engine::{Chrome, HistoryMenuItem, WebEngine, WebView};
use skiff_types::config::ShellConfig;
use skiff_types::error::Result;
use skiff_types::event::{EngineEvent, EngineEventKind, TabId};

use crate::history::{HistoryEntry, HistoryLog, HistoryStore};
use crate::nav::{self, NavigationController};
use crate::pages;
use crate::projector::HistoryProjector;
use crate::tabs::{CloseOutcome, TabRegistry};

/// The running browser session.
///
/// Owns the engine (and through it the shared profile), the chrome, the
/// history log and store, and the tab registry. Nothing here is shared
/// across threads.
pub struct Session<E: WebEngine, C: Chrome> {
    config: ShellConfig,
    engine: E,
    chrome: C,
    store: HistoryStore,
    history: HistoryLog,
    projector: HistoryProjector,
    menu: Vec<HistoryMenuItem>,
    tabs: TabRegistry<E::View>,
    nav: NavigationController,
    running: bool,
}

impl<E: WebEngine, C: Chrome> Session<E, C> {
    /// Start a session: prepare the cache directories, load history,
    /// publish the history menu, open one tab at the home page and show
    /// the window.
    pub fn start(config: ShellConfig, engine: E, chrome: C) -> Result<Self> {
        config.ensure_cache_dirs()?;

        let store = HistoryStore::new(&config.history_file);
        let history = store.load();
        log::info!(
            "Loaded {} history entries from {}",
            history.len(),
            store.path().display()
        );

        let home_url = config.home_url()?;
        let projector = HistoryProjector::new(config.history_menu_limit, config.history_label_width);
        let mut session = Self {
            nav: NavigationController::new(&home_url),
            config,
            engine,
            chrome,
            store,
            history,
            projector,
            menu: Vec::new(),
            tabs: TabRegistry::new(),
            running: true,
        };

        session.refresh_history_menu();
        session.open_tab(None)?;
        session
            .chrome
            .show(&session.config.window_title, session.config.fullscreen);
        Ok(session)
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn home_url(&self) -> &str {
        self.nav.home_url()
    }

    pub fn tabs(&self) -> &TabRegistry<E::View> {
        &self.tabs
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Current history menu, newest first.
    pub fn history_menu(&self) -> &[HistoryMenuItem] {
        &self.menu
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn chrome(&self) -> &C {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut C {
        &mut self.chrome
    }

    // -------------------------------------------------------------------
    // Tabs
    // -------------------------------------------------------------------

    /// Open a tab at `url` (the home page when None) and focus it.
    pub fn open_tab(&mut self, url: Option<&str>) -> Result<TabId> {
        let url = url.map_or_else(|| self.nav.home_url().to_string(), str::to_string);
        let id = self.tabs.open(&mut self.engine, &url)?;
        self.chrome.set_tabs(&self.tabs.strip());
        self.chrome.set_address(&url);
        Ok(id)
    }

    /// Close `tab`. Closing the only open tab ends the session.
    pub fn close_tab(&mut self, tab: TabId) {
        match self.tabs.close(tab) {
            CloseOutcome::Closed => {
                self.chrome.set_tabs(&self.tabs.strip());
                self.refresh_address_bar();
            },
            CloseOutcome::LastTab => self.quit(),
            CloseOutcome::NotFound => log::debug!("close: no such tab {tab}"),
        }
    }

    /// Close the active tab.
    pub fn close_active_tab(&mut self) {
        if let Some(id) = self.tabs.active_id() {
            self.close_tab(id);
        }
    }

    /// Focus `tab`. Returns false if it is not open.
    pub fn switch_to(&mut self, tab: TabId) -> bool {
        if !self.tabs.activate(tab) {
            return false;
        }
        self.chrome.set_tabs(&self.tabs.strip());
        self.refresh_address_bar();
        true
    }

    /// Open the history menu item at `index` in a new tab.
    pub fn open_history_item(&mut self, index: usize) -> Result<Option<TabId>> {
        let Some(item) = self.menu.get(index) else {
            return Ok(None);
        };
        let url = item.url.clone();
        self.open_tab(Some(&url)).map(Some)
    }

    // -------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------

    pub fn back(&mut self) {
        self.nav.back(&mut self.tabs);
    }

    pub fn forward(&mut self) {
        self.nav.forward(&mut self.tabs);
    }

    pub fn reload(&mut self) {
        self.nav.reload(&mut self.tabs);
    }

    pub fn go_home(&mut self) {
        self.nav.go_home(&mut self.tabs);
    }

    /// Load the address-bar text in the active tab.
    pub fn navigate(&mut self, raw_text: &str) -> Option<String> {
        self.nav.navigate(&mut self.tabs, raw_text)
    }

    // -------------------------------------------------------------------
    // Engine events
    // -------------------------------------------------------------------

    /// Drain the engine's event queue and dispatch every event in order.
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let events = self.engine.poll_events();
        let count = events.len();
        for event in events {
            self.dispatch(event);
        }
        count
    }

    /// Apply one engine event. Events for closed tabs are ignored.
    pub fn dispatch(&mut self, event: EngineEvent) {
        if self.tabs.get(event.tab).is_none() {
            log::debug!("Dropping {:?} for closed {}", event.kind, event.tab);
            return;
        }
        match event.kind {
            EngineEventKind::AddressChanged(url) => self.on_address_changed(event.tab, &url),
            EngineEventKind::LoadFinished { success } => self.on_load_finished(event.tab, success),
        }
    }

    fn on_address_changed(&mut self, id: TabId, url: &str) {
        if let Some(tab) = self.tabs.get_mut(id) {
            tab.set_displayed_address(url);
        }
        if self.tabs.is_active(id) {
            self.chrome.set_address(url);
        }
    }

    fn on_load_finished(&mut self, id: TabId, success: bool) {
        let home_url = self.nav.home_url().to_string();
        let title_width = self.config.tab_title_width;
        let Some(tab) = self.tabs.get_mut(id) else {
            return;
        };
        let url = tab.view().url();
        log::debug!("{id}: load finished ({success}) {url}");

        // Failed remote load: swap in our notice, once per failure.
        if !success && !url.is_empty() && !nav::is_local(&url) && !tab.shows_notice_for(&url) {
            log::info!("{id}: load failed for {url}");
            tab.install_notice(&url, &pages::notice_page_html(&url, &home_url));
        }

        tab.refresh_title(title_width);

        let record = success && nav::is_trackable(&url) && !tab.shows_notice_for(&url);
        let page_title = tab.view().title();
        self.chrome.set_tabs(&self.tabs.strip());

        if record {
            let entry = HistoryEntry::capture(&url, &page_title);
            self.store.append_and_persist(&mut self.history, entry);
            self.refresh_history_menu();
        }

        if nav::is_home(&url, &home_url) {
            self.sync_history_to_home(id);
        }
    }

    /// Push the serialized history into the home page's script context.
    fn sync_history_to_home(&mut self, id: TabId) {
        let script = match pages::history_sync_script(&self.history) {
            Ok(script) => script,
            Err(e) => {
                log::warn!("Cannot serialize history for home page: {e}");
                return;
            },
        };
        if let Some(tab) = self.tabs.get_mut(id) {
            tab.view_mut().run_script(&script);
        }
    }

    fn refresh_history_menu(&mut self) {
        self.menu = self.projector.project(&self.history);
        self.chrome.set_history_menu(&self.menu);
    }

    fn refresh_address_bar(&mut self) {
        if let Some(tab) = self.tabs.active() {
            self.chrome.set_address(tab.displayed_address());
        }
    }

    // -------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------

    /// Clear the shared HTTP cache and reset its directory on disk.
    pub fn clear_cache(&mut self) {
        let profile = self.engine.profile();
        profile.clear_http_cache();
        let cache_path = profile.cache_path();
        if cache_path.exists()
            && let Err(e) = reset_dir(&cache_path)
        {
            log::warn!("Could not reset cache dir {}: {e}", cache_path.display());
        }
        log::info!("HTTP cache cleared");
        self.chrome
            .acknowledge("Cache Cleared", "Browser cache has been cleared successfully.");
    }

    /// Delete every cookie in the shared profile.
    pub fn clear_cookies(&mut self) {
        self.engine.profile().delete_all_cookies();
        log::info!("Cookies cleared");
        self.chrome
            .acknowledge("Cookies Cleared", "All cookies have been cleared successfully.");
    }

    pub fn about(&mut self) {
        let title = format!("About {}", self.config.window_title);
        let message = format!(
            "{} v{}\n\nA tabbed browser shell.",
            self.config.window_title,
            env!("CARGO_PKG_VERSION")
        );
        self.chrome.acknowledge(&title, &message);
    }

    /// End the session and close the window.
    pub fn quit(&mut self) {
        if self.running {
            log::info!("Session ending");
            self.running = false;
            self.chrome.close_window();
        }
    }
}

/// Remove `path` recursively and recreate it empty.
fn reset_dir(path: &Path) -> io::Result<()> {
    std::fs::remove_dir_all(path)?;
    std::fs::create_dir_all(path)
}

#[cfg(test)]
impl<E: WebEngine, C: Chrome> Session<E, C> {
    pub(crate) fn view_mut(&mut self, id: TabId) -> &mut E::View {
        self.tabs
            .get_mut(id)
            .map(|t| t.view_mut())
            .expect("tab is open")
    }

    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
