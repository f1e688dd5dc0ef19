//! Shared test utilities for the browser core.
//!
//! Provides a recording engine, view, profile and chrome. Views never emit
//! events on their own; tests push events into [`MockEngine::queue`] or call
//! `Session::dispatch` directly.

use std::collections::VecDeque;
use std::path::PathBuf;

use skiff_engine::{Chrome, HistoryMenuItem, Profile, TabStripItem, WebEngine, WebView};
use skiff_types::error::{Result, SkiffError};
use skiff_types::event::{EngineEvent, TabId};

/// A recorded capability call on a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Load(String),
    Back,
    Forward,
    Reload,
    SetHtml(String),
    RunScript(String),
}

/// A view that records calls. `url` and `title` are set by tests.
#[derive(Debug, Default)]
pub struct MockView {
    pub calls: Vec<ViewCall>,
    pub url: String,
    pub title: String,
}

impl MockView {
    pub fn scripts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::RunScript(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn replaced_html(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::SetHtml(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl WebView for MockView {
    fn load(&mut self, url: &str) {
        self.calls.push(ViewCall::Load(url.to_string()));
    }

    fn back(&mut self) {
        self.calls.push(ViewCall::Back);
    }

    fn forward(&mut self) {
        self.calls.push(ViewCall::Forward);
    }

    fn reload(&mut self) {
        self.calls.push(ViewCall::Reload);
    }

    fn set_html(&mut self, html: &str) {
        self.calls.push(ViewCall::SetHtml(html.to_string()));
    }

    fn run_script(&mut self, js_source: &str) {
        self.calls.push(ViewCall::RunScript(js_source.to_string()));
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

/// A profile that counts clear requests.
#[derive(Debug, Default)]
pub struct MockProfile {
    pub cache_path: PathBuf,
    pub http_cache_clears: usize,
    pub cookie_clears: usize,
}

impl Profile for MockProfile {
    fn clear_http_cache(&mut self) {
        self.http_cache_clears += 1;
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_path.clone()
    }

    fn delete_all_cookies(&mut self) {
        self.cookie_clears += 1;
    }
}

/// An engine handing out [`MockView`]s.
#[derive(Debug, Default)]
pub struct MockEngine {
    pub created: Vec<TabId>,
    pub queue: VecDeque<EngineEvent>,
    pub profile: MockProfile,
    pub fail_next_create: bool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            profile: MockProfile {
                cache_path,
                ..MockProfile::default()
            },
            ..Self::default()
        }
    }
}

impl WebEngine for MockEngine {
    type View = MockView;

    fn create_view(&mut self, tab: TabId) -> Result<MockView> {
        if std::mem::take(&mut self.fail_next_create) {
            return Err(SkiffError::Engine("mock create failure".into()));
        }
        self.created.push(tab);
        Ok(MockView::default())
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.queue.drain(..).collect()
    }

    fn profile(&mut self) -> &mut dyn Profile {
        &mut self.profile
    }
}

/// A chrome that records everything shown to the user.
#[derive(Debug, Default)]
pub struct MockChrome {
    pub shown: Option<(String, bool)>,
    pub addresses: Vec<String>,
    pub tabs: Vec<TabStripItem>,
    pub menu: Vec<HistoryMenuItem>,
    pub menu_refreshes: usize,
    pub dialogs: Vec<(String, String)>,
    pub closed: bool,
}

impl MockChrome {
    pub fn address(&self) -> Option<&str> {
        self.addresses.last().map(String::as_str)
    }
}

impl Chrome for MockChrome {
    fn show(&mut self, title: &str, fullscreen: bool) {
        self.shown = Some((title.to_string(), fullscreen));
    }

    fn set_address(&mut self, url: &str) {
        self.addresses.push(url.to_string());
    }

    fn set_tabs(&mut self, tabs: &[TabStripItem]) {
        self.tabs = tabs.to_vec();
    }

    fn set_history_menu(&mut self, items: &[HistoryMenuItem]) {
        self.menu = items.to_vec();
        self.menu_refreshes += 1;
    }

    fn acknowledge(&mut self, title: &str, message: &str) {
        self.dialogs.push((title.to_string(), message.to_string()));
    }

    fn close_window(&mut self) {
        self.closed = true;
    }
}
