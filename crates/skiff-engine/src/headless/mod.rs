//! Headless engine: a display-less stand-in for an embedded web engine.
//!
//! Views never fetch anything over the network. A load resolves
//! immediately and its outcome is queued as events for the next poll:
//!
//! - `about:` URLs always load (empty title).
//! - `file://` URLs (percent-decoded) load when the file is readable; the title comes from
//!   the document's `<title>` element.
//! - `http://` / `https://` URLs load unless the host is empty or under the
//!   reserved `.invalid` TLD; the title is the host name.
//! - anything else fails.
//!
//! Every successful remote load stores a session cookie for its host in the
//! shared profile, so clearing cookies has an observable effect.

pub mod nav;

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use url::Url;

use skiff_types::error::Result;
use skiff_types::event::{EngineEvent, TabId};

use crate::view::{Profile, WebEngine, WebView};
use nav::ViewHistory;

/// State shared between the engine, its profile and every view.
#[derive(Debug, Default)]
struct Shared {
    events: VecDeque<EngineEvent>,
    cookies: BTreeSet<String>,
}

type SharedRef = Rc<RefCell<Shared>>;

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Outcome of resolving a URL without a network stack.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Resolution {
    success: bool,
    title: String,
    cookie_host: Option<String>,
}

impl Resolution {
    fn failed() -> Self {
        Self {
            success: false,
            title: String::new(),
            cookie_host: None,
        }
    }
}

fn resolve(url: &str) -> Resolution {
    if url.starts_with("about:") {
        return Resolution {
            success: true,
            title: String::new(),
            cookie_host: None,
        };
    }
    if url.starts_with("file://") {
        let Some(path) = Url::parse(url).ok().and_then(|u| u.to_file_path().ok()) else {
            log::debug!("headless: not a local file url: {url}");
            return Resolution::failed();
        };
        return match std::fs::read_to_string(&path) {
            Ok(doc) => Resolution {
                success: true,
                title: extract_title(&doc).unwrap_or_default(),
                cookie_host: None,
            },
            Err(e) => {
                log::debug!("headless: cannot read {}: {e}", path.display());
                Resolution::failed()
            },
        };
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    let Some(rest) = rest else {
        return Resolution::failed();
    };
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if host.is_empty()
        || host.chars().any(char::is_whitespace)
        || host == "invalid"
        || host.ends_with(".invalid")
    {
        return Resolution::failed();
    }
    Resolution {
        success: true,
        title: host.clone(),
        cookie_host: Some(host),
    }
}

/// Text of the first `<title>` element, trimmed.
fn extract_title(doc: &str) -> Option<String> {
    let lower = doc.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</title")?;
    Some(doc[start..end].trim().to_string())
}

// -----------------------------------------------------------------------
// HeadlessProfile
// -----------------------------------------------------------------------

/// Shared profile of the headless engine.
pub struct HeadlessProfile {
    cache_path: PathBuf,
    storage_path: PathBuf,
    shared: SharedRef,
}

impl HeadlessProfile {
    /// Directory reserved for cookies and site storage.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Hosts currently holding a cookie.
    pub fn cookie_hosts(&self) -> Vec<String> {
        self.shared.borrow().cookies.iter().cloned().collect()
    }
}

impl Profile for HeadlessProfile {
    fn clear_http_cache(&mut self) {
        // Nothing is cached in memory; the on-disk directory is managed by
        // the shell.
        log::debug!("headless: HTTP cache cleared");
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_path.clone()
    }

    fn delete_all_cookies(&mut self) {
        let mut shared = self.shared.borrow_mut();
        log::debug!("headless: deleting {} cookies", shared.cookies.len());
        shared.cookies.clear();
    }
}

// -----------------------------------------------------------------------
// HeadlessEngine
// -----------------------------------------------------------------------

/// Engine creating [`HeadlessView`]s that share one [`HeadlessProfile`].
pub struct HeadlessEngine {
    shared: SharedRef,
    profile: HeadlessProfile,
}

impl HeadlessEngine {
    pub fn new(cache_path: PathBuf, storage_path: PathBuf) -> Self {
        let shared: SharedRef = Rc::new(RefCell::new(Shared::default()));
        let profile = HeadlessProfile {
            cache_path,
            storage_path,
            shared: Rc::clone(&shared),
        };
        Self { shared, profile }
    }

    /// The concrete profile, for callers that need more than [`Profile`].
    pub fn headless_profile(&self) -> &HeadlessProfile {
        &self.profile
    }
}

impl WebEngine for HeadlessEngine {
    type View = HeadlessView;

    fn create_view(&mut self, tab: TabId) -> Result<HeadlessView> {
        Ok(HeadlessView {
            tab,
            shared: Rc::clone(&self.shared),
            history: ViewHistory::new(),
            url: String::new(),
            title: String::new(),
            html: None,
            scripts: Vec::new(),
        })
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.shared.borrow_mut().events.drain(..).collect()
    }

    fn profile(&mut self) -> &mut dyn Profile {
        &mut self.profile
    }
}

// -----------------------------------------------------------------------
// HeadlessView
// -----------------------------------------------------------------------

/// A view of the headless engine.
pub struct HeadlessView {
    tab: TabId,
    shared: SharedRef,
    history: ViewHistory,
    url: String,
    title: String,
    /// Content installed by `set_html`, replacing the loaded document.
    html: Option<String>,
    scripts: Vec<String>,
}

impl HeadlessView {
    /// Content installed with `set_html`, if the current page was replaced.
    pub fn replaced_html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Scripts executed since the view was created.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    fn emit(&self, event: EngineEvent) {
        self.shared.borrow_mut().events.push_back(event);
    }

    fn start_load(&mut self, url: &str) {
        let res = resolve(url);
        self.url = url.to_string();
        self.title = res.title;
        self.html = None;
        if let Some(host) = res.cookie_host {
            self.shared.borrow_mut().cookies.insert(host);
        }
        self.emit(EngineEvent::address_changed(self.tab, url));
        self.emit(EngineEvent::load_finished(self.tab, res.success));
    }
}

impl WebView for HeadlessView {
    fn load(&mut self, url: &str) {
        self.history.navigate(url);
        self.start_load(url);
    }

    fn back(&mut self) {
        if let Some(url) = self.history.go_back() {
            self.start_load(&url);
        }
    }

    fn forward(&mut self) {
        if let Some(url) = self.history.go_forward() {
            self.start_load(&url);
        }
    }

    fn reload(&mut self) {
        if let Some(url) = self.history.current().map(str::to_string) {
            self.start_load(&url);
        }
    }

    fn set_html(&mut self, html: &str) {
        self.title = extract_title(html).unwrap_or_default();
        self.html = Some(html.to_string());
        self.emit(EngineEvent::load_finished(self.tab, true));
    }

    fn run_script(&mut self, js_source: &str) {
        self.scripts.push(js_source.to_string());
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }
}

impl Drop for HeadlessView {
    fn drop(&mut self) {
        let tab = self.tab;
        self.shared.borrow_mut().events.retain(|ev| ev.tab != tab);
    }
}
