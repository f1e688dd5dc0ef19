//! Rendering engine capability traits.

use std::path::PathBuf;

use skiff_types::error::Result;
use skiff_types::event::{EngineEvent, TabId};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// A single embedded web view.
///
/// Loading is asynchronous: none of these calls wait for the page. Progress
/// is reported through the owning engine's event queue. Dropping a view
/// tears it down; no further events are delivered for it.
pub trait WebView {
    /// Begin loading `url`.
    fn load(&mut self, url: &str);

    /// Step back in the view's own history.
    fn back(&mut self);

    /// Step forward in the view's own history.
    fn forward(&mut self);

    /// Reload the current page.
    fn reload(&mut self);

    /// Replace the displayed content with `html`. The view's URL is left
    /// unchanged.
    fn set_html(&mut self, html: &str);

    /// Execute `js_source` in the page's script context.
    fn run_script(&mut self, js_source: &str);

    /// Current address.
    fn url(&self) -> String;

    /// Current page title (empty if the page has none).
    fn title(&self) -> String;
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Storage context shared by all views: HTTP cache, cookies, site data.
pub trait Profile {
    /// Drop the engine's in-memory and on-disk HTTP cache.
    fn clear_http_cache(&mut self);

    /// Directory holding the HTTP cache.
    fn cache_path(&self) -> PathBuf;

    /// Delete every cookie in the shared store.
    fn delete_all_cookies(&mut self);
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Factory for views bound to one shared [`Profile`].
pub trait WebEngine {
    type View: WebView;

    /// Create a view whose events will be tagged with `tab`.
    fn create_view(&mut self, tab: TabId) -> Result<Self::View>;

    /// Drain all events queued since the last poll, in emission order.
    fn poll_events(&mut self) -> Vec<EngineEvent>;

    /// The shared storage profile.
    fn profile(&mut self) -> &mut dyn Profile;
}
