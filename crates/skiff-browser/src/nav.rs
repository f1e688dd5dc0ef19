//! Navigation controller: user intents against the active tab, URL-bar
//! normalization, and URL classification.

use skiff_engine::WebView;

use crate::tabs::TabRegistry;

/// Placeholder address of an empty view.
pub const BLANK_URL: &str = "about:blank";

/// Prepend `https://` unless the text already names an http(s) scheme.
/// Surrounding whitespace is trimmed; nothing else is validated.
pub fn normalize_address(raw: &str) -> String {
    let text = raw.trim();
    if has_prefix_ignore_case(text, "http://") || has_prefix_ignore_case(text, "https://") {
        text.to_string()
    } else {
        format!("https://{text}")
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Local resources: files on disk and `about:` pages.
pub fn is_local(url: &str) -> bool {
    has_prefix_ignore_case(url, "file:") || has_prefix_ignore_case(url, "about:")
}

/// Pages that belong in the history log.
pub fn is_trackable(url: &str) -> bool {
    !url.is_empty() && url != BLANK_URL && !is_local(url)
}

/// Whether `url` is the home page, ignoring any fragment.
pub fn is_home(url: &str, home_url: &str) -> bool {
    if home_url.is_empty() {
        return false;
    }
    url == home_url
        || url
            .strip_prefix(home_url)
            .is_some_and(|rest| rest.starts_with('#'))
}

/// Translates navigation intents into calls on the active tab's view.
/// Every operation is a no-op when no tab is active.
#[derive(Debug, Clone)]
pub struct NavigationController {
    home_url: String,
}

impl NavigationController {
    pub fn new(home_url: &str) -> Self {
        Self {
            home_url: home_url.to_string(),
        }
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    pub fn back<V: WebView>(&self, tabs: &mut TabRegistry<V>) {
        if let Some(tab) = tabs.active_mut() {
            tab.begin_navigation();
            tab.view_mut().back();
        }
    }

    pub fn forward<V: WebView>(&self, tabs: &mut TabRegistry<V>) {
        if let Some(tab) = tabs.active_mut() {
            tab.begin_navigation();
            tab.view_mut().forward();
        }
    }

    pub fn reload<V: WebView>(&self, tabs: &mut TabRegistry<V>) {
        if let Some(tab) = tabs.active_mut() {
            tab.begin_navigation();
            tab.view_mut().reload();
        }
    }

    /// Load the home page in the active tab.
    pub fn go_home<V: WebView>(&self, tabs: &mut TabRegistry<V>) {
        self.load_active(tabs, &self.home_url);
    }

    /// Normalize `raw_text` and load it in the active tab. Returns the
    /// address handed to the engine, or None without an active tab.
    pub fn navigate<V: WebView>(&self, tabs: &mut TabRegistry<V>, raw_text: &str) -> Option<String> {
        tabs.active()?;
        let url = normalize_address(raw_text);
        self.load_active(tabs, &url);
        Some(url)
    }

    fn load_active<V: WebView>(&self, tabs: &mut TabRegistry<V>, url: &str) {
        if let Some(tab) = tabs.active_mut() {
            log::debug!("{}: load {url}", tab.id());
            tab.begin_navigation();
            tab.view_mut().load(url);
        }
    }
}
