//! Shell configuration (from `skiff.toml`).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{Result, SkiffError};

/// Subdirectory of the cache root holding the HTTP cache.
pub const HTTP_CACHE_SUBDIR: &str = "cache";
/// Subdirectory of the cache root holding cookies and site storage.
pub const STORAGE_SUBDIR: &str = "storage";

/// Runtime configuration for the browser shell.
///
/// Every field is optional in the TOML document; missing keys take the
/// values from [`ShellConfig::default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Window title.
    pub window_title: String,
    /// Local document used as the home page.
    pub home_page: PathBuf,
    /// JSON file the history log is persisted to.
    pub history_file: PathBuf,
    /// Root of the on-disk engine cache.
    pub cache_dir: PathBuf,
    /// Maximum entries shown in the history menu.
    pub history_menu_limit: usize,
    /// Title characters kept in a history menu label.
    pub history_label_width: usize,
    /// Title characters kept in a tab label.
    pub tab_title_width: usize,
    /// Show the window fullscreen at startup.
    pub fullscreen: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            window_title: "Skiff".to_string(),
            home_page: PathBuf::from("homepage.html"),
            history_file: PathBuf::from("browser_history.json"),
            cache_dir: PathBuf::from("cache"),
            history_menu_limit: 50,
            history_label_width: 50,
            tab_title_width: 20,
            fullscreen: true,
        }
    }
}

impl ShellConfig {
    /// Parse a configuration document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| SkiffError::Config(format!("skiff.toml: {e}")))
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Absolute, percent-encoded `file://` URL of the home page.
    pub fn home_url(&self) -> Result<String> {
        let path = std::path::absolute(&self.home_page)?;
        file_url(&path)
    }

    /// Directory handed to the engine for its HTTP cache.
    pub fn http_cache_path(&self) -> PathBuf {
        self.cache_dir.join(HTTP_CACHE_SUBDIR)
    }

    /// Directory handed to the engine for cookies and site storage.
    pub fn storage_path(&self) -> PathBuf {
        self.cache_dir.join(STORAGE_SUBDIR)
    }

    /// Create the cache root and both subdirectories if absent.
    pub fn ensure_cache_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.http_cache_path())?;
        std::fs::create_dir_all(self.storage_path())?;
        Ok(())
    }
}

/// Format an absolute path as a percent-encoded `file://` URL.
pub fn file_url(path: &Path) -> Result<String> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| SkiffError::Config(format!("not an absolute path: {}", path.display())))
}
