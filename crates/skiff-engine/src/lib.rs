//! Engine and chrome abstractions for Skiff.
//!
//! The rendering engine (page fetch, DOM, scripting, cache and cookie
//! storage) and the window-system chrome are external collaborators. This
//! crate pins down the capability surface the shell consumes from each:
//!
//! - [`WebView`] -- one per tab: load, history navigation, content
//!   replacement, script execution, current URL and title.
//! - [`Profile`] -- the storage context shared by every view.
//! - [`WebEngine`] -- creates views and queues their [`EngineEvent`]s.
//! - [`Chrome`] -- address bar, tab strip, history menu, dialogs.
//!
//! [`HeadlessEngine`] is a self-contained implementation used by the
//! console host.
//!
//! [`EngineEvent`]: skiff_types::event::EngineEvent

pub mod chrome;
pub mod headless;
pub mod view;

pub use chrome::{Chrome, HistoryMenuItem, TabStripItem};
pub use headless::{HeadlessEngine, HeadlessProfile, HeadlessView};
pub use view::{Profile, WebEngine, WebView};
