//! Browser shell core: history, tabs, navigation and session wiring.
//!
//! The rendering engine is consumed through the [`skiff_engine`] traits.
//! Everything here runs on the single UI event-loop thread: user intents
//! arrive as method calls on [`Session`], engine notifications arrive as
//! typed events through [`Session::dispatch`].

pub mod history;
pub mod nav;
pub mod pages;
pub mod projector;
pub mod session;
pub mod tabs;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use history::{HistoryEntry, HistoryLog, HistoryStore};
pub use nav::NavigationController;
pub use projector::HistoryProjector;
pub use session::Session;
pub use tabs::{CloseOutcome, TabRegistry, TabSession};
