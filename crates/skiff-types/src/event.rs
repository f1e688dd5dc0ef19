//! Tab identifiers and the typed events a rendering engine reports.
//!
//! Engines never call back into the shell. Every notification is queued as
//! an [`EngineEvent`] tagged with the [`TabId`] of the view that produced
//! it, and the session drains the queue from a single dispatch point.

use std::fmt;

/// Stable identifier of an open tab. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// What happened inside a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    /// The view's current address changed.
    AddressChanged(String),
    /// A load finished, successfully or not.
    LoadFinished { success: bool },
}

/// An engine notification addressed to one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub tab: TabId,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn address_changed(tab: TabId, url: impl Into<String>) -> Self {
        Self {
            tab,
            kind: EngineEventKind::AddressChanged(url.into()),
        }
    }

    pub fn load_finished(tab: TabId, success: bool) -> Self {
        Self {
            tab,
            kind: EngineEventKind::LoadFinished { success },
        }
    }
}
