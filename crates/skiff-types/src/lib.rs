//! Foundation types for Skiff.
//!
//! This crate contains the types shared by every Skiff crate: error types,
//! shell configuration, tab identifiers, and the typed events a rendering
//! engine delivers back to the session.

pub mod config;
pub mod error;
pub mod event;
