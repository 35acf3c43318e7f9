//! Anchors module - Workspace-wide anchor queries and marker diagnostics
//!
//! Markers look like `[[anchor:NAME]]`, `[[anchor:NAME|Label]]`,
//! `[[link:NAME]]` and `[[link:NAME|Label]]` unless configured otherwise.

pub mod api;
pub mod lint;
