//! Host module - Drives the engine the way an editor would
//!
//! Provides:
//! - workspace: gitignore-aware document discovery and index loading
//! - session: open/change/select/jump events with decoration gates
//! - sink: where decoration sets end up (recording, terminal preview)
//! - commands: single-document CLI commands

pub mod commands;
pub mod session;
pub mod sink;
pub mod workspace;
