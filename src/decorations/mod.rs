//! Decorations module - Range sets for rendering markers
//!
//! Provides:
//! - ranges: the five decoration sets for a document and cursor
//! - suppress: jump suppression for programmatic cursor moves

pub mod ranges;
pub mod suppress;

pub use ranges::{build, build_at_offset, ActiveMarker, DecorationRanges, DecorationSet};
pub use suppress::{SelectionOutcome, SuppressionRecord, SuppressionState};
