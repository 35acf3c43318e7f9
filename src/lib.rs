//! marklink - named anchors and links inside source comments
//!
//! The engine scans documents for `[[anchor:NAME]]` and `[[link:NAME]]`
//! markers, resolves links to anchors, and computes the five decoration sets
//! an editor needs to show markers as labels and icons instead of raw text.
//!
//! Data flows one way: `markers` → `index` → `links` → `decorations` → a
//! `host::sink::RenderSink`. The host owns the `AnchorIndex` and the
//! `SuppressionState`; nothing here is global.

pub mod anchors;
pub mod cli;
pub mod config;
pub mod core;
pub mod decorations;
pub mod error;
pub mod host;
pub mod index;
pub mod links;
pub mod markers;

pub use crate::config::{Config, DecorationStyle, DocumentGate};
pub use crate::core::text::{Position, Span};
pub use crate::decorations::{DecorationRanges, DecorationSet, SuppressionState};
pub use crate::error::{Error, Result};
pub use crate::index::document::{DocumentId, DocumentIndex, DocumentVersion};
pub use crate::index::store::AnchorIndex;
pub use crate::links::{resolve, Resolution, ResolutionScope, ResolvedLink};
pub use crate::markers::marker::{Marker, MarkerKind};
pub use crate::markers::scan::{scan, Scanner};
