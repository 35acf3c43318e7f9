//! Markers module - Anchor and link markers embedded in document text
//!
//! Format: [[anchor:NAME]], [[anchor:NAME|Label]], [[link:NAME]], [[link:NAME|Label]]

pub mod marker;
pub mod scan;
pub mod syntax;
