//! Index module - Anchor definitions and link references per document
//!
//! Provides:
//! - document: the immutable index of one document revision
//! - store: the process-wide cache of document indexes

pub mod document;
pub mod store;
