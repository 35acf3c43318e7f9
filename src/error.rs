//! Crate-level error type
//!
//! Marker-level problems (malformed markers, duplicate anchors, unresolved
//! links) are not errors: they are reported as lint issues and never abort a
//! scan or decoration pass. This type covers failures at the host boundary.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An explicitly requested config file does not exist.
    #[error("config not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Config file exists but cannot be parsed.
    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// Marker delimiters or keywords cannot form a usable grammar.
    #[error("invalid marker syntax: {reason}")]
    InvalidSyntax { reason: String },

    /// A cursor argument is not of the form `LINE:CHAR`.
    #[error("invalid position `{input}`: expected LINE:CHAR")]
    InvalidPosition { input: String },

    /// An operation named a document the session does not have open.
    #[error("unknown document: {id}")]
    UnknownDocument { id: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
