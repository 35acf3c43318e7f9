//! Links module - Resolve link references to anchor definitions

pub mod resolve;

pub use resolve::{
    find_anchor, resolve, resolve_all, AnchorTarget, Resolution, ResolutionScope, ResolvedLink,
};
