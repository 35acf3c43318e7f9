//! Core module - Fundamental data structures and utilities
//!
//! This module provides:
//! - Text geometry (byte spans, line/character positions)
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Path normalization utilities
//! - Document reading
//! - Common utilities

pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod text;
pub mod util;
