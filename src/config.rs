//! Configuration
//!
//! Loaded from `.marklink.json` at the root, or from an explicit `--config`
//! path. Every field is optional; a missing file means defaults, a file that
//! exists but does not parse is an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::file_reader::DEFAULT_MAX_FILE_SIZE;
use crate::core::paths::extension_of;
use crate::core::util::HashAlgorithm;
use crate::error::{Error, Result};
use crate::links::ResolutionScope;
use crate::markers::scan::Scanner;
use crate::markers::syntax::MarkerSyntax;

pub const CONFIG_FILE: &str = ".marklink.json";

const DEFAULT_EXTENSIONS: &[&str] = &[
    "md", "txt", "rs", "py", "js", "ts", "jsx", "tsx", "html", "css", "json", "yaml", "yml",
    "toml", "xml", "sh", "bash", "zsh", "c", "cpp", "h", "hpp", "java", "go", "rb", "php",
    "swift", "kt", "cs", "lua", "sql",
];

/// Decides which documents take part in indexing and decoration
pub trait DocumentGate {
    /// Eligible for scanning at all
    fn is_supported_document(&self, path: &Path) -> bool;

    /// Eligible for decoration; markdown is indexed but never decorated by default
    fn decorates(&self, path: &Path) -> bool;
}

/// Presentation settings, used only by the terminal preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationStyle {
    pub anchor_icon: String,
    pub anchor_icon_enabled: bool,
    /// Color name understood by `colored`, or "inherit"
    pub anchor_color: String,
    pub link_icon: String,
    pub link_icon_enabled: bool,
    pub link_color: String,
}

impl Default for DecorationStyle {
    fn default() -> Self {
        Self {
            anchor_icon: "⚓".to_string(),
            anchor_icon_enabled: true,
            anchor_color: "green".to_string(),
            link_icon: "🔗".to_string(),
            link_icon_enabled: true,
            link_color: "blue".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scope: ResolutionScope,
    /// File extensions (without the dot, case-insensitive) that are scanned
    pub extensions: Vec<String>,
    pub skip_markdown: bool,
    pub syntax: MarkerSyntax,
    pub style: DecorationStyle,
    /// Documents larger than this are skipped
    pub max_file_size: u64,
    /// Content hash used to version documents read from disk
    pub hash: HashAlgorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scope: ResolutionScope::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            skip_markdown: true,
            syntax: MarkerSyntax::default(),
            style: DecorationStyle::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            hash: HashAlgorithm::default(),
        }
    }
}

impl Config {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        log::debug!("Reading config from: {}", path.display());
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.syntax.validate()?;
        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load the explicit config, else `.marklink.json` under `root`, else defaults
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::load(path).map_err(|e| match e {
                Error::Io(io) if io.kind() == io::ErrorKind::NotFound => Error::ConfigNotFound {
                    path: path.to_path_buf(),
                },
                other => other,
            })?;
            return Ok((config, Some(path.to_path_buf())));
        }

        let candidate = root.join(CONFIG_FILE);
        if candidate.is_file() {
            let config = Self::load(&candidate)?;
            return Ok((config, Some(candidate)));
        }

        log::debug!("No config file found, using defaults");
        Ok((Self::default(), None))
    }

    /// A scanner for the configured marker syntax
    pub fn scanner(&self) -> Result<Scanner> {
        Scanner::new(&self.syntax)
    }

    fn is_markdown(path: &Path) -> bool {
        matches!(extension_of(path).as_deref(), Some("md") | Some("markdown"))
    }
}

impl DocumentGate for Config {
    fn is_supported_document(&self, path: &Path) -> bool {
        extension_of(path)
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false)
    }

    fn decorates(&self, path: &Path) -> bool {
        self.is_supported_document(path) && !(self.skip_markdown && Self::is_markdown(path))
    }
}
