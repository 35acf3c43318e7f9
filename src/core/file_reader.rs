//! Document reading
//!
//! Offsets computed by the scanner must refer to the exact text the host
//! shows, so documents are never truncated: oversized and binary files are
//! skipped instead, and non-UTF-8 content is converted lossily.

use std::fs;
use std::path::Path;

/// Default maximum document size in bytes (8 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 8 * 1024 * 1024;

/// Number of leading bytes inspected for NUL when sniffing binary content
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Result of reading a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadResult {
    /// The document text (if successfully read)
    pub content: Option<String>,

    /// Whether lossy conversion was used
    pub lossy_conversion: bool,

    /// Reason for skipping (if skipped)
    pub skip_reason: Option<String>,
}

impl FileReadResult {
    fn success(content: String, lossy_conversion: bool) -> Self {
        Self {
            content: Some(content),
            lossy_conversion,
            skip_reason: None,
        }
    }

    fn skipped(reason: impl Into<String>) -> Self {
        Self {
            content: None,
            lossy_conversion: false,
            skip_reason: Some(reason.into()),
        }
    }
}

/// Read a document, skipping anything that is not reasonably-sized text
pub fn read_document(path: &Path, max_file_size: u64) -> FileReadResult {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => return FileReadResult::skipped(format!("Cannot read metadata: {}", e)),
    };

    if metadata.len() > max_file_size {
        return FileReadResult::skipped(format!(
            "File size {} exceeds limit {}",
            metadata.len(),
            max_file_size
        ));
    }

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => return FileReadResult::skipped(format!("Cannot read file: {}", e)),
    };

    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return FileReadResult::skipped("File appears to be binary");
    }

    match String::from_utf8(bytes) {
        Ok(text) => FileReadResult::success(text, false),
        Err(e) => {
            let text = String::from_utf8_lossy(e.as_bytes()).into_owned();
            FileReadResult::success(text, true)
        }
    }
}
