//! Types for FM-Index construction and persistence
//!
//! Text is indexed as UTF-16 code units. Two codes are reserved: the
//! terminator that ends the whole text and the boundary placed between
//! documents.

use crate::succinct::wavelet_matrix::DEFAULT_MAX_CHAR_CODE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Document identifier (order of `push` calls)
pub type DocId = u32;

/// Terminator appended once after the last document
pub const TERMINATOR: u16 = 0x0000;

/// Separator placed between consecutive documents
pub const DOC_BOUNDARY: u16 = 0x0001;

/// Magic number for fm.bin files
pub const FM_MAGIC: u32 = 0x49584D46; // "FMXI" in little-endian

/// Current version of the fm.bin format
pub const FM_VERSION: u32 = 1;

/// Default sampling interval for the locate/extract dictionaries
pub const DEFAULT_SAMPLE_INTERVAL: u32 = 32;

/// True for codes that can never appear inside a document.
#[inline]
pub fn is_reserved(code: u16) -> bool {
    code == TERMINATOR || code == DOC_BOUNDARY
}

/// Configuration for FM-Index building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FmIndexConfig {
    /// Sampling interval (`ddic`): larger values use less memory but make
    /// locate and extract walk further
    #[serde(default = "default_sample_interval")]
    pub sample_interval: u32,

    /// Exclusive upper bound on symbol codes; the wavelet matrix uses
    /// `ceil(log2(max_char_code))` levels
    #[serde(default = "default_max_char_code")]
    pub max_char_code: u16,
}

fn default_sample_interval() -> u32 {
    DEFAULT_SAMPLE_INTERVAL
}

fn default_max_char_code() -> u16 {
    DEFAULT_MAX_CHAR_CODE
}

impl Default for FmIndexConfig {
    fn default() -> Self {
        Self {
            sample_interval: default_sample_interval(),
            max_char_code: default_max_char_code(),
        }
    }
}

impl FmIndexConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FmIndexConfig =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// Position of an occurrence relative to the document containing it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocPosition {
    /// Document containing the position
    pub doc_id: DocId,
    /// Offset within that document (in code units)
    pub offset: usize,
}

/// Search result with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Document where the match was found
    pub doc_id: DocId,
    /// Code-unit offset within the document
    pub offset: usize,
    /// Position in the concatenated text
    pub position: usize,
}

/// Statistics about a built index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FmIndexStats {
    /// Symbols in the transform, terminator included
    pub size: usize,
    /// Number of documents
    pub documents: usize,
    /// Sampling interval
    pub sample_interval: u32,
    /// Exclusive upper bound on symbol codes
    pub max_char_code: u16,
    /// Wavelet matrix levels
    pub bitsize: usize,
    /// Distinct symbols present
    pub distinct_symbols: usize,
    /// Entries in each sampling dictionary
    pub samples: usize,
    /// Approximate in-memory footprint
    pub heap_bytes: usize,
}

/// Index metadata stored in meta.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FmIndexMeta {
    /// fm.bin format version
    pub version: u32,
    /// Symbols in the transform, terminator included
    pub size: usize,
    /// Number of documents
    pub doc_count: usize,
    /// Sampling interval
    pub sample_interval: u32,
    /// Exclusive upper bound on symbol codes
    pub max_char_code: u16,
    /// Source label for each document (file path for CLI-built indexes)
    #[serde(default)]
    pub sources: Vec<String>,
    /// Unix timestamp of creation
    pub created_at: u64,
}

/// Header for fm.bin
#[derive(Debug, Clone, Copy)]
pub struct FmFileHeader {
    /// Magic number (FM_MAGIC)
    pub magic: u32,
    /// Version number
    pub version: u32,
}

impl FmFileHeader {
    /// Size of header in bytes
    pub const SIZE: usize = 4 + 4;

    pub fn new() -> Self {
        Self {
            magic: FM_MAGIC,
            version: FM_VERSION,
        }
    }
}

impl Default for FmFileHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: FmIndexConfig = serde_json::from_str(r#"{"sample_interval": 4}"#).unwrap();
        assert_eq!(config.sample_interval, 4);
        assert_eq!(config.max_char_code, 65535);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_char_code": 256}"#).unwrap();

        let config = FmIndexConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_char_code, 256);
        assert_eq!(config.sample_interval, DEFAULT_SAMPLE_INTERVAL);
    }

    #[test]
    fn test_reserved_codes() {
        assert!(is_reserved(0));
        assert!(is_reserved(1));
        assert!(!is_reserved(b'a' as u16));
    }
}
