//! FM-Index reader
//!
//! Memory-maps `fm.bin`, validates its header and loads the index.

use super::fm_index::FmIndex;
use super::types::*;
use super::writer::{INDEX_FILE, META_FILE};
use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// An opened index directory
pub struct FmIndexReader {
    index: FmIndex,
    meta: Option<FmIndexMeta>,
}

impl FmIndexReader {
    /// Open an index directory
    ///
    /// Returns `Ok(None)` if no fm.bin exists
    pub fn open(index_path: &Path) -> Result<Option<Self>> {
        let bin_path = index_path.join(INDEX_FILE);
        if !bin_path.exists() {
            return Ok(None);
        }

        let file = File::open(&bin_path).context("Failed to open fm.bin")?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < FmFileHeader::SIZE {
            anyhow::bail!("Invalid fm.bin: file too small");
        }
        let magic = u32::from_le_bytes([mmap[0], mmap[1], mmap[2], mmap[3]]);
        if magic != FM_MAGIC {
            anyhow::bail!("Invalid fm.bin: bad magic number");
        }
        let version = u32::from_le_bytes([mmap[4], mmap[5], mmap[6], mmap[7]]);
        if version != FM_VERSION {
            anyhow::bail!("Unsupported fm.bin version: {}", version);
        }

        let mut body = &mmap[FmFileHeader::SIZE..];
        let mut index = FmIndex::new();
        index.load(&mut body).context("Failed to load fm.bin")?;
        if !body.is_empty() {
            anyhow::bail!("Invalid fm.bin: {} trailing bytes", body.len());
        }

        let meta = Self::read_meta(index_path)?;
        if let Some(meta) = &meta {
            if meta.doc_count != index.document_count() {
                log::warn!(
                    "meta.json lists {} documents but index has {}",
                    meta.doc_count,
                    index.document_count()
                );
            }
        }

        Ok(Some(Self { index, meta }))
    }

    fn read_meta(index_path: &Path) -> Result<Option<FmIndexMeta>> {
        let path = index_path.join(META_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).context("Failed to read meta.json")?;
        let meta = serde_json::from_str(&content).context("Failed to parse meta.json")?;
        Ok(Some(meta))
    }

    pub fn index(&self) -> &FmIndex {
        &self.index
    }

    pub fn into_index(self) -> FmIndex {
        self.index
    }

    pub fn meta(&self) -> Option<&FmIndexMeta> {
        self.meta.as_ref()
    }

    /// Display label for a document: its recorded source, or `#id`
    pub fn source_label(&self, doc_id: DocId) -> String {
        self.meta
            .as_ref()
            .and_then(|m| m.sources.get(doc_id as usize))
            .cloned()
            .unwrap_or_else(|| format!("#{}", doc_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::writer::FmIndexWriter;
    use std::fs;
    use tempfile::tempdir;

    fn setup_test_index() -> (tempfile::TempDir, std::path::PathBuf) {
        let temp_dir = tempdir().unwrap();
        let index_path = temp_dir.path().join("idx");

        let mut index = FmIndex::new();
        index.push("hello world").unwrap();
        index.push("world hello").unwrap();
        index.push("foo bar baz").unwrap();
        index.build_default(8).unwrap();

        let sources = vec!["one.txt".to_string(), "two.txt".to_string(), "three.txt".to_string()];
        FmIndexWriter::write(&index_path, &index, &sources).unwrap();

        (temp_dir, index_path)
    }

    #[test]
    fn test_open_reader() {
        let (_temp_dir, index_path) = setup_test_index();
        let reader = FmIndexReader::open(&index_path).unwrap().unwrap();
        assert_eq!(reader.index().document_count(), 3);
        assert_eq!(reader.meta().unwrap().doc_count, 3);
        assert_eq!(reader.source_label(1), "two.txt");
        assert_eq!(reader.source_label(9), "#9");
    }

    #[test]
    fn test_search_after_open() {
        let (_temp_dir, index_path) = setup_test_index();
        let reader = FmIndexReader::open(&index_path).unwrap().unwrap();

        let docs = reader.index().search_documents("hello").unwrap();
        assert!(docs.contains(0));
        assert!(docs.contains(1));
        assert!(!docs.contains(2));
        assert_eq!(reader.index().document(2).unwrap(), "foo bar baz");
    }

    #[test]
    fn test_into_index_outlives_reader() {
        let (temp_dir, index_path) = setup_test_index();
        let reader = FmIndexReader::open(&index_path).unwrap().unwrap();
        let index = reader.into_index();
        drop(temp_dir);

        assert!(index.is_built());
        assert_eq!(index.search("world").unwrap(), vec![6, 12]);
        assert!(index.contains("baz").unwrap());
    }

    #[test]
    fn test_missing_index() {
        let temp_dir = tempdir().unwrap();
        assert!(FmIndexReader::open(temp_dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_bad_magic() {
        let (_temp_dir, index_path) = setup_test_index();
        let bin = index_path.join(INDEX_FILE);
        let mut data = fs::read(&bin).unwrap();
        data[0] ^= 0xFF;
        fs::write(&bin, data).unwrap();
        assert!(FmIndexReader::open(&index_path).is_err());
    }

    #[test]
    fn test_trailing_bytes() {
        let (_temp_dir, index_path) = setup_test_index();
        let bin = index_path.join(INDEX_FILE);
        let mut data = fs::read(&bin).unwrap();
        data.push(0);
        fs::write(&bin, data).unwrap();
        assert!(FmIndexReader::open(&index_path).is_err());
    }
}
