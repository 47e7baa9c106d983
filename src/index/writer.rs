//! FM-Index writer
//!
//! Writes a built index to an index directory:
//! - `fm.bin`: file header followed by the binary dump
//! - `meta.json`: human-readable metadata

use super::fm_index::FmIndex;
use super::types::*;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the binary index file inside an index directory
pub const INDEX_FILE: &str = "fm.bin";

/// Name of the metadata file inside an index directory
pub const META_FILE: &str = "meta.json";

/// Writes FM-Index files to an index directory
pub struct FmIndexWriter;

impl FmIndexWriter {
    /// Write all index files, creating `index_path` if needed
    ///
    /// `sources` labels each document (in push order) for display; it may be
    /// empty.
    pub fn write(index_path: &Path, index: &FmIndex, sources: &[String]) -> Result<()> {
        if !index.is_built() {
            anyhow::bail!("Cannot write an index that has not been built");
        }
        fs::create_dir_all(index_path)
            .with_context(|| format!("Failed to create {}", index_path.display()))?;

        Self::write_index(index_path, index)?;
        Self::write_meta(index_path, index, sources)?;

        log::info!(
            "wrote fm-index ({} rows) to {}",
            index.size(),
            index_path.display()
        );
        Ok(())
    }

    /// Write header and dump to fm.bin
    fn write_index(index_path: &Path, index: &FmIndex) -> Result<()> {
        let path = index_path.join(INDEX_FILE);
        let mut file = BufWriter::with_capacity(
            65536,
            File::create(&path).context("Failed to create fm.bin")?,
        );

        let header = FmFileHeader::new();
        file.write_all(&header.magic.to_le_bytes())?;
        file.write_all(&header.version.to_le_bytes())?;
        index.dump(&mut file).context("Failed to write fm.bin")?;

        file.flush()?;
        Ok(())
    }

    /// Write metadata to meta.json
    fn write_meta(index_path: &Path, index: &FmIndex, sources: &[String]) -> Result<()> {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let meta = FmIndexMeta {
            version: FM_VERSION,
            size: index.size(),
            doc_count: index.document_count(),
            sample_interval: index.sample_interval() as u32,
            max_char_code: index.max_char_code(),
            sources: sources.to_vec(),
            created_at,
        };

        let path = index_path.join(META_FILE);
        let content = serde_json::to_string_pretty(&meta).context("Failed to serialize meta.json")?;
        fs::write(&path, content).context("Failed to write meta.json")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_index() {
        let temp_dir = tempdir().unwrap();
        let index_path = temp_dir.path().join("idx");

        let mut index = FmIndex::new();
        index.push("hello world").unwrap();
        index.push("foo bar").unwrap();
        index.build_default(4).unwrap();

        FmIndexWriter::write(&index_path, &index, &["a.txt".into(), "b.txt".into()]).unwrap();

        assert!(index_path.join(INDEX_FILE).exists());
        assert!(index_path.join(META_FILE).exists());

        let data = fs::read(index_path.join(INDEX_FILE)).unwrap();
        let magic = u32::from_le_bytes(data[0..4].try_into().unwrap());
        assert_eq!(magic, FM_MAGIC);

        let meta: FmIndexMeta =
            serde_json::from_str(&fs::read_to_string(index_path.join(META_FILE)).unwrap()).unwrap();
        assert_eq!(meta.doc_count, 2);
        assert_eq!(meta.size, index.size());
        assert_eq!(meta.sources, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_write_unbuilt_fails() {
        let temp_dir = tempdir().unwrap();
        let index = FmIndex::new();
        assert!(FmIndexWriter::write(temp_dir.path(), &index, &[]).is_err());
    }
}
