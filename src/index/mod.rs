//! FM-Index construction, querying and persistence
//!
//! ## Architecture
//!
//! - `bwt`: Burrows-Wheeler Transform via suffix array
//! - `fm_index`: the index itself (push, build, search, extract)
//! - `writer`: persists an index directory
//! - `reader`: memory-mapped loading of an index directory
//! - `stats`: human-readable and JSON statistics for `fmx stats`
//! - `types`: configuration, constants and result types
//!
//! ## File Format
//!
//! Per index directory:
//! - `fm.bin`: `FMXI` magic, version, then the FM-Index dump
//! - `meta.json`: sizes, sampling parameters and document sources

pub mod bwt;
pub mod fm_index;
pub mod reader;
pub mod stats;
pub mod types;
pub mod writer;

// Re-exports for convenience
pub use bwt::BurrowsWheelerTransform;
pub use fm_index::FmIndex;
pub use reader::FmIndexReader;
pub use types::*;
pub use writer::FmIndexWriter;
