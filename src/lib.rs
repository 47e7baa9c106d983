//! # FMX - Compressed Full-Text Self-Index
//!
//! FMX builds an FM-Index over a collection of UTF-16 documents. The index
//! replaces the text: it counts and locates occurrences of any substring and
//! extracts arbitrary ranges of the original text.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`succinct`] - Bit vector with constant-time rank, wavelet matrix
//! - [`index`] - BWT, the FM-Index, and index directory persistence
//! - [`io`] - Little-endian binary stream traits used by `dump`/`load`
//! - [`output`] - Colored match printing for the CLI
//! - [`utils`] - Document screening and progress spinner
//!
//! ## Quick Start
//!
//! ```
//! use fmx::FmIndex;
//!
//! let mut index = FmIndex::new();
//! index.push("banana").unwrap();
//! index.build_default(1).unwrap();
//!
//! assert_eq!(index.search("ana").unwrap(), vec![1, 3]);
//! assert_eq!(index.substring(0, 6).unwrap(), "banana");
//! ```
//!
//! ## Persistence
//!
//! [`FmIndex::dump`] and [`FmIndex::load`] use a compact little-endian
//! format. [`index::FmIndexWriter`] and [`index::FmIndexReader`] wrap it in an
//! index directory with a magic header and `meta.json`.

pub mod error;
pub mod index;
pub mod io;
pub mod output;
pub mod succinct;
pub mod utils;

pub use error::{Error, Result};
pub use index::{BurrowsWheelerTransform, FmIndex, FmIndexConfig};
pub use succinct::{BitVector, BitVectorBuilder, WaveletMatrix};
