//! Utility functions shared by the CLI.
//!
//! - [`progress`] - spinner that compiles away without the `progress` feature
//! - [`text`] - binary detection and document decoding

pub mod progress;
pub mod text;

pub use text::*;
