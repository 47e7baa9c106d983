//! Succinct building blocks: a rank-capable bit vector and a wavelet matrix
//! layered on top of it.

pub mod bit_vector;
pub mod wavelet_matrix;

pub use bit_vector::{BitVector, BitVectorBuilder};
pub use wavelet_matrix::WaveletMatrix;
