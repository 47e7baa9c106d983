//! Succinct bit vector with constant-time rank.
//!
//! Bits are written through a [`BitVectorBuilder`]; `build()` consumes the
//! builder and precomputes one absolute rank per 512-bit block. A rank query
//! is then one block lookup plus at most eight popcounts.
//!
//! # Layout
//!
//! - `words`: raw bits, bit `i` is bit `i % 64` of `words[i / 64]`
//! - `blocks`: `blocks[b]` = number of ones in `[0, 512 * b)`, with one
//!   trailing entry so `rank1(len)` never needs a bounds special case

use crate::error::{Error, Result};
use crate::io::{BinaryInput, BinaryOutput, to_u32};

const WORD_BITS: usize = 64;
const WORDS_PER_BLOCK: usize = 8;
const BLOCK_BITS: usize = WORD_BITS * WORDS_PER_BLOCK;

/// Mutable bit storage used while a level is being constructed.
#[derive(Debug, Clone)]
pub struct BitVectorBuilder {
    words: Vec<u64>,
    len: usize,
}

impl BitVectorBuilder {
    /// Create a builder for `len` bits, all initially zero.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clear bit `i`.
    #[inline]
    pub fn set0(&mut self, i: usize) -> Result<()> {
        if i >= self.len {
            return Err(Error::range("BitVector::set0", i, self.len));
        }
        self.words[i / WORD_BITS] &= !(1u64 << (i % WORD_BITS));
        Ok(())
    }

    /// Set bit `i`.
    #[inline]
    pub fn set1(&mut self, i: usize) -> Result<()> {
        if i >= self.len {
            return Err(Error::range("BitVector::set1", i, self.len));
        }
        self.words[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
        Ok(())
    }

    /// Finalize the bits and compute rank metadata.
    pub fn build(self) -> BitVector {
        BitVector::from_words(self.words, self.len)
    }
}

/// Immutable bit vector answering `get`, `rank0` and `rank1`.
#[derive(Clone, PartialEq, Eq)]
pub struct BitVector {
    words: Vec<u64>,
    blocks: Vec<u32>,
    len: usize,
    ones: usize,
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("ones", &self.ones)
            .finish()
    }
}

impl BitVector {
    /// Build from raw words. Bits at or beyond `len` must be zero.
    fn from_words(words: Vec<u64>, len: usize) -> Self {
        let num_blocks = words.len().div_ceil(WORDS_PER_BLOCK);
        let mut blocks = Vec::with_capacity(num_blocks + 1);
        let mut total = 0usize;
        for chunk in words.chunks(WORDS_PER_BLOCK) {
            blocks.push(total as u32);
            total += chunk.iter().map(|w| w.count_ones() as usize).sum::<usize>();
        }
        blocks.push(total as u32);

        Self {
            words,
            blocks,
            len,
            ones: total,
        }
    }

    /// Number of bits.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Total number of zero bits.
    #[inline]
    pub fn size0(&self) -> usize {
        self.len - self.ones
    }

    /// Total number of one bits.
    #[inline]
    pub fn size1(&self) -> usize {
        self.ones
    }

    /// Read bit `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Result<bool> {
        if i >= self.len {
            return Err(Error::range("BitVector::get", i, self.len));
        }
        Ok((self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1)
    }

    /// Number of ones in `[0, i)`.
    #[inline]
    pub fn rank1(&self, i: usize) -> Result<usize> {
        if i > self.len {
            return Err(Error::range("BitVector::rank1", i, self.len));
        }
        let block = i / BLOCK_BITS;
        let word = i / WORD_BITS;
        let mut rank = self.blocks[block] as usize;
        for w in &self.words[block * WORDS_PER_BLOCK..word] {
            rank += w.count_ones() as usize;
        }
        let offset = i % WORD_BITS;
        if offset > 0 {
            let mask = (1u64 << offset) - 1;
            rank += (self.words[word] & mask).count_ones() as usize;
        }
        Ok(rank)
    }

    /// Number of zeros in `[0, i)`.
    #[inline]
    pub fn rank0(&self, i: usize) -> Result<usize> {
        Ok(i - self.rank1(i)?)
    }

    /// Approximate heap footprint in bytes.
    pub fn heap_size(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>() + self.blocks.len() * std::mem::size_of::<u32>()
    }

    /// Serialize as `len:u32` followed by `ceil(len / 32)` 32-bit words.
    pub fn dump(&self, out: &mut impl BinaryOutput) -> Result<()> {
        out.dump_u32(to_u32("BitVector::len", self.len)?)?;
        for k in 0..self.len.div_ceil(32) {
            let half = (self.words[k / 2] >> (32 * (k % 2))) as u32;
            out.dump_u32(half)?;
        }
        Ok(())
    }

    /// Deserialize a vector written by [`BitVector::dump`].
    pub fn load(input: &mut impl BinaryInput) -> Result<Self> {
        let len = input.load_u32()? as usize;
        let mut words = Vec::new();
        for k in 0..len.div_ceil(32) {
            let half = input.load_u32()? as u64;
            if k % 2 == 0 {
                words.push(half);
            } else if let Some(last) = words.last_mut() {
                *last |= half << 32;
            }
        }
        if len % WORD_BITS != 0 {
            if let Some(&last) = words.last() {
                if last >> (len % WORD_BITS) != 0 {
                    return Err(Error::invalid_format("bit vector has bits set past its length"));
                }
            }
        }
        Ok(Self::from_words(words, len))
    }
}
