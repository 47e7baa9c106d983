//! Wavelet matrix over 16-bit symbol codes.
//!
//! Level `d` stores bit `d` (most significant first) of every symbol, in the
//! order produced by stably partitioning the previous level into its 0-group
//! followed by its 1-group. `seps[d]` is the size of the 0-group, which is
//! where the 1-group starts in the next level. After the last level all
//! occurrences of a symbol are contiguous and `range[c]` is where they begin.
//!
//! Access, rank and rank-less-than all take `bitsize` rank queries.

use crate::error::{Error, Result};
use crate::io::{BinaryInput, BinaryOutput, to_u32};
use crate::succinct::bit_vector::{BitVector, BitVectorBuilder};
use rustc_hash::FxHashMap;

/// Default maximum symbol code (covers every UTF-16 code unit).
pub const DEFAULT_MAX_CHAR_CODE: u16 = 65535;

/// Bits needed to represent codes below `max_char_code`.
pub fn bit_size_for(max_char_code: u16) -> usize {
    if max_char_code < 2 {
        return 0;
    }
    (u16::BITS - (max_char_code - 1).leading_zeros()) as usize
}

#[derive(Debug, Clone)]
pub struct WaveletMatrix {
    bv: Vec<BitVector>,
    seps: Vec<usize>,
    range: FxHashMap<u32, usize>,
    max_char_code: u16,
    bitsize: usize,
    size: usize,
}

impl Default for WaveletMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveletMatrix {
    pub fn new() -> Self {
        Self {
            bv: Vec::new(),
            seps: Vec::new(),
            range: FxHashMap::default(),
            max_char_code: DEFAULT_MAX_CHAR_CODE,
            bitsize: bit_size_for(DEFAULT_MAX_CHAR_CODE),
            size: 0,
        }
    }

    /// Fix the code range; `bitsize` becomes `ceil(log2(max_char_code))`.
    pub fn set_max_char_code(&mut self, max_char_code: u16) -> Result<()> {
        if max_char_code < 2 {
            return Err(Error::invalid_arg(
                "max_char_code",
                format!("must be at least 2, got {}", max_char_code),
            ));
        }
        self.max_char_code = max_char_code;
        self.bitsize = bit_size_for(max_char_code);
        Ok(())
    }

    pub fn max_char_code(&self) -> u16 {
        self.max_char_code
    }

    pub fn bitsize(&self) -> usize {
        self.bitsize
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Drop all levels; the code range is kept.
    pub fn clear(&mut self) {
        self.bv.clear();
        self.seps.clear();
        self.range.clear();
        self.size = 0;
    }

    /// Build the matrix over `v`. Every code must fit in `bitsize` bits.
    pub fn build(&mut self, v: &[u16]) -> Result<()> {
        self.clear();
        let limit = 1u32 << self.bitsize;
        if let Some(&c) = v.iter().find(|&&c| u32::from(c) >= limit) {
            return Err(Error::invalid_arg(
                "symbols",
                format!("code {} does not fit in {} bits", c, self.bitsize),
            ));
        }

        let size = v.len();
        let mut cur: Vec<u16> = v.to_vec();
        let mut next: Vec<u16> = Vec::with_capacity(size);

        for depth in 0..self.bitsize {
            let mut builder = BitVectorBuilder::new(size);
            for (i, &code) in cur.iter().enumerate() {
                if self.bit(code as u32, depth) {
                    builder.set1(i)?;
                } else {
                    builder.set0(i)?;
                }
            }
            let level = builder.build();
            self.seps.push(level.size0());
            log::debug!(
                "wavelet level {}: {} zeros, {} ones",
                depth,
                level.size0(),
                level.size1()
            );
            self.bv.push(level);

            next.clear();
            next.extend(cur.iter().copied().filter(|&c| !self.bit(c as u32, depth)));
            next.extend(cur.iter().copied().filter(|&c| self.bit(c as u32, depth)));
            std::mem::swap(&mut cur, &mut next);
        }

        for (offset, &code) in cur.iter().enumerate() {
            self.range.entry(code as u32).or_insert(offset);
        }
        self.size = size;
        Ok(())
    }

    /// Number of occurrences of `c`.
    pub fn count(&self, c: u32) -> Result<usize> {
        self.rank(self.size, c)
    }

    /// Codes that occur at least once, ascending.
    pub fn used_symbols(&self) -> Vec<u32> {
        let mut codes: Vec<u32> = self.range.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Symbol at position `i`.
    pub fn get(&self, mut i: usize) -> Result<u32> {
        if i >= self.size {
            return Err(Error::range("WaveletMatrix::get", i, self.size));
        }
        let mut value = 0u32;
        for (level, &sep) in self.bv.iter().zip(&self.seps) {
            let bit = level.get(i)?;
            value <<= 1;
            if bit {
                i = level.rank1(i)? + sep;
                value += 1;
            } else {
                i = level.rank0(i)?;
            }
        }
        Ok(value)
    }

    /// Occurrences of `c` in `[0, i)`.
    pub fn rank(&self, i: usize, c: u32) -> Result<usize> {
        if i > self.size {
            return Err(Error::range("WaveletMatrix::rank", i, self.size));
        }
        if i == 0 {
            return Ok(0);
        }
        let Some(&begin) = self.range.get(&c) else {
            return Ok(0);
        };
        let mut end = i;
        for (depth, (level, &sep)) in self.bv.iter().zip(&self.seps).enumerate() {
            end = if self.bit(c, depth) {
                level.rank1(end)? + sep
            } else {
                level.rank0(end)?
            };
        }
        end.checked_sub(begin)
            .ok_or_else(|| Error::invalid_format("wavelet range offset past rank position"))
    }

    /// Occurrences of any code strictly less than `c` in `[0, i)`.
    pub fn rank_less_than(&self, i: usize, c: u32) -> Result<usize> {
        if i > self.size {
            return Err(Error::range("WaveletMatrix::rank_less_than", i, self.size));
        }
        if i == 0 {
            return Ok(0);
        }
        if c >= 1u32 << self.bitsize {
            return Ok(i);
        }
        let mut begin = 0usize;
        let mut end = i;
        let mut rlt = 0usize;
        for (depth, (level, &sep)) in self.bv.iter().zip(&self.seps).enumerate() {
            let rank0_begin = level.rank0(begin)?;
            let rank0_end = level.rank0(end)?;
            if self.bit(c, depth) {
                rlt += rank0_end - rank0_begin;
                begin += sep - rank0_begin;
                end += sep - rank0_end;
            } else {
                begin = rank0_begin;
                end = rank0_end;
            }
        }
        Ok(rlt)
    }

    /// Cumulative count table: entry `c` is the number of symbols with code
    /// below `c`, for every `c` in `0..=max_char_code`.
    pub fn cumulative_counts(&self) -> Result<Vec<usize>> {
        (0..=self.max_char_code as u32)
            .map(|c| self.rank_less_than(self.size, c))
            .collect()
    }

    /// Approximate heap footprint in bytes.
    pub fn heap_size(&self) -> usize {
        self.bv.iter().map(BitVector::heap_size).sum::<usize>()
            + self.seps.len() * std::mem::size_of::<usize>()
            + self.range.len() * (std::mem::size_of::<u32>() + std::mem::size_of::<usize>())
    }

    pub fn dump(&self, out: &mut impl BinaryOutput) -> Result<()> {
        out.dump_u16(self.max_char_code)?;
        out.dump_u16(self.bitsize as u16)?;
        out.dump_u32(to_u32("WaveletMatrix::size", self.size)?)?;
        for level in &self.bv {
            level.dump(out)?;
        }
        for &sep in &self.seps {
            out.dump_u32(sep as u32)?;
        }
        let mut entries: Vec<(u32, usize)> = self.range.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_unstable();
        out.dump_u32(entries.len() as u32)?;
        for (key, value) in entries {
            out.dump_u32(key)?;
            out.dump_u32(value as u32)?;
        }
        Ok(())
    }

    /// Replace the contents with a matrix written by [`WaveletMatrix::dump`].
    pub fn load(&mut self, input: &mut impl BinaryInput) -> Result<()> {
        self.clear();
        let max_char_code = input.load_u16()?;
        let bitsize = input.load_u16()? as usize;
        if max_char_code < 2 || bitsize != bit_size_for(max_char_code) {
            return Err(Error::invalid_format(format!(
                "bitsize {} does not match max char code {}",
                bitsize, max_char_code
            )));
        }
        let size = input.load_u32()? as usize;

        let mut bv = Vec::with_capacity(bitsize);
        for depth in 0..bitsize {
            let level = BitVector::load(input)?;
            if level.size() != size {
                return Err(Error::invalid_format(format!(
                    "level {} has {} bits, expected {}",
                    depth,
                    level.size(),
                    size
                )));
            }
            bv.push(level);
        }
        let mut seps = Vec::with_capacity(bitsize);
        for level in &bv {
            let sep = input.load_u32()? as usize;
            if sep != level.size0() {
                return Err(Error::invalid_format("separator does not match level zero count"));
            }
            seps.push(sep);
        }
        let range_size = input.load_u32()?;
        let mut range = FxHashMap::default();
        for _ in 0..range_size {
            let key = input.load_u32()?;
            let value = input.load_u32()? as usize;
            if value >= size || key >= 1u32 << bitsize {
                return Err(Error::invalid_format(format!(
                    "range entry {} -> {} out of bounds",
                    key, value
                )));
            }
            range.insert(key, value);
        }

        self.bv = bv;
        self.seps = seps;
        self.range = range;
        self.max_char_code = max_char_code;
        self.bitsize = bitsize;
        self.size = size;
        Ok(())
    }

    #[inline]
    fn bit(&self, c: u32, depth: usize) -> bool {
        (c >> (self.bitsize - 1 - depth)) & 1 == 1
    }
}
