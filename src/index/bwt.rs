//! Burrows-Wheeler Transform
//!
//! Builds the transform from a suffix array of the terminator-augmented text:
//! 1. Append [`TERMINATOR`], which is unique and smaller than every other code
//! 2. Sort all suffixes by prefix doubling (parallel sort for large inputs)
//! 3. Emit the symbol preceding each sorted suffix, wrapping at position 0
//!
//! With a unique smallest terminator the suffix order equals the order of
//! cyclic rotations, so the output is the last column of the rotation matrix.

use crate::error::{Error, Result};
use crate::index::types::TERMINATOR;
use rayon::prelude::*;

/// Inputs above this length are sorted with rayon.
const PARALLEL_SORT_THRESHOLD: usize = 100_000;

/// Result of transforming one text.
#[derive(Debug, Clone)]
pub struct BurrowsWheelerTransform {
    bwt: Vec<u16>,
    head: usize,
}

impl BurrowsWheelerTransform {
    /// Transform `text`. The terminator is appended here and must not already
    /// occur in the input.
    pub fn new(text: &[u16]) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::invalid_arg("text", "cannot transform an empty text"));
        }
        if let Some(pos) = text.iter().position(|&c| c == TERMINATOR) {
            return Err(Error::invalid_arg(
                "text",
                format!("terminator code found at position {}", pos),
            ));
        }
        if text.len() >= u32::MAX as usize {
            return Err(Error::invalid_arg(
                "text",
                format!("{} symbols exceeds the 32-bit index limit", text.len()),
            ));
        }

        let mut augmented = Vec::with_capacity(text.len() + 1);
        augmented.extend_from_slice(text);
        augmented.push(TERMINATOR);
        let n = augmented.len();

        let suffix_array = build_suffix_array(&augmented);
        let mut head = 0;
        let bwt = suffix_array
            .iter()
            .enumerate()
            .map(|(row, &sa)| {
                if sa == 0 {
                    head = row;
                }
                augmented[(sa as usize + n - 1) % n]
            })
            .collect();

        Ok(Self { bwt, head })
    }

    /// The last column of the sorted rotation matrix.
    pub fn get(&self) -> &[u16] {
        &self.bwt
    }

    /// Consume the transform, keeping only the last column.
    pub fn into_inner(self) -> Vec<u16> {
        self.bwt
    }

    /// Row whose rotation is the original text.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Length of the transform (input plus terminator).
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    /// Recover the original text (without terminator) by walking LF-mapping
    /// backward from the terminator row.
    pub fn inverse(&self) -> Vec<u16> {
        let n = self.bwt.len();
        let max = self.bwt.iter().copied().max().unwrap_or(0) as usize;

        let mut counts = vec![0usize; max + 2];
        for &c in &self.bwt {
            counts[c as usize + 1] += 1;
        }
        for c in 1..counts.len() {
            counts[c] += counts[c - 1];
        }

        let mut seen = vec![0usize; max + 1];
        let lf: Vec<usize> = self
            .bwt
            .iter()
            .map(|&c| {
                let c = c as usize;
                let row = counts[c] + seen[c];
                seen[c] += 1;
                row
            })
            .collect();

        let mut text = vec![TERMINATOR; n - 1];
        let mut row = self.head;
        for pos in (0..n - 1).rev() {
            row = lf[row];
            text[pos] = self.bwt[row];
        }
        text
    }
}

/// Sort all suffixes of `text` by prefix doubling.
///
/// Each round sorts positions by the rank pair `(rank[i], rank[i + k])`,
/// where a missing second half ranks below everything, then re-ranks. Stops as
/// soon as all ranks are distinct.
///
/// Time: O(n log^2 n). Space: O(n).
fn build_suffix_array(text: &[u16]) -> Vec<u32> {
    let n = text.len();
    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<u32> = text.iter().map(|&c| c as u32).collect();
    let mut next_rank = vec![0u32; n];
    let mut k = 1usize;

    loop {
        let key = |i: u32| -> u64 {
            let i = i as usize;
            let second = if i + k < n { rank[i + k] as u64 + 1 } else { 0 };
            ((rank[i] as u64) << 32) | second
        };

        if n > PARALLEL_SORT_THRESHOLD {
            sa.par_sort_unstable_by_key(|&i| key(i));
        } else {
            sa.sort_unstable_by_key(|&i| key(i));
        }

        next_rank[sa[0] as usize] = 0;
        for j in 1..n {
            let bump = (key(sa[j]) != key(sa[j - 1])) as u32;
            next_rank[sa[j] as usize] = next_rank[sa[j - 1] as usize] + bump;
        }
        std::mem::swap(&mut rank, &mut next_rank);

        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k *= 2;
    }

    sa
}
