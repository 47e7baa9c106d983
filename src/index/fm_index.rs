//! FM-Index over a collection of documents
//!
//! Documents are accumulated with [`FmIndex::push`] and turned into the
//! permanent structure by [`FmIndex::build`]:
//!
//! 1. Run the BWT over the joined documents (terminator appended)
//! 2. Build a wavelet matrix over the transform and take its cumulative
//!    count table (`rlt`)
//! 3. Walk the LF-mapping cycle once from `head`, sampling every `ddic`-th
//!    row into `posdic` and every `ddic`-th text position into `idic`
//!
//! Queries use backward search for counting, LF-steps to a sampled row for
//! locate, and LF-steps from a sampled position for extraction.

use super::bwt::BurrowsWheelerTransform;
use super::types::*;
use crate::error::{Error, Result};
use crate::io::{BinaryInput, BinaryOutput, to_u32};
use crate::succinct::wavelet_matrix::{DEFAULT_MAX_CHAR_CODE, WaveletMatrix};
use roaring::RoaringBitmap;
use std::ops::{Range, RangeInclusive};

#[derive(Debug, Clone)]
pub struct FmIndex {
    /// Text waiting for `build`
    substr: Vec<u16>,
    /// Start offset of every document in the joined text
    doc_starts: Vec<usize>,
    ddic: usize,
    ssize: usize,
    head: usize,
    wm: WaveletMatrix,
    posdic: Vec<u32>,
    idic: Vec<u32>,
    rlt: Vec<usize>,
    built: bool,
}

impl Default for FmIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FmIndex {
    pub fn new() -> Self {
        Self {
            substr: Vec::new(),
            doc_starts: Vec::new(),
            ddic: 0,
            ssize: 0,
            head: 0,
            wm: WaveletMatrix::new(),
            posdic: Vec::new(),
            idic: Vec::new(),
            rlt: Vec::new(),
            built: false,
        }
    }

    /// Reset to the empty, pre-build state.
    pub fn clear(&mut self) {
        self.substr.clear();
        self.doc_starts.clear();
        self.ddic = 0;
        self.ssize = 0;
        self.head = 0;
        self.wm.clear();
        self.posdic.clear();
        self.idic.clear();
        self.rlt.clear();
        self.built = false;
    }

    /// Number of rows (symbols in the transform, terminator included).
    pub fn size(&self) -> usize {
        self.wm.size()
    }

    /// Code units buffered for the next `build`.
    pub fn content_size(&self) -> usize {
        self.substr.len()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn sample_interval(&self) -> usize {
        self.ddic
    }

    pub fn max_char_code(&self) -> u16 {
        self.wm.max_char_code()
    }

    /// Append a document to the build buffer.
    pub fn push(&mut self, doc: &str) -> Result<()> {
        if self.built {
            return Err(Error::InvalidOperation("push into a built index; clear it first"));
        }
        if doc.is_empty() {
            return Err(Error::invalid_arg("doc", "empty document"));
        }
        let start = self.substr.len();
        if !self.substr.is_empty() {
            self.substr.push(DOC_BOUNDARY);
        }
        let doc_start = self.substr.len();
        self.substr.extend(doc.encode_utf16());
        if let Some(offset) = self.substr[doc_start..].iter().position(|&c| is_reserved(c)) {
            self.substr.truncate(start);
            return Err(Error::invalid_arg(
                "doc",
                format!("reserved code at offset {}", offset),
            ));
        }
        self.doc_starts.push(doc_start);
        Ok(())
    }

    /// Build with sampling interval `ddic` and the default code range.
    pub fn build_default(&mut self, ddic: u32) -> Result<()> {
        self.build(ddic, DEFAULT_MAX_CHAR_CODE)
    }

    pub fn build_with_config(&mut self, config: &FmIndexConfig) -> Result<()> {
        self.build(config.sample_interval, config.max_char_code)
    }

    /// Consume the buffer and build the index. Codes must be below `max_char`.
    ///
    /// On failure the index is left empty.
    pub fn build(&mut self, ddic: u32, max_char: u16) -> Result<()> {
        if self.built {
            return Err(Error::InvalidOperation("index is already built"));
        }
        if ddic == 0 {
            return Err(Error::invalid_arg("ddic", "sample interval must be positive"));
        }
        let result = self.build_inner(ddic as usize, max_char);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn build_inner(&mut self, ddic: usize, max_char: u16) -> Result<()> {
        if let Some(&c) = self.substr.iter().find(|&&c| c >= max_char) {
            return Err(Error::invalid_arg(
                "max_char",
                format!("text contains code {} not below {}", c, max_char),
            ));
        }

        let text = std::mem::take(&mut self.substr);
        log::debug!("bwt over {} code units", text.len());
        let bwt = BurrowsWheelerTransform::new(&text)?;
        drop(text);
        self.head = bwt.head();
        let s = bwt.into_inner();
        self.ssize = s.len();

        self.wm.set_max_char_code(max_char)?;
        self.wm.build(&s)?;
        self.rlt = self.wm.cumulative_counts()?;
        self.ddic = ddic;
        self.build_dictionaries()?;
        self.built = true;

        log::info!(
            "built fm-index: {} rows, {} documents, ddic {}",
            self.ssize,
            self.doc_starts.len(),
            self.ddic
        );
        Ok(())
    }

    /// Walk the LF cycle once, recording samples. The walk must visit every
    /// row exactly once before returning to `head`.
    fn build_dictionaries(&mut self) -> Result<()> {
        let n = self.size();
        let samples = n.div_ceil(self.ddic);
        self.posdic = vec![0; samples];
        self.idic = vec![0; samples];

        let mut i = self.head;
        for step in 0..n {
            if step > 0 && i == self.head {
                return Err(Error::invalid_format(format!(
                    "LF cycle closed after {} of {} rows",
                    step, n
                )));
            }
            let pos = n - 1 - step;
            if i % self.ddic == 0 {
                self.posdic[i / self.ddic] = pos as u32;
            }
            if pos % self.ddic == 0 {
                self.idic[pos / self.ddic] = i as u32;
            }
            i = self.lf(i)?;
        }
        if i != self.head {
            return Err(Error::invalid_format("LF cycle did not return to head"));
        }
        log::debug!("sampled {} rows and positions", samples);
        Ok(())
    }

    /// One LF-mapping step: the row of the suffix starting one position
    /// earlier. Returns the symbol at `i` along with the new row.
    #[inline]
    fn lf_with_symbol(&self, i: usize) -> Result<(u32, usize)> {
        let c = self.wm.get(i)?;
        let base = self
            .rlt
            .get(c as usize)
            .copied()
            .ok_or_else(|| Error::invalid_format(format!("symbol {} outside count table", c)))?;
        Ok((c, base + self.wm.rank(i, c)?))
    }

    #[inline]
    fn lf(&self, i: usize) -> Result<usize> {
        Ok(self.lf_with_symbol(i)?.1)
    }

    /// Backward search for `key`. Returns the 0-based range of matching rows.
    ///
    /// Keys with a reserved code or a code outside the index's range match
    /// nothing.
    pub fn rows(&self, key: &str) -> Result<Option<RangeInclusive<usize>>> {
        let units: Vec<u16> = key.encode_utf16().collect();
        if units.iter().any(|&c| is_reserved(c)) {
            return Ok(None);
        }
        self.rows_for_units(&units)
    }

    fn rows_for_units(&self, key: &[u16]) -> Result<Option<RangeInclusive<usize>>> {
        let Some((&last_code, rest)) = key.split_last() else {
            return Ok(None);
        };
        if self.rlt.is_empty() || key.iter().any(|&c| c >= self.wm.max_char_code()) {
            return Ok(None);
        }
        let code = last_code as usize;
        let mut first = self.rlt[code] + 1;
        let mut last = self.rlt[code + 1];

        for &c in rest.iter().rev() {
            if first > last {
                return Ok(None);
            }
            let base = self.rlt[c as usize];
            first = base + self.wm.rank(first - 1, c as u32)? + 1;
            last = base + self.wm.rank(last, c as u32)?;
        }
        if first > last {
            return Ok(None);
        }
        Ok(Some(first - 1..=last - 1))
    }

    /// Number of occurrences of `key`.
    pub fn count(&self, key: &str) -> Result<usize> {
        Ok(self.rows(key)?.map_or(0, |r| r.end() - r.start() + 1))
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.rows(key)?.is_some())
    }

    /// Text position of the suffix at `row`.
    pub fn position(&self, row: usize) -> Result<usize> {
        let n = self.size();
        if row >= n {
            return Err(Error::range("FmIndex::position", row, n));
        }
        let mut i = row;
        let mut steps = 0usize;
        while i != self.head {
            if i % self.ddic == 0 {
                let sample = self.posdic[i / self.ddic] as usize;
                return Ok((steps + sample + 1) % n);
            }
            i = self.lf(i)?;
            steps += 1;
            if steps > n {
                return Err(Error::invalid_format("LF walk did not reach a sample"));
            }
        }
        Ok(steps % n)
    }

    /// Extract `len` code units starting at `pos`, with terminator and
    /// document boundaries removed. The end is clamped to `size()`.
    pub fn substring(&self, pos: usize, len: usize) -> Result<String> {
        let units = self.substring_units(pos, len)?;
        Ok(String::from_utf16_lossy(&units))
    }

    fn substring_units(&self, pos: usize, len: usize) -> Result<Vec<u16>> {
        let n = self.size();
        if pos >= n {
            return Err(Error::range("FmIndex::substring", pos, n));
        }
        let pos_end = pos.saturating_add(len).min(n);
        if pos_end == pos {
            return Ok(Vec::new());
        }

        let mut pos_tmp = n - 1;
        let mut i = self.head;
        let pos_idic = (pos_end - 1).div_ceil(self.ddic);
        if let Some(&row) = self.idic.get(pos_idic) {
            pos_tmp = pos_idic * self.ddic;
            i = row as usize;
        }

        let mut units = Vec::with_capacity(pos_end - pos);
        loop {
            let (c, next) = self.lf_with_symbol(i)?;
            i = next;
            if pos_tmp < pos_end {
                units.push(c as u16);
            }
            if pos_tmp == pos {
                break;
            }
            pos_tmp -= 1;
        }
        units.reverse();
        units.retain(|&c| !is_reserved(c));
        Ok(units)
    }

    /// Every position where `keyword` occurs, ascending.
    pub fn search(&self, keyword: &str) -> Result<Vec<usize>> {
        let Some(rows) = self.rows(keyword)? else {
            return Ok(Vec::new());
        };
        let mut result = rows
            .map(|row| self.position(row))
            .collect::<Result<Vec<_>>>()?;
        result.sort_unstable();
        Ok(result)
    }

    /// Number of documents.
    pub fn document_count(&self) -> usize {
        self.doc_starts.len()
    }

    /// Map a text position to its document and offset. Boundary and
    /// terminator positions map to `None`.
    pub fn locate(&self, position: usize) -> Option<DocPosition> {
        if !self.built || position >= self.size() {
            return None;
        }
        let idx = self.doc_starts.partition_point(|&start| start <= position);
        let doc = idx.checked_sub(1)?;
        let start = self.doc_starts[doc];
        if position >= self.document_end(doc) {
            return None;
        }
        Some(DocPosition {
            doc_id: doc as DocId,
            offset: position - start,
        })
    }

    /// Span of document `doc_id` in the joined text.
    pub fn document_range(&self, doc_id: DocId) -> Option<Range<usize>> {
        let doc = doc_id as usize;
        let &start = self.doc_starts.get(doc)?;
        Some(start..self.document_end(doc))
    }

    /// Exclusive end of document `doc` in the joined text.
    fn document_end(&self, doc: usize) -> usize {
        match self.doc_starts.get(doc + 1) {
            Some(&next) => next - 1,
            None => self.size() - 1,
        }
    }

    /// Full text of one document.
    pub fn document(&self, doc_id: DocId) -> Result<String> {
        let Some(span) = self.document_range(doc_id) else {
            return Err(Error::range(
                "FmIndex::document",
                doc_id as usize,
                self.doc_starts.len(),
            ));
        };
        self.substring(span.start, span.len())
    }

    /// Matches with document-relative offsets, at most `limit` of them, in
    /// text order.
    pub fn search_with_positions(&self, keyword: &str, limit: usize) -> Result<Vec<SearchMatch>> {
        let positions = self.search(keyword)?;
        Ok(positions
            .into_iter()
            .filter_map(|position| {
                self.locate(position).map(|doc| SearchMatch {
                    doc_id: doc.doc_id,
                    offset: doc.offset,
                    position,
                })
            })
            .take(limit)
            .collect())
    }

    /// Documents containing `keyword`.
    pub fn search_documents(&self, keyword: &str) -> Result<RoaringBitmap> {
        let mut doc_ids = RoaringBitmap::new();
        for position in self.search(keyword)? {
            if let Some(doc) = self.locate(position) {
                doc_ids.insert(doc.doc_id);
            }
        }
        Ok(doc_ids)
    }

    pub fn stats(&self) -> FmIndexStats {
        FmIndexStats {
            size: self.size(),
            documents: self.document_count(),
            sample_interval: self.ddic as u32,
            max_char_code: self.wm.max_char_code(),
            bitsize: self.wm.bitsize(),
            distinct_symbols: self.wm.used_symbols().len(),
            samples: self.posdic.len(),
            heap_bytes: self.heap_size(),
        }
    }

    /// Approximate heap footprint of the built structure in bytes.
    pub fn heap_size(&self) -> usize {
        self.wm.heap_size()
            + (self.posdic.len() + self.idic.len()) * std::mem::size_of::<u32>()
            + self.rlt.len() * std::mem::size_of::<usize>()
            + self.doc_starts.len() * std::mem::size_of::<usize>()
    }

    pub fn dump(&self, out: &mut impl BinaryOutput) -> Result<()> {
        out.dump_u32(to_u32("ddic", self.ddic)?)?;
        out.dump_u32(to_u32("ssize", self.ssize)?)?;
        out.dump_u32(to_u32("head", self.head)?)?;
        self.wm.dump(out)?;
        out.dump_u32(to_u32("samples", self.posdic.len())?)?;
        for &p in &self.posdic {
            out.dump_u32(p)?;
        }
        for &i in &self.idic {
            out.dump_u32(i)?;
        }
        Ok(())
    }

    /// Replace the contents with an index written by [`FmIndex::dump`].
    ///
    /// On failure the index is left empty.
    pub fn load(&mut self, input: &mut impl BinaryInput) -> Result<()> {
        self.clear();
        let result = self.load_inner(input);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn load_inner(&mut self, input: &mut impl BinaryInput) -> Result<()> {
        let ddic = input.load_u32()? as usize;
        let ssize = input.load_u32()? as usize;
        let head = input.load_u32()? as usize;
        if ddic == 0 {
            return Err(Error::invalid_format("sample interval is zero"));
        }
        self.wm.load(input)?;
        let n = self.wm.size();
        if ssize != n || head >= n {
            return Err(Error::invalid_format(format!(
                "header (ssize {}, head {}) inconsistent with {} rows",
                ssize, head, n
            )));
        }

        let samples = input.load_u32()? as usize;
        if samples != n.div_ceil(ddic) {
            return Err(Error::invalid_format(format!(
                "{} samples, expected {}",
                samples,
                n.div_ceil(ddic)
            )));
        }
        let mut posdic = Vec::with_capacity(samples);
        for _ in 0..samples {
            posdic.push(load_bounded(input, n)?);
        }
        let mut idic = Vec::with_capacity(samples);
        for _ in 0..samples {
            idic.push(load_bounded(input, n)?);
        }

        self.ddic = ddic;
        self.ssize = ssize;
        self.head = head;
        self.posdic = posdic;
        self.idic = idic;
        self.rlt = self.wm.cumulative_counts()?;
        self.built = true;
        self.doc_starts = self.recover_doc_starts()?;

        log::debug!(
            "loaded fm-index: {} rows, {} documents",
            n,
            self.doc_starts.len()
        );
        Ok(())
    }

    /// Document starts: 0 plus one past every boundary symbol.
    fn recover_doc_starts(&self) -> Result<Vec<usize>> {
        let mut starts = vec![0];
        if let Some(rows) = self.rows_for_units(&[DOC_BOUNDARY])? {
            let mut boundaries = rows
                .map(|row| self.position(row))
                .collect::<Result<Vec<_>>>()?;
            boundaries.sort_unstable();
            starts.extend(boundaries.into_iter().map(|p| p + 1));
        }
        Ok(starts)
    }

    #[cfg(test)]
    fn lf_cycle_rows(&self) -> Result<Vec<usize>> {
        let mut rows = Vec::with_capacity(self.size());
        let mut i = self.head;
        loop {
            rows.push(i);
            i = self.lf(i)?;
            if i == self.head || rows.len() > self.size() {
                break;
            }
        }
        Ok(rows)
    }
}

/// Read one sample value, which must be a valid row or position.
fn load_bounded(input: &mut impl BinaryInput, bound: usize) -> Result<u32> {
    let value = input.load_u32()?;
    if value as usize >= bound {
        return Err(Error::invalid_format(format!(
            "sample {} out of range for {} rows",
            value, bound
        )));
    }
    Ok(value)
}
