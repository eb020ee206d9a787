//! Index deserialization
//!
//! The decoder is the exact inverse of the encoder. Per-term document-id
//! bitmaps are not part of the stream; they are rebuilt from the decoded
//! position pairs. All reads are bounds-checked so corrupt or truncated
//! input fails with an error instead of panicking.

use std::collections::HashMap;

use roaring::RoaringBitmap;

use crate::analyzer::Analyzer;
use crate::config::AnalyzerConfig;
use crate::error::{CinderError, Result};
use crate::index::{Bm25Params, DocumentStats, InvertedIndex, PostingKey, SkipList};

pub(super) fn decode_index(data: &[u8], analyzer: AnalyzerConfig) -> Result<InvertedIndex> {
    let mut reader = ByteReader::new(data);

    let total_docs = reader.read_u32()?;
    let total_terms = reader.read_u64()?;
    let k1 = reader.read_f64()?;
    let b = reader.read_f64()?;
    let num_doc_stats = reader.read_u32()?;

    let mut doc_stats = HashMap::new();
    for _ in 0..num_doc_stats {
        let (doc_id, stats) = read_doc_stats(&mut reader)?;
        doc_stats.insert(doc_id, stats);
    }

    let mut postings = HashMap::new();
    let mut doc_bitmaps = HashMap::new();
    while !reader.is_done() {
        let (term, list, docs) = read_posting_list(&mut reader)?;
        postings.insert(term.clone(), list);
        doc_bitmaps.insert(term, docs);
    }

    Ok(InvertedIndex {
        postings,
        doc_bitmaps,
        doc_stats,
        total_docs,
        total_terms,
        bm25: Bm25Params { k1, b },
        analyzer: Analyzer::new(analyzer),
    })
}

fn read_doc_stats(reader: &mut ByteReader<'_>) -> Result<(u32, DocumentStats)> {
    let doc_id = reader.read_u32()?;
    let length = reader.read_u32()?;
    let num_terms = reader.read_u32()?;

    let mut term_freqs = HashMap::new();
    for _ in 0..num_terms {
        let term = read_string(reader)?;
        let freq = reader.read_u32()?;
        term_freqs.insert(term, freq);
    }

    Ok((doc_id, DocumentStats::new(length, term_freqs)))
}

fn read_posting_list(reader: &mut ByteReader<'_>) -> Result<(String, SkipList, RoaringBitmap)> {
    let term = read_string(reader)?;

    let positions_len = reader.read_u32()?;
    if positions_len % 8 != 0 {
        return Err(CinderError::InvalidLength {
            field: "positions",
            len: positions_len,
            offset: reader.offset(),
        });
    }
    if positions_len as usize > reader.remaining() {
        return Err(CinderError::UnexpectedEof(reader.offset()));
    }
    let count = (positions_len / 8) as usize;

    let mut positions: Vec<PostingKey> = Vec::with_capacity(count);
    let mut docs = RoaringBitmap::new();
    for _ in 0..count {
        let doc_id = reader.read_i32()?;
        let offset = reader.read_i32()?;
        if doc_id < 0 || offset < 0 {
            return Err(CinderError::NegativePosition { doc_id, offset });
        }
        let key = (doc_id as u32, offset as u32);
        if positions.last().is_some_and(|&prev| prev >= key) {
            return Err(CinderError::UnsortedPositions(term));
        }
        docs.insert(key.0);
        positions.push(key);
    }

    let mut towers = Vec::with_capacity(count);
    for _ in 0..count {
        towers.push(read_tower(reader)?);
    }

    let list = SkipList::from_parts(positions, towers)?;
    Ok((term, list, docs))
}

fn read_tower(reader: &mut ByteReader<'_>) -> Result<Vec<u16>> {
    let byte_len = reader.read_u32()?;
    if byte_len == 0 || byte_len % 2 != 0 {
        return Err(CinderError::InvalidLength {
            field: "tower",
            len: byte_len,
            offset: reader.offset(),
        });
    }
    if byte_len as usize > reader.remaining() {
        return Err(CinderError::UnexpectedEof(reader.offset()));
    }

    let mut links = Vec::with_capacity((byte_len / 2) as usize);
    for _ in 0..byte_len / 2 {
        links.push(reader.read_u16()?);
    }

    // a single zero link denotes the empty tower of the final position
    if links == [0] {
        links.clear();
    }
    Ok(links)
}

fn read_string(reader: &mut ByteReader<'_>) -> Result<String> {
    let len = reader.read_u32()? as usize;
    let bytes = reader.read_bytes(len)?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Cursor over the encoded stream with bounds-checked reads
struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn is_done(&self) -> bool {
        self.offset >= self.data.len()
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(CinderError::UnexpectedEof(self.offset))?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }
}
