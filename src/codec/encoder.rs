//! Index serialization

use crate::error::{CinderError, Result};
use crate::index::InvertedIndex;

pub(super) fn encode_index(index: &InvertedIndex) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_header(index, &mut buf);
    write_doc_stats(index, &mut buf);
    write_postings(index, &mut buf)?;
    Ok(buf)
}

fn write_header(index: &InvertedIndex, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&index.total_docs.to_le_bytes());
    buf.extend_from_slice(&index.total_terms.to_le_bytes());
    buf.extend_from_slice(&index.bm25.k1.to_le_bytes());
    buf.extend_from_slice(&index.bm25.b.to_le_bytes());
    buf.extend_from_slice(&(index.doc_stats.len() as u32).to_le_bytes());
}

fn write_doc_stats(index: &InvertedIndex, buf: &mut Vec<u8>) {
    let mut doc_ids: Vec<u32> = index.doc_stats.keys().copied().collect();
    doc_ids.sort_unstable();

    for doc_id in doc_ids {
        let stats = &index.doc_stats[&doc_id];
        buf.extend_from_slice(&doc_id.to_le_bytes());
        buf.extend_from_slice(&stats.length.to_le_bytes());
        buf.extend_from_slice(&(stats.term_freqs.len() as u32).to_le_bytes());

        let mut terms: Vec<&String> = stats.term_freqs.keys().collect();
        terms.sort_unstable();
        for term in terms {
            write_string(term, buf);
            buf.extend_from_slice(&stats.term_freqs[term].to_le_bytes());
        }
    }
}

fn write_postings(index: &InvertedIndex, buf: &mut Vec<u8>) -> Result<()> {
    let mut terms: Vec<&String> = index.postings.keys().collect();
    terms.sort_unstable();

    for term in terms {
        let list = &index.postings[term];
        if list.len() > u16::MAX as usize {
            return Err(CinderError::PostingListTooLarge {
                term: term.clone(),
                count: list.len(),
            });
        }

        write_string(term, buf);

        let (positions, towers) = list.to_parts();
        buf.extend_from_slice(&((positions.len() * 8) as u32).to_le_bytes());
        for (doc_id, offset) in positions {
            buf.extend_from_slice(&(doc_id as i32).to_le_bytes());
            buf.extend_from_slice(&(offset as i32).to_le_bytes());
        }

        for links in towers {
            if links.is_empty() {
                // the final position carries no forward links
                buf.extend_from_slice(&2u32.to_le_bytes());
                buf.extend_from_slice(&0u16.to_le_bytes());
            } else {
                buf.extend_from_slice(&((links.len() * 2) as u32).to_le_bytes());
                for link in links {
                    buf.extend_from_slice(&link.to_le_bytes());
                }
            }
        }
    }

    Ok(())
}

fn write_string(s: &str, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}
