//! `InvertedIndex`: per-type ascending posting lists, delta-encoded.

use crate::component::Component;
use crate::error::{Result, ZigguratError};
use crate::varint::encode_varint_into;

const COMPONENT_TYPE: u8 = 0x07;
const MODE_BLOCK: u8 = 0x01;

pub struct InvertedIndex;

impl InvertedIndex {
    /// `k` types, `occurrences[i]` lists the type IDs occurring at
    /// position `i`. `p` is the jump-table granularity; only `0` is
    /// currently supported.
    pub fn new(name: &str, occurrences: &[Vec<usize>], k: usize, p: i64) -> Result<Component> {
        if p != 0 {
            return Err(ZigguratError::NotImplemented {
                detail: "inverted index jump tables are not implemented".to_string(),
            });
        }

        let mut postings: Vec<Vec<i64>> = vec![Vec::new(); k];
        for (pos, types) in occurrences.iter().enumerate() {
            for &t in types {
                postings[t].push(pos as i64);
            }
        }

        let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(k);
        for list in &postings {
            let mut block = Vec::new();
            encode_varint_into(0, &mut block)?;
            let mut prev = 0i64;
            for (i, &p) in list.iter().enumerate() {
                let delta = if i == 0 { p } else { p - prev };
                encode_varint_into(delta, &mut block)?;
                prev = p;
            }
            blocks.push(block);
        }

        let mut payload = Vec::with_capacity(k * 16 + blocks.iter().map(Vec::len).sum::<usize>());
        let mut offset = (k as i64) * 16;
        for (list, block) in postings.iter().zip(blocks.iter()) {
            payload.extend_from_slice(&(list.len() as i64).to_le_bytes());
            payload.extend_from_slice(&offset.to_le_bytes());
            offset += block.len() as i64;
        }
        for block in &blocks {
            payload.extend_from_slice(block);
        }

        Component::new(COMPONENT_TYPE, MODE_BLOCK, name, (k as i64, p), payload)
    }
}
