//! `Index` (plain sorted pairs) and `IndexCompressed` (blocked, overflow
//! on equal keys).

use tracing::debug;

use crate::component::Component;
use crate::error::Result;
use crate::varint::encode_varint_into;

const COMPONENT_TYPE: u8 = 0x06;
const MODE_PLAIN: u8 = 0x00;
const MODE_COMPRESSED: u8 = 0x01;
const TARGET_BLOCK: usize = 16;

/// Sorts `(key, position)` pairs primary by key ascending, secondary by
/// position ascending, unless `pre_sorted` is set.
fn sorted_pairs(pairs: &[(u64, i64)], pre_sorted: bool) -> Vec<(u64, i64)> {
    let mut data = pairs.to_vec();
    if !pre_sorted {
        data.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    }
    data
}

/// Plain forward (key, position) index, written as u64/i64 LE pairs.
pub struct Index;

impl Index {
    pub fn new(name: &str, pairs: &[(u64, i64)], pre_sorted: bool) -> Result<Component> {
        let data = sorted_pairs(pairs, pre_sorted);
        let n = data.len();
        let mut payload = Vec::with_capacity(n * 16);
        for (k, p) in &data {
            payload.extend_from_slice(&k.to_le_bytes());
            payload.extend_from_slice(&p.to_le_bytes());
        }
        Component::new(COMPONENT_TYPE, MODE_PLAIN, name, (n as i64, 2), payload)
    }
}

/// Blocked, delta-coded (key, position) index. Blocks target 16 entries;
/// a block holding >=16 entries extends past 16 rather than split a run
/// of equal keys (the "overflow" rule).
pub struct IndexCompressed;

impl IndexCompressed {
    pub fn new(name: &str, pairs: &[(u64, i64)], pre_sorted: bool) -> Result<Component> {
        let data = sorted_pairs(pairs, pre_sorted);
        let n = data.len();

        // Partition into row-index ranges, applying the overflow rule.
        let mut blocks: Vec<&[(u64, i64)]> = Vec::new();
        let mut bstart = 0usize;
        let mut blen = 0usize;
        for i in 0..n {
            if blen < TARGET_BLOCK {
                blen += 1;
            } else if data[i].0 == data[i - 1].0 {
                blen += 1;
            } else {
                blocks.push(&data[bstart..i]);
                bstart = i;
                blen = 1;
            }
        }

        let mut padding = 0usize;
        let mut padded_block: Vec<(u64, i64)> = Vec::new();
        if blen != 0 {
            if blen < TARGET_BLOCK {
                padding = TARGET_BLOCK - blen;
                padded_block = vec![(u64::MAX, -1); TARGET_BLOCK];
                padded_block[..blen].copy_from_slice(&data[bstart..]);
                blocks.push(&padded_block);
            } else {
                blocks.push(&data[bstart..]);
            }
        }

        let m = blocks.len();

        let mut r: i64 = 0;
        let mut packed_blocks: Vec<Vec<u8>> = Vec::with_capacity(m);
        let mut block_keys: Vec<u64> = Vec::with_capacity(m);

        for (bi, block) in blocks.iter().enumerate() {
            let is_last = bi == m - 1;
            let real_len = if is_last && padding > 0 { TARGET_BLOCK - padding } else { block.len() };
            r += real_len as i64;

            let mut packed = Vec::new();
            encode_varint_into(block.len() as i64 - TARGET_BLOCK as i64, &mut packed)?;

            let keys = &block[..TARGET_BLOCK.min(block.len())];
            block_keys.push(keys[0].0);
            for i in 1..keys.len() {
                encode_varint_into(keys[i].0 as i64 - keys[i - 1].0 as i64, &mut packed)?;
            }

            for i in 1..block.len() {
                encode_varint_into(block[i].1 - block[i - 1].1, &mut packed)?;
            }

            packed_blocks.push(packed);
        }

        let data_offset = (m as i64) * 8 + 8;
        let mut offsets = Vec::with_capacity(m);
        let mut running = data_offset;
        for b in &packed_blocks {
            offsets.push(running);
            running += b.len() as i64;
        }

        let mut payload = Vec::new();
        payload.extend_from_slice(&r.to_le_bytes());
        for (k, o) in block_keys.iter().zip(offsets.iter()) {
            payload.extend_from_slice(&k.to_le_bytes());
            payload.extend_from_slice(&o.to_le_bytes());
        }
        for b in &packed_blocks {
            payload.extend_from_slice(b);
        }

        debug!(
            target: "ziggurat",
            name, total_items = n, regular_items = r, overflow_items = n as i64 - r, sync_blocks = m,
            "packed IndexCompressed"
        );

        Component::new(COMPONENT_TYPE, MODE_COMPRESSED, name, (n as i64, 2), payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_index_sort() {
        let pairs = [(5u64, 2i64), (1, 0), (5, 1), (1, 1)];
        let c = Index::new("I", &pairs, false).unwrap();
        assert_eq!(c.bytelen(), 64);
        let expected: Vec<(u64, i64)> = vec![(1, 0), (1, 1), (5, 1), (5, 2)];
        let mut payload = Vec::new();
        for (k, p) in expected {
            payload.extend_from_slice(&k.to_le_bytes());
            payload.extend_from_slice(&p.to_le_bytes());
        }
        assert_eq!(c.payload(), payload.as_slice());
    }

    #[test]
    fn s6_index_compressed_overflow() {
        let pairs: Vec<(u64, i64)> = (0..17).map(|p| (7u64, p as i64)).collect();
        let c = IndexCompressed::new("IC", &pairs, false).unwrap();
        let payload = c.payload().to_vec();
        let r = i64::from_le_bytes(payload[0..8].try_into().unwrap());
        assert_eq!(r, 17);
        assert_eq!(c.params(), (17, 2));
        // bo = varint(17 - 16) = varint(1) = 0x01, found at the start of
        // the block region (offset 8 + 1*16 = 24).
        assert_eq!(payload[24], 0x01);
    }

    #[test]
    fn pads_short_final_block() {
        let pairs: Vec<(u64, i64)> = (0..5).map(|i| (i as u64, i as i64)).collect();
        let c = IndexCompressed::new("P", &pairs, false).unwrap();
        let payload = c.payload().to_vec();
        let r = i64::from_le_bytes(payload[0..8].try_into().unwrap());
        assert_eq!(r, 5);
    }
}
