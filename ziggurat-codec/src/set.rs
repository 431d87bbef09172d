//! `Set`: blocks of 16 delta-encoded integer sets.

use crate::component::Component;
use crate::error::Result;
use crate::varint::encode_varint_into;

const COMPONENT_TYPE: u8 = 0x05;
const MODE_BLOCK: u8 = 0x01;
const BLOCK_SETS: usize = 16;

/// Encodes `n` sets of nonnegative type IDs as blocks of 16.
pub struct Set;

impl Set {
    pub fn new(name: &str, sets: &[Vec<i64>]) -> Result<Component> {
        let n = sets.len();
        let m = if n == 0 { 0 } else { (n - 1) / BLOCK_SETS + 1 };

        let mut block_bytes: Vec<Vec<u8>> = Vec::with_capacity(m);
        let mut idx = 0;
        for _ in 0..m {
            let count = BLOCK_SETS.min(n - idx);

            let mut encoded_items = Vec::new();
            let mut raw_offsets = vec![-1i64; BLOCK_SETS];
            let mut lengths = vec![0i64; BLOCK_SETS];

            for slot in 0..count {
                let start = encoded_items.len() as i64;
                let mut sorted = sets[idx + slot].clone();
                sorted.sort_unstable();
                let mut prev = 0i64;
                for (k, &v) in sorted.iter().enumerate() {
                    let delta = if k == 0 { v } else { v - prev };
                    encode_varint_into(delta, &mut encoded_items)?;
                    prev = v;
                }
                raw_offsets[slot] = start;
                lengths[slot] = encoded_items.len() as i64 - start;
            }

            let mut delta_offsets = vec![0i64; BLOCK_SETS];
            delta_offsets[0] = raw_offsets[0];
            for i in 1..BLOCK_SETS {
                delta_offsets[i] = raw_offsets[i] - raw_offsets[i - 1];
            }

            let mut buf = Vec::new();
            for o in &delta_offsets {
                encode_varint_into(*o, &mut buf)?;
            }
            for l in &lengths {
                encode_varint_into(*l, &mut buf)?;
            }
            buf.extend_from_slice(&encoded_items);

            block_bytes.push(buf);
            idx += count;
        }

        // Unlike the Vector-family sync table, this one carries an
        // explicit (m+1)-th end marker.
        let mut sync = Vec::with_capacity(m + 1);
        let mut running = 0i64;
        sync.push(running);
        for b in &block_bytes {
            running += b.len() as i64;
            sync.push(running);
        }

        let mut payload = Vec::with_capacity((m + 1) * 8 + block_bytes.iter().map(Vec::len).sum::<usize>());
        for o in &sync {
            payload.extend_from_slice(&o.to_le_bytes());
        }
        for b in &block_bytes {
            payload.extend_from_slice(b);
        }

        Component::new(COMPONENT_TYPE, MODE_BLOCK, name, (n as i64, 2), payload)
    }
}
