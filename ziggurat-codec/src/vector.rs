//! Vector family: `Vector` (plain), `VectorComp` (block varint) and
//! `VectorDelta` (block varint of column-wise deltas).
//!
//! All three encode an (n x d) matrix of `i64`, row-major: element (row,
//! col) lives at `data[row * d + col]`.

use crate::component::Component;
use crate::error::{Result, ZigguratError};
use crate::varint::encode_varint_into;

const COMPONENT_TYPE: u8 = 0x04;
const MODE_PLAIN: u8 = 0x00;
const MODE_COMPRESSED: u8 = 0x01;
const MODE_DELTA: u8 = 0x02;

const BLOCK_ROWS: usize = 16;

fn check_dims(data: &[i64], n: usize, d: usize) -> Result<()> {
    if data.len() != n * d {
        return Err(ZigguratError::DimensionMismatch {
            detail: format!("expected {n}*{d}={} values, got {}", n * d, data.len()),
        });
    }
    Ok(())
}

/// Plain row-major (n x d) matrix of little-endian `i64`.
pub struct Vector;

impl Vector {
    pub fn new(name: &str, data: &[i64], n: usize, d: usize) -> Result<Component> {
        check_dims(data, n, d)?;
        let mut payload = Vec::with_capacity(data.len() * 8);
        for v in data {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        Component::new(COMPONENT_TYPE, MODE_PLAIN, name, (n as i64, d as i64), payload)
    }
}

/// Block-varint-compressed (n x d) matrix, no delta coding.
pub struct VectorComp;

impl VectorComp {
    pub fn new(name: &str, data: &[i64], n: usize, d: usize) -> Result<Component> {
        check_dims(data, n, d)?;
        let payload = build_sync_blocks(data, n, d, false)?;
        Component::new(COMPONENT_TYPE, MODE_COMPRESSED, name, (n as i64, d as i64), payload)
    }
}

/// Block-varint-compressed (n x d) matrix, column-wise delta coded within
/// each block (row 0 of a block stored verbatim).
pub struct VectorDelta;

impl VectorDelta {
    pub fn new(name: &str, data: &[i64], n: usize, d: usize) -> Result<Component> {
        check_dims(data, n, d)?;
        let payload = build_sync_blocks(data, n, d, true)?;
        Component::new(COMPONENT_TYPE, MODE_DELTA, name, (n as i64, d as i64), payload)
    }
}

/// Shared block/sync-table assembly for `VectorComp` and `VectorDelta`.
///
/// `m = ceil(n / 16)` blocks (0 blocks for `n == 0`). The final block is
/// padded with rows of all `-1`; for delta mode, padding happens before
/// the column-wise delta is taken, so the deltas transition into the
/// sentinel.
fn build_sync_blocks(data: &[i64], n: usize, d: usize, delta: bool) -> Result<Vec<u8>> {
    let m = if n == 0 { 0 } else { (n - 1) / BLOCK_ROWS + 1 };
    let sync_table_len = (m * 8) as i64;

    let mut block_bytes: Vec<Vec<u8>> = Vec::with_capacity(m);
    let mut row_idx = 0;
    for _ in 0..m {
        let block_rows = BLOCK_ROWS.min(n - row_idx);
        let mut block: Vec<i64> = vec![-1; BLOCK_ROWS * d];
        for r in 0..block_rows {
            for c in 0..d {
                block[r * d + c] = data[(row_idx + r) * d + c];
            }
        }
        if delta {
            for r in (1..BLOCK_ROWS).rev() {
                for c in 0..d {
                    block[r * d + c] -= block[(r - 1) * d + c];
                }
            }
        }
        let mut buf = Vec::new();
        for c in 0..d {
            for r in 0..BLOCK_ROWS {
                encode_varint_into(block[r * d + c], &mut buf)?;
            }
        }
        block_bytes.push(buf);
        row_idx += block_rows;
    }

    let mut offsets = Vec::with_capacity(m);
    let mut offset = sync_table_len;
    for b in &block_bytes {
        offsets.push(offset);
        offset += b.len() as i64;
    }

    let payload_len = sync_table_len as usize + block_bytes.iter().map(Vec::len).sum::<usize>();
    let mut payload = Vec::with_capacity(payload_len);
    for o in &offsets {
        payload.extend_from_slice(&o.to_le_bytes());
    }
    for b in &block_bytes {
        payload.extend_from_slice(b);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_tiny_vector() {
        let c = Vector::new("V", &[1, 2, 3], 3, 1).unwrap();
        assert_eq!(c.bytelen(), 24);
        let mut expected = Vec::new();
        for v in [1i64, 2, 3] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(c.payload(), expected.as_slice());
    }

    #[test]
    fn vector_delta_short_block_is_padded_to_sixteen_rows() {
        // Every block is padded to 16 rows before delta coding, even when
        // it's the only block (see DESIGN.md on the spec's S3 example).
        let c = VectorDelta::new("D", &[10, 12, 15, 20], 4, 1).unwrap();
        let mut expected = vec![0x08, 0, 0, 0, 0, 0, 0, 0];
        // row0=10 verbatim, then deltas 2,3,5, then -21 into the -1
        // padding sentinel, then eleven more zero deltas between
        // padding rows.
        expected.extend_from_slice(&[0x0a, 0x02, 0x03, 0x05, 0x54]);
        expected.extend(std::iter::repeat(0u8).take(11));
        assert_eq!(c.payload(), expected.as_slice());
        assert_eq!(c.bytelen(), 24);
    }

    #[test]
    fn vector_comp_pads_short_final_block() {
        let c = VectorComp::new("C", &[1, 2, 3], 3, 1).unwrap();
        // one block: sync table [8], then 16 varints: 1,2,3,-1*13
        let payload = c.payload().to_vec();
        assert_eq!(&payload[0..8], &8i64.to_le_bytes());
        // first three varints are 1,2,3 (single-byte forms), then -1 padding
        assert_eq!(payload[8], 0x01);
        assert_eq!(payload[9], 0x02);
        assert_eq!(payload[10], 0x03);
        assert_eq!(payload[11], 0x40); // varint(-1) == 0x40
    }

    #[test]
    fn empty_vector_comp_has_no_blocks() {
        let c = VectorComp::new("E", &[], 0, 1).unwrap();
        assert_eq!(c.bytelen(), 0);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        assert!(Vector::new("V", &[1, 2], 3, 1).is_err());
    }
}
