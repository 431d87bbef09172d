//! Layer and Variable composition recipes: fixed container-type tags and
//! component orderings over the codecs in this crate. None of these
//! invent new encodings; they just pick codecs and name them.

use std::collections::HashMap;

use uuid::Uuid;

use crate::container::Container;
use crate::error::{Result, ZigguratError};
use crate::fnv::fnv1a_64;
use crate::index::{Index, IndexCompressed};
use crate::inverted::InvertedIndex;
use crate::set::Set;
use crate::strings::{StringList, StringVector};
use crate::vector::{Vector, VectorComp, VectorDelta};

/// Selects among `Vector`/`VectorComp`/`VectorDelta` for an integer
/// stream, per the `{compressed, delta}` configuration pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorEncoding {
    pub compressed: bool,
    pub delta: bool,
}

/// Selects among `Index`/`IndexCompressed` for a sorted pair stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexEncoding {
    pub compressed: bool,
}

fn build_vector(name: &str, data: &[i64], n: usize, d: usize, enc: VectorEncoding) -> Result<crate::Component> {
    match (enc.compressed, enc.delta) {
        (false, false) => Vector::new(name, data, n, d),
        (true, false) => VectorComp::new(name, data, n, d),
        (_, true) => VectorDelta::new(name, data, n, d),
    }
}

fn build_index(name: &str, pairs: &[(u64, i64)], pre_sorted: bool, enc: IndexEncoding) -> Result<crate::Component> {
    if enc.compressed {
        IndexCompressed::new(name, pairs, pre_sorted)
    } else {
        Index::new(name, pairs, pre_sorted)
    }
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

fn check_partition(partition: &[i64]) -> Result<()> {
    if partition.len() < 2 {
        return Err(ZigguratError::DimensionMismatch {
            detail: "partition must span at least one range, i.e. have at least 2 entries".to_string(),
        });
    }
    Ok(())
}

/// `(fnv1a_64(value), lex_id)` pairs for a lexicon built over `values` in
/// their final lex-id order.
fn lex_hash_pairs(values: &[impl AsRef<str>]) -> Vec<(u64, i64)> {
    values
        .iter()
        .enumerate()
        .map(|(id, v)| (fnv1a_64(v.as_ref().as_bytes()), id as i64))
        .collect()
}

/// Orders `values` by descending occurrence count, ties broken by first
/// occurrence. Returns the ordered unique values plus a lookup from each
/// original value to its assigned lex ID.
fn build_lexicon<'a>(values: &'a [impl AsRef<str>]) -> (Vec<&'a str>, HashMap<&'a str, usize>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for v in values {
        let s = v.as_ref();
        let entry = counts.entry(s).or_insert_with(|| {
            first_seen.push(s);
            0
        });
        *entry += 1;
    }

    let mut ordered = first_seen;
    ordered.sort_by(|a, b| counts[b].cmp(&counts[a]));
    // `sort_by` is stable, but the comparator above only orders by count,
    // so equal-count entries keep their `first_seen` relative order.

    let lookup = ordered.iter().enumerate().map(|(id, &s)| (s, id)).collect();
    (ordered, lookup)
}

/// `PrimaryLayer` (`ZLp`): a bare partition over corpus positions.
pub struct PrimaryLayer;

impl PrimaryLayer {
    /// `n` is the corpus length (number of positions this layer spans);
    /// it is supplied independently of `partition`, which only carries
    /// the segment boundaries (e.g. `[0, n]` for a single unsegmented
    /// span).
    pub fn build(n: i64, partition: &[i64]) -> Result<Container> {
        check_partition(partition)?;
        let p_vec = Vector::new("Partition", partition, partition.len(), 1)?;
        Container::new("ZLp", (n, 0), &new_uuid(), (None, None), vec![p_vec])
    }
}

/// `SegmentationLayer` (`ZLs`): a partition plus per-segment start/end
/// ranges, indexed both ways.
pub struct SegmentationLayer;

impl SegmentationLayer {
    pub fn build(partition: &[i64], ranges: &[(i64, i64)]) -> Result<Container> {
        check_partition(partition)?;
        let n = ranges.len();

        let p_vec = Vector::new("Partition", partition, partition.len(), 1)?;

        let mut flat = Vec::with_capacity(n * 2);
        for &(s, e) in ranges {
            flat.push(s);
            flat.push(e);
        }
        let range_stream = VectorDelta::new("RangeStream", &flat, n, 2)?;

        // Ranges are supplied in ascending start order, so StartSort can
        // skip the sort pass; EndSort keys on the swapped column and is
        // sorted normally.
        let start_pairs: Vec<(u64, i64)> = ranges.iter().enumerate().map(|(i, &(s, _))| (s as u64, i as i64)).collect();
        let start_sort = IndexCompressed::new("StartSort", &start_pairs, true)?;

        let end_pairs: Vec<(u64, i64)> = ranges.iter().map(|&(s, e)| (e as u64, s)).collect();
        let end_sort = IndexCompressed::new("EndSort", &end_pairs, false)?;

        Container::new(
            "ZLs",
            (n as i64, 0),
            &new_uuid(),
            (None, None),
            vec![p_vec, range_stream, start_sort, end_sort],
        )
    }
}

/// `PlainStringVariable` (`ZVc`): a per-position string, stored inline.
pub struct PlainStringVariable;

impl PlainStringVariable {
    pub fn build(
        strings: &[impl AsRef<[u8]>],
        base_layer_uuid: &str,
        offset_encoding: VectorEncoding,
        hash_encoding: IndexEncoding,
    ) -> Result<Container> {
        let n = strings.len();
        let string_data = StringList::new("StringData", strings)?;

        // Raw cumulative string lengths, with no null-terminator byte added
        // per entry (unlike StringVector's own offset table, see
        // DESIGN.md).
        let mut cumulative = Vec::with_capacity(n + 1);
        let mut running = 0i64;
        cumulative.push(running);
        for s in strings {
            running += s.as_ref().len() as i64;
            cumulative.push(running);
        }
        let offset_stream = build_vector("OffsetStream", &cumulative, n + 1, 1, offset_encoding)?;

        let hash_pairs: Vec<(u64, i64)> = strings.iter().enumerate().map(|(i, s)| (fnv1a_64(s.as_ref()), i as i64)).collect();
        let string_hash = build_index("StringHash", &hash_pairs, false, hash_encoding)?;

        Container::new(
            "ZVc",
            (n as i64, 0),
            &new_uuid(),
            (Some(base_layer_uuid.to_string()), None),
            vec![string_data, offset_stream, string_hash],
        )
    }
}

/// `IndexedStringVariable` (`ZVx`): a per-position string resolved
/// through a deduplicated lexicon.
pub struct IndexedStringVariable;

impl IndexedStringVariable {
    pub fn build(
        strings: &[impl AsRef<str>],
        partition: &[i64],
        base_layer_uuid: &str,
        stream_encoding: VectorEncoding,
    ) -> Result<Container> {
        check_partition(partition)?;
        let n = strings.len();
        let (lexicon, lookup) = build_lexicon(strings);
        let v = lexicon.len();

        let lexicon_component = StringVector::new("Lexicon", &lexicon)?;
        let lex_hash = Index::new("LexHash", &lex_hash_pairs(&lexicon), false)?;
        let p_vec = Vector::new("Partition", partition, partition.len(), 1)?;

        let lex_ids: Vec<i64> = strings.iter().map(|s| lookup[s.as_ref()] as i64).collect();
        let lex_id_stream = build_vector("LexIDStream", &lex_ids, n, 1, stream_encoding)?;

        let occurrences: Vec<Vec<usize>> = lex_ids.iter().map(|&id| vec![id as usize]).collect();
        let lex_id_index = InvertedIndex::new("LexIDIndex", &occurrences, v, 0)?;

        Container::new(
            "ZVx",
            (n as i64, v as i64),
            &new_uuid(),
            (Some(base_layer_uuid.to_string()), None),
            vec![lexicon_component, lex_hash, p_vec, lex_id_stream, lex_id_index],
        )
    }
}

/// `IntegerVariable` (`ZVi`): a per-position integer, with a sorted
/// value index.
pub struct IntegerVariable;

impl IntegerVariable {
    pub fn build(
        ints: &[i64],
        dims_b: i64,
        base_layer_uuid: &str,
        stream_encoding: VectorEncoding,
        sort_encoding: IndexEncoding,
    ) -> Result<Container> {
        let n = ints.len();
        let int_stream = build_vector("IntStream", ints, n, 1, stream_encoding)?;

        // Index keys are u64 sorted as unsigned, so negative values are
        // mapped by flipping the sign bit: this keeps the u64 ordering
        // consistent with signed numeric order.
        let pairs: Vec<(u64, i64)> = ints
            .iter()
            .enumerate()
            .map(|(i, &v)| ((v as u64) ^ 0x8000_0000_0000_0000, i as i64))
            .collect();
        let int_sort = build_index("IntSort", &pairs, false, sort_encoding)?;

        Container::new(
            "ZVi",
            (n as i64, dims_b),
            &new_uuid(),
            (Some(base_layer_uuid.to_string()), None),
            vec![int_stream, int_sort],
        )
    }
}

/// `SetVariable` (`ZVs`): a per-position set of type IDs resolved
/// through a deduplicated lexicon.
pub struct SetVariable;

impl SetVariable {
    pub fn build(
        id_sets: &[Vec<usize>],
        types: &[impl AsRef<str>],
        partition: &[i64],
        base_layer_uuid: &str,
    ) -> Result<Container> {
        check_partition(partition)?;
        let n = id_sets.len();
        let v = types.len();
        let type_strs: Vec<&str> = types.iter().map(|t| t.as_ref()).collect();

        let lexicon_component = StringVector::new("Lexicon", &type_strs)?;
        let lex_hash = Index::new("LexHash", &lex_hash_pairs(&type_strs), false)?;
        let p_vec = Vector::new("Partition", partition, partition.len(), 1)?;

        let sets: Vec<Vec<i64>> = id_sets.iter().map(|s| s.iter().map(|&id| id as i64).collect()).collect();
        let id_set_stream = Set::new("IDSetStream", &sets)?;

        let id_set_index = InvertedIndex::new("IDSetIndex", id_sets, v, 0)?;

        Container::new(
            "ZVs",
            (n as i64, v as i64),
            &new_uuid(),
            (Some(base_layer_uuid.to_string()), None),
            vec![lexicon_component, lex_hash, p_vec, id_set_stream, id_set_index],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_UUID: &str = "00000000-0000-4000-8000-000000000000";

    #[test]
    fn primary_layer_s1() {
        let container = PrimaryLayer::build(0, &[0, 0]).unwrap();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert_eq!(buf.len(), 224);
    }

    #[test]
    fn primary_layer_rejects_short_partition() {
        assert!(PrimaryLayer::build(0, &[0]).is_err());
    }

    #[test]
    fn segmentation_layer_shape() {
        let container = SegmentationLayer::build(&[0, 2, 5], &[(0, 2), (2, 5)]).unwrap();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert!(buf.len() > 160);
    }

    #[test]
    fn plain_string_variable_roundtrip_shape() {
        let strings = ["foo", "bar"];
        let container =
            PlainStringVariable::build(&strings, ZERO_UUID, VectorEncoding::default(), IndexEncoding::default())
                .unwrap();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert!(buf.len() > 160);
    }

    #[test]
    fn indexed_string_variable_dedups_lexicon() {
        let strings = ["a", "b", "a", "a", "c"];
        let container =
            IndexedStringVariable::build(&strings, &[0, 5], ZERO_UUID, VectorEncoding::default()).unwrap();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert!(buf.len() > 160);
    }

    #[test]
    fn lexicon_orders_by_descending_count_then_first_seen() {
        let (lexicon, lookup) = build_lexicon(&["b", "a", "a", "c", "b"]);
        // "a" occurs twice, "b" occurs twice, "c" once. "b" was first seen
        // before "a", so ties keep "b" ahead of "a".
        assert_eq!(lexicon, vec!["b", "a", "c"]);
        assert_eq!(lookup["b"], 0);
        assert_eq!(lookup["a"], 1);
        assert_eq!(lookup["c"], 2);
    }

    #[test]
    fn integer_variable_shape() {
        let container = IntegerVariable::build(
            &[3, 1, 2],
            0,
            ZERO_UUID,
            VectorEncoding::default(),
            IndexEncoding::default(),
        )
        .unwrap();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert!(buf.len() > 160);
    }

    #[test]
    fn set_variable_shape() {
        let sets = vec![vec![0usize, 1], vec![1]];
        let types = ["NOUN", "VERB"];
        let container = SetVariable::build(&sets, &types, &[0, 2], ZERO_UUID).unwrap();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert!(buf.len() > 160);
    }
}
