//! Ziggurat container file encoding.
//!
//! This crate re-exports the encoding engine from `ziggurat-codec`: the
//! component codecs, the container header/BOM assembly, and the
//! layer/variable composition recipes. There is no CLI or file-reading
//! surface here — writing is the only supported direction.

pub use ziggurat_codec::component::{Component, NAME_MAX_LEN};
pub use ziggurat_codec::container::Container;
pub use ziggurat_codec::error::{Result, ZigguratError};
pub use ziggurat_codec::fnv::fnv1a_64;
pub use ziggurat_codec::index::{Index, IndexCompressed};
pub use ziggurat_codec::inverted::InvertedIndex;
pub use ziggurat_codec::recipe::{
    IndexEncoding, IndexedStringVariable, IntegerVariable, PlainStringVariable, PrimaryLayer, SegmentationLayer,
    SetVariable, VectorEncoding,
};
pub use ziggurat_codec::set::Set;
pub use ziggurat_codec::strings::{StringList, StringVector};
pub use ziggurat_codec::varint::{encode_varint, encode_varint_into};
pub use ziggurat_codec::vector::{Vector, VectorComp, VectorDelta};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_layer_is_reachable_through_the_facade() {
        let container = PrimaryLayer::build(3, &[0, 3]).unwrap();
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert!(buf.len() > 160);
    }
}
