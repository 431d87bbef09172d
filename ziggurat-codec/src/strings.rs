//! `StringList` and `StringVector`: null-terminated byte-string payloads,
//! the latter preceded by an offset table.

use crate::component::Component;
use crate::error::Result;

const TYPE_STRING_LIST: u8 = 0x02;
const TYPE_STRING_VECTOR: u8 = 0x03;
const MODE_PLAIN: u8 = 0x00;

/// Concatenation of `\0`-terminated strings; no random access.
pub struct StringList;

impl StringList {
    pub fn new(name: &str, strings: &[impl AsRef<[u8]>]) -> Result<Component> {
        let n = strings.len();
        let mut payload = Vec::new();
        for s in strings {
            payload.extend_from_slice(s.as_ref());
            payload.push(0);
        }
        Component::new(TYPE_STRING_LIST, MODE_PLAIN, name, (n as i64, 0), payload)
    }
}

/// `StringList` payload preceded by an offset table giving each string's
/// starting byte within the payload region.
pub struct StringVector;

impl StringVector {
    pub fn new(name: &str, strings: &[impl AsRef<[u8]>]) -> Result<Component> {
        let n = strings.len();
        let mut offsets = Vec::with_capacity(n);
        let mut body = Vec::new();
        for s in strings {
            offsets.push(body.len() as i64);
            body.extend_from_slice(s.as_ref());
            body.push(0);
        }
        let mut payload = Vec::with_capacity(n * 8 + body.len());
        for o in &offsets {
            payload.extend_from_slice(&o.to_le_bytes());
        }
        payload.extend_from_slice(&body);
        Component::new(TYPE_STRING_VECTOR, MODE_PLAIN, name, (n as i64, 0), payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_string_list() {
        let c = StringList::new("S", &["foo", "bar"]).unwrap();
        assert_eq!(c.payload(), b"foo\0bar\0");
        assert_eq!(c.bytelen(), 8);
        assert_eq!(c.params(), (2, 0));
    }

    #[test]
    fn string_vector_offset_table() {
        let c = StringVector::new("L", &["foo", "bar"]).unwrap();
        let payload = c.payload();
        assert_eq!(&payload[0..8], &0i64.to_le_bytes());
        assert_eq!(&payload[8..16], &4i64.to_le_bytes());
        assert_eq!(&payload[16..], b"foo\0bar\0");
        assert_eq!(c.bytelen(), 24);
    }

    #[test]
    fn empty_string_list() {
        let c = StringList::new("E", &[] as &[&str]).unwrap();
        assert_eq!(c.bytelen(), 0);
        assert_eq!(c.params(), (0, 0));
    }
}
