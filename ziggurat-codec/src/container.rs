//! The 160-byte header, the Bill-of-Materials index and final assembly.
//!
//! Every [`crate::component::Component`] is built eagerly and carries its
//! own `bytelen()` before it ever reaches a `Container`, so the BOM can be
//! filled in a single forward pass with no backpatching — `Container`
//! only needs `std::io::Write`, never `Seek`.

use crate::component::Component;
use crate::error::{Result, ZigguratError};

const MAGIC: &[u8; 8] = b"Ziggurat";
const VERSION: &[u8; 4] = b"1.0\t";
const HEADER_LEN: usize = 160;
const BOM_ENTRY_LEN: usize = 48;
const NAME_FIELD_LEN: usize = 13;
const UUID_LEN: usize = 36;

fn align8(offset: i64) -> i64 {
    offset + ((8 - (offset % 8)) % 8)
}

fn validate_uuid(uuid: &str) -> Result<()> {
    if uuid.len() != UUID_LEN || !uuid.is_ascii() {
        return Err(ZigguratError::InvalidUuid { uuid: uuid.to_string() });
    }
    Ok(())
}

fn write_uuid_field(out: &mut Vec<u8>, uuid: Option<&str>) {
    match uuid {
        Some(u) => out.extend_from_slice(u.as_bytes()),
        None => out.extend(std::iter::repeat(0u8).take(UUID_LEN)),
    }
}

/// A complete Ziggurat file: a container-type tag, two dimensions, a
/// UUID, up to two parent UUIDs and an ordered sequence of components.
pub struct Container {
    container_type: String,
    dims: (i64, i64),
    uuid: String,
    base_uuids: (Option<String>, Option<String>),
    components: Vec<Component>,
}

impl Container {
    pub fn new(
        container_type: &str,
        dims: (i64, i64),
        uuid: &str,
        base_uuids: (Option<String>, Option<String>),
        components: Vec<Component>,
    ) -> Result<Self> {
        if container_type.len() != 3 || !container_type.is_ascii() {
            return Err(ZigguratError::InvalidContainerType { tag: container_type.to_string() });
        }
        validate_uuid(uuid)?;
        if let Some(u) = base_uuids.0.as_deref() {
            validate_uuid(u)?;
        }
        if let Some(u) = base_uuids.1.as_deref() {
            validate_uuid(u)?;
        }
        if components.len() > 255 {
            return Err(ZigguratError::DimensionMismatch {
                detail: format!("{} components exceeds the 255-slot BOM", components.len()),
            });
        }
        Ok(Container {
            container_type: container_type.to_string(),
            dims,
            uuid: uuid.to_string(),
            base_uuids,
            components,
        })
    }

    fn data_start(&self) -> i64 {
        HEADER_LEN as i64 + BOM_ENTRY_LEN as i64 * self.components.len() as i64
    }

    fn offsets(&self) -> Vec<i64> {
        let mut offsets = Vec::with_capacity(self.components.len());
        let mut offset = self.data_start();
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                let prev = &self.components[i - 1];
                offset = align8(offsets[i - 1] + prev.bytelen());
            }
            offsets.push(offset);
        }
        offsets
    }

    fn write_header(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(VERSION);
        out.extend_from_slice(self.container_type.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(self.uuid.as_bytes());
        out.extend_from_slice(&[b'\n', 0x04, 0x00, 0x00]);
        let n = self.components.len() as u8;
        out.push(n);
        out.push(n);
        out.extend(std::iter::repeat(0u8).take(6));
        out.extend_from_slice(&self.dims.0.to_le_bytes());
        out.extend_from_slice(&self.dims.1.to_le_bytes());
        write_uuid_field(out, self.base_uuids.0.as_deref());
        out.extend(std::iter::repeat(0u8).take(4));
        write_uuid_field(out, self.base_uuids.1.as_deref());
        out.extend(std::iter::repeat(0u8).take(4));
        debug_assert_eq!(out.len(), HEADER_LEN);
    }

    fn write_bom_entry(out: &mut Vec<u8>, component: &Component, offset: i64) {
        out.push(0x01);
        out.push(component.component_type());
        out.push(component.mode());
        let name = component.name().as_bytes();
        let mut name_field = vec![0u8; NAME_FIELD_LEN];
        name_field[..name.len()].copy_from_slice(name);
        out.extend_from_slice(&name_field);
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&component.bytelen().to_le_bytes());
        let (p0, p1) = component.params();
        out.extend_from_slice(&p0.to_le_bytes());
        out.extend_from_slice(&p1.to_le_bytes());
        debug_assert_eq!(out.len() % BOM_ENTRY_LEN, 0);
    }

    /// Serializes the complete file: header, BOM, then each component's
    /// payload in declared order, zero-padded to keep every offset
    /// 8-byte aligned.
    pub fn write<W: std::io::Write>(&self, w: &mut W) -> Result<()> {
        let offsets = self.offsets();

        let mut buf = Vec::with_capacity(self.data_start() as usize);
        self.write_header(&mut buf);
        for (c, &offset) in self.components.iter().zip(offsets.iter()) {
            Self::write_bom_entry(&mut buf, c, offset);
        }
        w.write_all(&buf)?;

        let mut pos = self.data_start();
        for (c, &offset) in self.components.iter().zip(offsets.iter()) {
            if offset > pos {
                w.write_all(&vec![0u8; (offset - pos) as usize])?;
            }
            w.write_all(c.payload())?;
            pos = offset + c.bytelen();
        }
        Ok(())
    }

    pub fn file_len(&self) -> i64 {
        let offsets = self.offsets();
        match (offsets.last(), self.components.last()) {
            (Some(&o), Some(c)) => o + c.bytelen(),
            _ => self.data_start(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    #[test]
    fn align8_rounds_up_to_next_multiple() {
        assert_eq!(align8(0), 0);
        assert_eq!(align8(1), 8);
        assert_eq!(align8(8), 8);
        assert_eq!(align8(9), 16);
    }

    #[test]
    fn s1_empty_primary_layer() {
        let partition = Vector::new("Partition", &[0, 0], 2, 1).unwrap();
        let container = Container::new(
            "ZLp",
            (0, 0),
            "00000000-0000-4000-8000-000000000000",
            (None, None),
            vec![partition],
        )
        .unwrap();

        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert_eq!(buf.len(), 160 + 48 + 16);
        assert_eq!(container.file_len(), 224);

        assert_eq!(&buf[0..8], b"Ziggurat");
        assert_eq!(&buf[8..12], b"1.0\t");
        assert_eq!(&buf[12..15], b"ZLp");
        assert_eq!(buf[15], b'\n');
        assert_eq!(&buf[16..52], "00000000-0000-4000-8000-000000000000".as_bytes());
        assert_eq!(&buf[52..56], &[b'\n', 0x04, 0x00, 0x00]);
        assert_eq!(buf[56], 1);
        assert_eq!(buf[57], 1);
        assert_eq!(&buf[58..64], &[0u8; 6]);

        assert_eq!(buf[160], 0x01);
        let offset = i64::from_le_bytes(buf[176..184].try_into().unwrap());
        assert_eq!(offset, 208);
        let size = i64::from_le_bytes(buf[184..192].try_into().unwrap());
        assert_eq!(size, 16);
        assert_eq!(&buf[208..224], &[0u8; 16]);
    }

    #[test]
    fn rejects_non_three_char_type() {
        assert!(Container::new(
            "ZLong",
            (0, 0),
            "00000000-0000-4000-8000-000000000000",
            (None, None),
            vec![]
        )
        .is_err());
    }

    #[test]
    fn rejects_malformed_uuid() {
        assert!(Container::new("ZLp", (0, 0), "not-a-uuid", (None, None), vec![]).is_err());
    }
}
