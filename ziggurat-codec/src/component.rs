//! The common shape every codec produces: a typed, named, parameterized
//! blob of already-encoded bytes, ready to be dropped into a [`crate::container::Container`].
//!
//! Every codec in this crate builds its payload eagerly at construction
//! time (see the crate's module docs), so there is no dynamic dispatch
//! here — just one concrete struct that every `Xxx::new(...)` constructor
//! returns.

use crate::error::{Result, ZigguratError};

pub const NAME_MAX_LEN: usize = 12;

#[derive(Debug, Clone)]
pub struct Component {
    component_type: u8,
    mode: u8,
    name: String,
    params: (i64, i64),
    payload: Vec<u8>,
}

impl Component {
    pub(crate) fn new(
        component_type: u8,
        mode: u8,
        name: &str,
        params: (i64, i64),
        payload: Vec<u8>,
    ) -> Result<Self> {
        validate_name(name)?;
        Ok(Component {
            component_type,
            mode,
            name: name.to_string(),
            params,
            payload,
        })
    }

    pub fn component_type(&self) -> u8 {
        self.component_type
    }

    pub fn mode(&self) -> u8 {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> (i64, i64) {
        self.params
    }

    pub fn bytelen(&self) -> i64 {
        self.payload.len() as i64
    }

    pub(crate) fn payload(&self) -> &[u8] {
        &self.payload
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if !name.is_ascii() || name.len() > NAME_MAX_LEN {
        return Err(ZigguratError::NameTooLong {
            name: name.to_string(),
            max: NAME_MAX_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_overlong_name() {
        let err = Component::new(0x04, 0x00, "ThisNameIsWayTooLong", (0, 0), vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_non_ascii_name() {
        let err = Component::new(0x04, 0x00, "Ümlaut", (0, 0), vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn accepts_boundary_name() {
        let c = Component::new(0x04, 0x00, "TwelveChars!", (1, 2), vec![1, 2, 3]).unwrap();
        assert_eq!(c.name(), "TwelveChars!");
        assert_eq!(c.bytelen(), 3);
        assert_eq!(c.params(), (1, 2));
    }
}
