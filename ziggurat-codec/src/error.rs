use std::fmt;

/// The specific ways a Ziggurat component or container can fail to
/// construct. All of these are reported eagerly, before any bytes are
/// written (see module docs on [`crate::container`]).
#[derive(Debug)]
pub enum ZigguratError {
    /// A component or container name exceeded its byte limit.
    NameTooLong { name: String, max: usize },
    /// A container type tag was not exactly 3 characters.
    InvalidContainerType { tag: String },
    /// A UUID string was not a canonical 36-byte hyphenated form.
    InvalidUuid { uuid: String },
    /// A declared length disagreed with the actual input length, or a
    /// partition was shorter than 2 entries.
    DimensionMismatch { detail: String },
    /// `InvertedIndex` was asked for a nonzero jump-table granularity;
    /// jump tables are reserved for a future format revision.
    NotImplemented { detail: String },
    /// A varint would need more than 9 bytes to represent a value.
    /// Unreachable for any 64-bit input; kept as a defensive case.
    EncodingOverflow,
    /// An underlying I/O failure encountered while writing a container.
    Io(std::io::Error),
}

impl fmt::Display for ZigguratError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZigguratError::NameTooLong { name, max } => {
                write!(f, "name {name:?} exceeds {max} bytes")
            }
            ZigguratError::InvalidContainerType { tag } => {
                write!(f, "container type tag {tag:?} must be exactly 3 characters")
            }
            ZigguratError::InvalidUuid { uuid } => {
                write!(f, "uuid {uuid:?} is not a canonical 36-byte form")
            }
            ZigguratError::DimensionMismatch { detail } => write!(f, "dimension mismatch: {detail}"),
            ZigguratError::NotImplemented { detail } => write!(f, "not implemented: {detail}"),
            ZigguratError::EncodingOverflow => write!(f, "varint encoding requires more than 9 bytes"),
            ZigguratError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for ZigguratError {}

impl From<std::io::Error> for ZigguratError {
    fn from(e: std::io::Error) -> ZigguratError {
        ZigguratError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, ZigguratError>;
