//! Ziggurat container file encoding engine.
//!
//! A [`container::Container`] is built from a fixed, ordered set of
//! [`component::Component`]s. Every component type in this crate
//! computes its full encoded payload at construction time — there is no
//! streaming or backpatching anywhere in the write path, which is what
//! lets [`container::Container::write`] take a plain `std::io::Write`
//! instead of a seekable stream.
//!
//! The `recipe` module composes these codecs into the named layer and
//! variable containers (`ZLp`, `ZLs`, `ZVc`, `ZVx`, `ZVi`, `ZVs`); callers
//! who need a bespoke layout can use the component constructors and
//! [`container::Container::new`] directly.

pub mod component;
pub mod container;
pub mod error;
pub mod fnv;
pub mod index;
pub mod inverted;
pub mod recipe;
pub mod set;
pub mod strings;
pub mod varint;
pub mod vector;

pub use component::Component;
pub use container::Container;
pub use error::{Result, ZigguratError};
