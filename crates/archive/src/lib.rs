//! Structured archives for layer serialization.
//!
//! An archive is the byte-level half of serialization: it knows how to write a
//! labeled field and how to read one back, and nothing about which concrete
//! type the fields belong to. Two wire kinds are provided:
//!
//! - [`Json`]: nested representation. Every record lives in its own object, so
//!   readers and writers must open and close a node around it.
//! - [`Binary`]: flat, positional representation (postcard). Labels are not
//!   stored and node scoping is a no-op.
//!
//! Concrete types describe their fields once through [`Persist`] and work with
//! either wire kind.

mod binary;
mod error;
mod format;
mod json;
mod persist;

pub use binary::{BinaryInputArchive, BinaryOutputArchive};
pub use error::ArchiveError;
pub use format::{ArchiveFormat, Binary, InputArchive, Json, OutputArchive, WireKind};
pub use json::{JsonInputArchive, JsonOutputArchive};
pub use persist::Persist;
