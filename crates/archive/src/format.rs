//! Archive traits and the two wire formats.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::binary::{BinaryInputArchive, BinaryOutputArchive};
use crate::error::ArchiveError;
use crate::json::{JsonInputArchive, JsonOutputArchive};

/// Shape of the wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
	/// Records are delimited objects; scoping calls are required.
	Nested,
	/// Records are positional byte runs; scoping calls do nothing.
	Flat,
}

impl std::fmt::Display for WireKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			WireKind::Nested => write!(f, "nested"),
			WireKind::Flat => write!(f, "flat"),
		}
	}
}

/// Reader side of an archive.
pub trait InputArchive {
	/// Enters the next record (or child node).
	fn start_node(&mut self) -> Result<(), ArchiveError> {
		Ok(())
	}

	/// Leaves the record entered by the matching [`start_node`](Self::start_node).
	fn finish_node(&mut self) -> Result<(), ArchiveError> {
		Ok(())
	}

	/// Reads the field stored under `label`.
	fn read<T: DeserializeOwned>(&mut self, label: &str) -> Result<T, ArchiveError>;
}

/// Writer side of an archive.
pub trait OutputArchive {
	/// Opens a new record (or child node).
	fn start_node(&mut self) -> Result<(), ArchiveError> {
		Ok(())
	}

	/// Closes the record opened by the matching [`start_node`](Self::start_node).
	fn finish_node(&mut self) -> Result<(), ArchiveError> {
		Ok(())
	}

	/// Writes `value` under `label`.
	fn write<T: Serialize + ?Sized>(&mut self, label: &str, value: &T) -> Result<(), ArchiveError>;
}

/// Binds a reader and a writer into one wire format.
///
/// Registries are keyed by format: a type registered for [`Json`] is not
/// implicitly available for [`Binary`].
pub trait ArchiveFormat: Send + Sync + 'static {
	/// Human-readable format name used in logs and errors.
	const NAME: &'static str;
	/// Whether records need explicit scoping.
	const WIRE: WireKind;

	type Input: InputArchive;
	type Output: OutputArchive;
}

/// Nested JSON wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl ArchiveFormat for Json {
	const NAME: &'static str = "json";
	const WIRE: WireKind = WireKind::Nested;

	type Input = JsonInputArchive;
	type Output = JsonOutputArchive;
}

/// Flat binary wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl ArchiveFormat for Binary {
	const NAME: &'static str = "binary";
	const WIRE: WireKind = WireKind::Flat;

	type Input = BinaryInputArchive;
	type Output = BinaryOutputArchive;
}
