use crate::error::ArchiveError;
use crate::format::{InputArchive, OutputArchive};

/// Field-level serialization for one concrete type.
///
/// `save` writes the type's own fields into the currently open record;
/// `load_and_construct` reads them back and builds a complete value. A type
/// that rejects what it read returns an error instead of a half-built value.
pub trait Persist: Sized {
	fn save<A: OutputArchive>(&self, ar: &mut A) -> Result<(), ArchiveError>;

	fn load_and_construct<A: InputArchive>(ar: &mut A) -> Result<Self, ArchiveError>;
}
