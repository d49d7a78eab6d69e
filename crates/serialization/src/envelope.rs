//! Record envelope: one scoped node holding a `"type"` tag followed by the
//! concrete type's own fields.
//!
//! For nested archives the node is a delimited object; for flat archives the
//! scoping calls are no-ops and the tag is simply the first field.

use std::sync::Arc;

use synapse_archive::{ArchiveFormat, InputArchive, OutputArchive};

use crate::base::Base;
use crate::error::RegistryError;
use crate::registry::Registry;

/// Label of the type tag written before a record's fields.
pub const TYPE_FIELD: &str = "type";

/// Writes `T`'s serialized type name as the `"type"` field.
pub fn serialize_prolog<F, B, T>(
	registry: &Registry<F, B>,
	ar: &mut F::Output,
) -> Result<(), RegistryError>
where
	F: ArchiveFormat,
	B: ?Sized + Base,
	T: 'static,
{
	let name = registry.serialization_name_of::<T>()?;
	ar.write(TYPE_FIELD, name)?;
	Ok(())
}

/// Opens a record before its tag is written.
pub fn start_saving_record<A: OutputArchive>(ar: &mut A) -> Result<(), RegistryError> {
	ar.start_node()?;
	Ok(())
}

/// Closes the record opened by [`start_saving_record`].
pub fn finish_saving_record<A: OutputArchive>(ar: &mut A) -> Result<(), RegistryError> {
	ar.finish_node()?;
	Ok(())
}

/// Enters the next record before reading its tag.
pub fn start_loading_record<A: InputArchive>(ar: &mut A) -> Result<(), RegistryError> {
	ar.start_node()?;
	Ok(())
}

/// Leaves the record entered by [`start_loading_record`].
pub fn finish_loading_record<A: InputArchive>(ar: &mut A) -> Result<(), RegistryError> {
	ar.finish_node()?;
	Ok(())
}

/// Writes one complete record for `value`, tagged with its dynamic type.
///
/// Lookup failures are reported before the record is opened, so the archive
/// is left as it was.
pub fn save_record<F, B>(
	registry: &Registry<F, B>,
	ar: &mut F::Output,
	value: &B,
) -> Result<(), RegistryError>
where
	F: ArchiveFormat,
	B: ?Sized + Base,
{
	let name = registry.name_of(value)?;
	registry.check_save(name, value)?;
	start_saving_record(ar)?;
	ar.write(TYPE_FIELD, name)?;
	registry.save(name, ar, value)?;
	finish_saving_record(ar)?;
	Ok(())
}

/// Reads one complete record written by [`save_record`].
pub fn load_record<F, B>(registry: &Registry<F, B>, ar: &mut F::Input) -> Result<Arc<B>, RegistryError>
where
	F: ArchiveFormat,
	B: ?Sized + Base,
{
	start_loading_record(ar)?;
	let name: String = ar.read(TYPE_FIELD)?;
	let value = registry.load(&name, ar)?;
	finish_loading_record(ar)?;
	Ok(value)
}
