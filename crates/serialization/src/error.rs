use synapse_archive::ArchiveError;
use thiserror::Error;

use crate::table::TableKind;

/// Errors surfaced by registration, lookup, load and save.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// `load` or `save` was called with a name absent from the tables.
	#[error(
		"no {format} serializer is registered for `{name}`; register the type under this name before loading or saving it"
	)]
	UnregisteredTypeName { name: String, format: &'static str },
	/// `serialization_name` was called for a type never passed to `register_type`.
	#[error("type `{type_name}` has no registered serialization name")]
	UnregisteredTypeIdentity { type_name: String },
	/// A saver received a value whose dynamic type does not match its name.
	#[error("saver for `{name}` expects `{expected}` but was given `{found}`")]
	DowncastMismatch {
		name: String,
		expected: &'static str,
		found: &'static str,
	},
	/// The archive failed while constructing a registered type.
	#[error("failed to construct `{name}` from archive: {source}")]
	Construction {
		name: String,
		#[source]
		source: ArchiveError,
	},
	/// A name was registered twice under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
	#[error("duplicate {table} registration for `{name}`")]
	DuplicateName { table: TableKind, name: String },
	/// Reading or writing the record envelope failed.
	#[error(transparent)]
	Archive(#[from] ArchiveError),
}

impl RegistryError {
	pub(crate) fn unregistered(name: &str, format: &'static str) -> Self {
		Self::UnregisteredTypeName {
			name: name.to_owned(),
			format,
		}
	}
}
