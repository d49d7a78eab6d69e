use std::any::TypeId;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use synapse_archive::ArchiveFormat;

use crate::base::Base;
use crate::builder::{LoaderFn, SaverEntry};
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::table::Collision;

#[cfg(test)]
mod tests;

/// Frozen serialization tables for one archive format and one base type.
///
/// Built by [`RegistryBuilder::finalize`](crate::RegistryBuilder::finalize).
/// Read-only, so a shared reference may be used from any thread.
pub struct Registry<F: ArchiveFormat, B: ?Sized + 'static> {
	pub(crate) loaders: FxHashMap<String, LoaderFn<F, B>>,
	pub(crate) savers: FxHashMap<String, SaverEntry<F, B>>,
	pub(crate) type_names: FxHashMap<TypeId, String>,
	pub(crate) collisions: Vec<Collision>,
	pub(crate) config: RegistryConfig,
}

impl<F: ArchiveFormat, B: ?Sized + Base> Registry<F, B> {
	/// Constructs a new `B` registered under `name` from the archive.
	pub fn load(&self, name: &str, ar: &mut F::Input) -> Result<Arc<B>, RegistryError> {
		let loader = self
			.loaders
			.get(name)
			.ok_or_else(|| RegistryError::unregistered(name, F::NAME))?;
		loader(ar)
	}

	/// Writes `value`'s fields using the saver registered under `name`.
	///
	/// Fails before writing anything when `name` is unknown or its saver
	/// expects a different concrete type.
	pub fn save(&self, name: &str, ar: &mut F::Output, value: &B) -> Result<(), RegistryError> {
		let saver = self.saver_for(name, value)?;
		(saver.save)(ar, value)
	}

	/// Checks that [`save`](Self::save) would dispatch `value` under `name`.
	pub fn check_save(&self, name: &str, value: &B) -> Result<(), RegistryError> {
		self.saver_for(name, value).map(|_| ())
	}

	fn saver_for(&self, name: &str, value: &B) -> Result<&SaverEntry<F, B>, RegistryError> {
		let saver = self
			.savers
			.get(name)
			.ok_or_else(|| RegistryError::unregistered(name, F::NAME))?;
		if saver.concrete != value.as_any().type_id() {
			return Err(RegistryError::DowncastMismatch {
				name: name.to_owned(),
				expected: saver.expected,
				found: value.type_name(),
			});
		}
		Ok(saver)
	}

	/// Serialized type name registered for a type identity.
	pub fn serialization_name(&self, id: TypeId) -> Result<&str, RegistryError> {
		self.type_names
			.get(&id)
			.map(String::as_str)
			.ok_or_else(|| RegistryError::UnregisteredTypeIdentity {
				type_name: format!("{id:?}"),
			})
	}

	pub fn serialization_name_of<T: 'static>(&self) -> Result<&str, RegistryError> {
		self.type_names
			.get(&TypeId::of::<T>())
			.map(String::as_str)
			.ok_or_else(|| RegistryError::UnregisteredTypeIdentity {
				type_name: std::any::type_name::<T>().to_owned(),
			})
	}

	/// Serialized type name of `value`'s dynamic type.
	pub fn name_of(&self, value: &B) -> Result<&str, RegistryError> {
		self.type_names
			.get(&value.as_any().type_id())
			.map(String::as_str)
			.ok_or_else(|| RegistryError::UnregisteredTypeIdentity {
				type_name: value.type_name().to_owned(),
			})
	}

	pub fn contains(&self, name: &str) -> bool {
		self.loaders.contains_key(name)
	}

	/// Loadable type names, sorted.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<_> = self.loaders.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.loaders.len()
	}

	pub fn is_empty(&self) -> bool {
		self.loaders.is_empty()
	}

	/// Duplicate registrations seen while building.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	pub fn format(&self) -> &'static str {
		F::NAME
	}
}

impl<F: ArchiveFormat, B: ?Sized + 'static> std::fmt::Debug for Registry<F, B> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("format", &F::NAME)
			.field("loaders", &self.loaders.len())
			.field("savers", &self.savers.len())
			.field("types", &self.type_names.len())
			.field("collisions", &self.collisions.len())
			.finish()
	}
}
