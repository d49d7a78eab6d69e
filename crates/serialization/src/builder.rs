use std::any::TypeId;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use synapse_archive::ArchiveFormat;

use crate::base::Base;
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::registry::Registry;
use crate::table::{Collision, InsertAction, Ledger, TableKind};

pub(crate) type LoaderFn<F, B> = Box<
	dyn Fn(&mut <F as ArchiveFormat>::Input) -> Result<Arc<B>, RegistryError> + Send + Sync,
>;

pub(crate) type SaverFn<F, B> = Box<
	dyn Fn(&mut <F as ArchiveFormat>::Output, &B) -> Result<(), RegistryError> + Send + Sync,
>;

/// Saver plus the concrete type it accepts, so a mismatch is caught before
/// anything is written.
pub(crate) struct SaverEntry<F: ArchiveFormat, B: ?Sized> {
	pub concrete: TypeId,
	pub expected: &'static str,
	pub save: SaverFn<F, B>,
}

/// Mutable registration phase of a [`Registry`].
///
/// All registrations must happen here; [`finalize`](Self::finalize) freezes
/// the tables.
pub struct RegistryBuilder<F: ArchiveFormat, B: ?Sized + 'static> {
	pub(crate) loaders: FxHashMap<String, LoaderFn<F, B>>,
	pub(crate) savers: FxHashMap<String, SaverEntry<F, B>>,
	pub(crate) type_names: FxHashMap<TypeId, String>,
	owners: FxHashMap<String, TypeId>,
	ledger: Ledger,
	config: RegistryConfig,
}

impl<F: ArchiveFormat, B: ?Sized + Base> RegistryBuilder<F, B> {
	pub fn new() -> Self {
		Self::with_config(RegistryConfig::default())
	}

	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			loaders: FxHashMap::default(),
			savers: FxHashMap::default(),
			type_names: FxHashMap::default(),
			owners: FxHashMap::default(),
			ledger: Ledger::new(F::NAME, config.duplicates),
			config,
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Inserts the loader for `name`.
	pub fn register_loader<L>(
		&mut self,
		name: impl Into<String>,
		loader: L,
	) -> Result<InsertAction, RegistryError>
	where
		L: Fn(&mut F::Input) -> Result<Arc<B>, RegistryError> + Send + Sync + 'static,
	{
		let name = name.into();
		let label = name.clone();
		let loader: LoaderFn<F, B> = Box::new(loader);
		self.ledger
			.insert(&mut self.loaders, TableKind::Loader, name, &label, loader)
	}

	/// Inserts the saver for `name`, downcasting the base to `T` at call time.
	///
	/// A base whose dynamic type is not `T` fails with
	/// [`RegistryError::DowncastMismatch`] before `saver` runs.
	pub fn register_saver<T, S>(
		&mut self,
		name: impl Into<String>,
		saver: S,
	) -> Result<InsertAction, RegistryError>
	where
		T: 'static,
		S: Fn(&mut F::Output, &T) -> Result<(), RegistryError> + Send + Sync + 'static,
	{
		let name = name.into();
		let expected = std::any::type_name::<T>();
		let saver_name = name.clone();
		let erased: SaverFn<F, B> = Box::new(move |ar: &mut F::Output, base: &B| {
			let Some(concrete) = base.as_any().downcast_ref::<T>() else {
				return Err(RegistryError::DowncastMismatch {
					name: saver_name.clone(),
					expected,
					found: base.type_name(),
				});
			};
			saver(ar, concrete)
		});
		let entry = SaverEntry {
			concrete: TypeId::of::<T>(),
			expected,
			save: erased,
		};
		let label = name.clone();
		self.ledger
			.insert(&mut self.savers, TableKind::Saver, name, &label, entry)
	}

	/// Maps `T`'s type identity to `name`.
	pub fn register_type<T: 'static>(
		&mut self,
		name: impl Into<String>,
	) -> Result<InsertAction, RegistryError> {
		let name = name.into();
		let id = TypeId::of::<T>();
		let action = self.ledger.insert(
			&mut self.type_names,
			TableKind::TypeTag,
			id,
			std::any::type_name::<T>(),
			name.clone(),
		)?;
		match self.ledger.policy {
			crate::DuplicatePolicy::FirstWins => {
				self.owners.entry(name).or_insert(id);
			}
			_ => {
				self.owners.insert(name, id);
			}
		}
		Ok(action)
	}

	/// Concrete type identity currently bound to `name`.
	pub fn owner_of(&self, name: &str) -> Option<TypeId> {
		self.owners.get(name).copied()
	}

	/// Name `T`'s type identity currently maps to.
	pub fn name_for<T: 'static>(&self) -> Option<&str> {
		self.type_names.get(&TypeId::of::<T>()).map(String::as_str)
	}

	/// Under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject), fails
	/// if registering `T` under `name` would hit any occupied slot.
	///
	/// Lets a caller refuse a registration before touching any table, so a
	/// rejected name never ends up half registered.
	pub fn ensure_vacant<T: 'static>(&self, name: &str) -> Result<(), RegistryError> {
		if self.ledger.policy != crate::DuplicatePolicy::Reject {
			return Ok(());
		}
		let occupied = if self.loaders.contains_key(name) {
			Some((TableKind::Loader, name))
		} else if self.type_names.contains_key(&TypeId::of::<T>()) {
			Some((TableKind::TypeTag, std::any::type_name::<T>()))
		} else if self.savers.contains_key(name) {
			Some((TableKind::Saver, name))
		} else {
			None
		};
		match occupied {
			Some((table, key)) => Err(RegistryError::DuplicateName {
				table,
				name: key.to_owned(),
			}),
			None => Ok(()),
		}
	}

	pub fn collisions(&self) -> &[Collision] {
		&self.ledger.collisions
	}

	/// Freezes the tables into an immutable [`Registry`].
	pub fn finalize(self) -> Registry<F, B> {
		for name in self.loaders.keys() {
			if !self.savers.contains_key(name) {
				tracing::warn!(format = F::NAME, name = %name, "loader registered without saver");
			}
		}
		for name in self.savers.keys() {
			if !self.loaders.contains_key(name) {
				tracing::warn!(format = F::NAME, name = %name, "saver registered without loader");
			}
		}

		tracing::info!(
			format = F::NAME,
			loaders = self.loaders.len(),
			savers = self.savers.len(),
			types = self.type_names.len(),
			collisions = self.ledger.collisions.len(),
			"serialization registry finalized"
		);

		Registry {
			loaders: self.loaders,
			savers: self.savers,
			type_names: self.type_names,
			collisions: self.ledger.collisions,
			config: self.config,
		}
	}
}

impl<F: ArchiveFormat, B: ?Sized + Base> Default for RegistryBuilder<F, B> {
	fn default() -> Self {
		Self::new()
	}
}
