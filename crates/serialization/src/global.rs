use std::sync::OnceLock;

use synapse_archive::ArchiveFormat;

use crate::base::Base;
use crate::builder::RegistryBuilder;
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::registry::Registry;

/// Registration phase run once when a [`GlobalRegistry`] is first accessed.
pub type Bootstrap<F, B> = fn(&mut RegistryBuilder<F, B>) -> Result<(), RegistryError>;

/// Process-wide registry, built lazily and never torn down.
///
/// ```ignore
/// static LAYERS: GlobalRegistry<Json, dyn Layer> = GlobalRegistry::new(register_all);
///
/// let registry = LAYERS.get();
/// ```
pub struct GlobalRegistry<F: ArchiveFormat, B: ?Sized + 'static> {
	cell: OnceLock<Registry<F, B>>,
	bootstrap: Bootstrap<F, B>,
}

impl<F: ArchiveFormat, B: ?Sized + Base> GlobalRegistry<F, B> {
	pub const fn new(bootstrap: Bootstrap<F, B>) -> Self {
		Self {
			cell: OnceLock::new(),
			bootstrap,
		}
	}

	/// Returns the registry, building it with [`RegistryConfig::from_env`] on
	/// first access.
	pub fn get(&self) -> &Registry<F, B> {
		self.get_or_init_with(RegistryConfig::from_env)
	}

	/// Returns the registry, building it with `config` on first access.
	///
	/// `config` is ignored once the registry exists.
	pub fn get_or_init_with(&self, config: impl FnOnce() -> RegistryConfig) -> &Registry<F, B> {
		self.cell.get_or_init(|| {
			let mut builder = RegistryBuilder::with_config(config());
			if let Err(e) = (self.bootstrap)(&mut builder) {
				tracing::error!(format = F::NAME, error = %e, "serializer bootstrap failed");
			}
			builder.finalize()
		})
	}

	pub fn is_initialized(&self) -> bool {
		self.cell.get().is_some()
	}
}
