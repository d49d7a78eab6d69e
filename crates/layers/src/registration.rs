//! Link-time collection of layer serializers and the per-format registries.
//!
//! Every [`layer_serializer!`](crate::layer_serializer) declaration submits a
//! [`LayerSerializerReg`]. The first access to a format's registry runs
//! [`register_all`], which applies the collected declarations in name order.

use std::sync::Arc;

use synapse_archive::{ArchiveFormat, Binary, Json, Persist};
use synapse_serialization::{
	GlobalRegistry, Registry, RegistryBuilder, RegistryConfig, RegistryError, register_serializer,
};

use crate::layer::Layer;

/// Registers one layer type under a name into a builder for format `F`.
pub type Registrar<F> =
	fn(&mut RegistryBuilder<F, dyn Layer>, &'static str) -> Result<(), RegistryError>;

/// One declared layer serializer, carrying a trigger per archive format.
pub struct LayerSerializerReg {
	pub name: &'static str,
	pub json: Registrar<Json>,
	pub binary: Registrar<Binary>,
}

inventory::collect!(LayerSerializerReg);

impl LayerSerializerReg {
	pub const fn new<T: Layer + Persist>(name: &'static str) -> Self {
		Self {
			name,
			json: register::<Json, T>,
			binary: register::<Binary, T>,
		}
	}
}

fn upcast<T: Layer>(layer: Arc<T>) -> Arc<dyn Layer> {
	layer
}

fn register<F: ArchiveFormat, T: Layer + Persist>(
	builder: &mut RegistryBuilder<F, dyn Layer>,
	name: &'static str,
) -> Result<(), RegistryError> {
	register_serializer::<F, dyn Layer, T>(builder, name, upcast::<T>)
}

/// Archive formats that have a process-wide layer registry.
pub trait LayerFormat: ArchiveFormat + Sized {
	/// Selects this format's trigger from a declaration.
	fn registrar(reg: &LayerSerializerReg) -> Registrar<Self>;

	fn global() -> &'static GlobalRegistry<Self, dyn Layer>;
}

static JSON_LAYERS: GlobalRegistry<Json, dyn Layer> = GlobalRegistry::new(register_all::<Json>);
static BINARY_LAYERS: GlobalRegistry<Binary, dyn Layer> = GlobalRegistry::new(register_all::<Binary>);

impl LayerFormat for Json {
	fn registrar(reg: &LayerSerializerReg) -> Registrar<Self> {
		reg.json
	}

	fn global() -> &'static GlobalRegistry<Self, dyn Layer> {
		&JSON_LAYERS
	}
}

impl LayerFormat for Binary {
	fn registrar(reg: &LayerSerializerReg) -> Registrar<Self> {
		reg.binary
	}

	fn global() -> &'static GlobalRegistry<Self, dyn Layer> {
		&BINARY_LAYERS
	}
}

/// Applies every collected declaration to `builder`, sorted by name.
///
/// Stops at the first registration the builder rejects.
pub fn register_all<F: LayerFormat>(
	builder: &mut RegistryBuilder<F, dyn Layer>,
) -> Result<(), RegistryError> {
	let mut regs: Vec<&LayerSerializerReg> = inventory::iter::<LayerSerializerReg>.into_iter().collect();
	regs.sort_by_key(|reg| reg.name);

	for reg in &regs {
		F::registrar(reg)(builder, reg.name)?;
	}

	tracing::debug!(format = F::NAME, count = regs.len(), "registered layer serializers");
	Ok(())
}

/// The process-wide layer registry for `F`.
///
/// Built on first access with the configuration named by
/// [`RegistryConfig::ENV_VAR`], or defaults.
pub fn registry<F: LayerFormat>() -> &'static Registry<F, dyn Layer> {
	F::global().get()
}

/// Builds the process-wide registry for `F` with `config`.
///
/// Has no effect on the configuration if the registry was already built.
pub fn init_registry<F: LayerFormat>(config: RegistryConfig) -> &'static Registry<F, dyn Layer> {
	let global = F::global();
	if global.is_initialized() {
		tracing::warn!(format = F::NAME, "layer registry already built; ignoring config");
	}
	global.get_or_init_with(|| config)
}

/// Builds a standalone registry for `F` from the collected declarations.
pub fn build_registry<F: LayerFormat>(
	config: RegistryConfig,
) -> Result<Registry<F, dyn Layer>, RegistryError> {
	let mut builder = RegistryBuilder::with_config(config);
	register_all::<F>(&mut builder)?;
	Ok(builder.finalize())
}
