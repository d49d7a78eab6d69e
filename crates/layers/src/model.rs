//! Whole-model save and load.
//!
//! A model is written as one node holding its name, its layer count and then
//! one tagged record per layer. In the nested JSON form each layer record
//! becomes a positional child (`value0`, `value1`, ...) of the model object.

use std::io;
use std::sync::Arc;

use synapse_archive::{
	ArchiveError, ArchiveFormat, Binary, BinaryInputArchive, BinaryOutputArchive, InputArchive,
	Json, JsonInputArchive, JsonOutputArchive, OutputArchive,
};
use synapse_serialization::{Registry, RegistryError, load_record, save_record};

use crate::layer::Layer;
use crate::registration::{LayerFormat, registry};


/// An ordered stack of layers.
#[derive(Debug, Clone, Default)]
pub struct Sequential {
	name: String,
	layers: Vec<Arc<dyn Layer>>,
}

impl Sequential {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			layers: Vec::new(),
		}
	}

	/// Appends `layer`, builder style.
	pub fn with(mut self, layer: impl Layer) -> Self {
		self.push(layer);
		self
	}

	pub fn push(&mut self, layer: impl Layer) -> &mut Self {
		self.layers.push(Arc::new(layer));
		self
	}

	pub fn push_shared(&mut self, layer: Arc<dyn Layer>) -> &mut Self {
		self.layers.push(layer);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn layers(&self) -> &[Arc<dyn Layer>] {
		&self.layers
	}

	pub fn len(&self) -> usize {
		self.layers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}

	/// Saves through the process-wide registry for `F`.
	pub fn save<F: LayerFormat>(&self, ar: &mut F::Output) -> Result<(), RegistryError> {
		self.save_with(registry::<F>(), ar)
	}

	/// Loads through the process-wide registry for `F`.
	pub fn load<F: LayerFormat>(ar: &mut F::Input) -> Result<Self, RegistryError> {
		Self::load_with(registry::<F>(), ar)
	}

	pub fn save_with<F: ArchiveFormat>(
		&self,
		registry: &Registry<F, dyn Layer>,
		ar: &mut F::Output,
	) -> Result<(), RegistryError> {
		ar.start_node()?;
		ar.write("name", &self.name)?;
		ar.write("layer_count", &self.layers.len())?;
		for layer in &self.layers {
			save_record(registry, ar, layer.as_ref())?;
		}
		ar.finish_node()?;
		Ok(())
	}

	pub fn load_with<F: ArchiveFormat>(
		registry: &Registry<F, dyn Layer>,
		ar: &mut F::Input,
	) -> Result<Self, RegistryError> {
		ar.start_node()?;
		let name: String = ar.read("name")?;
		let count: usize = ar.read("layer_count")?;
		let mut layers = Vec::new();
		for _ in 0..count {
			layers.push(load_record(registry, ar)?);
		}
		ar.finish_node()?;
		tracing::debug!(format = F::NAME, model = %name, layers = count, "loaded model");
		Ok(Self { name, layers })
	}

	pub fn to_json_string(&self, pretty: bool) -> Result<String, RegistryError> {
		let mut out = JsonOutputArchive::new();
		self.save::<Json>(&mut out)?;
		Ok(out.into_string(pretty)?)
	}

	pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
		let mut input = JsonInputArchive::parse(text)?;
		Self::finish_json(Self::load::<Json>(&mut input)?, &input)
	}

	pub fn write_json<W: io::Write>(&self, writer: W, pretty: bool) -> Result<(), RegistryError> {
		let mut out = JsonOutputArchive::new();
		self.save::<Json>(&mut out)?;
		out.write_to(writer, pretty)?;
		Ok(())
	}

	pub fn read_json<R: io::Read>(reader: R) -> Result<Self, RegistryError> {
		let mut input = JsonInputArchive::from_reader(reader)?;
		Self::finish_json(Self::load::<Json>(&mut input)?, &input)
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, RegistryError> {
		let mut out = BinaryOutputArchive::new();
		self.save::<Binary>(&mut out)?;
		Ok(out.into_bytes())
	}

	/// Loads a model from `bytes`, which must hold nothing after it.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, RegistryError> {
		let mut input = BinaryInputArchive::new(bytes);
		let model = Self::load::<Binary>(&mut input)?;
		if !input.is_exhausted() {
			return Err(ArchiveError::invalid(
				"layer_count",
				format!("{} trailing bytes after the last layer", input.remaining()),
			)
			.into());
		}
		Ok(model)
	}

	fn finish_json(model: Self, input: &JsonInputArchive) -> Result<Self, RegistryError> {
		if input.remaining() > 0 {
			tracing::warn!(
				model = %model.name,
				extra = input.remaining(),
				"ignoring records after the model"
			);
		}
		Ok(model)
	}
}
