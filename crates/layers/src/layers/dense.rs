use synapse_archive::{ArchiveError, InputArchive, OutputArchive, Persist};

use crate::error::{LayerError, positive};
use crate::layer::{Layer, LayerKind, Shape3};

/// Fully connected layer mapping `in_size` inputs to `out_size` outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dense {
	in_size: usize,
	out_size: usize,
	has_bias: bool,
}

impl Dense {
	pub fn new(in_size: usize, out_size: usize) -> Result<Self, LayerError> {
		Self::with_bias(in_size, out_size, true)
	}

	pub fn with_bias(in_size: usize, out_size: usize, has_bias: bool) -> Result<Self, LayerError> {
		positive("fully_connected", "in_size", in_size)?;
		positive("fully_connected", "out_size", out_size)?;
		Ok(Self {
			in_size,
			out_size,
			has_bias,
		})
	}

	pub fn in_size(&self) -> usize {
		self.in_size
	}

	pub fn out_size(&self) -> usize {
		self.out_size
	}

	pub fn has_bias(&self) -> bool {
		self.has_bias
	}
}

impl Layer for Dense {
	fn kind(&self) -> LayerKind {
		LayerKind::FullyConnected
	}

	fn in_shape(&self) -> Shape3 {
		Shape3::flat(self.in_size)
	}

	fn out_shape(&self) -> Shape3 {
		Shape3::flat(self.out_size)
	}
}

impl Persist for Dense {
	fn save<A: OutputArchive>(&self, ar: &mut A) -> Result<(), ArchiveError> {
		ar.write("in_size", &self.in_size)?;
		ar.write("out_size", &self.out_size)?;
		ar.write("has_bias", &self.has_bias)
	}

	fn load_and_construct<A: InputArchive>(ar: &mut A) -> Result<Self, ArchiveError> {
		let in_size = ar.read("in_size")?;
		let out_size = ar.read("out_size")?;
		let has_bias = ar.read("has_bias")?;
		Ok(Self::with_bias(in_size, out_size, has_bias)?)
	}
}

crate::layer_serializer!(Dense, "fully_connected");
