use serde::{Deserialize, Serialize};
use synapse_archive::{ArchiveError, InputArchive, OutputArchive, Persist};

use crate::error::{LayerError, positive};
use crate::layer::{Layer, LayerKind, Shape3};

/// Network phase a dropout layer was saved in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	#[default]
	Train,
	Test,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropout {
	in_size: usize,
	dropout_rate: f32,
	phase: Phase,
}

impl Dropout {
	pub fn new(in_size: usize, dropout_rate: f32) -> Result<Self, LayerError> {
		Self::with_phase(in_size, dropout_rate, Phase::default())
	}

	pub fn with_phase(in_size: usize, dropout_rate: f32, phase: Phase) -> Result<Self, LayerError> {
		positive("dropout", "in_size", in_size)?;
		if !(0.0..1.0).contains(&dropout_rate) {
			return Err(LayerError::new(
				"dropout",
				"dropout_rate",
				format!("{dropout_rate} is outside [0, 1)"),
			));
		}
		Ok(Self {
			in_size,
			dropout_rate,
			phase,
		})
	}

	pub fn in_size(&self) -> usize {
		self.in_size
	}

	pub fn dropout_rate(&self) -> f32 {
		self.dropout_rate
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}
}

impl Layer for Dropout {
	fn kind(&self) -> LayerKind {
		LayerKind::Dropout
	}

	fn in_shape(&self) -> Shape3 {
		Shape3::flat(self.in_size)
	}

	fn out_shape(&self) -> Shape3 {
		Shape3::flat(self.in_size)
	}
}

impl Persist for Dropout {
	fn save<A: OutputArchive>(&self, ar: &mut A) -> Result<(), ArchiveError> {
		ar.write("in_size", &self.in_size)?;
		ar.write("dropout_rate", &self.dropout_rate)?;
		ar.write("phase", &self.phase)
	}

	fn load_and_construct<A: InputArchive>(ar: &mut A) -> Result<Self, ArchiveError> {
		let in_size = ar.read("in_size")?;
		let dropout_rate = ar.read("dropout_rate")?;
		let phase = ar.read("phase")?;
		Ok(Self::with_phase(in_size, dropout_rate, phase)?)
	}
}

crate::layer_serializer!(Dropout, "dropout");
