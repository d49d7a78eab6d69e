use std::marker::PhantomData;

use synapse_archive::{ArchiveError, InputArchive, OutputArchive, Persist};

use crate::activation::Activation;
use crate::error::{LayerError, positive};
use crate::layer::{Layer, LayerKind, Shape3};

const NAME: &str = "max_pool";

/// Geometry of a 2D max-pooling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolParams {
	pub in_width: usize,
	pub in_height: usize,
	pub in_channels: usize,
	pub pool_size_x: usize,
	pub pool_size_y: usize,
	pub stride_x: usize,
	pub stride_y: usize,
}

impl PoolParams {
	/// Non-overlapping square pooling: stride equals the pool size.
	pub const fn square(in_size: usize, in_channels: usize, pool_size: usize) -> Self {
		Self {
			in_width: in_size,
			in_height: in_size,
			in_channels,
			pool_size_x: pool_size,
			pool_size_y: pool_size,
			stride_x: pool_size,
			stride_y: pool_size,
		}
	}

	fn validate(&self) -> Result<(), LayerError> {
		positive(NAME, "in_width", self.in_width)?;
		positive(NAME, "in_height", self.in_height)?;
		positive(NAME, "in_channels", self.in_channels)?;
		positive(NAME, "pool_size_x", self.pool_size_x)?;
		positive(NAME, "pool_size_y", self.pool_size_y)?;
		positive(NAME, "stride_x", self.stride_x)?;
		positive(NAME, "stride_y", self.stride_y)?;
		if self.pool_size_x > self.in_width {
			return Err(LayerError::new(NAME, "pool_size_x", "pool window is wider than the input"));
		}
		if self.pool_size_y > self.in_height {
			return Err(LayerError::new(NAME, "pool_size_y", "pool window is taller than the input"));
		}
		Ok(())
	}
}

/// Max pooling followed by activation `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool<A: Activation> {
	params: PoolParams,
	_activation: PhantomData<A>,
}

impl<A: Activation> MaxPool<A> {
	pub fn new(params: PoolParams) -> Result<Self, LayerError> {
		params.validate()?;
		Ok(Self {
			params,
			_activation: PhantomData,
		})
	}

	pub fn params(&self) -> &PoolParams {
		&self.params
	}
}

impl<A: Activation> Layer for MaxPool<A> {
	fn kind(&self) -> LayerKind {
		LayerKind::MaxPool
	}

	fn in_shape(&self) -> Shape3 {
		let p = &self.params;
		Shape3::new(p.in_width, p.in_height, p.in_channels)
	}

	fn out_shape(&self) -> Shape3 {
		let p = &self.params;
		Shape3::new(
			(p.in_width - p.pool_size_x) / p.stride_x + 1,
			(p.in_height - p.pool_size_y) / p.stride_y + 1,
			p.in_channels,
		)
	}

	fn activation(&self) -> Option<&'static str> {
		Some(A::NAME)
	}
}

impl<A: Activation> Persist for MaxPool<A> {
	fn save<Ar: OutputArchive>(&self, ar: &mut Ar) -> Result<(), ArchiveError> {
		let p = &self.params;
		ar.write("in_width", &p.in_width)?;
		ar.write("in_height", &p.in_height)?;
		ar.write("in_channels", &p.in_channels)?;
		ar.write("pool_size_x", &p.pool_size_x)?;
		ar.write("pool_size_y", &p.pool_size_y)?;
		ar.write("stride_x", &p.stride_x)?;
		ar.write("stride_y", &p.stride_y)
	}

	fn load_and_construct<Ar: InputArchive>(ar: &mut Ar) -> Result<Self, ArchiveError> {
		let params = PoolParams {
			in_width: ar.read("in_width")?,
			in_height: ar.read("in_height")?,
			in_channels: ar.read("in_channels")?,
			pool_size_x: ar.read("pool_size_x")?,
			pool_size_y: ar.read("pool_size_y")?,
			stride_x: ar.read("stride_x")?,
			stride_y: ar.read("stride_y")?,
		};
		Ok(Self::new(params)?)
	}
}

crate::layer_serializer!(MaxPool, "max_pool", activations);
