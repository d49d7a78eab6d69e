use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use synapse_archive::{ArchiveError, InputArchive, OutputArchive, Persist};

use crate::activation::Activation;
use crate::error::{LayerError, positive};
use crate::layer::{Layer, LayerKind, Shape3};

const NAME: &str = "conv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
	/// Only positions where the window fits entirely inside the input.
	#[default]
	Valid,
	/// Output keeps the input extent, divided by the stride.
	Same,
}

/// Geometry of a 2D convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvParams {
	pub in_width: usize,
	pub in_height: usize,
	pub window_width: usize,
	pub window_height: usize,
	pub in_channels: usize,
	pub out_channels: usize,
	pub padding: Padding,
	pub has_bias: bool,
	pub w_stride: usize,
	pub h_stride: usize,
}

impl ConvParams {
	/// Square input and window, unit stride, valid padding, with bias.
	pub const fn square(in_size: usize, window_size: usize, in_channels: usize, out_channels: usize) -> Self {
		Self {
			in_width: in_size,
			in_height: in_size,
			window_width: window_size,
			window_height: window_size,
			in_channels,
			out_channels,
			padding: Padding::Valid,
			has_bias: true,
			w_stride: 1,
			h_stride: 1,
		}
	}

	fn validate(&self) -> Result<(), LayerError> {
		positive(NAME, "in_width", self.in_width)?;
		positive(NAME, "in_height", self.in_height)?;
		positive(NAME, "window_width", self.window_width)?;
		positive(NAME, "window_height", self.window_height)?;
		positive(NAME, "in_channels", self.in_channels)?;
		positive(NAME, "out_channels", self.out_channels)?;
		positive(NAME, "w_stride", self.w_stride)?;
		positive(NAME, "h_stride", self.h_stride)?;
		if self.padding == Padding::Valid {
			if self.window_width > self.in_width {
				return Err(LayerError::new(NAME, "window_width", "window is wider than the input"));
			}
			if self.window_height > self.in_height {
				return Err(LayerError::new(NAME, "window_height", "window is taller than the input"));
			}
		}
		Ok(())
	}

	fn out_extent(&self, input: usize, window: usize, stride: usize) -> usize {
		match self.padding {
			Padding::Valid => (input - window) / stride + 1,
			Padding::Same => input.div_ceil(stride),
		}
	}
}

/// 2D convolution followed by activation `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convolutional<A: Activation> {
	params: ConvParams,
	_activation: PhantomData<A>,
}

impl<A: Activation> Convolutional<A> {
	pub fn new(params: ConvParams) -> Result<Self, LayerError> {
		params.validate()?;
		Ok(Self {
			params,
			_activation: PhantomData,
		})
	}

	pub fn params(&self) -> &ConvParams {
		&self.params
	}
}

impl<A: Activation> Layer for Convolutional<A> {
	fn kind(&self) -> LayerKind {
		LayerKind::Convolutional
	}

	fn in_shape(&self) -> Shape3 {
		let p = &self.params;
		Shape3::new(p.in_width, p.in_height, p.in_channels)
	}

	fn out_shape(&self) -> Shape3 {
		let p = &self.params;
		Shape3::new(
			p.out_extent(p.in_width, p.window_width, p.w_stride),
			p.out_extent(p.in_height, p.window_height, p.h_stride),
			p.out_channels,
		)
	}

	fn activation(&self) -> Option<&'static str> {
		Some(A::NAME)
	}
}

impl<A: Activation> Persist for Convolutional<A> {
	fn save<Ar: OutputArchive>(&self, ar: &mut Ar) -> Result<(), ArchiveError> {
		let p = &self.params;
		ar.write("in_width", &p.in_width)?;
		ar.write("in_height", &p.in_height)?;
		ar.write("window_width", &p.window_width)?;
		ar.write("window_height", &p.window_height)?;
		ar.write("in_channels", &p.in_channels)?;
		ar.write("out_channels", &p.out_channels)?;
		ar.write("padding", &p.padding)?;
		ar.write("has_bias", &p.has_bias)?;
		ar.write("w_stride", &p.w_stride)?;
		ar.write("h_stride", &p.h_stride)
	}

	fn load_and_construct<Ar: InputArchive>(ar: &mut Ar) -> Result<Self, ArchiveError> {
		let params = ConvParams {
			in_width: ar.read("in_width")?,
			in_height: ar.read("in_height")?,
			window_width: ar.read("window_width")?,
			window_height: ar.read("window_height")?,
			in_channels: ar.read("in_channels")?,
			out_channels: ar.read("out_channels")?,
			padding: ar.read("padding")?,
			has_bias: ar.read("has_bias")?,
			w_stride: ar.read("w_stride")?,
			h_stride: ar.read("h_stride")?,
		};
		Ok(Self::new(params)?)
	}
}

crate::layer_serializer!(Convolutional, "conv", activations);
