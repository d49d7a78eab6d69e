use std::any::Any;
use std::fmt::{self, Debug};

use synapse_serialization::Base;

/// Width, height and depth of a layer's input or output volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Shape3 {
	pub width: usize,
	pub height: usize,
	pub depth: usize,
}

impl Shape3 {
	pub const fn new(width: usize, height: usize, depth: usize) -> Self {
		Self {
			width,
			height,
			depth,
		}
	}

	/// A `size x 1 x 1` vector.
	pub const fn flat(size: usize) -> Self {
		Self::new(size, 1, 1)
	}

	pub const fn size(&self) -> usize {
		self.width * self.height * self.depth
	}
}

impl fmt::Display for Shape3 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}x{}", self.width, self.height, self.depth)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
	FullyConnected,
	Convolutional,
	MaxPool,
	Dropout,
}

impl fmt::Display for LayerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LayerKind::FullyConnected => write!(f, "fully-connected"),
			LayerKind::Convolutional => write!(f, "convolutional"),
			LayerKind::MaxPool => write!(f, "max-pool"),
			LayerKind::Dropout => write!(f, "dropout"),
		}
	}
}

/// Common supertype of every serializable layer.
///
/// Save and load call sites only see `dyn Layer`; the registry recovers the
/// concrete type through [`Base`].
pub trait Layer: Any + Send + Sync + Debug {
	fn kind(&self) -> LayerKind;

	fn in_shape(&self) -> Shape3;

	fn out_shape(&self) -> Shape3;

	/// Activation name for layers parameterized by one.
	fn activation(&self) -> Option<&'static str> {
		None
	}

	/// Rust type name of the concrete layer.
	fn concrete_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

impl dyn Layer {
	pub fn downcast_ref<T: Layer>(&self) -> Option<&T> {
		(self as &dyn Any).downcast_ref::<T>()
	}

	pub fn is<T: Layer>(&self) -> bool {
		(self as &dyn Any).is::<T>()
	}
}

impl Base for dyn Layer {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn type_name(&self) -> &'static str {
		self.concrete_name()
	}
}
