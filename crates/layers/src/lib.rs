//! Layer types with self-registering serializers.
//!
//! Each concrete layer implements [`Persist`](synapse_archive::Persist) for
//! its own fields and declares its wire name with [`layer_serializer!`].
//! Save and load call sites only handle `Arc<dyn Layer>`: the process-wide
//! [`registry`] for a format resolves the concrete type from the `"type"` tag
//! of each record.
//!
//! ```ignore
//! let model = Sequential::new("mnist")
//! 	.with(Convolutional::<Relu>::new(ConvParams::square(28, 5, 1, 6))?)
//! 	.with(Dense::new(3456, 10)?);
//! let text = model.to_json_string(true)?;
//! let back = Sequential::from_json_str(&text)?;
//! ```

pub mod activation;
mod error;
mod layer;
pub mod layers;
mod macros;
mod model;
mod registration;

pub use error::LayerError;
#[doc(hidden)]
pub use inventory;
pub use layer::{Layer, LayerKind, Shape3};
pub use layers::{
	ConvParams, Convolutional, Dense, Dropout, MaxPool, Padding, Phase, PoolParams,
};
pub use model::Sequential;
pub use registration::{
	LayerFormat, LayerSerializerReg, Registrar, build_registry, init_registry, register_all,
	registry,
};
