//! Activation kinds.
//!
//! Activations carry no state here; they only select the wire name a
//! parameterized layer is registered under, e.g. `conv<relu>`.

use std::fmt::Debug;

/// Marker for one activation kind.
pub trait Activation: Debug + Default + Clone + Copy + PartialEq + Eq + Send + Sync + 'static {
	/// Name used inside the angle brackets of a layer's wire name.
	const NAME: &'static str;
}

macro_rules! activations {
	($($(#[$meta:meta])* $ty:ident => $name:literal),* $(,)?) => {
		$(
			$(#[$meta])*
			#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
			pub struct $ty;

			impl Activation for $ty {
				const NAME: &'static str = $name;
			}
		)*

		/// Every activation name, in registration order.
		pub const NAMES: &[&str] = &[$($name),*];
	};
}

activations! {
	/// Hyperbolic tangent.
	TanH => "tan_h",
	Softmax => "softmax",
	Identity => "identity",
	Sigmoid => "sigmoid",
	/// Rectified linear unit.
	Relu => "relu",
	LeakyRelu => "leaky_relu",
	/// Exponential linear unit.
	Elu => "elu",
	/// Hyperbolic tangent rescaled to `[0, 1]`.
	TanHp1m2 => "tan_hp1m2",
}
