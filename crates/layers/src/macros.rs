//! Registration macros for layer serializers.

/// Declares a layer's serializer under a wire name.
///
/// The declaration is collected at link time and applied when a format's
/// registry is first built; nothing runs before `main`.
///
/// ```ignore
/// layer_serializer!(Dense, "fully_connected");
/// ```
///
/// With `activations`, the layer must be generic over one
/// [`Activation`](crate::activation::Activation) and is declared once per
/// kind, named `name<activation>`:
///
/// ```ignore
/// // registers "conv<tan_h>", "conv<softmax>", ..., "conv<tan_hp1m2>"
/// layer_serializer!(Convolutional, "conv", activations);
/// ```
#[macro_export]
macro_rules! layer_serializer {
	(@each $ty:ident, $name:literal, [$($act:ident => $act_name:literal),* $(,)?]) => {
		$(
			$crate::layer_serializer!(
				$ty<$crate::activation::$act>,
				concat!($name, "<", $act_name, ">")
			);
		)*
	};
	// Same kinds, in the same order, as `activation.rs`.
	($ty:ident, $name:literal, activations) => {
		$crate::layer_serializer!(@each $ty, $name, [
			TanH => "tan_h",
			Softmax => "softmax",
			Identity => "identity",
			Sigmoid => "sigmoid",
			Relu => "relu",
			LeakyRelu => "leaky_relu",
			Elu => "elu",
			TanHp1m2 => "tan_hp1m2",
		]);
	};
	($ty:ty, $name:expr) => {
		$crate::inventory::submit! {
			$crate::LayerSerializerReg::new::<$ty>($name)
		}
	};
}
