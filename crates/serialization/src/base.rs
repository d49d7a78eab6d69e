use std::any::Any;

/// Registry view of the common supertype of all registered types.
///
/// Implemented for the trait object of a base trait, typically by upcasting:
///
/// ```
/// use std::any::Any;
///
/// use synapse_serialization::Base;
///
/// trait Shape: Any + Send + Sync {}
///
/// impl Base for dyn Shape {
/// 	fn as_any(&self) -> &dyn Any {
/// 		self
/// 	}
///
/// 	fn type_name(&self) -> &'static str {
/// 		"shape"
/// 	}
/// }
/// ```
pub trait Base: Send + Sync + 'static {
	/// Returns the value as `Any` so savers can downcast to the concrete type.
	fn as_any(&self) -> &dyn Any;

	/// Rust type name of the concrete value, for diagnostics.
	fn type_name(&self) -> &'static str;
}
