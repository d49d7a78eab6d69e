use synapse_archive::ArchiveError;
use thiserror::Error;

/// A layer parameter that violates the layer's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {layer} parameter `{field}`: {reason}")]
pub struct LayerError {
	pub layer: &'static str,
	pub field: &'static str,
	pub reason: String,
}

impl LayerError {
	pub(crate) fn new(layer: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
		Self {
			layer,
			field,
			reason: reason.into(),
		}
	}
}

impl From<LayerError> for ArchiveError {
	fn from(err: LayerError) -> Self {
		ArchiveError::invalid(err.field, err.reason)
	}
}

/// Fails unless `value` is non-zero.
pub(crate) fn positive(layer: &'static str, field: &'static str, value: usize) -> Result<(), LayerError> {
	if value == 0 {
		return Err(LayerError::new(layer, field, "must be greater than zero"));
	}
	Ok(())
}
