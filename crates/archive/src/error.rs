use thiserror::Error;

/// Errors raised while reading or writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
	/// A labeled field was not present in the current node.
	#[error("missing field `{label}`")]
	MissingField { label: String },
	/// A field was written or read while no node was open.
	#[error("field `{label}` accessed outside of an open node")]
	NoOpenNode { label: String },
	/// `finish_node` was called without a matching `start_node`.
	#[error("finish_node without a matching start_node")]
	UnbalancedNode,
	/// Nodes were still open when the archive was finished.
	#[error("{open} node(s) still open")]
	UnclosedNodes { open: usize },
	/// `start_node` was called after the last record was consumed.
	#[error("no more records in archive")]
	EndOfRecords,
	/// A record or child node was not a JSON object.
	#[error("expected an object, found {found}")]
	NotAnObject { found: &'static str },
	/// A JSON field did not decode into the requested type.
	#[error("invalid value for field `{label}`: {source}")]
	Json {
		label: String,
		#[source]
		source: serde_json::Error,
	},
	/// The JSON document itself could not be parsed or emitted.
	#[error("malformed json document: {0}")]
	Document(#[source] serde_json::Error),
	/// The binary codec failed, typically on truncated input.
	#[error("binary codec error: {0}")]
	Binary(#[from] postcard::Error),
	/// A decoded value violates an invariant of the type being constructed.
	#[error("invalid value for field `{label}`: {reason}")]
	Invalid { label: &'static str, reason: String },
	/// Underlying reader or writer failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl ArchiveError {
	/// Convenience constructor for [`ArchiveError::Invalid`].
	pub fn invalid(label: &'static str, reason: impl Into<String>) -> Self {
		Self::Invalid {
			label,
			reason: reason.into(),
		}
	}
}
