//! Nested JSON archive.
//!
//! A document is an array of top-level records. Each record is one object
//! opened by `start_node` and closed by `finish_node`; fields are written into
//! the innermost open object in insertion order. A node opened while another
//! is open becomes a positional child of its parent under `value0`, `value1`,
//! and so on.

use std::collections::VecDeque;
use std::io;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ArchiveError;
use crate::format::{InputArchive, OutputArchive};

#[cfg(test)]
mod tests;

#[derive(Debug, Default)]
struct Node {
	fields: Map<String, Value>,
	children: usize,
}

impl Node {
	fn new(fields: Map<String, Value>) -> Self {
		Self {
			fields,
			children: 0,
		}
	}

	fn next_child_key(&mut self) -> String {
		let key = format!("value{}", self.children);
		self.children += 1;
		key
	}
}

fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// Writer for the nested JSON wire format.
#[derive(Debug, Default)]
pub struct JsonOutputArchive {
	open: Vec<Node>,
	records: Vec<Value>,
}

impl JsonOutputArchive {
	pub fn new() -> Self {
		Self::default()
	}

	/// Completed top-level records.
	pub fn records(&self) -> &[Value] {
		&self.records
	}

	/// Number of currently open nodes.
	pub fn depth(&self) -> usize {
		self.open.len()
	}

	/// Finishes the document and returns it as an array of records.
	pub fn into_value(self) -> Result<Value, ArchiveError> {
		if !self.open.is_empty() {
			return Err(ArchiveError::UnclosedNodes {
				open: self.open.len(),
			});
		}
		Ok(Value::Array(self.records))
	}

	/// Finishes the document and renders it.
	pub fn into_string(self, pretty: bool) -> Result<String, ArchiveError> {
		let value = self.into_value()?;
		let rendered = if pretty {
			serde_json::to_string_pretty(&value)
		} else {
			serde_json::to_string(&value)
		};
		rendered.map_err(ArchiveError::Document)
	}

	/// Finishes the document and writes it to `writer`.
	pub fn write_to<W: io::Write>(self, writer: W, pretty: bool) -> Result<(), ArchiveError> {
		let value = self.into_value()?;
		let written = if pretty {
			serde_json::to_writer_pretty(writer, &value)
		} else {
			serde_json::to_writer(writer, &value)
		};
		written.map_err(ArchiveError::Document)
	}
}

impl OutputArchive for JsonOutputArchive {
	fn start_node(&mut self) -> Result<(), ArchiveError> {
		self.open.push(Node::default());
		Ok(())
	}

	fn finish_node(&mut self) -> Result<(), ArchiveError> {
		let node = self.open.pop().ok_or(ArchiveError::UnbalancedNode)?;
		let value = Value::Object(node.fields);
		match self.open.last_mut() {
			Some(parent) => {
				let key = parent.next_child_key();
				parent.fields.insert(key, value);
			}
			None => self.records.push(value),
		}
		Ok(())
	}

	fn write<T: Serialize + ?Sized>(&mut self, label: &str, value: &T) -> Result<(), ArchiveError> {
		let node = self.open.last_mut().ok_or_else(|| ArchiveError::NoOpenNode {
			label: label.to_owned(),
		})?;
		let value = serde_json::to_value(value).map_err(|source| ArchiveError::Json {
			label: label.to_owned(),
			source,
		})?;
		node.fields.insert(label.to_owned(), value);
		Ok(())
	}
}

/// Reader for the nested JSON wire format.
#[derive(Debug, Default)]
pub struct JsonInputArchive {
	records: VecDeque<Value>,
	open: Vec<Node>,
}

impl JsonInputArchive {
	/// Accepts either an array of records or a single record object.
	pub fn from_value(value: Value) -> Result<Self, ArchiveError> {
		let records = match value {
			Value::Array(items) => items.into(),
			record @ Value::Object(_) => VecDeque::from([record]),
			other => {
				return Err(ArchiveError::NotAnObject {
					found: kind_of(&other),
				});
			}
		};
		Ok(Self {
			records,
			open: Vec::new(),
		})
	}

	pub fn parse(text: &str) -> Result<Self, ArchiveError> {
		let value = serde_json::from_str(text).map_err(ArchiveError::Document)?;
		Self::from_value(value)
	}

	pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, ArchiveError> {
		let value = serde_json::from_reader(reader).map_err(ArchiveError::Document)?;
		Self::from_value(value)
	}

	/// Number of top-level records not yet entered.
	pub fn remaining(&self) -> usize {
		self.records.len()
	}
}

impl InputArchive for JsonInputArchive {
	fn start_node(&mut self) -> Result<(), ArchiveError> {
		let value = match self.open.last_mut() {
			Some(parent) => {
				let key = parent.next_child_key();
				parent
					.fields
					.remove(&key)
					.ok_or(ArchiveError::MissingField { label: key })?
			}
			None => self.records.pop_front().ok_or(ArchiveError::EndOfRecords)?,
		};
		match value {
			Value::Object(fields) => {
				self.open.push(Node::new(fields));
				Ok(())
			}
			other => Err(ArchiveError::NotAnObject {
				found: kind_of(&other),
			}),
		}
	}

	fn finish_node(&mut self) -> Result<(), ArchiveError> {
		let node = self.open.pop().ok_or(ArchiveError::UnbalancedNode)?;
		if !node.fields.is_empty() {
			tracing::trace!(
				unread = ?node.fields.keys().collect::<Vec<_>>(),
				"closing json node with unread fields"
			);
		}
		Ok(())
	}

	fn read<T: DeserializeOwned>(&mut self, label: &str) -> Result<T, ArchiveError> {
		let node = self.open.last_mut().ok_or_else(|| ArchiveError::NoOpenNode {
			label: label.to_owned(),
		})?;
		let value = node
			.fields
			.remove(label)
			.ok_or_else(|| ArchiveError::MissingField {
				label: label.to_owned(),
			})?;
		serde_json::from_value(value).map_err(|source| ArchiveError::Json {
			label: label.to_owned(),
			source,
		})
	}
}
