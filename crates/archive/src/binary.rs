//! Flat binary archive backed by postcard.
//!
//! Fields are appended in write order with no labels and no record
//! delimiters, so a reader must request them in exactly the same order.

use std::io;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ArchiveError;
use crate::format::{InputArchive, OutputArchive};


/// Writer for the flat binary wire format.
#[derive(Debug, Default, Clone)]
pub struct BinaryOutputArchive {
	buf: Vec<u8>,
}

impl BinaryOutputArchive {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.buf
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.buf
	}

	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}
}

impl OutputArchive for BinaryOutputArchive {
	fn write<T: Serialize + ?Sized>(&mut self, _label: &str, value: &T) -> Result<(), ArchiveError> {
		let bytes = postcard::to_stdvec(value)?;
		self.buf.extend_from_slice(&bytes);
		Ok(())
	}
}

/// Reader for the flat binary wire format.
#[derive(Debug, Default, Clone)]
pub struct BinaryInputArchive {
	buf: Vec<u8>,
	pos: usize,
}

impl BinaryInputArchive {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			buf: bytes.into(),
			pos: 0,
		}
	}

	pub fn from_reader<R: io::Read>(mut reader: R) -> Result<Self, ArchiveError> {
		let mut buf = Vec::new();
		reader.read_to_end(&mut buf)?;
		Ok(Self::new(buf))
	}

	/// Bytes not yet consumed.
	pub fn remaining(&self) -> usize {
		self.buf.len() - self.pos
	}

	pub fn is_exhausted(&self) -> bool {
		self.remaining() == 0
	}
}

impl InputArchive for BinaryInputArchive {
	fn read<T: DeserializeOwned>(&mut self, _label: &str) -> Result<T, ArchiveError> {
		let (value, rest) = postcard::take_from_bytes::<T>(&self.buf[self.pos..])?;
		let unread = rest.len();
		self.pos = self.buf.len() - unread;
		Ok(value)
	}
}
