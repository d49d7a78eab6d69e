//! Shared insertion logic for the three registry tables.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::config::DuplicatePolicy;
use crate::error::RegistryError;

/// Which table a registration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
	/// Type name to loader.
	Loader,
	/// Type name to saver.
	Saver,
	/// Type identity to type name.
	TypeTag,
}

impl std::fmt::Display for TableKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TableKind::Loader => write!(f, "loader"),
			TableKind::Saver => write!(f, "saver"),
			TableKind::TypeTag => write!(f, "type-tag"),
		}
	}
}

/// Result of a successful insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAction {
	/// Key was new; entry inserted.
	InsertedNew,
	/// Key existed; the existing entry was kept.
	KeptExisting,
	/// Key existed; the new entry replaced it.
	ReplacedExisting,
}

/// Records a duplicate registration resolved by policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	pub table: TableKind,
	/// Type name, or the Rust type name for [`TableKind::TypeTag`].
	pub key: String,
	pub action: InsertAction,
}

/// Policy plus collision log shared by every table of one builder.
#[derive(Debug)]
pub(crate) struct Ledger {
	pub format: &'static str,
	pub policy: DuplicatePolicy,
	pub collisions: Vec<Collision>,
}

impl Ledger {
	pub fn new(format: &'static str, policy: DuplicatePolicy) -> Self {
		Self {
			format,
			policy,
			collisions: Vec::new(),
		}
	}

	/// Inserts `value` under `key`, resolving an occupied slot by policy.
	///
	/// `label` names the key in collisions and logs.
	pub fn insert<K: Eq + Hash, V>(
		&mut self,
		table: &mut FxHashMap<K, V>,
		kind: TableKind,
		key: K,
		label: &str,
		value: V,
	) -> Result<InsertAction, RegistryError> {
		let mut slot = match table.entry(key) {
			Entry::Vacant(slot) => {
				slot.insert(value);
				return Ok(InsertAction::InsertedNew);
			}
			Entry::Occupied(slot) => slot,
		};

		let action = match self.policy {
			DuplicatePolicy::LastWins => {
				slot.insert(value);
				InsertAction::ReplacedExisting
			}
			DuplicatePolicy::FirstWins => InsertAction::KeptExisting,
			DuplicatePolicy::Reject => {
				return Err(RegistryError::DuplicateName {
					table: kind,
					name: label.to_owned(),
				});
			}
		};

		tracing::warn!(
			format = self.format,
			table = %kind,
			key = label,
			?action,
			"duplicate serializer registration"
		);
		self.collisions.push(Collision {
			table: kind,
			key: label.to_owned(),
			action,
		});
		Ok(action)
	}
}
