//! Registry configuration.
//!
//! Read from the `[registry]` table of a TOML document:
//!
//! ```toml
//! [registry]
//! duplicates = "reject"
//! ```
//!
//! Other tables in the same document are ignored, so the registry section can
//! live inside a larger application config.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// How a second registration under an existing key is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// Overwrite with the later registration and record a collision.
	#[default]
	LastWins,
	/// Keep the earlier registration and record a collision.
	FirstWins,
	/// Fail the registration with [`RegistryError::DuplicateName`](crate::RegistryError::DuplicateName).
	Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	pub duplicates: DuplicatePolicy,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
	#[serde(default)]
	registry: RegistryConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("invalid registry config: {0}")]
	Parse(#[from] toml::de::Error),
}

impl RegistryConfig {
	/// Environment variable naming a config file for [`from_env`](Self::from_env).
	pub const ENV_VAR: &'static str = "SYNAPSE_REGISTRY_CONFIG";

	pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
		self.duplicates = policy;
		self
	}

	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let document: ConfigDocument = toml::from_str(text)?;
		Ok(document.registry)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}

	/// Loads the file named by [`ENV_VAR`](Self::ENV_VAR), falling back to
	/// defaults when unset or unreadable.
	pub fn from_env() -> Self {
		let Some(path) = std::env::var_os(Self::ENV_VAR) else {
			return Self::default();
		};
		match Self::from_path(&path) {
			Ok(config) => {
				tracing::debug!(path = ?path, ?config, "loaded registry config");
				config
			}
			Err(error) => {
				tracing::warn!(path = ?path, %error, "ignoring registry config");
				Self::default()
			}
		}
	}
}
