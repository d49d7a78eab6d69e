//! CLI configuration.
//!
//! ```toml
//! [registry]
//! duplicates = "first-wins"
//!
//! [output]
//! pretty = true
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use synapse_serialization::RegistryConfig;


#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
	pub registry: RegistryConfig,
	pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
	/// Pretty-print JSON written by `convert`.
	pub pretty: bool,
}

impl CliConfig {
	pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
		toml::from_str(text).context("invalid config")
	}

	/// Reads `path` if given; otherwise defaults, with the registry section
	/// taken from [`RegistryConfig::from_env`].
	pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
		let Some(path) = path else {
			return Ok(Self {
				registry: RegistryConfig::from_env(),
				..Self::default()
			});
		};
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read config {}", path.display()))?;
		let config = Self::from_toml_str(&text)
			.with_context(|| format!("in {}", path.display()))?;
		tracing::debug!(path = %path.display(), ?config, "loaded config");
		Ok(config)
	}
}
