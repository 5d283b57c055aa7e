use std::path::Path;

use serde::Deserialize;
use stratum_primitives::ZIndex;

use crate::error::ConfigError;

/// Tuning knobs for a [`WidgetStore`](crate::WidgetStore).
///
/// ```toml
/// initial-capacity = 20000
/// base-z = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StoreConfig {
	/// Number of widgets the id index is sized for up front.
	pub initial_capacity: usize,
	/// Stack position handed to the first widget created without an explicit z.
	pub base_z: ZIndex,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			initial_capacity: 1000,
			base_z: 0,
		}
	}
}

impl StoreConfig {
	/// Parses a TOML document. Missing keys keep their defaults.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}
}
