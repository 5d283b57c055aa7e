use std::path::PathBuf;

use stratum_primitives::ZIndex;
use thiserror::Error;

/// Errors returned by store mutations.
///
/// A failed call never leaves a partial change behind: both indexes are exactly
/// as they were before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
	/// Every slot from `requested` up to `ZIndex::MAX` is taken, so nothing can
	/// be displaced to make room, or there is no successor to the highest slot.
	#[error("no free stack position at or above z={requested}")]
	CapacityExceeded {
		/// The z-index the caller asked for, or the successor that was needed.
		requested: ZIndex,
	},
}

/// Errors raised while loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
	/// Reading the config file failed.
	#[error("failed to read {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},
	/// The file is not valid TOML or has unexpected keys.
	#[error("invalid store config: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Result alias for store mutations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
