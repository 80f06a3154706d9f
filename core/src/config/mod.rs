//! Application configuration management

use std::{fs, path::PathBuf};

use pq_utils::error::FileIOError;
use thiserror::Error;

pub mod app_config;

pub use app_config::{AppConfig, FirebaseConfig, RoutingConfig, SearchConfig};

pub const CONFIG_FILE_NAME: &str = "plaques.json";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("could not determine data directory")]
	NoDataDir,
	#[error("invalid config file: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("invalid config value for '{field}': {reason}")]
	Invalid { field: &'static str, reason: String },
	#[error(transparent)]
	FileIO(#[from] FileIOError),
}

/// Platform-specific data directory resolution
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
	#[cfg(target_os = "linux")]
	let dir = dirs::data_local_dir()
		.ok_or(ConfigError::NoDataDir)?
		.join("plaques");

	#[cfg(not(target_os = "linux"))]
	let dir = dirs::data_dir()
		.ok_or(ConfigError::NoDataDir)?
		.join("Plaques");

	// Create directory if it doesn't exist
	fs::create_dir_all(&dir).map_err(|e| FileIOError::from_std_io_err(&dir, e))?;

	Ok(dir)
}
