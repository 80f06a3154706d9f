//! Application configuration

use std::{
	fs,
	path::{Path, PathBuf},
};

use pq_utils::error::FileIOError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{default_data_dir, ConfigError, CONFIG_FILE_NAME};
use crate::ops::search::input::MAX_LIMIT;

pub const MAPBOX_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
pub const FIREBASE_API_KEY_ENV: &str = "FIREBASE_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
	/// Config schema version
	pub version: u32,

	/// Data directory path
	pub data_dir: PathBuf,

	/// Logging level
	pub log_level: String,

	/// Whether logs are also appended to `logs/plaques.log`
	#[serde(default)]
	pub log_to_file: bool,

	/// Plaque dataset; `<data_dir>/plaque_data.json` when unset
	#[serde(default)]
	pub dataset_path: Option<PathBuf>,

	#[serde(default)]
	pub search: SearchConfig,

	#[serde(default)]
	pub routing: RoutingConfig,

	#[serde(default)]
	pub firebase: FirebaseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
	pub max_results: usize,
	pub debounce_ms: u64,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			max_results: 10,
			debounce_ms: 300,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
	/// Without a token every route is a straight-line estimate
	#[serde(default)]
	pub mapbox_token: Option<String>,
	pub api_url: String,
	/// Pause between consecutive Directions API calls
	pub request_delay_ms: u64,
	pub cache_capacity: usize,
	/// Used for estimated durations
	pub walking_speed_kmh: f64,
}

impl Default for RoutingConfig {
	fn default() -> Self {
		Self {
			mapbox_token: None,
			api_url: pq_directions::DEFAULT_API_URL.to_string(),
			request_delay_ms: 300,
			cache_capacity: 100,
			walking_speed_kmh: 5.0,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirebaseConfig {
	#[serde(default)]
	pub api_key: Option<String>,
	pub auth_url: String,
}

impl Default for FirebaseConfig {
	fn default() -> Self {
		Self {
			api_key: None,
			auth_url: "https://identitytoolkit.googleapis.com".to_string(),
		}
	}
}

impl AppConfig {
	/// Load configuration from the default location
	pub fn load() -> Result<Self, ConfigError> {
		let data_dir = default_data_dir()?;
		Self::load_from(&data_dir)
	}

	/// Load configuration from a specific data directory, creating a default
	/// one if none exists yet
	pub fn load_from(data_dir: &Path) -> Result<Self, ConfigError> {
		let config_path = data_dir.join(CONFIG_FILE_NAME);

		let mut config = if config_path.exists() {
			info!("Loading config from {:?}", config_path);
			let json = fs::read_to_string(&config_path)
				.map_err(|e| FileIOError::from_std_io_err(&config_path, e))?;
			let mut config: AppConfig = serde_json::from_str(&json)?;
			config.data_dir = data_dir.to_path_buf();

			if config.version < Self::target_version() {
				info!(
					"Migrating config from v{} to v{}",
					config.version,
					Self::target_version()
				);
				config.migrate();
				config.save()?;
			}

			config
		} else {
			warn!("No config found, creating default at {:?}", config_path);
			let config = Self::default_with_dir(data_dir.to_path_buf());
			config.save()?;
			config
		};

		config.apply_overrides(|key| std::env::var(key).ok());
		config.validate()?;
		Ok(config)
	}

	/// Create default configuration with specific data directory
	pub fn default_with_dir(data_dir: PathBuf) -> Self {
		Self {
			version: Self::target_version(),
			data_dir,
			log_level: "info".to_string(),
			log_to_file: false,
			dataset_path: None,
			search: SearchConfig::default(),
			routing: RoutingConfig::default(),
			firebase: FirebaseConfig::default(),
		}
	}

	pub fn target_version() -> u32 {
		2 // Routing and Firebase sections
	}

	/// Sections added since the file was written take their defaults through
	/// serde, so only the version needs bumping
	fn migrate(&mut self) {
		self.version = Self::target_version();
	}

	/// Secrets may come from the environment instead of the config file
	pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
		if let Some(token) = lookup(MAPBOX_TOKEN_ENV).filter(|t| !t.is_empty()) {
			debug!("Using Mapbox token from {MAPBOX_TOKEN_ENV}");
			self.routing.mapbox_token = Some(token);
		}
		if let Some(key) = lookup(FIREBASE_API_KEY_ENV).filter(|k| !k.is_empty()) {
			debug!("Using Firebase API key from {FIREBASE_API_KEY_ENV}");
			self.firebase.api_key = Some(key);
		}
	}

	/// Rejects values the search and routing services can't work with
	pub fn validate(&self) -> Result<(), ConfigError> {
		let invalid = |field: &'static str, reason: String| -> Result<(), ConfigError> {
			Err(ConfigError::Invalid { field, reason })
		};

		let speed = self.routing.walking_speed_kmh;
		if !speed.is_finite() || speed <= 0.0 {
			return invalid(
				"routing.walking_speed_kmh",
				format!("must be a positive number, got {speed}"),
			);
		}
		if self.routing.cache_capacity == 0 {
			return invalid("routing.cache_capacity", "must be at least 1".to_string());
		}
		if !(1..=MAX_LIMIT).contains(&self.search.max_results) {
			return invalid(
				"search.max_results",
				format!(
					"must be between 1 and {MAX_LIMIT}, got {}",
					self.search.max_results
				),
			);
		}

		Ok(())
	}

	/// Save configuration to disk
	pub fn save(&self) -> Result<(), ConfigError> {
		fs::create_dir_all(&self.data_dir)
			.map_err(|e| FileIOError::from_std_io_err(&self.data_dir, e))?;

		let config_path = self.data_dir.join(CONFIG_FILE_NAME);
		let json = serde_json::to_string_pretty(self)?;
		fs::write(&config_path, json).map_err(|e| FileIOError::from_std_io_err(&config_path, e))?;
		info!("Saved config to {:?}", config_path);
		Ok(())
	}

	pub fn dataset_path(&self) -> PathBuf {
		self.dataset_path
			.clone()
			.unwrap_or_else(|| self.data_dir.join("plaque_data.json"))
	}

	/// Get the path for logs directory
	pub fn logs_dir(&self) -> PathBuf {
		self.data_dir.join("logs")
	}

	/// Get the path for the document store
	pub fn store_dir(&self) -> PathBuf {
		self.data_dir.join("store")
	}

	pub fn session_path(&self) -> PathBuf {
		self.data_dir.join("session.json")
	}

	/// Ensure all required directories exist
	pub fn ensure_directories(&self) -> Result<(), ConfigError> {
		for dir in [self.data_dir.clone(), self.logs_dir(), self.store_dir()] {
			fs::create_dir_all(&dir).map_err(|e| FileIOError::from_std_io_err(&dir, e))?;
		}
		Ok(())
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		let data_dir = default_data_dir().unwrap_or_else(|_| PathBuf::from("."));
		Self::default_with_dir(data_dir)
	}
}
