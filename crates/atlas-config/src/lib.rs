//! Configuration loading with environment variable overrides.
//!
//! Defaults carry the public explorer endpoints, a TOML file overrides
//! the defaults (a `[platforms]` table is authoritative when present),
//! and `ATLAS_*` environment variables override the file. A platform
//! whose API base URL ends up absent or empty is disabled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Unreadable {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("failed to parse config: {0}")]
	Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
	/// Address the HTTP server binds to.
	pub bind: String,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind: "0.0.0.0:8420".to_string(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinsConfig {
	/// Path to the coin descriptor file.
	pub file: PathBuf,
}

impl Default for CoinsConfig {
	fn default() -> Self {
		Self {
			file: PathBuf::from("coins.yml"),
		}
	}
}

/// Per-platform settings, keyed by handle in the `[platforms]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
	/// Explorer API base URL. Empty disables the platform.
	pub api: String,
	/// Upstream request timeout in milliseconds.
	pub timeout_ms: Option<u64>,
}

/// Settings consumed only by the external block observer. This core
/// parses and passes them through without interpreting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
	/// Persistent store connection string for last-seen heights.
	pub redis: String,
	/// Minimum polling interval in milliseconds.
	pub min_poll_ms: u64,
	/// Backlog time horizon in seconds.
	pub backlog_secs: u64,
	/// Maximum number of backlog blocks fetched in one catch-up.
	pub backlog_max_blocks: u64,
	/// Concurrent stream connection cap.
	pub stream_conns: u32,
}

impl Default for ObserverConfig {
	fn default() -> Self {
		Self {
			redis: "redis://localhost:6379".to_string(),
			min_poll_ms: 250,
			backlog_secs: 3 * 3600,
			backlog_max_blocks: 200,
			stream_conns: 16,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	pub server: ServerConfig,
	pub coins: CoinsConfig,
	pub platforms: HashMap<String, PlatformConfig>,
	pub observer: ObserverConfig,
}

impl Default for Config {
	fn default() -> Self {
		// Platforms with public explorer endpoints are enabled out of
		// the box, matching the shipped deployment.
		let defaults = [
			("binance", "https://explorer.binance.org/api/v1"),
			("stellar", "https://horizon.stellar.org"),
			("kin", "https://horizon.kinfederation.com"),
		];
		let platforms = defaults
			.into_iter()
			.map(|(handle, api)| {
				(
					handle.to_string(),
					PlatformConfig {
						api: api.to_string(),
						timeout_ms: None,
					},
				)
			})
			.collect();
		Self {
			server: ServerConfig::default(),
			coins: CoinsConfig::default(),
			platforms,
			observer: ObserverConfig::default(),
		}
	}
}

impl Config {
	/// Returns the API base URL for a handle, or `None` when the
	/// platform is not configured or its URL is empty (disabled).
	pub fn api_url(&self, handle: &str) -> Option<&str> {
		self.platforms
			.get(handle)
			.map(|p| p.api.trim())
			.filter(|api| !api.is_empty())
	}

	pub fn platform(&self, handle: &str) -> Option<&PlatformConfig> {
		self.platforms.get(handle)
	}
}

/// Loads configuration in layers: defaults, optional TOML file,
/// `ATLAS_*` environment overrides.
#[derive(Debug, Default)]
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn load(&self) -> Result<Config, ConfigError> {
		let mut config = match &self.file_path {
			Some(path) => {
				info!(path = %path.display(), "Loading config file");
				let contents =
					std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
						path: path.clone(),
						source,
					})?;
				toml::from_str(&contents)?
			}
			None => {
				info!("Running without config file");
				Config::default()
			}
		};

		apply_env_overrides(&mut config);
		Ok(config)
	}
}

/// Applies `ATLAS_*` overrides: `ATLAS_BIND`, `ATLAS_COINS_FILE`, and
/// `ATLAS_<HANDLE>_API` for platform base URLs.
fn apply_env_overrides(config: &mut Config) {
	if let Ok(bind) = std::env::var("ATLAS_BIND") {
		debug!("Overriding server bind from environment");
		config.server.bind = bind;
	}
	if let Ok(file) = std::env::var("ATLAS_COINS_FILE") {
		debug!("Overriding coin file from environment");
		config.coins.file = PathBuf::from(file);
	}
	for (key, value) in std::env::vars() {
		let Some(rest) = key.strip_prefix("ATLAS_") else {
			continue;
		};
		let Some(handle) = rest.strip_suffix("_API") else {
			continue;
		};
		if handle.is_empty() {
			continue;
		}
		let handle = handle.to_ascii_lowercase();
		debug!(%handle, "Overriding platform API URL from environment");
		config.platforms.entry(handle).or_default().api = value;
	}
}
