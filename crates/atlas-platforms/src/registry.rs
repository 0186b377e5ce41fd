//! Build-once registry of active platforms.
//!
//! Construction walks the static registration list, derives each
//! adapter's configuration key from its coin handle, skips platforms
//! with no configured API URL, and fails on duplicate handles or
//! adapter initialization errors. The finished registry is read-only;
//! the serving layer shares it behind an `Arc` with no further locking.

use crate::implementations::{binance, stellar};
use atlas_coins::{Coin, CoinList};
use atlas_config::Config;
use atlas_types::{BlockApi, Capabilities, PlatformError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Settings handed to an adapter constructor.
#[derive(Debug, Clone)]
pub struct AdapterSettings {
	pub api_url: String,
	pub timeout: Duration,
}

/// One statically known adapter: the coin it serves and its constructor.
pub struct Registration {
	pub coin_id: u32,
	pub build: fn(Coin, &AdapterSettings) -> Result<Capabilities, PlatformError>,
}

/// The compiled list of adapters this build knows about.
pub fn registrations() -> Vec<Registration> {
	vec![
		binance::registration(),
		stellar::registration(stellar::XLM),
		stellar::registration(stellar::KIN),
	]
}

#[derive(Error, Debug)]
pub enum RegistryError {
	#[error("no coin descriptor for coin id {0}")]
	MissingCoin(u32),

	#[error("duplicate platform handle {0:?}")]
	DuplicateHandle(String),

	#[error("failed to initialize platform {handle:?}: {source}")]
	Init {
		handle: String,
		source: PlatformError,
	},
}

/// One registered platform: its coin metadata and capability record.
#[derive(Clone)]
pub struct PlatformEntry {
	pub coin: Coin,
	pub capabilities: Capabilities,
}

/// Read-only index of active platforms by handle and by capability.
pub struct PlatformRegistry {
	platforms: HashMap<String, PlatformEntry>,
	block_apis: HashMap<String, Arc<dyn BlockApi>>,
}

impl PlatformRegistry {
	/// Creates an empty registry. Registration happens once during
	/// startup; afterwards the registry is only read.
	pub fn new() -> Self {
		Self {
			platforms: HashMap::new(),
			block_apis: HashMap::new(),
		}
	}

	/// Builds the registry from the compiled adapter list. Called once
	/// by the startup sequence; any error here aborts startup.
	pub fn build(coins: &CoinList, config: &Config) -> Result<Self, RegistryError> {
		Self::from_registrations(registrations(), coins, config)
	}

	fn from_registrations(
		registrations: Vec<Registration>,
		coins: &CoinList,
		config: &Config,
	) -> Result<Self, RegistryError> {
		let mut registry = Self::new();

		for registration in registrations {
			let coin = coins
				.by_id(registration.coin_id)
				.ok_or(RegistryError::MissingCoin(registration.coin_id))?
				.clone();
			let handle = coin.handle.clone();

			let Some(api_url) = config.api_url(&handle) else {
				debug!(%handle, "Platform disabled, no API URL configured");
				continue;
			};
			if registry.platforms.contains_key(&handle) {
				return Err(RegistryError::DuplicateHandle(handle));
			}

			let timeout = config
				.platform(&handle)
				.and_then(|p| p.timeout_ms)
				.map(Duration::from_millis)
				.unwrap_or(DEFAULT_TIMEOUT);
			let settings = AdapterSettings {
				api_url: api_url.to_string(),
				timeout,
			};

			let capabilities =
				(registration.build)(coin.clone(), &settings).map_err(|source| {
					RegistryError::Init {
						handle: handle.clone(),
						source,
					}
				})?;

			registry.register(coin, capabilities)?;
		}

		Ok(registry)
	}

	/// Records an initialized adapter under its coin's handle and in the
	/// capability indexes.
	pub fn register(&mut self, coin: Coin, capabilities: Capabilities) -> Result<(), RegistryError> {
		let handle = coin.handle.clone();
		if self.platforms.contains_key(&handle) {
			return Err(RegistryError::DuplicateHandle(handle));
		}

		info!(%handle, coin = %coin, capabilities = ?capabilities, "Registered platform");

		if let Some(blocks) = &capabilities.blocks {
			self.block_apis.insert(handle.clone(), blocks.clone());
		}
		self.platforms.insert(handle, PlatformEntry { coin, capabilities });
		Ok(())
	}

	pub fn get(&self, handle: &str) -> Option<&PlatformEntry> {
		self.platforms.get(handle)
	}

	pub fn entries(&self) -> impl Iterator<Item = (&str, &PlatformEntry)> {
		self.platforms.iter().map(|(h, e)| (h.as_str(), e))
	}

	/// O(1) lookup of a platform's block service, for the block observer.
	pub fn block_api(&self, handle: &str) -> Option<Arc<dyn BlockApi>> {
		self.block_apis.get(handle).cloned()
	}

	pub fn block_apis(&self) -> &HashMap<String, Arc<dyn BlockApi>> {
		&self.block_apis
	}

	/// All enabled handles, sorted for stable listings.
	pub fn handles(&self) -> Vec<String> {
		let mut handles: Vec<String> = self.platforms.keys().cloned().collect();
		handles.sort();
		handles
	}

	pub fn len(&self) -> usize {
		self.platforms.len()
	}

	pub fn is_empty(&self) -> bool {
		self.platforms.is_empty()
	}
}

impl Default for PlatformRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for PlatformRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PlatformRegistry")
			.field("platforms", &self.handles())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use atlas_config::PlatformConfig;
	use atlas_types::{Block, TxApi, TxPage};

	struct MockTxApi;

	#[async_trait]
	impl TxApi for MockTxApi {
		async fn txs_by_address(&self, _address: &str) -> Result<TxPage, PlatformError> {
			Ok(TxPage::default())
		}
	}

	struct MockBlockApi;

	#[async_trait]
	impl BlockApi for MockBlockApi {
		async fn current_block_number(&self) -> Result<u64, PlatformError> {
			Ok(100)
		}

		async fn block_by_number(&self, number: u64) -> Result<Block, PlatformError> {
			Ok(Block {
				number,
				txs: vec![],
			})
		}
	}

	fn build_txs_only(_coin: Coin, _settings: &AdapterSettings) -> Result<Capabilities, PlatformError> {
		Ok(Capabilities {
			txs: Some(Arc::new(MockTxApi)),
			..Capabilities::default()
		})
	}

	fn build_with_blocks(
		_coin: Coin,
		_settings: &AdapterSettings,
	) -> Result<Capabilities, PlatformError> {
		Ok(Capabilities {
			txs: Some(Arc::new(MockTxApi)),
			blocks: Some(Arc::new(MockBlockApi)),
			..Capabilities::default()
		})
	}

	fn build_failing(_coin: Coin, _settings: &AdapterSettings) -> Result<Capabilities, PlatformError> {
		Err(PlatformError::Internal("bad base url".to_string()))
	}

	fn coins() -> CoinList {
		atlas_coins::from_yaml(
			"- id: 1\n  handle: alpha\n  symbol: AAA\n  name: Alpha\n  decimals: 8\n  blockTime: 1000\n\
			 - id: 2\n  handle: beta\n  symbol: BBB\n  name: Beta\n  decimals: 6\n  blockTime: 2000\n",
		)
		.unwrap()
	}

	fn config_enabling(handles: &[&str]) -> Config {
		let mut config = Config::default();
		config.platforms.clear();
		for handle in handles {
			config.platforms.insert(
				handle.to_string(),
				PlatformConfig {
					api: format!("http://localhost/{handle}"),
					timeout_ms: None,
				},
			);
		}
		config
	}

	#[test]
	fn test_unconfigured_platform_is_excluded() {
		let regs = vec![
			Registration {
				coin_id: 1,
				build: build_txs_only,
			},
			Registration {
				coin_id: 2,
				build: build_txs_only,
			},
		];
		let registry =
			PlatformRegistry::from_registrations(regs, &coins(), &config_enabling(&["alpha"]))
				.unwrap();
		assert_eq!(registry.handles(), vec!["alpha"]);
		assert!(registry.get("beta").is_none());
	}

	#[test]
	fn test_empty_api_url_is_excluded() {
		let mut config = config_enabling(&["alpha"]);
		config.platforms.get_mut("alpha").unwrap().api = String::new();
		let regs = vec![Registration {
			coin_id: 1,
			build: build_txs_only,
		}];
		let registry = PlatformRegistry::from_registrations(regs, &coins(), &config).unwrap();
		assert!(registry.is_empty());
	}

	#[test]
	fn test_duplicate_handle_is_fatal() {
		let regs = vec![
			Registration {
				coin_id: 1,
				build: build_txs_only,
			},
			Registration {
				coin_id: 1,
				build: build_txs_only,
			},
		];
		let err =
			PlatformRegistry::from_registrations(regs, &coins(), &config_enabling(&["alpha"]))
				.unwrap_err();
		assert!(matches!(err, RegistryError::DuplicateHandle(h) if h == "alpha"));
	}

	#[test]
	fn test_init_failure_is_fatal() {
		let regs = vec![Registration {
			coin_id: 1,
			build: build_failing,
		}];
		let err =
			PlatformRegistry::from_registrations(regs, &coins(), &config_enabling(&["alpha"]))
				.unwrap_err();
		assert!(matches!(err, RegistryError::Init { handle, .. } if handle == "alpha"));
	}

	#[test]
	fn test_missing_coin_descriptor_is_fatal() {
		let regs = vec![Registration {
			coin_id: 99,
			build: build_txs_only,
		}];
		let err =
			PlatformRegistry::from_registrations(regs, &coins(), &config_enabling(&["alpha"]))
				.unwrap_err();
		assert!(matches!(err, RegistryError::MissingCoin(99)));
	}

	#[test]
	fn test_block_capability_index() {
		let regs = vec![
			Registration {
				coin_id: 1,
				build: build_with_blocks,
			},
			Registration {
				coin_id: 2,
				build: build_txs_only,
			},
		];
		let registry = PlatformRegistry::from_registrations(
			regs,
			&coins(),
			&config_enabling(&["alpha", "beta"]),
		)
		.unwrap();
		assert_eq!(registry.len(), 2);
		assert!(registry.block_api("alpha").is_some());
		assert!(registry.block_api("beta").is_none());
		assert_eq!(registry.block_apis().len(), 1);
	}

	#[test]
	fn test_handles_sorted() {
		let regs = vec![
			Registration {
				coin_id: 2,
				build: build_txs_only,
			},
			Registration {
				coin_id: 1,
				build: build_txs_only,
			},
		];
		let registry = PlatformRegistry::from_registrations(
			regs,
			&coins(),
			&config_enabling(&["alpha", "beta"]),
		)
		.unwrap();
		assert_eq!(registry.handles(), vec!["alpha", "beta"]);
	}
}
