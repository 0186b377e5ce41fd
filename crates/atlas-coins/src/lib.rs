//! Coin descriptor registry.
//!
//! Loads the ordered list of chain metadata once at startup. The load is
//! all-or-nothing: a single malformed descriptor fails the whole call so
//! the process never runs on a partially valid coin table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// The native currency of one blockchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
	/// SLIP-44 coin id (e.g. 714).
	pub id: u32,
	/// Stable lowercase identifier (e.g. "binance"), used as config key
	/// prefix and route segment.
	pub handle: String,
	/// Symbol of the native currency.
	pub symbol: String,
	/// Full name of the native currency.
	#[serde(rename = "name")]
	pub title: String,
	/// Number of decimals.
	pub decimals: u32,
	/// Average time between blocks, in milliseconds.
	#[serde(rename = "blockTime")]
	pub block_time: u64,
	/// Random address seen on chain, for smoke testing.
	#[serde(rename = "sampleAddress", default, skip_serializing_if = "Option::is_none")]
	pub sample_address: Option<String>,
	/// Random token seen on chain, for smoke testing.
	#[serde(rename = "sampleToken", default, skip_serializing_if = "Option::is_none")]
	pub sample_token: Option<String>,
}

impl fmt::Display for Coin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}] {} (#{})", self.symbol, self.title, self.id)
	}
}

#[derive(Error, Debug)]
pub enum CoinError {
	#[error("coin source unreadable: {0}")]
	Unreadable(#[from] std::io::Error),

	#[error("malformed coin descriptor: {0}")]
	Malformed(#[from] serde_yaml::Error),
}

/// The loaded coin table, ordered as in the source, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct CoinList {
	coins: Vec<Coin>,
	by_id: HashMap<u32, usize>,
}

impl CoinList {
	pub fn new(coins: Vec<Coin>) -> Self {
		let by_id = coins
			.iter()
			.enumerate()
			.map(|(idx, coin)| (coin.id, idx))
			.collect();
		Self { coins, by_id }
	}

	pub fn by_id(&self, id: u32) -> Option<&Coin> {
		self.by_id.get(&id).map(|&idx| &self.coins[idx])
	}

	pub fn iter(&self) -> impl Iterator<Item = &Coin> {
		self.coins.iter()
	}

	pub fn len(&self) -> usize {
		self.coins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.coins.is_empty()
	}
}

/// Loads the coin list from a YAML descriptor file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<CoinList, CoinError> {
	let path = path.as_ref();
	let contents = std::fs::read_to_string(path)?;
	let list = from_yaml(&contents)?;
	info!(coins = list.len(), path = %path.display(), "Loaded coin list");
	Ok(list)
}

/// Parses a coin list from a YAML string.
pub fn from_yaml(contents: &str) -> Result<CoinList, CoinError> {
	let coins: Vec<Coin> = serde_yaml::from_str(contents)?;
	Ok(CoinList::new(coins))
}
