//! Client for the Binance DEX explorer API.

use crate::client::{fetch_json, http_client};
use atlas_types::PlatformError;
use serde::Deserialize;
use std::time::Duration;

/// A transaction as the explorer reports it. `value` and `tx_fee` are
/// JSON numbers with fractional parts; they are kept as
/// `serde_json::Number` so the decimal text survives untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrcTx {
	pub block_height: u64,
	pub tx_hash: String,
	pub tx_type: String,
	pub tx_asset: String,
	#[serde(default)]
	pub mapped_tx_asset: String,
	pub from_addr: String,
	#[serde(default)]
	pub to_addr: String,
	pub value: serde_json::Number,
	pub tx_fee: serde_json::Number,
	/// Milliseconds since epoch.
	pub time_stamp: i64,
	#[serde(default)]
	pub memo: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxSearch {
	#[serde(rename = "txArray", default)]
	pub txs: Vec<SrcTx>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
	pub block_height: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockList {
	#[serde(rename = "blockArray", default)]
	pub blocks: Vec<BlockDescriptor>,
}

#[derive(Debug, Clone)]
pub struct Client {
	base_url: String,
	http: reqwest::Client,
}

impl Client {
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PlatformError> {
		Ok(Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			http: http_client(timeout)?,
		})
	}

	/// Fetches transactions of an address, optionally filtered to one
	/// token asset. The endpoint accepts an empty filter.
	pub async fn txs_of_address(
		&self,
		address: &str,
		token: &str,
	) -> Result<TxSearch, PlatformError> {
		let mut request = self
			.http
			.get(format!("{}/txs", self.base_url))
			.query(&[("address", address)]);
		if !token.is_empty() {
			request = request.query(&[("txAsset", token)]);
		}
		fetch_json(request).await
	}

	/// Fetches the newest `rows` block descriptors.
	pub async fn block_list(&self, rows: u32) -> Result<BlockList, PlatformError> {
		let rows = rows.to_string();
		let request = self
			.http
			.get(format!("{}/blocks", self.base_url))
			.query(&[("page", "1"), ("rows", rows.as_str())]);
		fetch_json(request).await
	}

	/// Fetches the transactions of one block.
	pub async fn txs_in_block(&self, height: u64) -> Result<TxSearch, PlatformError> {
		let request = self
			.http
			.get(format!("{}/txs", self.base_url))
			.query(&[("blockHeight", &height.to_string())]);
		fetch_json(request).await
	}
}
