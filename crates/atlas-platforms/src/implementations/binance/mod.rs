//! Binance DEX adapter.
//!
//! Declares address lookup, token lookup, and block retrieval. The
//! explorer reports both native BNB transfers and BEP-2 token transfers
//! through the same endpoint; the normalizer tells them apart by asset
//! and by the token filter of the query.

pub mod client;

use self::client::{Client, SrcTx};
use crate::registry::{AdapterSettings, Registration};
use async_trait::async_trait;
use atlas_coins::Coin;
use atlas_types::{
	collect_page, to_subunits, Block, BlockApi, Capabilities, Normalized, PlatformError,
	TokenTxApi, Tx, TxApi, TxMeta, TxPage, TxStatus,
};
use std::sync::Arc;

/// SLIP-44 coin id of BNB.
pub const BNB: u32 = 714;

const BNB_DECIMALS: u32 = 8;

pub fn registration() -> Registration {
	Registration {
		coin_id: BNB,
		build,
	}
}

fn build(_coin: Coin, settings: &AdapterSettings) -> Result<Capabilities, PlatformError> {
	let platform = Arc::new(Platform {
		client: Client::new(&settings.api_url, settings.timeout)?,
	});
	Ok(Capabilities {
		txs: Some(platform.clone()),
		token_txs: Some(platform.clone()),
		blocks: Some(platform),
		custom: None,
	})
}

pub struct Platform {
	client: Client,
}

#[async_trait]
impl TxApi for Platform {
	async fn txs_by_address(&self, address: &str) -> Result<TxPage, PlatformError> {
		// The endpoint supports queries without a token filter.
		self.token_txs_by_address(address, "").await
	}
}

#[async_trait]
impl TokenTxApi for Platform {
	async fn token_txs_by_address(
		&self,
		address: &str,
		token: &str,
	) -> Result<TxPage, PlatformError> {
		let search = self.client.txs_of_address(address, token).await?;
		Ok(normalize_txs(&search.txs, token))
	}
}

#[async_trait]
impl BlockApi for Platform {
	async fn current_block_number(&self) -> Result<u64, PlatformError> {
		// No direct height endpoint; ask for the newest block in the
		// block list and report its number.
		let list = self.client.block_list(1).await?;
		list.blocks
			.first()
			.map(|b| b.block_height)
			.ok_or_else(|| {
				PlatformError::SourceUnavailable("no block descriptor in response".to_string())
			})
	}

	async fn block_by_number(&self, number: u64) -> Result<Block, PlatformError> {
		let search = self.client.txs_in_block(number).await?;
		// TODO: include token transfers once the observer models them;
		// only native BNB transfers are returned for now.
		let page = normalize_txs(&search.txs, "");
		Ok(Block {
			number,
			txs: page.0,
		})
	}
}

/// Converts one explorer transaction into the generic model. `token` is
/// the asset filter of the query: empty selects native BNB transfers,
/// otherwise only transfers of that exact asset apply.
pub fn normalize_tx(src: &SrcTx, token: &str) -> Normalized {
	if src.tx_type != "TRANSFER" {
		return Normalized::NotApplicable;
	}
	let native = token.is_empty() && src.tx_asset == "BNB";
	let token_match = !token.is_empty() && src.tx_asset == token;
	if !native && !token_match {
		return Normalized::NotApplicable;
	}

	let value = match to_subunits(src.value.as_str(), BNB_DECIMALS) {
		Ok(amount) => amount,
		Err(e) => return Normalized::malformed(format!("value: {e}")),
	};
	let fee = match to_subunits(src.tx_fee.as_str(), BNB_DECIMALS) {
		Ok(amount) => amount,
		Err(e) => return Normalized::malformed(format!("fee: {e}")),
	};

	let meta = if native {
		TxMeta::Transfer { value }
	} else {
		TxMeta::NativeTokenTransfer {
			token_id: src.tx_asset.clone(),
			symbol: src.mapped_tx_asset.clone(),
			value,
			decimals: BNB_DECIMALS,
			from: src.from_addr.clone(),
			to: src.to_addr.clone(),
		}
	};

	Normalized::Tx(Tx {
		id: src.tx_hash.clone(),
		coin: BNB,
		date: src.time_stamp / 1000,
		from: src.from_addr.clone(),
		to: src.to_addr.clone(),
		fee,
		block: src.block_height,
		memo: (!src.memo.is_empty()).then(|| src.memo.clone()),
		status: TxStatus::Completed,
		meta,
	})
}

/// Converts a batch of explorer transactions, applying the page cap.
pub fn normalize_txs(txs: &[SrcTx], token: &str) -> TxPage {
	collect_page(txs.iter().map(|src| normalize_tx(src, token)))
}
