//! Capability contracts implemented by chain adapters.
//!
//! An adapter declares an arbitrary subset of these capabilities by
//! filling in the matching slots of its [`Capabilities`] record. The
//! serving layer probes the record at runtime ("does this adapter carry
//! a token lookup handle?") and mounts routes accordingly; adding a new
//! capability means adding a slot here, not touching the dispatch core.

use crate::errors::PlatformError;
use crate::tx::{Block, TxPage};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Address-scoped transaction lookup.
#[async_trait]
pub trait TxApi: Send + Sync {
	async fn txs_by_address(&self, address: &str) -> Result<TxPage, PlatformError>;
}

/// Token-scoped transaction lookup.
#[async_trait]
pub trait TokenTxApi: Send + Sync {
	async fn token_txs_by_address(&self, address: &str, token: &str)
		-> Result<TxPage, PlatformError>;
}

/// Chain height and block retrieval, consumed by the external block
/// observer rather than by the query routes.
#[async_trait]
pub trait BlockApi: Send + Sync {
	async fn current_block_number(&self) -> Result<u64, PlatformError>;
	async fn block_by_number(&self, number: u64) -> Result<Block, PlatformError>;
}

/// Bespoke endpoints beyond the generic shape. The returned router is
/// nested under the adapter's handle by the composer.
pub trait CustomApi: Send + Sync {
	fn register_routes(&self) -> axum::Router;
}

/// One of the query capabilities an adapter may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
	Txs,
	TokenTxs,
	Blocks,
	Custom,
}

/// The capability record of one adapter: a set of optional handles,
/// fixed at construction.
#[derive(Clone, Default)]
pub struct Capabilities {
	pub txs: Option<Arc<dyn TxApi>>,
	pub token_txs: Option<Arc<dyn TokenTxApi>>,
	pub blocks: Option<Arc<dyn BlockApi>>,
	pub custom: Option<Arc<dyn CustomApi>>,
}

impl Capabilities {
	pub fn supports(&self, capability: Capability) -> bool {
		match capability {
			Capability::Txs => self.txs.is_some(),
			Capability::TokenTxs => self.token_txs.is_some(),
			Capability::Blocks => self.blocks.is_some(),
			Capability::Custom => self.custom.is_some(),
		}
	}

	fn declared(&self) -> Vec<Capability> {
		[
			Capability::Txs,
			Capability::TokenTxs,
			Capability::Blocks,
			Capability::Custom,
		]
		.into_iter()
		.filter(|c| self.supports(*c))
		.collect()
	}
}

impl fmt::Debug for Capabilities {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Capabilities").field(&self.declared()).finish()
	}
}
