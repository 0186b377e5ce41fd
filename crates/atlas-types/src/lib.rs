//! Generic transaction model and capability contracts.
//!
//! This crate defines the chain-agnostic types every adapter normalizes
//! into, and the capability traits an adapter may implement. The serving
//! layer composes its routes from the capability record alone; nothing
//! in here knows about any concrete blockchain.

pub mod amount;
pub mod capabilities;
pub mod errors;
pub mod normalize;
pub mod tx;

pub use amount::{to_subunits, Amount, AmountError};
pub use capabilities::{BlockApi, Capabilities, Capability, CustomApi, TokenTxApi, TxApi};
pub use errors::PlatformError;
pub use normalize::{collect_page, Normalized};
pub use tx::{Block, Tx, TxMeta, TxPage, TxStatus, TX_PER_PAGE};
