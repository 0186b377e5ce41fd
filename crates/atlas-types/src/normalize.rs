//! Normalization outcome and page assembly.

use crate::tx::{Tx, TxPage, TX_PER_PAGE};
use tracing::warn;

/// Result of normalizing one source record.
///
/// `NotApplicable` is a deliberate filter: upstream explorer feeds
/// include transaction kinds the generic model does not represent.
/// `Malformed` is different, the record claimed a recognized shape but
/// its contents were invalid; those are surfaced, not silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
	Tx(Tx),
	NotApplicable,
	Malformed(String),
}

impl Normalized {
	/// Shorthand for building a `Malformed` outcome.
	pub fn malformed(reason: impl Into<String>) -> Self {
		Normalized::Malformed(reason.into())
	}
}

/// Assembles a page from normalization outcomes, preserving source
/// order and enforcing the page-size cap. Transactions past the cap are
/// dropped entirely. Malformed records are logged and excluded.
pub fn collect_page<I>(outcomes: I) -> TxPage
where
	I: IntoIterator<Item = Normalized>,
{
	let mut txs = Vec::new();
	for outcome in outcomes {
		match outcome {
			Normalized::Tx(tx) => {
				if txs.len() < TX_PER_PAGE {
					txs.push(tx);
				}
			}
			Normalized::NotApplicable => {}
			Normalized::Malformed(reason) => {
				warn!(%reason, "dropping malformed source transaction");
			}
		}
	}
	TxPage(txs)
}
