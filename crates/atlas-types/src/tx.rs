//! The generic transaction model shared by all chains.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// Maximum number of transactions in one returned page. Eligible source
/// records beyond this count are dropped, not paginated.
pub const TX_PER_PAGE: usize = 25;

/// Execution status of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
	#[default]
	Completed,
	Pending,
	Error,
}

/// Chain-specific payload of a transaction, exactly one per `Tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "metadata")]
pub enum TxMeta {
	/// Native currency movement.
	#[serde(rename = "transfer")]
	Transfer { value: Amount },

	/// Token movement on a chain with native multi-asset support.
	#[serde(rename = "native_token_transfer")]
	NativeTokenTransfer {
		#[serde(rename = "tokenID")]
		token_id: String,
		symbol: String,
		value: Amount,
		decimals: u32,
		from: String,
		to: String,
	},
}

/// A single transaction in the generic model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
	/// Chain-scoped transaction hash, unique within one coin.
	pub id: String,
	/// Numeric id of the coin this transaction belongs to.
	pub coin: u32,
	/// Unix timestamp, seconds.
	pub date: i64,
	pub from: String,
	pub to: String,
	/// Fee in subunits.
	pub fee: Amount,
	/// Height of the block containing this transaction.
	pub block: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub memo: Option<String>,
	#[serde(default)]
	pub status: TxStatus,
	#[serde(flatten)]
	pub meta: TxMeta,
}

/// One page of transactions, serialized as `{"total": n, "docs": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxPage(pub Vec<Tx>);

#[derive(Serialize, Deserialize)]
struct PageRepr {
	total: usize,
	docs: Vec<Tx>,
}

impl Serialize for TxPage {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		PageRepr {
			total: self.0.len(),
			docs: self.0.clone(),
		}
		.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for TxPage {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let repr = PageRepr::deserialize(deserializer)?;
		Ok(TxPage(repr.docs))
	}
}

impl TxPage {
	/// Sorts the page into descending chronological order. The sort is
	/// stable, so transactions with equal timestamps keep their relative
	/// source order.
	pub fn sort(&mut self) {
		self.0.sort_by(|a, b| b.date.cmp(&a.date));
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// A block with its normalized transactions, for the block observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
	pub number: u64,
	pub txs: Vec<Tx>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tx(id: &str, date: i64) -> Tx {
		Tx {
			id: id.to_string(),
			coin: 714,
			date,
			from: "a".to_string(),
			to: "b".to_string(),
			fee: Amount::from("1"),
			block: 1,
			memo: None,
			status: TxStatus::Completed,
			meta: TxMeta::Transfer {
				value: Amount::from("10"),
			},
		}
	}

	#[test]
	fn test_sort_descending() {
		let mut page = TxPage(vec![tx("a", 1), tx("b", 3), tx("c", 2)]);
		page.sort();
		let dates: Vec<i64> = page.0.iter().map(|t| t.date).collect();
		assert_eq!(dates, vec![3, 2, 1]);
	}

	#[test]
	fn test_sort_stable_on_equal_dates() {
		let mut page = TxPage(vec![tx("a", 2), tx("b", 2), tx("c", 2)]);
		page.sort();
		let ids: Vec<&str> = page.0.iter().map(|t| t.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b", "c"]);
	}

	#[test]
	fn test_page_serialization_shape() {
		let page = TxPage(vec![tx("a", 1)]);
		let json = serde_json::to_value(&page).unwrap();
		assert_eq!(json["total"], 1);
		assert_eq!(json["docs"][0]["id"], "a");
		assert_eq!(json["docs"][0]["type"], "transfer");
		assert_eq!(json["docs"][0]["metadata"]["value"], "10");
		assert_eq!(json["docs"][0]["status"], "completed");
	}

	#[test]
	fn test_page_round_trip() {
		let page = TxPage(vec![tx("a", 1), tx("b", 2)]);
		let json = serde_json::to_string(&page).unwrap();
		let back: TxPage = serde_json::from_str(&json).unwrap();
		assert_eq!(back, page);
	}

	#[test]
	fn test_token_meta_serialization() {
		let mut t = tx("a", 1);
		t.meta = TxMeta::NativeTokenTransfer {
			token_id: "YLC-D8B".to_string(),
			symbol: "YLC".to_string(),
			value: Amount::from("210572645"),
			decimals: 8,
			from: "a".to_string(),
			to: "b".to_string(),
		};
		let json = serde_json::to_value(&t).unwrap();
		assert_eq!(json["type"], "native_token_transfer");
		assert_eq!(json["metadata"]["tokenID"], "YLC-D8B");
		assert_eq!(json["metadata"]["decimals"], 8);
	}
}
