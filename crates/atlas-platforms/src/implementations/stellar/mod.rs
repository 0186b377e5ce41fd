//! Horizon-based adapter, shared by Stellar and Kin.
//!
//! The adapter is parameterized by its coin so both networks reuse the
//! same client and normalizer. It declares address lookup only.

pub mod client;

use self::client::{Client, Payment};
use crate::registry::{AdapterSettings, Registration};
use async_trait::async_trait;
use atlas_coins::Coin;
use atlas_types::{
	collect_page, to_subunits, Amount, Capabilities, Normalized, PlatformError, Tx, TxApi, TxMeta,
	TxPage, TxStatus,
};
use chrono::DateTime;
use std::sync::Arc;

/// SLIP-44 coin id of Stellar Lumens.
pub const XLM: u32 = 148;
/// SLIP-44 coin id of Kin.
pub const KIN: u32 = 2017;

/// Every operation pays a flat fee of 100 subunits (stroops on Stellar).
const FIXED_FEE: &str = "100";

pub fn registration(coin_id: u32) -> Registration {
	Registration {
		coin_id,
		build,
	}
}

fn build(coin: Coin, settings: &AdapterSettings) -> Result<Capabilities, PlatformError> {
	let platform = Arc::new(Platform {
		client: Client::new(&settings.api_url, settings.timeout)?,
		coin,
	});
	Ok(Capabilities {
		txs: Some(platform),
		..Capabilities::default()
	})
}

pub struct Platform {
	client: Client,
	coin: Coin,
}

#[async_trait]
impl TxApi for Platform {
	async fn txs_by_address(&self, address: &str) -> Result<TxPage, PlatformError> {
		let payments = self.client.payments_of_address(address).await?;
		Ok(collect_page(
			payments.iter().map(|p| normalize_payment(p, &self.coin)),
		))
	}
}

/// Converts one Horizon payment operation into the generic model.
///
/// Classification and validation are one explicit match per operation
/// kind: a `payment` must move the native asset and carry an amount, a
/// `create_account` funds a new account from its starting balance. All
/// other kinds are outside the model.
pub fn normalize_payment(payment: &Payment, coin: &Coin) -> Normalized {
	let (from, to, amount) = match payment.kind.as_str() {
		"payment" => {
			if payment.asset_type != "native" {
				return Normalized::NotApplicable;
			}
			if payment.amount.is_empty() {
				return Normalized::malformed("native payment without amount");
			}
			(&payment.from, &payment.to, &payment.amount)
		}
		"create_account" => {
			if payment.starting_balance.is_empty() {
				return Normalized::malformed("create_account without starting balance");
			}
			(&payment.funder, &payment.account, &payment.starting_balance)
		}
		_ => return Normalized::NotApplicable,
	};

	let block = match payment.id.parse::<u64>() {
		Ok(id) => id,
		Err(_) => return Normalized::malformed(format!("non-numeric operation id {:?}", payment.id)),
	};
	let date = match DateTime::parse_from_rfc3339(&payment.created_at) {
		Ok(date) => date.timestamp(),
		Err(e) => return Normalized::malformed(format!("created_at: {e}")),
	};
	let value = match to_subunits(amount, coin.decimals) {
		Ok(amount) => amount,
		Err(e) => return Normalized::malformed(format!("amount: {e}")),
	};

	Normalized::Tx(Tx {
		id: payment.transaction_hash.clone(),
		coin: coin.id,
		date,
		from: from.clone(),
		to: to.clone(),
		fee: Amount::from(FIXED_FEE),
		block,
		memo: None,
		status: TxStatus::Completed,
		meta: TxMeta::Transfer { value },
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stellar_coin() -> Coin {
		Coin {
			id: XLM,
			handle: "stellar".to_string(),
			symbol: "XLM".to_string(),
			title: "Stellar Lumens".to_string(),
			decimals: 7,
			block_time: 5000,
			sample_address: None,
			sample_token: None,
		}
	}

	fn payment() -> Payment {
		Payment {
			id: "99047676129185793".to_string(),
			kind: "payment".to_string(),
			transaction_hash: "fb1c6b4fdcfbbff79cfbb2d091c6bf08a41b5b2ecebf92d3f03ce7b5e0c13a2f"
				.to_string(),
			created_at: "2019-04-12T06:17:47Z".to_string(),
			asset_type: "native".to_string(),
			from: "GBEZOC5U4TVH7ZY5N3FLYHTCZSI6VFGTULG7PBITLF5ZEBPJXFT46YZM".to_string(),
			to: "GDKIJJIKXLOM2NRMPNQZUUYK24ZPVFC6426GZAEP3KUK6KEJLACCWNMX".to_string(),
			amount: "100.0000000".to_string(),
			funder: String::new(),
			account: String::new(),
			starting_balance: String::new(),
		}
	}

	#[test]
	fn test_native_payment() {
		let coin = stellar_coin();
		let Normalized::Tx(tx) = normalize_payment(&payment(), &coin) else {
			panic!("expected a transaction");
		};
		assert_eq!(tx.coin, XLM);
		assert_eq!(tx.date, 1555049867);
		assert_eq!(tx.fee, Amount::from("100"));
		assert_eq!(tx.block, 99047676129185793);
		assert_eq!(tx.from, payment().from);
		assert_eq!(tx.to, payment().to);
		assert_eq!(
			tx.meta,
			TxMeta::Transfer {
				value: Amount::from("1000000000")
			}
		);
	}

	#[test]
	fn test_create_account_funds_new_account() {
		let mut p = payment();
		p.kind = "create_account".to_string();
		p.asset_type = String::new();
		p.amount = String::new();
		p.funder = "GFUNDER".to_string();
		p.account = "GNEWACCOUNT".to_string();
		p.starting_balance = "2.5000000".to_string();

		let Normalized::Tx(tx) = normalize_payment(&p, &stellar_coin()) else {
			panic!("expected a transaction");
		};
		assert_eq!(tx.from, "GFUNDER");
		assert_eq!(tx.to, "GNEWACCOUNT");
		assert_eq!(
			tx.meta,
			TxMeta::Transfer {
				value: Amount::from("25000000")
			}
		);
	}

	#[test]
	fn test_non_native_payment_not_applicable() {
		let mut p = payment();
		p.asset_type = "credit_alphanum4".to_string();
		assert_eq!(normalize_payment(&p, &stellar_coin()), Normalized::NotApplicable);
	}

	#[test]
	fn test_unknown_kind_not_applicable() {
		let mut p = payment();
		p.kind = "manage_offer".to_string();
		assert_eq!(normalize_payment(&p, &stellar_coin()), Normalized::NotApplicable);
	}

	#[test]
	fn test_missing_amount_is_malformed() {
		let mut p = payment();
		p.amount = String::new();
		assert!(matches!(
			normalize_payment(&p, &stellar_coin()),
			Normalized::Malformed(_)
		));
	}

	#[test]
	fn test_bad_timestamp_is_malformed() {
		let mut p = payment();
		p.created_at = "yesterday".to_string();
		assert!(matches!(
			normalize_payment(&p, &stellar_coin()),
			Normalized::Malformed(_)
		));
	}

	#[test]
	fn test_non_numeric_id_is_malformed() {
		let mut p = payment();
		p.id = "abc".to_string();
		assert!(matches!(
			normalize_payment(&p, &stellar_coin()),
			Normalized::Malformed(_)
		));
	}

	#[test]
	fn test_kin_uses_its_own_decimals() {
		let coin = Coin {
			id: KIN,
			handle: "kin".to_string(),
			symbol: "KIN".to_string(),
			title: "Kin".to_string(),
			decimals: 5,
			block_time: 5000,
			sample_address: None,
			sample_token: None,
		};
		let mut p = payment();
		p.amount = "3.00000".to_string();
		let Normalized::Tx(tx) = normalize_payment(&p, &coin) else {
			panic!("expected a transaction");
		};
		assert_eq!(tx.coin, KIN);
		assert_eq!(
			tx.meta,
			TxMeta::Transfer {
				value: Amount::from("300000")
			}
		);
	}
}
