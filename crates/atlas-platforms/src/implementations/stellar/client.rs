//! Client for Horizon-style APIs (Stellar and Kin).

use crate::client::{fetch_json, http_client};
use atlas_types::{PlatformError, TX_PER_PAGE};
use serde::Deserialize;
use std::time::Duration;

/// One payment operation as Horizon reports it. Fields are populated
/// depending on the operation kind, hence the defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
	/// Numeric operation id, as a decimal string.
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub transaction_hash: String,
	/// RFC 3339 timestamp.
	pub created_at: String,
	#[serde(default)]
	pub asset_type: String,
	#[serde(default)]
	pub from: String,
	#[serde(default)]
	pub to: String,
	#[serde(default)]
	pub amount: String,
	#[serde(default)]
	pub funder: String,
	#[serde(default)]
	pub account: String,
	#[serde(default)]
	pub starting_balance: String,
}

#[derive(Debug, Deserialize)]
struct Embedded {
	records: Vec<Payment>,
}

#[derive(Debug, Deserialize)]
struct PaymentsResponse {
	#[serde(rename = "_embedded")]
	embedded: Embedded,
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

	/// Fetches the newest payment operations of an account.
	pub async fn payments_of_address(&self, address: &str) -> Result<Vec<Payment>, PlatformError> {
		let limit = TX_PER_PAGE.to_string();
		let request = self
			.http
			.get(format!(
				"{}/accounts/{}/payments",
				self.base_url, address
			))
			.query(&[("order", "desc"), ("limit", limit.as_str())]);
		let response: PaymentsResponse = fetch_json(request).await?;
		Ok(response.embedded.records)
	}
}
