//! Shared HTTP plumbing for explorer clients.
//!
//! Maps transport and status failures into the closed [`PlatformError`]
//! taxonomy so no reqwest error type crosses the adapter boundary.

use atlas_types::PlatformError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Builds a reqwest client with the adapter's request timeout. No
/// retries: retry policy belongs to the caller, not the query path.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, PlatformError> {
	reqwest::Client::builder()
		.timeout(timeout)
		.build()
		.map_err(|e| PlatformError::Internal(format!("http client: {e}")))
}

/// Sends a request and decodes a JSON body, translating failures into
/// the platform error taxonomy.
pub async fn fetch_json<T: DeserializeOwned>(
	request: reqwest::RequestBuilder,
) -> Result<T, PlatformError> {
	let response = request
		.send()
		.await
		.map_err(|e| PlatformError::SourceUnavailable(e.to_string()))?;

	match response.status() {
		status if status.is_success() => response
			.json()
			.await
			.map_err(|e| PlatformError::SourceUnavailable(format!("upstream payload: {e}"))),
		StatusCode::NOT_FOUND => Err(PlatformError::NotFound),
		StatusCode::BAD_REQUEST => Err(PlatformError::InvalidAddress),
		status if status.is_server_error() => Err(PlatformError::SourceUnavailable(format!(
			"upstream status {status}"
		))),
		status => Err(PlatformError::Internal(format!(
			"unexpected upstream status {status}"
		))),
	}
}
