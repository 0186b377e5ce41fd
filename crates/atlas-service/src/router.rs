//! Route composition over the finished platform registry.
//!
//! One pass over the registry builds the complete route tree: for every
//! platform the composer probes capabilities in a fixed order (custom
//! routes, address lookup, token lookup) and mounts only what the
//! adapter declares, all under a single group per handle. No
//! chain-specific branching lives here.

use atlas_platforms::{PlatformEntry, PlatformRegistry};
use atlas_types::{PlatformError, TokenTxApi, TxApi, TxPage};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// Builds the full application router from the registry.
pub fn compose(registry: Arc<PlatformRegistry>) -> Router {
	let mut v1 = Router::new();
	for (handle, entry) in registry.entries() {
		v1 = v1.nest(&format!("/{handle}"), platform_routes(entry));
	}

	let endpoints = registry.handles();
	v1 = v1.route(
		"/",
		get(move || {
			let endpoints = endpoints.clone();
			async move { Json(json!({ "endpoints": endpoints })) }
		}),
	);

	Router::new()
		.route("/", get(|| async { Json(json!({ "status": true })) }))
		.nest("/v1", v1)
}

/// Mounts the generic endpoints one platform declares. Routes for one
/// handle all land in this single group.
fn platform_routes(entry: &PlatformEntry) -> Router {
	let mut group = Router::new();

	if let Some(custom) = &entry.capabilities.custom {
		group = group.merge(custom.register_routes());
	}
	if let Some(api) = &entry.capabilities.txs {
		let api = api.clone();
		group = group.route(
			"/{address}/txs",
			get(move |Path(address): Path<String>| {
				let api = api.clone();
				async move { address_txs(api, address).await }
			}),
		);
	}
	if let Some(api) = &entry.capabilities.token_txs {
		let api = api.clone();
		group = group.route(
			"/{address}/token/{token}/txs",
			get(move |Path((address, token)): Path<(String, String)>| {
				let api = api.clone();
				async move { token_txs(api, address, token).await }
			}),
		);
	}

	group
}

async fn address_txs(api: Arc<dyn TxApi>, address: String) -> Response {
	if address.trim().is_empty() {
		return error_response(PlatformError::InvalidAddress);
	}
	match api.txs_by_address(&address).await {
		Ok(page) => page_response(page),
		Err(err) => error_response(err),
	}
}

async fn token_txs(api: Arc<dyn TokenTxApi>, address: String, token: String) -> Response {
	if address.trim().is_empty() || token.trim().is_empty() {
		return error_response(PlatformError::InvalidAddress);
	}
	match api.token_txs_by_address(&address, &token).await {
		Ok(page) => page_response(page),
		Err(err) => error_response(err),
	}
}

fn page_response(mut page: TxPage) -> Response {
	page.sort();
	Json(page).into_response()
}

#[derive(Serialize)]
struct ErrorBody {
	error: &'static str,
}

/// Maps the closed error taxonomy onto response statuses. Internal
/// detail is logged, never returned to the caller.
fn error_response(err: PlatformError) -> Response {
	let (status, message) = match &err {
		PlatformError::InvalidAddress => (StatusCode::BAD_REQUEST, "Invalid address"),
		PlatformError::NotFound => (StatusCode::NOT_FOUND, "No such address"),
		PlatformError::SourceUnavailable(detail) => {
			warn!(%detail, "Upstream source unavailable");
			(StatusCode::SERVICE_UNAVAILABLE, "Lost connection to blockchain")
		}
		PlatformError::Internal(detail) => {
			error!(%detail, "Internal platform error");
			(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
		}
	};
	(status, Json(ErrorBody { error: message })).into_response()
}
