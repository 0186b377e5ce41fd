//! Smoke-tests a live API deployment.
//!
//! Requests the sample address of every coin the server reports as
//! enabled and checks the returned page. Probes run concurrently behind
//! a bounded admission gate; a fault in one probe is contained, folded
//! into a shared atomic failure flag, and reported once at the end
//! through the process exit status.

use anyhow::{ensure, Context, Result};
use atlas_coins::{Coin, CoinList};
use atlas_types::TxPage;
use clap::Parser;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "atlas-verify")]
#[command(about = "Smoke-test a live aggregation API", long_about = None)]
struct Cli {
	/// Base URL of the deployment to test
	base_url: String,

	/// Path to the coin list
	#[arg(long, default_value = "coins.yml")]
	coins: PathBuf,

	/// Probes to run at once
	#[arg(short, long, default_value_t = 8)]
	concurrency: usize,

	/// Fail on platforms not enabled server-side instead of skipping
	#[arg(short = 'a', long)]
	all: bool,

	#[arg(long, env = "ATLAS_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Deserialize)]
struct Endpoints {
	endpoints: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let coins = atlas_coins::load(&cli.coins).context("Failed to load coin list")?;
	let client = reqwest::Client::builder()
		.timeout(Duration::from_secs(5))
		.build()
		.context("Failed to build HTTP client")?;
	let base_url = cli.base_url.trim_end_matches('/').to_string();

	let supported = supported_handles(&client, &base_url)
		.await
		.context("Failed to get enabled platforms")?;
	info!(platforms = supported.len(), "Server reports enabled platforms");

	let failed = Arc::new(AtomicBool::new(false));
	let tests = select_tests(&coins, &supported, cli.all, &failed);
	info!(
		tests = tests.len(),
		concurrency = cli.concurrency,
		"Running probes"
	);

	// Bounded admission gate; each probe is an independent task.
	let gate = Arc::new(Semaphore::new(cli.concurrency.max(1)));
	let mut handles = Vec::with_capacity(tests.len());
	for coin in tests {
		let client = client.clone();
		let base_url = base_url.clone();
		let gate = gate.clone();
		let failed = failed.clone();
		handles.push(tokio::spawn(async move {
			let _permit = gate.acquire().await.expect("gate closed");
			let start = Instant::now();
			match probe(&client, &base_url, &coin).await {
				Ok(()) => {
					info!(platform = %coin.handle, elapsed = ?start.elapsed(), "Endpoint works");
				}
				Err(e) => {
					error!(platform = %coin.handle, error = %e, "Endpoint failed");
					failed.store(true, Ordering::SeqCst);
				}
			}
		}));
	}

	// Wait for every probe before judging the aggregate. A panicked
	// probe counts as a failure but cannot abort its siblings.
	for handle in handles {
		if handle.await.is_err() {
			error!("Probe task panicked");
			failed.store(true, Ordering::SeqCst);
		}
	}

	if failed.load(Ordering::SeqCst) {
		error!("Verification failed");
		std::process::exit(1);
	}
	info!("Verification passed");
	Ok(())
}

async fn supported_handles(client: &reqwest::Client, base_url: &str) -> Result<HashSet<String>> {
	let response: Endpoints = client
		.get(format!("{base_url}/v1/"))
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;
	Ok(response.endpoints.into_iter().collect())
}

/// Picks the coins worth probing. Platforms the server does not enable
/// are skipped, or flagged as failures under `--all`.
fn select_tests(
	coins: &CoinList,
	supported: &HashSet<String>,
	require_all: bool,
	failed: &AtomicBool,
) -> Vec<Coin> {
	let mut tests = Vec::new();
	for coin in coins.iter() {
		if !supported.contains(&coin.handle) {
			if require_all {
				error!(platform = %coin.handle, "Platform not enabled at server but required");
				failed.store(true, Ordering::SeqCst);
			} else {
				warn!(platform = %coin.handle, "Platform not enabled at server, skipping");
			}
			continue;
		}
		if coin.sample_address.is_none() {
			warn!(platform = %coin.handle, "No sample address, skipping");
			continue;
		}
		tests.push(coin.clone());
	}
	tests
}

async fn probe(client: &reqwest::Client, base_url: &str, coin: &Coin) -> Result<()> {
	let address = coin
		.sample_address
		.as_deref()
		.context("no sample address")?;
	let url = format!("{base_url}/v1/{}/{}/txs", coin.handle, address);

	let response = client.get(&url).send().await?;
	ensure!(
		response.status().is_success(),
		"status {}",
		response.status()
	);
	let content_type = response
		.headers()
		.get(reqwest::header::CONTENT_TYPE)
		.and_then(|v| v.to_str().ok())
		.unwrap_or_default()
		.to_string();
	ensure!(
		content_type.starts_with("application/json"),
		"unexpected content type {content_type:?}"
	);

	let page: TxPage = response.json().await?;
	if page.is_empty() {
		warn!(platform = %coin.handle, "No transactions");
		return Ok(());
	}
	check_page(&page, coin)
}

/// Validates the invariants a served page must uphold: descending
/// chronological order and the right coin id on every transaction.
fn check_page(page: &TxPage, coin: &Coin) -> Result<()> {
	let mut last = i64::MAX;
	for tx in &page.0 {
		ensure!(
			tx.date <= last,
			"transactions not in chronological order: {} after {}",
			tx.date,
			last
		);
		last = tx.date;
		ensure!(tx.coin == coin.id, "wrong coin id {} on {}", tx.coin, tx.id);
	}
	Ok(())
}
