//! Transaction aggregation API server.
//!
//! Startup is strictly ordered: configuration, coin list, platform
//! registry, route tree, then the listener. Any failure before the
//! listener is fatal; the core components only return errors, the
//! decision to abort is made here.

use anyhow::{Context, Result};
use atlas_config::ConfigLoader;
use atlas_platforms::PlatformRegistry;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

#[derive(Parser)]
#[command(name = "atlas-api")]
#[command(about = "Blockchain transaction aggregation API", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	/// Path to configuration file
	#[arg(short, long, value_name = "FILE", env = "ATLAS_CONFIG")]
	config: Option<PathBuf>,

	/// Bind address override
	#[arg(long)]
	bind: Option<String>,

	#[arg(long, env = "ATLAS_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	setup_tracing(&cli.log_level);

	let mut loader = ConfigLoader::new();
	if let Some(path) = &cli.config {
		loader = loader.with_file(path);
	}
	let config = loader.load().context("Failed to load configuration")?;

	let coins = atlas_coins::load(&config.coins.file).context("Failed to load coin list")?;

	let registry = Arc::new(
		PlatformRegistry::build(&coins, &config)
			.context("Failed to build platform registry")?,
	);
	info!(platforms = registry.len(), "Platform registry ready");

	let app = router::compose(registry)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive());

	let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
	let listener = tokio::net::TcpListener::bind(&bind)
		.await
		.with_context(|| format!("Failed to bind {bind}"))?;
	info!(%bind, "API server listening");

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("Server error")?;

	info!("Server stopped");
	Ok(())
}

fn setup_tracing(log_level: &str) {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
