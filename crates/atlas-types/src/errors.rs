//! Request-time error taxonomy.
//!
//! Every adapter translates its upstream failures into this closed set
//! before they cross the adapter boundary; the serving layer maps each
//! variant to one response status regardless of source chain.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
	/// The address does not parse under the chain's address rules.
	#[error("invalid address")]
	InvalidAddress,

	/// The address is well formed but the source has no data for it.
	#[error("no such address")]
	NotFound,

	/// The upstream explorer is unreachable or returned a server error.
	#[error("source unavailable: {0}")]
	SourceUnavailable(String),

	/// Any other adapter-internal fault. The detail is logged but never
	/// shown to the caller.
	#[error("internal error: {0}")]
	Internal(String),
}
