//! Bridge failures.

use std::time::Duration;

/// A convenient type alias for `Result` with `E` = [`BridgeError`].
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

/// Why a bridged request did not produce a value.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BridgeError {
	/// No response arrived in time. The request is forgotten; a late
	/// response is dropped.
	#[error("request {id} timed out after {after:?}")]
	Timeout { id: String, after: Duration },
	/// The host answered with `serviceError`.
	#[error("{0}")]
	Remote(String),
	/// The transport refused the outbound message.
	#[error("transport failed: {0}")]
	Transport(String),
	/// A message or result could not be encoded or decoded.
	#[error("malformed message: {0}")]
	Decode(#[from] serde_json::Error),
	/// The bridge was closed while the request was pending.
	#[error("bridge closed before a response arrived")]
	Closed,
}
