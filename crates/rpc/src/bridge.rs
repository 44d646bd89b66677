//! Request/response correlation over a one-way message channel.
//!
//! A UI surface that can only post opaque messages to the host uses a
//! [`Bridge`] to turn that channel into async calls. Each request gets a fresh
//! correlation id and a pending slot; the matching `serviceResponse` or
//! `serviceError` fills the slot. Requests without an answer expire after the
//! bridge timeout.

use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::error::{BridgeError, Result};
use crate::id::CorrelationIdGen;
use crate::message::{Inbound, Outbound, ServiceRequest};

/// Default time a request waits for its response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

type Reply = std::result::Result<Value, String>;
type Pending = Mutex<HashMap<String, oneshot::Sender<Reply>>>;

/// Removes a request's pending slot on drop, so a caller that stops waiting
/// does not leave its sender behind.
struct PendingSlot<'a> {
	pending: &'a Pending,
	id: &'a str,
}

impl Drop for PendingSlot<'_> {
	fn drop(&mut self) {
		self.pending.lock().remove(self.id);
	}
}

/// Posts messages towards the host.
pub trait MessageSink: Send + Sync {
	fn post(&self, message: Value) -> Result<()>;
}

impl MessageSink for mpsc::UnboundedSender<Value> {
	fn post(&self, message: Value) -> Result<()> {
		self.send(message)
			.map_err(|_| BridgeError::Transport("receiver dropped".into()))
	}
}

impl MessageSink for mpsc::Sender<Value> {
	fn post(&self, message: Value) -> Result<()> {
		self.try_send(message)
			.map_err(|err| BridgeError::Transport(err.to_string()))
	}
}

/// Client side of the message bridge.
///
/// The pending map belongs to this instance. Two bridges never see each
/// other's responses.
pub struct Bridge<S> {
	sink: S,
	ids: CorrelationIdGen,
	pending: Pending,
	timeout: Duration,
}

impl<S> std::fmt::Debug for Bridge<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Bridge")
			.field("pending", &self.pending.lock().len())
			.field("timeout", &self.timeout)
			.finish_non_exhaustive()
	}
}

impl<S: MessageSink> Bridge<S> {
	pub fn new(sink: S) -> Self {
		Self::with_timeout(sink, DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(sink: S, timeout: Duration) -> Self {
		Self {
			sink,
			ids: CorrelationIdGen::new(),
			pending: Mutex::new(HashMap::default()),
			timeout,
		}
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Number of requests still waiting for a response.
	pub fn pending_count(&self) -> usize {
		self.pending.lock().len()
	}

	/// Sends `request` and waits for the raw result.
	pub async fn request(&self, request: ServiceRequest) -> Result<Value> {
		let method = request.method();
		let id = self.ids.next();
		let message = serde_json::to_value(Outbound {
			request_id: id.clone(),
			request,
		})?;

		let (tx, rx) = oneshot::channel();
		self.pending.lock().insert(id.clone(), tx);
		let slot = PendingSlot {
			pending: &self.pending,
			id: &id,
		};
		self.sink.post(message)?;
		trace!(%id, method, "bridge.sent");

		let reply = tokio::time::timeout(self.timeout, rx).await;
		drop(slot);
		match reply {
			Ok(Ok(Ok(result))) => Ok(result),
			Ok(Ok(Err(error))) => Err(BridgeError::Remote(error)),
			Ok(Err(_)) => Err(BridgeError::Closed),
			Err(_) => {
				warn!(%id, method, timeout_ms = self.timeout.as_millis() as u64, "bridge.timeout");
				Err(BridgeError::Timeout {
					id,
					after: self.timeout,
				})
			}
		}
	}

	/// Sends `request` and decodes the result as `T`.
	pub async fn call<T: DeserializeOwned>(&self, request: ServiceRequest) -> Result<T> {
		Ok(serde_json::from_value(self.request(request).await?)?)
	}

	/// Feeds one message received from the host.
	///
	/// Returns true if it completed a pending request. Unknown message kinds,
	/// malformed messages, and responses nobody waits for are dropped.
	pub fn receive(&self, message: Value) -> bool {
		let inbound = match serde_json::from_value::<Inbound>(message) {
			Ok(inbound) => inbound,
			Err(err) => {
				debug!(error = %err, "bridge.malformed");
				return false;
			}
		};
		let (id, reply) = match inbound {
			Inbound::ServiceResponse { request_id, result } => (request_id, Ok(result)),
			Inbound::ServiceError { request_id, error } => (request_id, Err(error)),
			Inbound::Unknown => return false,
		};
		let Some(tx) = self.pending.lock().remove(&id) else {
			trace!(%id, "bridge.unmatched");
			return false;
		};
		tx.send(reply).is_ok()
	}

	/// Drains `inbound` into [`Bridge::receive`] until the channel closes.
	pub async fn pump(&self, mut inbound: mpsc::UnboundedReceiver<Value>) {
		while let Some(message) = inbound.recv().await {
			self.receive(message);
		}
		self.close();
	}

	/// Fails every pending request with [`BridgeError::Closed`].
	pub fn close(&self) {
		let drained = std::mem::take(&mut *self.pending.lock());
		if !drained.is_empty() {
			debug!(count = drained.len(), "bridge.closed");
		}
	}
}
