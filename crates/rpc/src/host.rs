//! Host side of the bridge.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use stencil_content::ContentStore;
use stencil_ops::CodeOperationService;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::bridge::MessageSink;
use crate::message::{Outbound, ServiceRequest};

/// Answers bridged requests with the in-process services.
pub struct HostEndpoint {
	ops: Arc<CodeOperationService>,
}

impl std::fmt::Debug for HostEndpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HostEndpoint").finish_non_exhaustive()
	}
}

impl HostEndpoint {
	pub fn new(ops: Arc<CodeOperationService>) -> Self {
		Self { ops }
	}

	fn content(&self) -> &ContentStore {
		self.ops.content()
	}

	/// Handles one message and returns the reply to post back.
	///
	/// Messages without a string `requestId` are not requests and get no
	/// reply.
	pub async fn handle(&self, message: Value) -> Option<Value> {
		let id = message.get("requestId")?.as_str()?.to_string();
		let reply = match serde_json::from_value::<Outbound>(message) {
			Ok(Outbound { request, .. }) => {
				let method = request.method();
				debug!(%id, method, "host.request");
				self.dispatch(request).await.inspect_err(|err| {
					debug!(%id, method, error = %err, "host.request_failed");
				})
			}
			Err(err) => {
				warn!(%id, error = %err, "host.bad_request");
				Err(format!("unsupported request: {err}"))
			}
		};
		Some(match reply {
			Ok(result) => json!({ "type": "serviceResponse", "requestId": id, "result": result }),
			Err(error) => json!({ "type": "serviceError", "requestId": id, "error": error }),
		})
	}

	async fn dispatch(&self, request: ServiceRequest) -> Result<Value, String> {
		match request {
			ServiceRequest::CopyTemplate { address, options } => {
				encode(self.ops.copy_template(&address, &options).await)
			}
			ServiceRequest::InsertTemplate { address, options } => {
				encode(self.ops.insert_template(&address, &options).await)
			}
			ServiceRequest::CopyCodeSnippet {
				code,
				address,
				options,
			} => encode(
				self.ops
					.copy_code_snippet(&code, address.as_deref(), &options)
					.await,
			),
			ServiceRequest::InsertCodeSnippet {
				code,
				address,
				options,
			} => encode(
				self.ops
					.insert_code_snippet(&code, address.as_deref(), &options)
					.await,
			),
			ServiceRequest::ReloadContent { snapshot } => encode(self.ops.reload_content(snapshot)),
			ServiceRequest::GetTemplate { address } => encode(Ok::<_, String>(self.content().template(&address))),
			ServiceRequest::GetCards { topic_path } => {
				let catalog = self.content().load();
				let cards = match topic_path {
					None => Ok(catalog.hierarchy.root_cards()),
					Some(path) => catalog
						.hierarchy
						.cards(&path)
						.ok_or_else(|| format!("topic not found: {path}")),
				};
				encode(cards)
			}
			ServiceRequest::LanguageDisplayName { name, fallback } => {
				let catalog = self.content().load();
				encode(Ok::<_, String>(catalog.display.language_display_name(&name, fallback)))
			}
			ServiceRequest::TopicDisplayName { path, fallback } => {
				let catalog = self.content().load();
				encode(Ok::<_, String>(catalog.display.topic_display_name(&path, fallback)))
			}
			ServiceRequest::FullDisplayPath { path } => {
				let catalog = self.content().load();
				encode(Ok::<_, String>(catalog.display.full_display_path(&path)))
			}
		}
	}

	/// Serves requests from `inbound` until it closes, posting replies to `sink`.
	///
	/// Requests run concurrently; replies are posted in completion order.
	pub async fn serve<S>(self: Arc<Self>, mut inbound: mpsc::UnboundedReceiver<Value>, sink: Arc<S>)
	where
		S: MessageSink + 'static,
	{
		let mut tasks = JoinSet::new();
		loop {
			tokio::select! {
				message = inbound.recv() => {
					let Some(message) = message else { break };
					let endpoint = self.clone();
					let sink = sink.clone();
					tasks.spawn(async move {
						if let Some(reply) = endpoint.handle(message).await
							&& let Err(err) = sink.post(reply)
						{
							warn!(error = %err, "host.reply_dropped");
						}
					});
				}
				Some(joined) = tasks.join_next() => log_join(joined),
			}
		}
		while let Some(joined) = tasks.join_next().await {
			log_join(joined);
		}
		debug!("host.serve_finished");
	}
}

fn encode<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> Result<Value, String> {
	let value = result.map_err(|err| err.to_string())?;
	serde_json::to_value(value).map_err(|err| err.to_string())
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
	if let Err(err) = joined {
		error!(error = %err, "host.request_panicked");
	}
}

#[cfg(test)]
mod tests;
