//! Wire messages exchanged with the host.
//!
//! Every message is a JSON object discriminated by `type`. Requests carry their
//! parameters inline next to `requestId`:
//!
//! ```json
//! { "type": "copyTemplate", "requestId": "1712345678901-0", "address": "c/templates/main" }
//! ```
//!
//! The host answers with `serviceResponse` or `serviceError` carrying the same
//! `requestId`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stencil_content::{ContentSnapshot, Fallback};
use stencil_ops::{OperationKind, OperationOptions};

/// Every method the host serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServiceRequest {
	CopyTemplate {
		address: String,
		#[serde(default)]
		options: OperationOptions,
	},
	InsertTemplate {
		address: String,
		#[serde(default)]
		options: OperationOptions,
	},
	CopyCodeSnippet {
		code: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		address: Option<String>,
		#[serde(default)]
		options: OperationOptions,
	},
	InsertCodeSnippet {
		code: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		address: Option<String>,
		#[serde(default)]
		options: OperationOptions,
	},
	/// Replaces the host's content. Returns the new generation.
	ReloadContent { snapshot: ContentSnapshot },
	/// Returns the template at `address`, or `null`.
	GetTemplate { address: String },
	/// Returns the cards of `topic_path`, or of the root level when absent.
	GetCards {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		topic_path: Option<String>,
	},
	LanguageDisplayName {
		name: String,
		#[serde(default = "language_fallback")]
		fallback: Fallback,
	},
	TopicDisplayName {
		path: String,
		#[serde(default = "topic_fallback")]
		fallback: Fallback,
	},
	FullDisplayPath { path: String },
}

fn language_fallback() -> Fallback {
	Fallback::LANGUAGE
}

fn topic_fallback() -> Fallback {
	Fallback::TOPIC
}

impl ServiceRequest {
	/// Wire name of the method.
	pub fn method(&self) -> &'static str {
		match self {
			Self::CopyTemplate { .. } => OperationKind::CopyTemplate.name(),
			Self::InsertTemplate { .. } => OperationKind::InsertTemplate.name(),
			Self::CopyCodeSnippet { .. } => OperationKind::CopySnippet.name(),
			Self::InsertCodeSnippet { .. } => OperationKind::InsertSnippet.name(),
			Self::ReloadContent { .. } => "reloadContent",
			Self::GetTemplate { .. } => "getTemplate",
			Self::GetCards { .. } => "getCards",
			Self::LanguageDisplayName { .. } => "languageDisplayName",
			Self::TopicDisplayName { .. } => "topicDisplayName",
			Self::FullDisplayPath { .. } => "fullDisplayPath",
		}
	}
}

/// A request as posted to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
	#[serde(rename = "requestId")]
	pub request_id: String,
	#[serde(flatten)]
	pub request: ServiceRequest,
}

/// A message received from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Inbound {
	ServiceResponse {
		request_id: String,
		#[serde(default)]
		result: Value,
	},
	ServiceError { request_id: String, error: String },
	/// Any other message kind. Ignored by the bridge.
	#[serde(other)]
	Unknown,
}

impl Inbound {
	pub fn request_id(&self) -> Option<&str> {
		match self {
			Self::ServiceResponse { request_id, .. } | Self::ServiceError { request_id, .. } => {
				Some(request_id)
			}
			Self::Unknown => None,
		}
	}
}
