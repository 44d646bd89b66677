//! Typed client over a [`Bridge`].

use std::sync::Arc;

use stencil_content::{Card, ContentSnapshot, Fallback, Template};
use stencil_ops::{OperationOptions, Outcome};

use crate::bridge::{Bridge, MessageSink};
use crate::error::Result;
use crate::message::ServiceRequest;

/// The host's services as seen from an isolated UI surface.
pub struct RemoteServices<S> {
	bridge: Arc<Bridge<S>>,
}

impl<S> Clone for RemoteServices<S> {
	fn clone(&self) -> Self {
		Self {
			bridge: self.bridge.clone(),
		}
	}
}

impl<S: MessageSink> RemoteServices<S> {
	pub fn new(bridge: Arc<Bridge<S>>) -> Self {
		Self { bridge }
	}

	pub fn bridge(&self) -> &Arc<Bridge<S>> {
		&self.bridge
	}

	pub async fn copy_template(&self, address: &str, options: OperationOptions) -> Result<Outcome> {
		self.bridge
			.call(ServiceRequest::CopyTemplate {
				address: address.to_string(),
				options,
			})
			.await
	}

	pub async fn insert_template(&self, address: &str, options: OperationOptions) -> Result<Outcome> {
		self.bridge
			.call(ServiceRequest::InsertTemplate {
				address: address.to_string(),
				options,
			})
			.await
	}

	pub async fn copy_code_snippet(
		&self,
		code: &str,
		address: Option<&str>,
		options: OperationOptions,
	) -> Result<Outcome> {
		self.bridge
			.call(ServiceRequest::CopyCodeSnippet {
				code: code.to_string(),
				address: address.map(str::to_string),
				options,
			})
			.await
	}

	pub async fn insert_code_snippet(
		&self,
		code: &str,
		address: Option<&str>,
		options: OperationOptions,
	) -> Result<Outcome> {
		self.bridge
			.call(ServiceRequest::InsertCodeSnippet {
				code: code.to_string(),
				address: address.map(str::to_string),
				options,
			})
			.await
	}

	/// Sends new content to the host. Returns its generation.
	pub async fn reload_content(&self, snapshot: ContentSnapshot) -> Result<u64> {
		self.bridge
			.call(ServiceRequest::ReloadContent { snapshot })
			.await
	}

	pub async fn template(&self, address: &str) -> Result<Option<Template>> {
		self.bridge
			.call(ServiceRequest::GetTemplate {
				address: address.to_string(),
			})
			.await
	}

	/// Cards of `topic_path`, or of the root level.
	pub async fn cards(&self, topic_path: Option<&str>) -> Result<Vec<Card>> {
		self.bridge
			.call(ServiceRequest::GetCards {
				topic_path: topic_path.map(str::to_string),
			})
			.await
	}

	pub async fn language_display_name(&self, name: &str) -> Result<String> {
		self.bridge
			.call(ServiceRequest::LanguageDisplayName {
				name: name.to_string(),
				fallback: Fallback::LANGUAGE,
			})
			.await
	}

	pub async fn topic_display_name(&self, path: &str) -> Result<String> {
		self.bridge
			.call(ServiceRequest::TopicDisplayName {
				path: path.to_string(),
				fallback: Fallback::TOPIC,
			})
			.await
	}

	pub async fn full_display_path(&self, path: &str) -> Result<String> {
		self.bridge
			.call(ServiceRequest::FullDisplayPath {
				path: path.to_string(),
			})
			.await
	}
}
