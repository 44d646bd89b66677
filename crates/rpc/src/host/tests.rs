use pretty_assertions::assert_eq;
use stencil_content::{Card, ContentSnapshot, Template, TopicConfig, TopicEntry};
use stencil_ops::{OperationOptions, Outcome};
use stencil_platform::{Document, HeadlessPlatform, HostEvent, HostEventKind};

use super::*;
use crate::bridge::Bridge;
use crate::error::BridgeError;
use crate::remote::RemoteServices;

fn content() -> Arc<ContentStore> {
	let store = ContentStore::new();
	store
		.reload(ContentSnapshot {
			languages: Vec::new(),
			topics: vec![TopicEntry::new(TopicConfig::new("c", "C")).with_child(
				TopicEntry::new(TopicConfig::new("basic", "Basics")).with_template(Template {
					name: "hello".into(),
					title: "Hello".into(),
					description: String::new(),
					code: "puts(\"hi\");".into(),
					language: "c".into(),
					documentation: None,
				}),
			)],
		})
		.unwrap();
	Arc::new(store)
}

fn endpoint(host: &Arc<HeadlessPlatform>) -> Arc<HostEndpoint> {
	let ops = CodeOperationService::new(content(), Arc::new(host.adapter()));
	Arc::new(HostEndpoint::new(Arc::new(ops)))
}

#[tokio::test]
async fn non_requests_get_no_reply() {
	let endpoint = endpoint(&HeadlessPlatform::new());
	assert_eq!(endpoint.handle(json!({ "type": "ready" })).await, None);
	assert_eq!(endpoint.handle(json!({ "type": "getTemplate", "requestId": 7 })).await, None);
}

#[tokio::test]
async fn unknown_methods_get_service_errors() {
	let endpoint = endpoint(&HeadlessPlatform::new());
	let reply = endpoint
		.handle(json!({ "type": "formatDisk", "requestId": "1-0" }))
		.await
		.unwrap();
	assert_eq!(reply["type"], json!("serviceError"));
	assert_eq!(reply["requestId"], json!("1-0"));
	assert!(reply["error"].as_str().unwrap().starts_with("unsupported request"));
}

#[tokio::test]
async fn display_requests_are_answered_from_the_catalog() {
	let endpoint = endpoint(&HeadlessPlatform::new());
	let reply = endpoint
		.handle(json!({ "type": "fullDisplayPath", "requestId": "1-1", "path": "c/basic" }))
		.await
		.unwrap();
	assert_eq!(
		reply,
		json!({ "type": "serviceResponse", "requestId": "1-1", "result": "C / Basics" })
	);
}

#[tokio::test]
async fn remote_calls_round_trip_through_the_host() {
	let host = HeadlessPlatform::new();
	host.set_document(Some(Document::new("")));
	let endpoint = endpoint(&host);

	let (to_host, host_inbox) = mpsc::unbounded_channel();
	let (to_ui, ui_inbox) = mpsc::unbounded_channel();
	tokio::spawn(endpoint.serve(host_inbox, Arc::new(to_ui)));
	let bridge = Arc::new(Bridge::new(to_host));
	let pump = {
		let bridge = bridge.clone();
		tokio::spawn(async move { bridge.pump(ui_inbox).await })
	};
	let remote = RemoteServices::new(bridge);

	let outcome = remote
		.insert_template("c/basic/templates/hello", OperationOptions::silent())
		.await
		.unwrap();
	assert_eq!(outcome, Outcome::Inserted);
	assert_eq!(host.document().unwrap().text, "puts(\"hi\");");

	let roots = remote.cards(None).await.unwrap();
	assert_eq!(roots.len(), 1);
	assert_eq!(roots[0].address(), "c");
	let cards = remote.cards(Some("c/basic")).await.unwrap();
	assert!(matches!(&cards[0], Card::Template { address, .. } if address == "c/basic/templates/hello"));

	assert_eq!(remote.topic_display_name("c/basic").await.unwrap(), "Basics");
	assert_eq!(remote.language_display_name("rust").await.unwrap(), "Rust");
	assert_eq!(remote.template("c/basic/templates/nope").await.unwrap(), None);

	let err = remote
		.copy_template("c/basic/templates/nope", OperationOptions::silent())
		.await
		.unwrap_err();
	assert!(matches!(err, BridgeError::Remote(msg) if msg == "template not found: c/basic/templates/nope"));
	let err = remote.cards(Some("go")).await.unwrap_err();
	assert!(matches!(err, BridgeError::Remote(msg) if msg == "topic not found: go"));

	assert_eq!(remote.bridge().pending_count(), 0);
	assert!(host.ui_calls().is_empty());
	drop(remote);
	pump.abort();
}

#[tokio::test]
async fn reload_requests_swap_content_and_notify_listeners() {
	let endpoint = endpoint(&HeadlessPlatform::new());
	let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
	{
		let seen = seen.clone();
		endpoint
			.ops
			.platform()
			.events()
			.on(HostEventKind::ContentReloaded, move |event| {
				if let HostEvent::ContentReloaded { generation } = event {
					seen.lock().push(*generation);
				}
				Ok(())
			});
	}

	let snapshot = ContentSnapshot {
		languages: Vec::new(),
		topics: vec![TopicEntry::new(TopicConfig::new("go", "Go"))],
	};
	let reply = endpoint
		.handle(json!({ "type": "reloadContent", "requestId": "1-2", "snapshot": snapshot }))
		.await
		.unwrap();
	assert_eq!(reply["result"], json!(2));
	assert_eq!(*seen.lock(), vec![2]);
	assert_eq!(endpoint.content().template("c/basic/templates/hello"), None);

	let duplicated = json!({ "topics": [{ "name": "go", "title": "Go" }, { "name": "go", "title": "Again" }] });
	let reply = endpoint
		.handle(json!({ "type": "reloadContent", "requestId": "1-3", "snapshot": duplicated }))
		.await
		.unwrap();
	assert_eq!(reply["type"], json!("serviceError"));
	assert_eq!(*seen.lock(), vec![2]);
	assert_eq!(endpoint.content().load().generation, 2);
}
