//! Operations driven across content reloads.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use stencil_content::{ContentSnapshot, ContentStore};
use stencil_ops::{CodeOperationService, OperationError, OperationOptions, Outcome, StorageUsageTracker};
use stencil_platform::{Document, HeadlessPlatform};

const SNAPSHOT: &str = r#"{
	"languages": [{ "name": "python", "title": "Python", "fileExtensions": [".py"] }],
	"topics": [{
		"name": "python",
		"title": "Python",
		"templates": [{
			"name": "main",
			"title": "Main guard",
			"code": "if __name__ == \"__main__\":\n\tmain()\n",
			"language": "python"
		}]
	}]
}"#;

#[tokio::test]
async fn renamed_topic_moves_template_addresses() {
	let content = Arc::new(ContentStore::new());
	content.reload(ContentSnapshot::from_json(SNAPSHOT).unwrap()).unwrap();

	let host = HeadlessPlatform::new();
	host.set_document(Some(Document::new("")));
	let platform = Arc::new(host.adapter());
	let service = CodeOperationService::new(content.clone(), platform.clone());

	let outcome = service
		.insert_template("python/templates/main", &OperationOptions::silent())
		.await
		.unwrap();
	assert_eq!(outcome, Outcome::Inserted);
	assert_eq!(
		host.document().unwrap().text,
		"if __name__ == \"__main__\":\n    main()"
	);

	let mut renamed = ContentSnapshot::from_json(SNAPSHOT).unwrap();
	renamed.topic_mut("python").unwrap().config.name = "py".into();
	content.reload(renamed).unwrap();

	let err = service
		.copy_template("python/templates/main", &OperationOptions::silent())
		.await
		.unwrap_err();
	assert!(matches!(err, OperationError::TemplateNotFound(_)));

	service
		.copy_template("py/templates/main", &OperationOptions::silent())
		.await
		.unwrap();

	let usage = StorageUsageTracker::new(platform);
	assert_eq!(usage.usage("python/templates/main").await.unwrap().unwrap().count, 1);
	assert_eq!(usage.usage("py/templates/main").await.unwrap().unwrap().count, 1);
	assert!(host.ui_calls().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_operations_count_every_use() {
	let content = Arc::new(ContentStore::new());
	content.reload(ContentSnapshot::from_json(SNAPSHOT).unwrap()).unwrap();
	let host = HeadlessPlatform::new();
	host.set_document(Some(Document::new("")));
	let platform = Arc::new(host.adapter());
	let service = Arc::new(CodeOperationService::new(content, platform.clone()));

	let tasks: Vec<_> = (0..8)
		.map(|_| {
			let service = service.clone();
			tokio::spawn(async move {
				service
					.copy_template("python/templates/main", &OperationOptions::silent())
					.await
					.map(|_| ())
			})
		})
		.collect();
	for task in tasks {
		task.await.unwrap().unwrap();
	}

	let usage = StorageUsageTracker::new(platform);
	assert_eq!(usage.usage("python/templates/main").await.unwrap().unwrap().count, 8);
}
