//! Per-template usage counters kept in host storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stencil_platform::{PlatformAdapter, PlatformError};
use tokio::sync::Mutex;
use tracing::debug;

/// Storage key prefix for usage entries.
pub const USAGE_KEY_PREFIX: &str = "usage/";

/// How often and how recently a template was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
	pub count: u64,
	pub last_used: DateTime<Utc>,
}

/// Records that a template was used.
#[async_trait]
pub trait UsageTracker: Send + Sync {
	/// Bumps the counter for `address` and returns the updated record.
	async fn record(&self, address: &str) -> Result<UsageRecord, PlatformError>;
}

fn usage_key(address: &str) -> String {
	format!("{USAGE_KEY_PREFIX}{address}")
}

/// [`UsageTracker`] backed by the adapter's storage capability.
///
/// Updates are read-modify-write against storage, so they go through a single
/// writer lock; concurrent records on one tracker never lose an increment.
pub struct StorageUsageTracker {
	platform: Arc<PlatformAdapter>,
	writer: Mutex<()>,
}

impl StorageUsageTracker {
	pub fn new(platform: Arc<PlatformAdapter>) -> Self {
		Self {
			platform,
			writer: Mutex::new(()),
		}
	}

	/// Reads the stored record for `address`.
	///
	/// Entries that fail to decode read as absent.
	pub async fn usage(&self, address: &str) -> Result<Option<UsageRecord>, PlatformError> {
		let Some(value) = self.platform.storage().get(&usage_key(address)).await? else {
			return Ok(None);
		};
		match serde_json::from_value(value) {
			Ok(record) => Ok(Some(record)),
			Err(err) => {
				debug!(%address, error = %err, "usage.decode_failed");
				Ok(None)
			}
		}
	}
}

#[async_trait]
impl UsageTracker for StorageUsageTracker {
	async fn record(&self, address: &str) -> Result<UsageRecord, PlatformError> {
		let _guard = self.writer.lock().await;
		let count = self.usage(address).await?.map_or(0, |r| r.count);
		let record = UsageRecord {
			count: count + 1,
			last_used: Utc::now(),
		};
		self.platform
			.storage()
			.set(&usage_key(address), serde_json::to_value(&record)?)
			.await?;
		debug!(%address, count = record.count, "usage.recorded");
		Ok(record)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use stencil_platform::{Faults, HeadlessPlatform, StorageAccess};

	use super::*;

	#[tokio::test]
	async fn counts_accumulate_per_address() {
		let host = HeadlessPlatform::new();
		let tracker = StorageUsageTracker::new(Arc::new(host.adapter()));

		assert_eq!(tracker.record("c/templates/a").await.unwrap().count, 1);
		assert_eq!(tracker.record("c/templates/a").await.unwrap().count, 2);
		assert_eq!(tracker.record("c/templates/b").await.unwrap().count, 1);

		let stored = host.stored("usage/c/templates/a").unwrap();
		assert_eq!(stored["count"], json!(2));
		assert!(stored.get("lastUsed").is_some());
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_records_are_not_lost() {
		let host = HeadlessPlatform::new();
		let tracker = Arc::new(StorageUsageTracker::new(Arc::new(host.adapter())));

		let tasks: Vec<_> = (0..32)
			.map(|_| {
				let tracker = tracker.clone();
				tokio::spawn(async move { tracker.record("x/templates/y").await.map(|r| r.count) })
			})
			.collect();
		for task in tasks {
			task.await.unwrap().unwrap();
		}
		assert_eq!(tracker.usage("x/templates/y").await.unwrap().unwrap().count, 32);
	}

	#[tokio::test]
	async fn garbage_entries_restart_the_count() {
		let host = HeadlessPlatform::new();
		host.set("usage/a/templates/b", json!("nonsense")).await.unwrap();
		let tracker = StorageUsageTracker::new(Arc::new(host.adapter()));
		assert_eq!(tracker.record("a/templates/b").await.unwrap().count, 1);
	}

	#[tokio::test]
	async fn storage_failures_surface() {
		let host = HeadlessPlatform::new();
		host.set_faults(Faults {
			storage: true,
			..Faults::default()
		});
		let tracker = StorageUsageTracker::new(Arc::new(host.adapter()));
		assert!(matches!(
			tracker.record("a/templates/b").await,
			Err(PlatformError::Storage(_))
		));
	}
}
