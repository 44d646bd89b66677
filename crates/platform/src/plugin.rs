//! Plugin registry owned by the adapter.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::adapter::PlatformAdapter;
use crate::error::{PlatformError, Result};

/// An extension activated against a [`PlatformAdapter`].
pub trait Plugin: Send + Sync {
	/// Unique id of this plugin.
	fn id(&self) -> &str;

	/// Called once on registration. Returning an error aborts registration.
	fn activate(&self, adapter: &PlatformAdapter) -> Result<()>;

	/// Called when the plugin is removed from the registry.
	fn deactivate(&self) {}
}

/// Registered plugins keyed by id, in registration order.
#[derive(Default)]
pub struct PluginRegistry {
	plugins: RwLock<Vec<Arc<dyn Plugin>>>,
	index: RwLock<HashMap<String, usize>>,
}

impl std::fmt::Debug for PluginRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PluginRegistry").field("ids", &self.ids()).finish()
	}
}

impl PluginRegistry {
	pub fn contains(&self, id: &str) -> bool {
		self.index.read().contains_key(id)
	}

	pub fn get(&self, id: &str) -> Option<Arc<dyn Plugin>> {
		let idx = *self.index.read().get(id)?;
		self.plugins.read().get(idx).cloned()
	}

	/// Ids in registration order.
	pub fn ids(&self) -> Vec<String> {
		self.plugins.read().iter().map(|p| p.id().to_string()).collect()
	}

	pub fn len(&self) -> usize {
		self.plugins.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub(crate) fn insert(&self, plugin: Arc<dyn Plugin>) -> Result<()> {
		let mut plugins = self.plugins.write();
		let mut index = self.index.write();
		let id = plugin.id().to_string();
		if index.contains_key(&id) {
			return Err(PlatformError::DuplicatePlugin(id));
		}
		index.insert(id, plugins.len());
		plugins.push(plugin);
		Ok(())
	}

	pub(crate) fn remove(&self, id: &str) -> Option<Arc<dyn Plugin>> {
		let mut plugins = self.plugins.write();
		let mut index = self.index.write();
		let idx = index.remove(id)?;
		let plugin = plugins.remove(idx);
		for slot in index.values_mut() {
			if *slot > idx {
				*slot -= 1;
			}
		}
		Some(plugin)
	}

	pub(crate) fn drain(&self) -> Vec<Arc<dyn Plugin>> {
		let mut plugins = self.plugins.write();
		self.index.write().clear();
		std::mem::take(&mut *plugins)
	}
}
