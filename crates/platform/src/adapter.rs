//! The capability set core logic runs against.
//!
//! A [`PlatformAdapter`] bundles one implementation of each capability trait
//! with host metadata, configuration, plugins, and the host event emitter.
//! Core services take an `Arc<PlatformAdapter>` and never see the concrete
//! host type.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::capabilities::{ClipboardAccess, EditorAccess, StorageAccess, UiAccess};
use crate::config::Configuration;
use crate::error::{PlatformError, Result};
use crate::events::{EventEmitter, HostEvent};
use crate::plugin::{Plugin, PluginRegistry};

/// Host identification and optional features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
	pub name: String,
	pub features: Vec<String>,
}

impl PlatformInfo {
	pub fn new<I, S>(name: impl Into<String>, features: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			features: features.into_iter().map(Into::into).collect(),
		}
	}
}

/// One implementation of every capability trait.
#[derive(Clone)]
pub struct Capabilities {
	pub editor: Arc<dyn EditorAccess>,
	pub ui: Arc<dyn UiAccess>,
	pub clipboard: Arc<dyn ClipboardAccess>,
	pub storage: Arc<dyn StorageAccess>,
}

impl Capabilities {
	/// Uses a single host object for all four capabilities.
	pub fn from_host<H>(host: Arc<H>) -> Self
	where
		H: EditorAccess + UiAccess + ClipboardAccess + StorageAccess + 'static,
	{
		Self {
			editor: host.clone(),
			ui: host.clone(),
			clipboard: host.clone(),
			storage: host,
		}
	}
}

/// Capability set plus host-wide state.
pub struct PlatformAdapter {
	info: PlatformInfo,
	caps: Capabilities,
	config: RwLock<Configuration>,
	plugins: PluginRegistry,
	events: EventEmitter<HostEvent>,
}

impl std::fmt::Debug for PlatformAdapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PlatformAdapter")
			.field("info", &self.info)
			.field("plugins", &self.plugins)
			.finish_non_exhaustive()
	}
}

impl PlatformAdapter {
	pub fn new(info: PlatformInfo, caps: Capabilities) -> Self {
		debug!(host = %info.name, features = ?info.features, "platform.created");
		Self {
			info,
			caps,
			config: RwLock::new(Configuration::default()),
			plugins: PluginRegistry::default(),
			events: EventEmitter::new(),
		}
	}

	pub fn info(&self) -> &PlatformInfo {
		&self.info
	}

	/// Returns true if the host advertises `feature`.
	pub fn supports(&self, feature: &str) -> bool {
		self.info.features.iter().any(|f| f == feature)
	}

	pub fn editor(&self) -> &dyn EditorAccess {
		self.caps.editor.as_ref()
	}

	pub fn ui(&self) -> &dyn UiAccess {
		self.caps.ui.as_ref()
	}

	pub fn clipboard(&self) -> &dyn ClipboardAccess {
		self.caps.clipboard.as_ref()
	}

	pub fn storage(&self) -> &dyn StorageAccess {
		self.caps.storage.as_ref()
	}

	pub fn events(&self) -> &EventEmitter<HostEvent> {
		&self.events
	}

	/// Decodes one configuration value.
	pub fn config_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
		self.config.read().get_as(key)
	}

	/// Shallow-merges `partial` into the configuration.
	///
	/// Emits [`HostEvent::ConfigurationChanged`] when at least one key changed.
	pub fn update_configuration(&self, partial: Map<String, Value>) -> Vec<String> {
		let changed = self.config.write().merge(partial);
		if !changed.is_empty() {
			debug!(keys = ?changed, "platform.config_updated");
			self.events.emit(&HostEvent::ConfigurationChanged {
				keys: changed.clone(),
			});
		}
		changed
	}

	pub fn plugins(&self) -> &PluginRegistry {
		&self.plugins
	}

	/// Activates and registers `plugin`.
	///
	/// Fails if the id is taken or activation fails; in both cases the
	/// registry is unchanged.
	pub fn register_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<()> {
		let id = plugin.id().to_string();
		if self.plugins.contains(&id) {
			return Err(PlatformError::DuplicatePlugin(id));
		}
		plugin.activate(self).map_err(|err| match err {
			err @ PlatformError::PluginActivation { .. } => err,
			other => PlatformError::PluginActivation {
				id: id.clone(),
				reason: other.to_string(),
			},
		})?;
		if let Err(err) = self.plugins.insert(plugin.clone()) {
			// Registered concurrently by someone else.
			plugin.deactivate();
			return Err(err);
		}
		info!(plugin = %id, "platform.plugin_registered");
		self.events.emit(&HostEvent::PluginRegistered { id });
		Ok(())
	}

	/// Removes and deactivates a plugin. Returns false if it was not registered.
	pub fn unregister_plugin(&self, id: &str) -> bool {
		let Some(plugin) = self.plugins.remove(id) else {
			return false;
		};
		plugin.deactivate();
		info!(plugin = %id, "platform.plugin_unregistered");
		self.events.emit(&HostEvent::PluginUnregistered { id: id.to_string() });
		true
	}

	/// Deactivates every plugin, most recently registered first.
	pub fn clear_plugins(&self) {
		for plugin in self.plugins.drain().into_iter().rev() {
			plugin.deactivate();
			self.events.emit(&HostEvent::PluginUnregistered {
				id: plugin.id().to_string(),
			});
		}
	}
}
