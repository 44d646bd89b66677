//! User settings read from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use stencil_content::display::DEFAULT_PATH_SEPARATOR;
use stencil_platform::IndentUnit;
use stencil_rpc::DEFAULT_TIMEOUT;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Settings {
	/// Content snapshot used when `--data` is not given.
	pub content_file: Option<PathBuf>,
	/// Where usage counters are kept.
	pub storage_file: Option<PathBuf>,
	pub path_separator: String,
	pub bridge_timeout_ms: u64,
	pub indent: IndentSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct IndentSettings {
	pub use_tabs: bool,
	pub width: u8,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			content_file: None,
			storage_file: None,
			path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
			bridge_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
			indent: IndentSettings::default(),
		}
	}
}

impl Default for IndentSettings {
	fn default() -> Self {
		Self {
			use_tabs: false,
			width: 4,
		}
	}
}

impl IndentSettings {
	pub fn unit(&self) -> IndentUnit {
		if self.use_tabs { IndentUnit::Tab } else { IndentUnit::Spaces(self.width) }
	}
}

impl Settings {
	/// Default settings file location.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("stencil").join("config.toml"))
	}

	/// Reads settings from `path`, or from the default location.
	///
	/// A missing default file yields defaults; a missing explicit file is an
	/// error.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let (path, explicit) = match path {
			Some(path) => (path.to_path_buf(), true),
			None => match Self::default_path() {
				Some(path) => (path, false),
				None => return Ok(Self::default()),
			},
		};
		if !explicit && !path.exists() {
			return Ok(Self::default());
		}
		let text = std::fs::read_to_string(&path)
			.with_context(|| format!("reading settings from {}", path.display()))?;
		Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
	}

	pub fn parse(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	pub fn bridge_timeout(&self) -> Duration {
		Duration::from_millis(self.bridge_timeout_ms)
	}

	pub fn storage_file(&self) -> Option<PathBuf> {
		self.storage_file
			.clone()
			.or_else(|| dirs::data_dir().map(|dir| dir.join("stencil").join("storage.json")))
	}
}
