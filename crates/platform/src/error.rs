//! Errors surfaced by host capabilities.

/// A convenient type alias for `Result` with `E` = [`PlatformError`].
pub type Result<T, E = PlatformError> = std::result::Result<T, E>;

/// Failures reported by a host or by the adapter itself.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlatformError {
	/// An editor operation was requested while no editor is focused.
	#[error("no active editor")]
	NoActiveEditor,
	/// The editor rejected an operation.
	#[error("editor operation failed: {0}")]
	Editor(String),
	/// The clipboard could not be read or written.
	#[error("clipboard unavailable: {0}")]
	Clipboard(String),
	/// Key-value storage failed.
	#[error("storage error: {0}")]
	Storage(String),
	/// The host does not provide this capability.
	#[error("unsupported feature: {0}")]
	Unsupported(String),
	/// A plugin with this id is already registered.
	#[error("plugin {0} is already registered")]
	DuplicatePlugin(String),
	/// A plugin refused to activate.
	#[error("plugin {id} failed to activate: {reason}")]
	PluginActivation { id: String, reason: String },
	/// Input/output errors from host-backed resources.
	#[error("{0}")]
	Io(#[from] std::io::Error),
	/// A stored value could not be encoded or decoded.
	#[error("serialization failed: {0}")]
	Serde(#[from] serde_json::Error),
}
