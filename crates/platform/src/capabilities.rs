//! Fine-grained capability traits a host implements.
//!
//! Each trait covers one independent concern so a host can back them with
//! unrelated subsystems, and core logic can be exercised against any host:
//!
//! - [`EditorAccess`] - cursor context and text insertion
//! - [`UiAccess`] - user-facing messages with optional action buttons
//! - [`ClipboardAccess`] - system clipboard
//! - [`StorageAccess`] - key-value persistence for configuration and usage data
//!
//! All traits are object safe; the adapter stores them as `Arc<dyn _>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// One level of indentation as configured in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndentUnit {
	Tab,
	Spaces(u8),
}

impl Default for IndentUnit {
	fn default() -> Self {
		Self::Spaces(4)
	}
}

impl IndentUnit {
	/// Renders `levels` indentation levels.
	pub fn repeat(self, levels: usize) -> String {
		match self {
			Self::Tab => "\t".repeat(levels),
			Self::Spaces(width) => " ".repeat(levels * usize::from(width)),
		}
	}

	/// Guesses the unit from a line's leading whitespace.
	pub fn detect(prefix: &str) -> Option<Self> {
		if prefix.starts_with('\t') {
			return Some(Self::Tab);
		}
		let spaces = prefix.chars().take_while(|c| *c == ' ').count();
		match spaces {
			0 => None,
			n if n % 4 == 0 => Some(Self::Spaces(4)),
			n if n % 2 == 0 => Some(Self::Spaces(2)),
			_ => None,
		}
	}
}

/// Indentation implied by the current cursor position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndentContext {
	/// Leading whitespace of the cursor line.
	pub line_prefix: String,
	/// Editor's configured indent unit.
	pub unit: IndentUnit,
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
	#[default]
	Info,
	Warning,
	Error,
}

/// Editor access.
///
/// Every method other than [`EditorAccess::is_editor_active`] may fail with
/// [`PlatformError::NoActiveEditor`](crate::PlatformError::NoActiveEditor).
#[async_trait]
pub trait EditorAccess: Send + Sync {
	/// Returns true if a text editor currently has focus.
	fn is_editor_active(&self) -> bool;

	/// Returns the language of the active document, if known.
	fn active_language(&self) -> Option<String> {
		None
	}

	/// Returns the indentation at the cursor.
	async fn indentation_context(&self) -> Result<IndentContext>;

	/// Inserts `text` at the cursor, replacing any selection.
	async fn insert_text(&self, text: &str) -> Result<()>;

	/// Returns the selected text, if any.
	async fn selected_text(&self) -> Result<Option<String>> {
		Ok(None)
	}

	/// Opens a new, empty document and makes it the active editor.
	async fn create_document(&self, language: Option<&str>) -> Result<()>;
}

/// User-facing messages.
///
/// Returns the label of the action the user picked, or `None` when the message
/// was dismissed or had no actions.
#[async_trait]
pub trait UiAccess: Send + Sync {
	async fn show_message(&self, level: MessageLevel, message: &str, actions: &[&str]) -> Option<String>;

	async fn show_info(&self, message: &str, actions: &[&str]) -> Option<String> {
		self.show_message(MessageLevel::Info, message, actions).await
	}

	async fn show_warning(&self, message: &str, actions: &[&str]) -> Option<String> {
		self.show_message(MessageLevel::Warning, message, actions).await
	}

	async fn show_error(&self, message: &str, actions: &[&str]) -> Option<String> {
		self.show_message(MessageLevel::Error, message, actions).await
	}
}

/// System clipboard.
#[async_trait]
pub trait ClipboardAccess: Send + Sync {
	async fn write_text(&self, text: &str) -> Result<()>;

	async fn read_text(&self) -> Result<String>;
}

/// Key-value persistence.
#[async_trait]
pub trait StorageAccess: Send + Sync {
	async fn get(&self, key: &str) -> Result<Option<Value>>;

	async fn set(&self, key: &str, value: Value) -> Result<()>;

	async fn remove(&self, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn indent_unit_renders_levels() {
		assert_eq!(IndentUnit::Tab.repeat(2), "\t\t");
		assert_eq!(IndentUnit::Spaces(2).repeat(3), "      ");
		assert_eq!(IndentUnit::default().repeat(0), "");
	}

	#[test]
	fn indent_unit_detection() {
		assert_eq!(IndentUnit::detect("\t  "), Some(IndentUnit::Tab));
		assert_eq!(IndentUnit::detect("        "), Some(IndentUnit::Spaces(4)));
		assert_eq!(IndentUnit::detect("  "), Some(IndentUnit::Spaces(2)));
		assert_eq!(IndentUnit::detect(""), None);
		assert_eq!(IndentUnit::detect("   "), None);
	}
}
