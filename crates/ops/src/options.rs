//! Operation kinds, caller options, and outcomes.

use serde::{Deserialize, Serialize};

/// Caller-supplied knobs shared by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationOptions {
	/// Suppress every UI call, success or failure.
	pub silent: bool,
	/// Replaces the default success message.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub success_message: Option<String>,
	/// Replaces the default error prefix.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_prefix: Option<String>,
}

impl OperationOptions {
	pub fn silent() -> Self {
		Self {
			silent: true,
			..Self::default()
		}
	}
}

/// Where the formatted code goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
	Clipboard,
	Editor,
}

/// The four public operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
	CopyTemplate,
	InsertTemplate,
	CopySnippet,
	InsertSnippet,
}

impl OperationKind {
	/// Name used in logs and on the wire.
	pub const fn name(self) -> &'static str {
		match self {
			Self::CopyTemplate => "copyTemplate",
			Self::InsertTemplate => "insertTemplate",
			Self::CopySnippet => "copyCodeSnippet",
			Self::InsertSnippet => "insertCodeSnippet",
		}
	}

	pub const fn destination(self) -> Destination {
		match self {
			Self::CopyTemplate | Self::CopySnippet => Destination::Clipboard,
			Self::InsertTemplate | Self::InsertSnippet => Destination::Editor,
		}
	}

	/// True if the unit of work is a whole template.
	pub const fn is_template(self) -> bool {
		matches!(self, Self::CopyTemplate | Self::InsertTemplate)
	}

	pub(crate) const fn default_error_prefix(self) -> &'static str {
		match self {
			Self::CopyTemplate => "Failed to copy template",
			Self::InsertTemplate => "Failed to insert template",
			Self::CopySnippet => "Failed to copy code",
			Self::InsertSnippet => "Failed to insert code",
		}
	}

	pub(crate) fn default_success_message(self, title: Option<&str>) -> String {
		match (self.destination(), title) {
			(Destination::Clipboard, Some(title)) => format!("Template '{title}' copied to clipboard"),
			(Destination::Editor, Some(title)) => format!("Template '{title}' inserted"),
			(Destination::Clipboard, None) => "Code copied to clipboard".to_string(),
			(Destination::Editor, None) => "Code inserted".to_string(),
		}
	}
}

/// Workflow stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
	Resolving,
	CheckingEditor,
	NoEditorRecovery,
	ComputingIndentation,
	Formatting,
	Executing,
	RecordingUsage,
	Reporting,
}

/// How a successful operation delivered the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
	/// Formatted code written to the clipboard.
	Copied,
	/// Formatted code inserted into the active editor.
	Inserted,
	/// No editor was active: raw code went to the clipboard, and optionally
	/// into a newly created document.
	#[serde(rename_all = "camelCase")]
	ClipboardFallback { new_document: bool },
}
