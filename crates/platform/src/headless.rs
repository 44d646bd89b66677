//! In-memory host.
//!
//! [`HeadlessPlatform`] implements every capability with plain data: a text
//! buffer stands in for the editor, the clipboard is a string, UI prompts are
//! answered from a script, and storage is a map. It records every interaction
//! so callers can inspect what happened. Failures can be injected per
//! capability.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;
use serde_json::Value;

use crate::adapter::{Capabilities, PlatformAdapter, PlatformInfo};
use crate::capabilities::{
	ClipboardAccess, EditorAccess, IndentContext, IndentUnit, MessageLevel, StorageAccess, UiAccess,
};
use crate::error::{PlatformError, Result};

/// Name reported by [`HeadlessPlatform::adapter`].
pub const HEADLESS_NAME: &str = "headless";

/// A text document with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
	pub text: String,
	/// Byte offset of the cursor.
	pub cursor: usize,
	pub language: Option<String>,
}

impl Document {
	/// Creates a document with the cursor at the end.
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		Self {
			cursor: text.len(),
			text,
			language: None,
		}
	}

	/// Leading whitespace of the line containing the cursor.
	pub fn cursor_line_prefix(&self) -> &str {
		let start = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
		let line = &self.text[start..];
		let end = line
			.find(|c: char| c != ' ' && c != '\t')
			.unwrap_or(line.len());
		&line[..end]
	}
}

/// A recorded UI call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiCall {
	pub level: MessageLevel,
	pub message: String,
	pub actions: Vec<String>,
}

/// Which capability calls should fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
	pub clipboard: bool,
	pub indentation: bool,
	pub insert: bool,
	pub create_document: bool,
	pub storage: bool,
}

#[derive(Debug, Default)]
struct State {
	document: Option<Document>,
	created_documents: usize,
	clipboard: Option<String>,
	clipboard_writes: Vec<String>,
	ui_calls: Vec<UiCall>,
	answers: VecDeque<Option<String>>,
	storage: HashMap<String, Value>,
	indent_unit: IndentUnit,
	faults: Faults,
}

/// In-memory implementation of every capability trait.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
	state: Mutex<State>,
}

impl HeadlessPlatform {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Builds an adapter backed by this host.
	pub fn adapter(self: &Arc<Self>) -> PlatformAdapter {
		PlatformAdapter::new(
			PlatformInfo::new(HEADLESS_NAME, ["clipboard", "editor", "storage"]),
			Capabilities::from_host(self.clone()),
		)
	}

	/// Opens `document` as the active editor. `None` closes it.
	pub fn set_document(&self, document: Option<Document>) {
		self.state.lock().document = document;
	}

	pub fn document(&self) -> Option<Document> {
		self.state.lock().document.clone()
	}

	pub fn created_documents(&self) -> usize {
		self.state.lock().created_documents
	}

	pub fn set_indent_unit(&self, unit: IndentUnit) {
		self.state.lock().indent_unit = unit;
	}

	pub fn set_faults(&self, faults: Faults) {
		self.state.lock().faults = faults;
	}

	/// Queues the answer to the next UI prompt. Unanswered prompts return `None`.
	pub fn answer_next(&self, action: Option<&str>) {
		self.state.lock().answers.push_back(action.map(str::to_string));
	}

	pub fn clipboard(&self) -> Option<String> {
		self.state.lock().clipboard.clone()
	}

	/// Every text written to the clipboard, oldest first.
	pub fn clipboard_writes(&self) -> Vec<String> {
		self.state.lock().clipboard_writes.clone()
	}

	pub fn ui_calls(&self) -> Vec<UiCall> {
		self.state.lock().ui_calls.clone()
	}

	pub fn stored(&self, key: &str) -> Option<Value> {
		self.state.lock().storage.get(key).cloned()
	}
}

#[async_trait]
impl EditorAccess for HeadlessPlatform {
	fn is_editor_active(&self) -> bool {
		self.state.lock().document.is_some()
	}

	fn active_language(&self) -> Option<String> {
		self.state.lock().document.as_ref()?.language.clone()
	}

	async fn indentation_context(&self) -> Result<IndentContext> {
		let state = self.state.lock();
		if state.faults.indentation {
			return Err(PlatformError::Editor("cursor unavailable".into()));
		}
		let doc = state.document.as_ref().ok_or(PlatformError::NoActiveEditor)?;
		Ok(IndentContext {
			line_prefix: doc.cursor_line_prefix().to_string(),
			unit: state.indent_unit,
		})
	}

	async fn insert_text(&self, text: &str) -> Result<()> {
		let mut state = self.state.lock();
		if state.faults.insert {
			return Err(PlatformError::Editor("insert rejected".into()));
		}
		let doc = state.document.as_mut().ok_or(PlatformError::NoActiveEditor)?;
		doc.text.insert_str(doc.cursor, text);
		doc.cursor += text.len();
		Ok(())
	}

	async fn create_document(&self, language: Option<&str>) -> Result<()> {
		let mut state = self.state.lock();
		if state.faults.create_document {
			return Err(PlatformError::Editor("cannot open document".into()));
		}
		state.created_documents += 1;
		state.document = Some(Document {
			language: language.map(str::to_string),
			..Document::default()
		});
		Ok(())
	}
}

#[async_trait]
impl UiAccess for HeadlessPlatform {
	async fn show_message(&self, level: MessageLevel, message: &str, actions: &[&str]) -> Option<String> {
		let mut state = self.state.lock();
		state.ui_calls.push(UiCall {
			level,
			message: message.to_string(),
			actions: actions.iter().map(|a| a.to_string()).collect(),
		});
		if actions.is_empty() {
			return None;
		}
		state
			.answers
			.pop_front()
			.flatten()
			.filter(|answer| actions.contains(&answer.as_str()))
	}
}

#[async_trait]
impl ClipboardAccess for HeadlessPlatform {
	async fn write_text(&self, text: &str) -> Result<()> {
		let mut state = self.state.lock();
		if state.faults.clipboard {
			return Err(PlatformError::Clipboard("write rejected".into()));
		}
		state.clipboard = Some(text.to_string());
		state.clipboard_writes.push(text.to_string());
		Ok(())
	}

	async fn read_text(&self) -> Result<String> {
		let state = self.state.lock();
		if state.faults.clipboard {
			return Err(PlatformError::Clipboard("read rejected".into()));
		}
		Ok(state.clipboard.clone().unwrap_or_default())
	}
}

#[async_trait]
impl StorageAccess for HeadlessPlatform {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		let state = self.state.lock();
		if state.faults.storage {
			return Err(PlatformError::Storage("read rejected".into()));
		}
		Ok(state.storage.get(key).cloned())
	}

	async fn set(&self, key: &str, value: Value) -> Result<()> {
		let mut state = self.state.lock();
		if state.faults.storage {
			return Err(PlatformError::Storage("write rejected".into()));
		}
		state.storage.insert(key.to_string(), value);
		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<()> {
		let mut state = self.state.lock();
		if state.faults.storage {
			return Err(PlatformError::Storage("write rejected".into()));
		}
		state.storage.remove(key);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn cursor_line_prefix_uses_the_cursor_line() {
		let mut doc = Document::new("fn main() {\n    let x = 1;\n\tfoo");
		assert_eq!(doc.cursor_line_prefix(), "\t");
		doc.cursor = 15;
		assert_eq!(doc.cursor_line_prefix(), "    ");
		doc.cursor = 0;
		assert_eq!(doc.cursor_line_prefix(), "");
	}

	#[tokio::test]
	async fn insert_moves_the_cursor() {
		let host = HeadlessPlatform::new();
		host.set_document(Some(Document::new("ab")));
		host.insert_text("cd").await.unwrap();
		host.insert_text("e").await.unwrap();
		assert_eq!(host.document().unwrap().text, "abcde");
	}

	#[tokio::test]
	async fn prompts_return_only_offered_actions() {
		let host = HeadlessPlatform::new();
		host.answer_next(Some("Nope"));
		host.answer_next(Some("Yes"));
		assert_eq!(host.show_info("q", &["Yes"]).await, None);
		assert_eq!(host.show_info("q", &["Yes"]).await.as_deref(), Some("Yes"));
		assert_eq!(host.ui_calls().len(), 2);
	}
}
