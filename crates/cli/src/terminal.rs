//! Capabilities backed by files and the terminal.
//!
//! The editor is a file on disk (`--target`), messages go to stderr, the
//! clipboard is stdout unless the host serves the bridge there, and storage is
//! a JSON file. A document opened with
//! "Create New File" lives in memory and is printed when the command ends.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use stencil_content::Catalog;
use stencil_platform::{
	Capabilities, ClipboardAccess, Document, EditorAccess, IndentContext, IndentUnit, MessageLevel,
	PlatformAdapter, PlatformError, PlatformInfo, Result, StorageAccess, UiAccess,
};
use tracing::debug;

/// A file opened as the active editor.
#[derive(Debug)]
struct TargetFile {
	path: PathBuf,
	doc: Document,
}

#[derive(Debug, Default)]
struct State {
	target: Option<TargetFile>,
	scratch: Option<Document>,
	clipboard: Option<String>,
}

#[derive(Debug)]
pub struct TerminalHost {
	state: Mutex<State>,
	unit: IndentUnit,
	storage_file: Option<PathBuf>,
	accept_actions: bool,
	quiet: bool,
	echo_clipboard: bool,
}

impl TerminalHost {
	pub fn new(unit: IndentUnit, storage_file: Option<PathBuf>) -> Self {
		Self {
			state: Mutex::new(State::default()),
			unit,
			storage_file,
			accept_actions: false,
			quiet: false,
			echo_clipboard: true,
		}
	}

	/// Picks the first offered action of every prompt.
	pub fn accept_actions(mut self, accept: bool) -> Self {
		self.accept_actions = accept;
		self
	}

	/// Drops info messages.
	pub fn quiet(mut self, quiet: bool) -> Self {
		self.quiet = quiet;
		self
	}

	/// Prints clipboard writes to stdout. Off while stdout carries bridge
	/// replies.
	pub fn echo_clipboard(mut self, echo: bool) -> Self {
		self.echo_clipboard = echo;
		self
	}

	/// Opens `path` as the active editor, with the cursor after the leading
	/// whitespace of `line` (1-based), or at the end of the file.
	///
	/// The document language is the catalog language claiming the file
	/// extension, if any.
	pub fn open(&self, path: &Path, line: Option<usize>, catalog: &Catalog) -> anyhow::Result<()> {
		let text = match std::fs::read_to_string(path) {
			Ok(text) => text,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
			Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
		};
		let mut doc = Document::new(text);
		if let Some(line) = line {
			doc.cursor = line_cursor(&doc.text, line)
				.with_context(|| format!("{} has no line {line}", path.display()))?;
		}
		doc.language = path
			.extension()
			.and_then(|ext| ext.to_str())
			.and_then(|ext| catalog.language_for_extension(ext))
			.map(|language| language.name.clone());
		self.state.lock().target = Some(TargetFile {
			path: path.to_path_buf(),
			doc,
		});
		Ok(())
	}

	pub fn adapter(self: &Arc<Self>) -> PlatformAdapter {
		let mut features = vec!["clipboard", "editor"];
		if self.storage_file.is_some() {
			features.push("storage");
		}
		PlatformAdapter::new(
			PlatformInfo::new("terminal", features),
			Capabilities::from_host(self.clone()),
		)
	}

	/// Prints a document created during the command, if any.
	pub fn flush_scratch(&self) -> anyhow::Result<()> {
		let Some(doc) = self.state.lock().scratch.take() else {
			return Ok(());
		};
		let mut out = std::io::stdout().lock();
		writeln!(out, "{}", doc.text)?;
		Ok(())
	}

	fn load_storage(&self) -> Result<Map<String, Value>> {
		let Some(path) = &self.storage_file else {
			return Err(PlatformError::Unsupported("storage".into()));
		};
		match std::fs::read_to_string(path) {
			Ok(text) if text.trim().is_empty() => Ok(Map::new()),
			Ok(text) => Ok(serde_json::from_str(&text)?),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
			Err(err) => Err(err.into()),
		}
	}

	fn save_storage(&self, map: &Map<String, Value>) -> Result<()> {
		let Some(path) = &self.storage_file else {
			return Err(PlatformError::Unsupported("storage".into()));
		};
		if let Some(dir) = path.parent() {
			std::fs::create_dir_all(dir)?;
		}
		std::fs::write(path, serde_json::to_vec_pretty(map)?)?;
		Ok(())
	}
}

/// Byte offset after the leading whitespace of `line` (1-based).
fn line_cursor(text: &str, line: usize) -> Option<usize> {
	if line == 0 {
		return None;
	}
	let mut start = 0;
	for _ in 1..line {
		start += text[start..].find('\n')? + 1;
	}
	let rest = &text[start..];
	let indent = rest
		.find(|c: char| c != ' ' && c != '\t')
		.unwrap_or(rest.len());
	Some(start + indent)
}

#[async_trait]
impl EditorAccess for TerminalHost {
	fn is_editor_active(&self) -> bool {
		let state = self.state.lock();
		state.target.is_some() || state.scratch.is_some()
	}

	fn active_language(&self) -> Option<String> {
		let state = self.state.lock();
		match &state.target {
			Some(target) => target.doc.language.clone(),
			None => state.scratch.as_ref()?.language.clone(),
		}
	}

	async fn indentation_context(&self) -> Result<IndentContext> {
		let state = self.state.lock();
		let doc = match &state.target {
			Some(target) => &target.doc,
			None => state.scratch.as_ref().ok_or(PlatformError::NoActiveEditor)?,
		};
		let line_prefix = doc.cursor_line_prefix().to_string();
		Ok(IndentContext {
			unit: IndentUnit::detect(&line_prefix).unwrap_or(self.unit),
			line_prefix,
		})
	}

	async fn insert_text(&self, text: &str) -> Result<()> {
		let mut state = self.state.lock();
		let state = &mut *state;
		if let Some(target) = &mut state.target {
			let doc = &mut target.doc;
			doc.text.insert_str(doc.cursor, text);
			doc.cursor += text.len();
			std::fs::write(&target.path, &doc.text)?;
			debug!(path = %target.path.display(), bytes = text.len(), "terminal.inserted");
			return Ok(());
		}
		let doc = state.scratch.as_mut().ok_or(PlatformError::NoActiveEditor)?;
		doc.text.insert_str(doc.cursor, text);
		doc.cursor += text.len();
		Ok(())
	}

	async fn create_document(&self, language: Option<&str>) -> Result<()> {
		let mut state = self.state.lock();
		if state.target.is_some() {
			return Err(PlatformError::Editor("a target file is already open".into()));
		}
		state.scratch = Some(Document {
			language: language.map(str::to_string),
			..Document::default()
		});
		Ok(())
	}
}

#[async_trait]
impl UiAccess for TerminalHost {
	async fn show_message(&self, level: MessageLevel, message: &str, actions: &[&str]) -> Option<String> {
		let label = match level {
			MessageLevel::Info => "info",
			MessageLevel::Warning => "warning",
			MessageLevel::Error => "error",
		};
		if !(self.quiet && level == MessageLevel::Info) {
			if actions.is_empty() {
				eprintln!("{label}: {message}");
			} else {
				eprintln!("{label}: {message} [{}]", actions.join(", "));
			}
		}
		let choice = actions.first().filter(|_| self.accept_actions)?;
		Some(choice.to_string())
	}
}

#[async_trait]
impl ClipboardAccess for TerminalHost {
	async fn write_text(&self, text: &str) -> Result<()> {
		if self.echo_clipboard {
			let mut out = std::io::stdout().lock();
			writeln!(out, "{text}")?;
			out.flush()?;
		}
		self.state.lock().clipboard = Some(text.to_string());
		Ok(())
	}

	async fn read_text(&self) -> Result<String> {
		Ok(self.state.lock().clipboard.clone().unwrap_or_default())
	}
}

#[async_trait]
impl StorageAccess for TerminalHost {
	async fn get(&self, key: &str) -> Result<Option<Value>> {
		Ok(self.load_storage()?.get(key).cloned())
	}

	async fn set(&self, key: &str, value: Value) -> Result<()> {
		let mut map = self.load_storage()?;
		map.insert(key.to_string(), value);
		self.save_storage(&map)
	}

	async fn remove(&self, key: &str) -> Result<()> {
		let mut map = self.load_storage()?;
		if map.remove(key).is_some() {
			self.save_storage(&map)?;
		}
		Ok(())
	}
}

/// Fails unless `path` exists, for commands that need a content file.
pub fn require_file(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
	let Some(path) = path else {
		bail!("no content file: pass --data or set content-file in the settings");
	};
	if !path.is_file() {
		bail!("content file {} does not exist", path.display());
	}
	Ok(path)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use stencil_content::Language;

	use super::*;

	fn catalog() -> Catalog {
		Catalog {
			languages: vec![Language {
				name: "clang".into(),
				title: "C".into(),
				tag_name: String::new(),
				file_extensions: vec![".c".into(), ".h".into()],
				description: String::new(),
			}],
			..Catalog::default()
		}
	}

	#[test]
	fn line_cursor_skips_indentation() {
		let text = "a\n    b\n\tc";
		assert_eq!(line_cursor(text, 1), Some(0));
		assert_eq!(line_cursor(text, 2), Some(6));
		assert_eq!(line_cursor(text, 3), Some(9));
		assert_eq!(line_cursor(text, 4), None);
		assert_eq!(line_cursor(text, 0), None);
	}

	#[tokio::test]
	async fn inserts_are_written_to_the_target() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("main.c");
		std::fs::write(&path, "int main() {\n\treturn 0;\n}\n").unwrap();

		let host = TerminalHost::new(IndentUnit::Spaces(4), None);
		host.open(&path, Some(2), &catalog()).unwrap();
		let ctx = host.indentation_context().await.unwrap();
		assert_eq!(ctx.line_prefix, "\t");
		assert_eq!(ctx.unit, IndentUnit::Tab);
		assert_eq!(host.active_language().as_deref(), Some("clang"));

		host.insert_text("puts(\"hi\");\n\t").await.unwrap();
		assert_eq!(
			std::fs::read_to_string(&path).unwrap(),
			"int main() {\n\tputs(\"hi\");\n\treturn 0;\n}\n"
		);
	}

	#[tokio::test]
	async fn storage_persists_in_a_json_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("state").join("storage.json");
		let host = TerminalHost::new(IndentUnit::default(), Some(path.clone()));

		assert_eq!(host.get("k").await.unwrap(), None);
		host.set("k", json!({ "count": 1 })).await.unwrap();
		let reopened = TerminalHost::new(IndentUnit::default(), Some(path));
		assert_eq!(reopened.get("k").await.unwrap(), Some(json!({ "count": 1 })));
		reopened.remove("k").await.unwrap();
		assert_eq!(host.get("k").await.unwrap(), None);
	}

	#[tokio::test]
	async fn prompts_accept_the_first_action_on_request() {
		let host = TerminalHost::new(IndentUnit::default(), None).quiet(true);
		assert_eq!(host.show_info("pick", &["A", "B"]).await, None);
		let host = host.accept_actions(true);
		assert_eq!(host.show_info("pick", &["A", "B"]).await.as_deref(), Some("A"));
	}

	#[tokio::test]
	async fn files_without_a_known_language_have_none() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("notes.txt");
		let host = TerminalHost::new(IndentUnit::default(), None);
		host.open(&path, None, &catalog()).unwrap();
		assert!(host.is_editor_active());
		assert_eq!(host.active_language(), None);
	}

	#[tokio::test]
	async fn silent_clipboard_still_records_the_text() {
		let host = TerminalHost::new(IndentUnit::default(), None).echo_clipboard(false);
		assert!(!host.echo_clipboard);
		host.write_text("int a;").await.unwrap();
		assert_eq!(host.read_text().await.unwrap(), "int a;");
	}
}
