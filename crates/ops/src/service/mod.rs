//! Copy/insert orchestration.
//!
//! Every operation runs the same pipeline: resolve, check the editor, read the
//! cursor indentation, format, execute, record usage, report. The first
//! failing step ends the run; failures are reported to the user once and
//! returned to the caller.

use std::sync::Arc;

use stencil_content::{ContentSnapshot, ContentStore, Template};
use stencil_platform::{HostEvent, IndentContext, PlatformAdapter};
use tracing::{debug, error, warn};

use crate::error::{OperationError, Result};
use crate::format::{format_snippet, format_template};
use crate::options::{Destination, OperationKind, OperationOptions, Outcome, Stage};
use crate::usage::{StorageUsageTracker, UsageTracker};

/// Action offered when there is no editor to insert into.
pub const CREATE_FILE_ACTION: &str = "Create New File";

const NO_EDITOR_MESSAGE: &str = "No active editor. The code was copied to the clipboard.";
const NEW_FILE_MESSAGE: &str = "Code inserted into a new file";

/// Template resolved for one run, with its address.
struct Resolved {
	address: String,
	template: Template,
}

/// Inputs of one run.
struct Request<'a> {
	kind: OperationKind,
	/// Explicit snippet code. `None` for template operations.
	snippet: Option<&'a str>,
	address: Option<&'a str>,
	options: &'a OperationOptions,
}

/// Runs copy and insert operations against the current content and host.
pub struct CodeOperationService {
	content: Arc<ContentStore>,
	platform: Arc<PlatformAdapter>,
	usage: Arc<dyn UsageTracker>,
}

impl std::fmt::Debug for CodeOperationService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CodeOperationService")
			.field("platform", &self.platform)
			.finish_non_exhaustive()
	}
}

impl CodeOperationService {
	/// Creates a service that records usage in the host's storage.
	pub fn new(content: Arc<ContentStore>, platform: Arc<PlatformAdapter>) -> Self {
		let usage = Arc::new(StorageUsageTracker::new(platform.clone()));
		Self::with_usage_tracker(content, platform, usage)
	}

	pub fn with_usage_tracker(
		content: Arc<ContentStore>,
		platform: Arc<PlatformAdapter>,
		usage: Arc<dyn UsageTracker>,
	) -> Self {
		Self {
			content,
			platform,
			usage,
		}
	}

	pub fn content(&self) -> &Arc<ContentStore> {
		&self.content
	}

	pub fn platform(&self) -> &Arc<PlatformAdapter> {
		&self.platform
	}

	/// Replaces the content and announces the new generation to the host's
	/// listeners. A rejected snapshot leaves the content and listeners alone.
	pub fn reload_content(&self, snapshot: ContentSnapshot) -> stencil_content::Result<u64> {
		let generation = self.content.reload(snapshot)?;
		self.platform
			.events()
			.emit(&HostEvent::ContentReloaded { generation });
		Ok(generation)
	}

	/// Copies the template at `address` to the clipboard.
	pub async fn copy_template(&self, address: &str, options: &OperationOptions) -> Result<Outcome> {
		self.run(Request {
			kind: OperationKind::CopyTemplate,
			snippet: None,
			address: Some(address),
			options,
		})
		.await
	}

	/// Inserts the template at `address` at the editor cursor.
	pub async fn insert_template(&self, address: &str, options: &OperationOptions) -> Result<Outcome> {
		self.run(Request {
			kind: OperationKind::InsertTemplate,
			snippet: None,
			address: Some(address),
			options,
		})
		.await
	}

	/// Copies `code` to the clipboard.
	///
	/// `address` optionally names the template the code was taken from; it
	/// guides formatting and usage tracking.
	pub async fn copy_code_snippet(
		&self,
		code: &str,
		address: Option<&str>,
		options: &OperationOptions,
	) -> Result<Outcome> {
		self.run(Request {
			kind: OperationKind::CopySnippet,
			snippet: Some(code),
			address,
			options,
		})
		.await
	}

	/// Inserts `code` at the editor cursor.
	pub async fn insert_code_snippet(
		&self,
		code: &str,
		address: Option<&str>,
		options: &OperationOptions,
	) -> Result<Outcome> {
		self.run(Request {
			kind: OperationKind::InsertSnippet,
			snippet: Some(code),
			address,
			options,
		})
		.await
	}

	async fn run(&self, req: Request<'_>) -> Result<Outcome> {
		let kind = req.kind;
		let options = req.options;
		match self.execute(&req).await {
			Ok((outcome, title)) => {
				if !options.silent && !matches!(outcome, Outcome::ClipboardFallback { .. }) {
					let message = options
						.success_message
						.clone()
						.unwrap_or_else(|| kind.default_success_message(title.as_deref()));
					self.platform.ui().show_info(&message, &[]).await;
				}
				debug!(operation = kind.name(), stage = ?Stage::Reporting, ?outcome, "ops.completed");
				Ok(outcome)
			}
			Err(err) => {
				error!(operation = kind.name(), stage = ?err.stage(), error = %err, "ops.failed");
				if !options.silent {
					let prefix = options
						.error_prefix
						.as_deref()
						.unwrap_or_else(|| kind.default_error_prefix());
					self.platform.ui().show_error(&format!("{prefix}: {err}"), &[]).await;
				}
				Err(err)
			}
		}
	}

	/// Steps 1 to 6. Returns the outcome and the title used in the success message.
	async fn execute(&self, req: &Request<'_>) -> Result<(Outcome, Option<String>)> {
		let kind = req.kind;
		debug!(operation = kind.name(), stage = ?Stage::Resolving, address = ?req.address, "ops.stage");
		let resolved = self.resolve(req)?;
		let code = match (req.snippet, &resolved) {
			(Some(code), _) => code,
			(None, Some(r)) => r.template.code.as_str(),
			(None, None) => {
				let address = req.address.unwrap_or_default().to_string();
				return Err(OperationError::TemplateNotFound(address));
			}
		};
		let title = match (kind.is_template(), &resolved) {
			(true, Some(r)) => Some(r.template.label().to_string()),
			_ => None,
		};

		debug!(operation = kind.name(), stage = ?Stage::CheckingEditor, "ops.stage");
		let editor = self.platform.editor();
		if !editor.is_editor_active() {
			let outcome = self.recover_without_editor(code, resolved.as_ref(), req).await?;
			self.record_usage(resolved.as_ref()).await;
			return Ok((outcome, title));
		}

		debug!(operation = kind.name(), stage = ?Stage::ComputingIndentation, "ops.stage");
		let ctx = editor
			.indentation_context()
			.await
			.map_err(OperationError::at(Stage::ComputingIndentation))?;

		debug!(operation = kind.name(), stage = ?Stage::Formatting, "ops.stage");
		let formatted = format_code(code, resolved.as_ref().map(|r| &r.template), &ctx);

		debug!(operation = kind.name(), stage = ?Stage::Executing, bytes = formatted.len(), "ops.stage");
		let outcome = match kind.destination() {
			Destination::Clipboard => {
				self.platform
					.clipboard()
					.write_text(&formatted)
					.await
					.map_err(OperationError::at(Stage::Executing))?;
				Outcome::Copied
			}
			Destination::Editor => {
				editor
					.insert_text(&formatted)
					.await
					.map_err(OperationError::at(Stage::Executing))?;
				Outcome::Inserted
			}
		};

		self.record_usage(resolved.as_ref()).await;
		Ok((outcome, title))
	}

	/// Without an address, a snippet whose body is exactly a known template
	/// resolves to that template.
	fn resolve(&self, req: &Request<'_>) -> Result<Option<Resolved>> {
		let Some(address) = req.address else {
			let Some(code) = req.snippet else {
				return Ok(None);
			};
			let catalog = self.content.load();
			return Ok(catalog
				.hierarchy
				.template_by_code(code)
				.map(|(address, template)| Resolved {
					address,
					template: template.clone(),
				}));
		};
		match self.content.template(address) {
			Some(template) => Ok(Some(Resolved {
				address: address.to_string(),
				template,
			})),
			None if req.kind.is_template() => Err(OperationError::TemplateNotFound(address.to_string())),
			None => {
				debug!(operation = req.kind.name(), %address, "ops.context_unresolved");
				Ok(None)
			}
		}
	}

	/// Puts the raw code on the clipboard and offers to open a new document.
	///
	/// Only the clipboard write can fail the operation.
	async fn recover_without_editor(
		&self,
		code: &str,
		resolved: Option<&Resolved>,
		req: &Request<'_>,
	) -> Result<Outcome> {
		debug!(operation = req.kind.name(), stage = ?Stage::NoEditorRecovery, "ops.stage");
		self.platform
			.clipboard()
			.write_text(code)
			.await
			.map_err(OperationError::at(Stage::NoEditorRecovery))?;

		if req.options.silent {
			return Ok(Outcome::ClipboardFallback { new_document: false });
		}

		let ui = self.platform.ui();
		let choice = ui.show_info(NO_EDITOR_MESSAGE, &[CREATE_FILE_ACTION]).await;
		if choice.as_deref() != Some(CREATE_FILE_ACTION) {
			return Ok(Outcome::ClipboardFallback { new_document: false });
		}

		let language = resolved
			.map(|r| r.template.language.as_str())
			.filter(|l| !l.is_empty());
		let editor = self.platform.editor();
		let created = match editor.create_document(language).await {
			Ok(()) => editor.insert_text(code).await,
			Err(err) => Err(err),
		};
		match created {
			Ok(()) => {
				let message = req.options.success_message.as_deref().unwrap_or(NEW_FILE_MESSAGE);
				ui.show_info(message, &[]).await;
				Ok(Outcome::ClipboardFallback { new_document: true })
			}
			Err(err) => {
				warn!(operation = req.kind.name(), error = %err, "ops.new_document_failed");
				Ok(Outcome::ClipboardFallback { new_document: false })
			}
		}
	}

	/// Usage is best effort and never fails the operation.
	async fn record_usage(&self, resolved: Option<&Resolved>) {
		let Some(resolved) = resolved else {
			return;
		};
		debug!(stage = ?Stage::RecordingUsage, address = %resolved.address, "ops.stage");
		if let Err(err) = self.usage.record(&resolved.address).await {
			warn!(address = %resolved.address, error = %err, "ops.usage_failed");
		}
	}
}

/// Uses the whole-template formatter when `code` is exactly the template body.
fn format_code(code: &str, template: Option<&Template>, ctx: &IndentContext) -> String {
	match template {
		Some(t) if t.code == code => format_template(t, ctx),
		_ => format_snippet(code, template, ctx),
	}
}
