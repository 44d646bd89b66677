//! Subcommand execution.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};
use stencil_content::{ContentSnapshot, ContentStore, Entity, Fallback, LinkTarget};
use stencil_ops::{CodeOperationService, OperationKind, OperationOptions, Outcome, StorageUsageTracker};
use stencil_rpc::{Bridge, HostEndpoint, MessageSink, RemoteServices};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::{Command, DisplayCommand, OperationArgs};
use crate::settings::Settings;
use crate::terminal::{TerminalHost, require_file};

/// Loaded content plus the host it runs against.
pub struct App {
	settings: Settings,
	content: Arc<ContentStore>,
}

impl App {
	pub fn load(data: Option<&Path>, settings: Settings) -> Result<Self> {
		let path = require_file(data.map(Path::to_path_buf).or_else(|| settings.content_file.clone()))?;
		let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
		let snapshot = ContentSnapshot::from_json(&json).with_context(|| format!("decoding {}", path.display()))?;
		let content = ContentStore::with_separator(settings.path_separator.clone());
		content
			.reload(snapshot)
			.with_context(|| format!("loading {}", path.display()))?;
		info!(path = %path.display(), "cli.content_loaded");
		Ok(Self {
			settings,
			content: Arc::new(content),
		})
	}

	pub async fn run(&self, command: Command) -> Result<()> {
		match command {
			Command::Resolve { address } => self.resolve(&address),
			Command::Display { what } => {
				let catalog = self.content.load();
				let name = match what {
					DisplayCommand::Language { name } => {
						catalog.display.language_display_name(&name, Fallback::LANGUAGE)
					}
					DisplayCommand::Topic { path } => catalog.display.topic_display_name(&path, Fallback::TOPIC),
					DisplayCommand::Path { path } => catalog.display.full_display_path(&path),
				};
				println!("{name}");
				Ok(())
			}
			Command::Cards { topic } => {
				let catalog = self.content.load();
				let cards = match topic.as_deref() {
					None => catalog.hierarchy.root_cards(),
					Some(path) => catalog
						.hierarchy
						.cards(path)
						.ok_or_else(|| anyhow!("topic not found: {path}"))?,
				};
				for card in cards {
					println!("{}", serde_json::to_string(&card)?);
				}
				Ok(())
			}
			Command::Copy(args) => self.operate(OperationKind::CopySnippet, args).await,
			Command::Insert(args) => self.operate(OperationKind::InsertSnippet, args).await,
			Command::Usage { address } => {
				let host = Arc::new(self.host(false, false));
				let platform = Arc::new(host.adapter());
				match StorageUsageTracker::new(platform).usage(&address).await? {
					Some(record) => println!("{}", serde_json::to_string(&record)?),
					None => println!("{address}: never used"),
				}
				Ok(())
			}
			Command::Serve => self.serve().await,
		}
	}

	fn host(&self, accept: bool, quiet: bool) -> TerminalHost {
		TerminalHost::new(self.settings.indent.unit(), self.settings.storage_file())
			.accept_actions(accept)
			.quiet(quiet)
	}

	fn service(&self, host: &Arc<TerminalHost>) -> Arc<CodeOperationService> {
		let platform = Arc::new(host.adapter());
		Arc::new(CodeOperationService::new(self.content.clone(), platform))
	}

	fn resolve(&self, address: &str) -> Result<()> {
		let catalog = self.content.load();
		let entity = catalog
			.hierarchy
			.resolve(address)
			.ok_or_else(|| anyhow!("nothing at {address}"))?;
		let value = match entity {
			Entity::Topic(node) => json!({
				"kind": "topic",
				"path": node.path,
				"config": node.config,
				"templates": node.templates.len(),
				"links": node.links.len(),
			}),
			Entity::Template { template, .. } => json!({ "kind": "template", "template": template }),
			Entity::Link { link, .. } => json!({
				"kind": "link",
				"link": link,
				"external": link.target_kind() == LinkTarget::External,
			}),
		};
		println!("{}", serde_json::to_string_pretty(&value)?);
		Ok(())
	}

	/// Runs copy or insert. `snippet_kind` is the snippet flavor; a missing
	/// `--code` switches to the template flavor.
	async fn operate(&self, snippet_kind: OperationKind, args: OperationArgs) -> Result<()> {
		let host = Arc::new(self.host(args.yes, args.silent));
		if let Some(target) = &args.target {
			host.open(target, args.line, &self.content.load())?;
		}
		let service = self.service(&host);
		let options = OperationOptions {
			silent: args.silent,
			..OperationOptions::default()
		};
		let kind = match (&args.code, snippet_kind) {
			(Some(_), kind) => kind,
			(None, OperationKind::CopySnippet) => OperationKind::CopyTemplate,
			(None, _) => OperationKind::InsertTemplate,
		};
		if args.code.is_none() && args.address.is_none() {
			bail!("{} needs an address or --code", kind.name());
		}

		let outcome = if args.bridged {
			self.operate_bridged(service, kind, &args, options).await?
		} else {
			run_direct(&service, kind, &args, &options).await?
		};
		debug!(operation = kind.name(), ?outcome, "cli.operation_done");
		host.flush_scratch()
	}

	/// Sends the operation through an in-process bridge, as an isolated UI
	/// surface would.
	async fn operate_bridged(
		&self,
		service: Arc<CodeOperationService>,
		kind: OperationKind,
		args: &OperationArgs,
		options: OperationOptions,
	) -> Result<Outcome> {
		let (to_host, host_inbox) = mpsc::unbounded_channel();
		let (to_ui, ui_inbox) = mpsc::unbounded_channel();
		let endpoint = Arc::new(HostEndpoint::new(service));
		let server = tokio::spawn(endpoint.serve(host_inbox, Arc::new(to_ui)));

		let bridge = Arc::new(Bridge::with_timeout(to_host, self.settings.bridge_timeout()));
		let pump = {
			let bridge = bridge.clone();
			tokio::spawn(async move { bridge.pump(ui_inbox).await })
		};
		let remote = RemoteServices::new(bridge);
		let address = args.address.as_deref();
		let code = args.code.as_deref().unwrap_or_default();
		let outcome = match kind {
			OperationKind::CopyTemplate => remote.copy_template(address.unwrap_or_default(), options).await,
			OperationKind::InsertTemplate => remote.insert_template(address.unwrap_or_default(), options).await,
			OperationKind::CopySnippet => remote.copy_code_snippet(code, address, options).await,
			OperationKind::InsertSnippet => remote.insert_code_snippet(code, address, options).await,
		};

		// The pump holds the last handle on the host inbox.
		drop(remote);
		pump.abort();
		server.await?;
		Ok(outcome?)
	}

	/// Host for `serve`. Stdout carries only bridge replies.
	fn serve_host(&self) -> TerminalHost {
		self.host(false, true).echo_clipboard(false)
	}

	/// Answers bridge requests from stdin until it closes.
	async fn serve(&self) -> Result<()> {
		let host = Arc::new(self.serve_host());
		let endpoint = Arc::new(HostEndpoint::new(self.service(&host)));
		let (tx, rx) = mpsc::unbounded_channel();
		let server = tokio::spawn(endpoint.serve(rx, Arc::new(StdoutSink)));

		let mut lines = BufReader::new(tokio::io::stdin()).lines();
		while let Some(line) = lines.next_line().await? {
			if line.trim().is_empty() {
				continue;
			}
			match serde_json::from_str::<Value>(&line) {
				Ok(message) => {
					if tx.send(message).is_err() {
						break;
					}
				}
				Err(err) => tracing::warn!(error = %err, "cli.bad_message"),
			}
		}
		drop(tx);
		server.await?;
		Ok(())
	}
}

async fn run_direct(
	service: &CodeOperationService,
	kind: OperationKind,
	args: &OperationArgs,
	options: &OperationOptions,
) -> Result<Outcome> {
	let address = args.address.as_deref();
	let code = args.code.as_deref().unwrap_or_default();
	let outcome = match kind {
		OperationKind::CopyTemplate => service.copy_template(address.unwrap_or_default(), options).await,
		OperationKind::InsertTemplate => service.insert_template(address.unwrap_or_default(), options).await,
		OperationKind::CopySnippet => service.copy_code_snippet(code, address, options).await,
		OperationKind::InsertSnippet => service.insert_code_snippet(code, address, options).await,
	};
	Ok(outcome?)
}

/// Replies to bridge requests, one JSON message per line.
struct StdoutSink;

impl MessageSink for StdoutSink {
	fn post(&self, message: Value) -> stencil_rpc::Result<()> {
		println!("{message}");
		Ok(())
	}
}
