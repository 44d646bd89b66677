use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(about = "Browse, copy, and insert code templates")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Content snapshot (JSON). Defaults to `content_file` from the settings
	#[arg(long, short = 'd', value_name = "FILE", global = true)]
	pub data: Option<PathBuf>,

	/// Settings file. Defaults to $XDG_CONFIG_HOME/stencil/config.toml
	#[arg(long, short = 'c', value_name = "FILE", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the entity at an address
	Resolve {
		/// Topic, template, or link address
		address: String,
	},
	/// Print display names
	Display {
		#[command(subcommand)]
		what: DisplayCommand,
	},
	/// List the cards of a topic, or the root level
	Cards {
		/// Topic path
		topic: Option<String>,
	},
	/// Copy a template or snippet to the clipboard (printed to stdout)
	Copy(OperationArgs),
	/// Insert a template or snippet into a file
	Insert(OperationArgs),
	/// Show how often a template was used
	Usage {
		/// Template address
		address: String,
	},
	/// Answer bridge requests read from stdin, one JSON message per line
	Serve,
}

#[derive(Subcommand, Debug)]
pub enum DisplayCommand {
	/// Display name of a language
	Language { name: String },
	/// Display name of a topic
	Topic { path: String },
	/// Display titles of every segment of a topic path
	Path { path: String },
}

/// Arguments shared by `copy` and `insert`.
#[derive(Args, Debug)]
pub struct OperationArgs {
	/// Template address. With --code it only provides context
	pub address: Option<String>,

	/// Use this code instead of the template body
	#[arg(long)]
	pub code: Option<String>,

	/// File acting as the active editor
	#[arg(long, short = 't', value_name = "FILE")]
	pub target: Option<PathBuf>,

	/// 1-based line to insert at. Defaults to the end of the file
	#[arg(long, requires = "target")]
	pub line: Option<usize>,

	/// Accept offered actions such as creating a new file
	#[arg(long, short = 'y')]
	pub yes: bool,

	/// Suppress messages
	#[arg(long, short = 's')]
	pub silent: bool,

	/// Route the request through the message bridge
	#[arg(long)]
	pub bridged: bool,
}
