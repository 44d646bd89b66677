//! Stencil terminal host.
//!
//! Loads a content snapshot and exposes the template operations as
//! subcommands. Messages and logs go to stderr; copied code and query results
//! go to stdout.

mod app;
mod cli;
mod settings;
mod terminal;

use clap::Parser;

use crate::app::App;
use crate::cli::Cli;
use crate::settings::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let settings = Settings::load(cli.config.as_deref())?;
	let app = App::load(cli.data.as_deref(), settings)?;
	app.run(cli.command).await
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("STENCIL_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("stencil=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
