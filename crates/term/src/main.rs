//! termtools: an extensible, menu-driven toolbox for the terminal.

mod app;
mod builtins;
mod cli;
mod config;
mod logging;
mod render;
mod signals;
mod sink;

use std::io::{self, BufReader, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use render::Painter;
use sink::TerminalSink;
use termtools_output::{LogFileSink, OutputChannel, OutputSink, TeeSink};

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	let log_dir = logging::resolve_log_dir(cli.log_dir.clone());
	let log_path = logging::setup_tracing(cli.verbose, log_dir.as_deref());
	logging::install_panic_hook();
	tracing::info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting termtools");

	let mut settings = match &cli.config {
		Some(path) => config::load_file(path)?,
		None => Vec::new(),
	};
	settings.extend(config::overrides(&cli.overrides));

	let stdout_tty = io::stdout().is_terminal();
	let color = !cli.no_color && stdout_tty && std::env::var_os("NO_COLOR").is_none();
	let painter = Painter::new(color);
	let output = OutputChannel::new(output_sink(color, log_dir.as_deref()));
	let registry = app::create_app(output, settings)?;

	if cli.list {
		registry.output().write(render::help_tree(&registry, painter));
		registry.shutdown();
		return Ok(ExitCode::SUCCESS);
	}

	if let Some(key) = &cli.exec {
		let result = registry.execute(key, &cli.args);
		registry.shutdown();
		registry.output().drain();
		return Ok(if result.is_ok() {
			ExitCode::SUCCESS
		} else {
			ExitCode::FAILURE
		});
	}

	let interactive = stdout_tty && io::stdin().is_terminal();
	let stop = signals::stop_requests()?;
	app::run(&registry, painter, BufReader::new(io::stdin()), stop, interactive)?;
	Ok(ExitCode::SUCCESS)
}

/// Terminal output, mirrored to `session.log` when a log directory is usable.
fn output_sink(color: bool, log_dir: Option<&Path>) -> Box<dyn OutputSink> {
	let terminal = TerminalSink::stdout(color);
	let Some(dir) = log_dir else {
		return Box::new(terminal);
	};
	match LogFileSink::open(dir.join("session.log")) {
		Ok(file) => Box::new(TeeSink::new(terminal, file)),
		Err(error) => {
			tracing::warn!(dir = %dir.display(), %error, "session log unavailable");
			Box::new(terminal)
		}
	}
}
