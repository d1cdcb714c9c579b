//! CLI schema and parsing helpers for the termtools binary.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "termtools")]
#[command(about = "Menu-driven toolbox for the terminal")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// TOML file whose values seed the session configuration.
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Override one configuration value (repeatable).
	#[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
	pub overrides: Vec<(String, String)>,

	/// Disable colored output.
	#[arg(long)]
	pub no_color: bool,

	/// Directory for the tracing log and the session output log.
	#[arg(long, value_name = "DIR")]
	pub log_dir: Option<PathBuf>,

	/// Verbose logging.
	#[arg(short, long)]
	pub verbose: bool,

	/// Print the menu tree and exit.
	#[arg(long, conflicts_with = "exec")]
	pub list: bool,

	/// Run a single menu item by key and exit.
	#[arg(short = 'x', long, value_name = "KEY")]
	pub exec: Option<String>,

	/// Arguments passed to the item selected with `--exec`.
	#[arg(trailing_var_arg = true, requires = "exec", value_name = "ARGS")]
	pub args: Vec<String>,
}

/// Splits `key=value`. The key is trimmed and must be non-empty; the value is
/// kept verbatim.
pub fn parse_override(raw: &str) -> Result<(String, String), String> {
	let (key, value) = raw
		.split_once('=')
		.ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
	let key = key.trim();
	if key.is_empty() {
		return Err(format!("missing key in '{raw}'"));
	}
	Ok((key.to_string(), value.to_string()))
}
