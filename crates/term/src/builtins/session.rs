//! Session inspection: configuration dump, debug toggle, command runner.

use std::fmt::Write as _;
use std::process::Command;

use termtools_registry::{Blueprint, Handler, HandlerError, HandlerResult, Registry, RegistryError};

/// Blueprint name.
pub const NAME: &str = "session";
const CATEGORY: &str = "SESSION";

/// Builds the `session` blueprint.
pub fn blueprint() -> Result<Blueprint, RegistryError> {
	let mut bp = Blueprint::new(NAME, "Inspect and adjust the running session");
	bp.add_item(
		"s",
		"Show configuration",
		"List every configuration value",
		CATEGORY,
		1,
		Handler::with_context(|ctx, _| show_config(ctx)),
	)?
	.add_item(
		"d",
		"Toggle debug",
		"Flip the debug flag",
		CATEGORY,
		2,
		Handler::with_context(|ctx, _| toggle_debug(ctx)),
	)?
	.add_item(
		"r",
		"Run command",
		"Run a program and show its output",
		CATEGORY,
		3,
		Handler::with_context(run_command),
	)?
	.on_init(|ctx| {
		ctx.set_config("session_enabled", true);
		Ok(())
	});
	Ok(bp)
}

fn show_config(ctx: &Registry) -> HandlerResult {
	let mut text = String::from("Configuration:");
	for (key, value) in ctx.config_snapshot() {
		let _ = write!(text, "\n  {key} = {value}");
	}
	ctx.output().write(text);
	Ok(())
}

fn toggle_debug(ctx: &Registry) -> HandlerResult {
	let enabled = !ctx.config_as::<bool>("debug").unwrap_or(false);
	ctx.set_config("debug", enabled);
	tracing::info!(enabled, "session.debug");
	ctx.output()
		.success(format!("✓ Debug mode {}", if enabled { "enabled" } else { "disabled" }));
	Ok(())
}

fn run_command(ctx: &Registry, args: &[String]) -> HandlerResult {
	let (program, rest) = args
		.split_first()
		.ok_or_else(|| HandlerError::InvalidArgument("usage: r <program> [args...]".to_string()))?;
	let output = Command::new(program).args(rest).output()?;
	if !output.status.success() {
		return Err(HandlerError::command(args.join(" "), &output));
	}
	let stdout = String::from_utf8_lossy(&output.stdout);
	let stdout = stdout.trim_end();
	if !stdout.is_empty() {
		ctx.output().write(stdout.to_string());
	}
	ctx.output().success(format!("✓ `{}` finished", args.join(" ")));
	Ok(())
}
