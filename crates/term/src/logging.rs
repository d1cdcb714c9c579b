//! Tracing setup.

use std::fs::OpenOptions;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

/// Environment variable overriding the log directory.
pub const LOG_DIR_ENV: &str = "TERMTOOLS_LOG_DIR";
/// Environment variable holding an `EnvFilter` directive.
pub const LOG_FILTER_ENV: &str = "TERMTOOLS_LOG";

/// Where tracing output ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
	File,
	Stderr,
}

/// Picks the log directory: explicit flag, then environment, then the user's
/// local data directory.
pub fn resolve_log_dir(flag: Option<PathBuf>) -> Option<PathBuf> {
	flag.or_else(|| std::env::var_os(LOG_DIR_ENV).map(PathBuf::from))
		.or_else(|| dirs::data_local_dir().map(|dir| dir.join("termtools").join("logs")))
}

/// First non-empty directive from `TERMTOOLS_LOG`, then `RUST_LOG`.
fn env_directives() -> Option<String> {
	[LOG_FILTER_ENV, EnvFilter::DEFAULT_ENV]
		.into_iter()
		.filter_map(|name| std::env::var(name).ok())
		.find(|directives| !directives.trim().is_empty())
}

fn default_directives(verbose: bool, target: Target) -> &'static str {
	match (target, verbose) {
		(Target::File, true) => "termtools_term=trace,termtools_registry=trace,termtools_worker=debug,debug",
		(Target::File, false) => "termtools_term=debug,termtools_registry=debug,info",
		(Target::Stderr, true) => "debug",
		(Target::Stderr, false) => "warn",
	}
}

fn filter(directives: Option<String>, verbose: bool, target: Target) -> EnvFilter {
	directives
		.and_then(|directives| EnvFilter::try_new(directives).ok())
		.unwrap_or_else(|| EnvFilter::new(default_directives(verbose, target)))
}

/// Installs the global subscriber.
///
/// Logs go to `termtools.<pid>.log` inside `log_dir` when it can be created;
/// stdout belongs to the menu, so the fallback writes warnings and errors to
/// stderr (everything when `verbose`). `TERMTOOLS_LOG` or `RUST_LOG` override
/// the level in both cases. Returns the log file path, if any.
pub fn setup_tracing(verbose: bool, log_dir: Option<&Path>) -> Option<PathBuf> {
	if let Some(log_dir) = log_dir
		&& std::fs::create_dir_all(log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("termtools.{}.log", std::process::id()));
		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_span_events(FmtSpan::CLOSE)
				.with_target(true);

			tracing_subscriber::registry()
				.with(filter(env_directives(), verbose, Target::File))
				.with(file_layer)
				.init();

			tracing::info!(path = ?log_path, "tracing initialized");
			return Some(log_path);
		}
	}

	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(filter(env_directives(), verbose, Target::Stderr))
		.init();
	None
}

/// Replaces the default panic hook so panics are logged through tracing
/// instead of printed over the menu.
///
/// Handler and hook panics are already reported on the output channel by the
/// registry; the hook only records where they happened.
pub fn install_panic_hook() {
	std::panic::set_hook(Box::new(log_panic));
}

fn log_panic(info: &PanicHookInfo<'_>) {
	let thread = std::thread::current();
	let location = info.location().map(ToString::to_string);
	tracing::error!(
		thread = thread.name().unwrap_or("<unnamed>"),
		location = location.as_deref().unwrap_or("<unknown>"),
		payload = info.payload_as_str().unwrap_or("non-string panic payload"),
		"process.panic"
	);
}
