//! Countdown timer running on a background worker.
//!
//! Progress is reported through the output channel from the worker thread, so
//! it reaches the terminal while the menu loop waits for input.

use std::sync::Arc;
use std::time::Duration;

use termtools_output::OutputChannel;
use termtools_registry::{Blueprint, ConfigValue, Handler, HandlerError, HandlerResult, Registry, RegistryError};
use termtools_worker::{CancelToken, TaskClass, WorkerSet};

/// Blueprint name.
pub const NAME: &str = "timer";
const CATEGORY: &str = "TIMER";
const WORKER: &str = "timer";

const DEFAULT_DURATION: Duration = Duration::from_secs(25 * 60);
const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Builds the `timer` blueprint. Its cleanup hook cancels and joins a running
/// countdown.
pub fn blueprint() -> Result<Blueprint, RegistryError> {
	let workers = Arc::new(WorkerSet::new());
	let start = Arc::clone(&workers);
	let cancel = Arc::clone(&workers);

	let mut bp = Blueprint::new(NAME, "Background countdown timer");
	bp.add_item(
		"t",
		"Start timer",
		"t [duration], e.g. 25m, 90s, 500ms",
		CATEGORY,
		1,
		Handler::with_context(move |ctx, args| start_timer(ctx, &start, args)),
	)?
	.add_item(
		"c",
		"Cancel timer",
		"Stop the running countdown",
		CATEGORY,
		2,
		Handler::plain(move |_| cancel_timer(&cancel)),
	)?
	.on_init(|ctx| {
		ctx.set_config("timer_enabled", true);
		Ok(())
	})
	.on_cleanup(move |_| stop_workers(&workers));
	Ok(bp)
}

fn start_timer(ctx: &Registry, workers: &WorkerSet, args: &[String]) -> HandlerResult {
	let total = match args.first() {
		Some(raw) => parse_duration(raw)?,
		None => config_duration(ctx, "timer.duration", DEFAULT_DURATION)?,
	};
	let interval = config_duration(ctx, "timer.interval", DEFAULT_INTERVAL)?;
	if total.is_zero() || interval.is_zero() {
		return Err(HandlerError::InvalidArgument("timer durations must be positive".to_string()));
	}

	let out = ctx.output().clone();
	workers
		.spawn(TaskClass::Timer, WORKER, move |token| countdown(&out, &token, total, interval))
		.map_err(|error| HandlerError::failed(error.to_string()))?;
	tracing::info!(?total, ?interval, "timer.start");
	ctx.output()
		.info(format!("⏱ Timer started for {}", format_duration(total)));
	Ok(())
}

fn countdown(out: &OutputChannel, token: &CancelToken, total: Duration, interval: Duration) {
	let mut remaining = total;
	while !remaining.is_zero() {
		let step = remaining.min(interval);
		if !token.sleep(step) {
			tracing::debug!("timer.cancelled");
			out.warn("⏹ Timer cancelled");
			return;
		}
		remaining -= step;
		if !remaining.is_zero() {
			out.info(format!("⏱ {} remaining", format_duration(remaining)));
		}
	}
	out.success("⏰ Time's up!");
}

fn cancel_timer(workers: &WorkerSet) -> HandlerResult {
	if workers.cancel(WORKER) {
		Ok(())
	} else {
		Err(HandlerError::failed("no timer is running"))
	}
}

fn stop_workers(workers: &WorkerSet) -> HandlerResult {
	let errors = workers.shutdown();
	if errors.is_empty() {
		return Ok(());
	}
	let message = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
	Err(HandlerError::failed(message))
}

/// Reads a duration from config: a duration string, or whole seconds.
fn config_duration(ctx: &Registry, key: &str, default: Duration) -> Result<Duration, HandlerError> {
	match ctx.config_value(key) {
		None => Ok(default),
		Some(ConfigValue::Int(secs)) if secs >= 0 => Ok(Duration::from_secs(secs.unsigned_abs())),
		Some(ConfigValue::String(raw)) => parse_duration(&raw),
		Some(other) => Err(HandlerError::InvalidArgument(format!(
			"{key} must be a duration, got {}",
			other.type_name()
		))),
	}
}

/// Parses `250ms`, `90s`, `5m`, `1h` or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, HandlerError> {
	let raw = raw.trim();
	let invalid = || HandlerError::InvalidArgument(format!("invalid duration '{raw}' (try 90, 30s, 5m or 250ms)"));
	let (digits, unit) = raw
		.find(|c: char| !c.is_ascii_digit())
		.map_or((raw, ""), |at| raw.split_at(at));
	let value: u64 = digits.parse().map_err(|_| invalid())?;
	let duration = match unit {
		"ms" => Duration::from_millis(value),
		"" | "s" => Duration::from_secs(value),
		"m" => Duration::from_secs(value.checked_mul(60).ok_or_else(invalid)?),
		"h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(invalid)?),
		_ => return Err(invalid()),
	};
	Ok(duration)
}

/// Compact human form: `250ms`, `45s`, `5m 00s`, `1h 02m`.
pub fn format_duration(duration: Duration) -> String {
	let secs = duration.as_secs();
	if secs == 0 {
		return format!("{}ms", duration.as_millis());
	}
	match (secs / 3600, secs % 3600 / 60, secs % 60) {
		(0, 0, s) => format!("{s}s"),
		(0, m, s) => format!("{m}m {s:02}s"),
		(h, m, _) => format!("{h}h {m:02}m"),
	}
}
