//! Key resolution, invocation and failure containment.

use std::fmt::Write as _;
use std::panic::{AssertUnwindSafe, catch_unwind};

use termtools_worker::panic_message;

use crate::{DispatchError, HandlerError, MenuItem, Registry};

impl Registry {
	/// Runs the handler bound to `key` with `args`.
	///
	/// Handlers that opted into context receive this registry. Every failure is
	/// contained here: unknown keys, handler errors and handler panics are
	/// written to the output channel as one clearly marked message and returned
	/// as a [`DispatchError`]. The registry stays usable afterwards.
	pub fn execute(&self, key: &str, args: &[String]) -> Result<(), DispatchError> {
		let Some(item) = self.get_item(key) else {
			tracing::debug!(key, "dispatch.unknown_key");
			self.output().error(format!("✗ Menu item '{key}' not found"));
			return Err(DispatchError::UnknownKey(key.to_string()));
		};

		let span = tracing::debug_span!(
			"dispatch",
			key,
			blueprint = item.blueprint(),
			context = item.wants_context()
		);
		let _guard = span.enter();

		let result = catch_unwind(AssertUnwindSafe(|| item.handler().invoke(self, args)))
			.unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload.as_ref()))));

		match result {
			Ok(()) => {
				tracing::debug!("dispatch.ok");
				Ok(())
			}
			Err(error) => {
				tracing::warn!(kind = error.kind(), %error, "dispatch.handler_failed");
				self.output().error(failure_message(item, &error));
				Err(DispatchError::Handler {
					key: key.to_string(),
					title: item.title().to_string(),
					source: error,
				})
			}
		}
	}
}

/// Renders the user-facing report for a handler failure.
///
/// Command failures include both captured streams, indented under labels.
pub(crate) fn failure_message(item: &MenuItem, error: &HandlerError) -> String {
	let mut message = format!("✗ Error executing '{}': {}: {error}", item.title(), error.kind());
	if let Some((stdout, stderr)) = error.captured_streams() {
		append_stream(&mut message, "stdout", stdout);
		append_stream(&mut message, "stderr", stderr);
	}
	message
}

fn append_stream(message: &mut String, label: &str, contents: &str) {
	let contents = contents.trim_end();
	if contents.is_empty() {
		let _ = write!(message, "\n  {label}: (empty)");
		return;
	}
	let _ = write!(message, "\n  {label}:");
	for line in contents.lines() {
		let _ = write!(message, "\n    {line}");
	}
}
