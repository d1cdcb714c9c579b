use std::fmt;
use std::sync::Arc;

/// Severity attached to an output line, used by sinks for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
	/// Unstyled text.
	#[default]
	Plain,
	/// Informational progress.
	Info,
	/// A completed operation.
	Success,
	/// Something the user should look at.
	Warn,
	/// A failed operation.
	Error,
}

impl Level {
	/// Returns the lowercase label used in log files.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Plain => "plain",
			Self::Info => "info",
			Self::Success => "success",
			Self::Warn => "warn",
			Self::Error => "error",
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How a line reached the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
	/// Written on the owner thread and delivered in the same call.
	Direct,
	/// Written on another thread and delivered by a later drain.
	Queued,
}

/// One complete unit of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
	/// Position in the delivered stream, starting at 1.
	pub seq: u64,
	/// Severity.
	pub level: Level,
	/// Name of the writing thread (or its id when unnamed).
	pub origin: Arc<str>,
	/// Whether the line was delivered directly or via the queue.
	pub delivery: Delivery,
	/// Line text; may contain embedded newlines, which are kept together.
	pub text: String,
}

/// A line waiting for delivery; the sequence number is stamped at delivery.
#[derive(Debug)]
pub(crate) struct PendingLine {
	pub level: Level,
	pub origin: Arc<str>,
	pub text: String,
}

impl PendingLine {
	pub(crate) fn new(level: Level, text: String) -> Self {
		Self {
			level,
			origin: current_thread_label(),
			text,
		}
	}

	pub(crate) fn stamp(self, seq: u64, delivery: Delivery) -> OutputLine {
		OutputLine {
			seq,
			level: self.level,
			origin: self.origin,
			delivery,
			text: self.text,
		}
	}
}

fn current_thread_label() -> Arc<str> {
	let thread = std::thread::current();
	match thread.name() {
		Some(name) => Arc::from(name),
		None => Arc::from(format!("{:?}", thread.id())),
	}
}
