/// Execution classes used for worker naming and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Countdowns and other work driven by wall-clock time.
	Timer,
	/// Blocking I/O such as waiting on an external command.
	IoBlocking,
}

impl TaskClass {
	/// Returns the label used in trace events.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Timer => "timer",
			Self::IoBlocking => "io_blocking",
		}
	}
}
