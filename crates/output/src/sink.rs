use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::OutputLine;

/// Destination for delivered output lines.
///
/// Sinks are only invoked on the channel's owner thread and never concurrently.
/// A sink must not write back into the channel that feeds it.
pub trait OutputSink: Send {
	/// Receives one complete line.
	fn deliver(&mut self, line: &OutputLine);

	/// Called after a batch of lines has been delivered.
	fn flush(&mut self) {}
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
	fn deliver(&mut self, line: &OutputLine) {
		(**self).deliver(line);
	}

	fn flush(&mut self) {
		(**self).flush();
	}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
	fn deliver(&mut self, _line: &OutputLine) {}
}

/// Collects delivered lines in memory.
///
/// Clones share the same buffer, so a caller can keep one handle while the
/// channel owns another.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
	lines: Arc<Mutex<Vec<OutputLine>>>,
}

impl MemorySink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy of every line delivered so far.
	pub fn lines(&self) -> Vec<OutputLine> {
		self.lines.lock().clone()
	}

	/// Returns the text of every line delivered so far.
	pub fn texts(&self) -> Vec<String> {
		self.lines.lock().iter().map(|line| line.text.clone()).collect()
	}

	/// Removes and returns all collected lines.
	pub fn take(&self) -> Vec<OutputLine> {
		std::mem::take(&mut *self.lines.lock())
	}

	/// Number of lines collected.
	pub fn len(&self) -> usize {
		self.lines.lock().len()
	}

	/// Returns true when nothing has been delivered.
	pub fn is_empty(&self) -> bool {
		self.lines.lock().is_empty()
	}
}

impl OutputSink for MemorySink {
	fn deliver(&mut self, line: &OutputLine) {
		self.lines.lock().push(line.clone());
	}
}

/// Appends ANSI-stripped lines to a log file.
#[derive(Debug)]
pub struct LogFileSink {
	path: PathBuf,
	file: File,
	failed: bool,
}

impl LogFileSink {
	/// Opens (creating if needed) `path` in append mode.
	pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
		let path = path.as_ref().to_path_buf();
		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			std::fs::create_dir_all(parent)?;
		}
		let file = OpenOptions::new().create(true).append(true).open(&path)?;
		Ok(Self {
			path,
			file,
			failed: false,
		})
	}

	/// Path of the underlying file.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl OutputSink for LogFileSink {
	fn deliver(&mut self, line: &OutputLine) {
		if self.failed {
			return;
		}
		let clean = strip_ansi_escapes::strip_str(&line.text);
		if let Err(error) = writeln!(self.file, "[{}] [{}] {}", line.level, line.origin, clean) {
			// Logged once; the interactive sink keeps working without the file.
			tracing::warn!(path = %self.path.display(), %error, "output log write failed");
			self.failed = true;
		}
	}

	fn flush(&mut self) {
		if !self.failed {
			let _ = self.file.flush();
		}
	}
}

/// Delivers every line to two sinks, first `A` then `B`.
#[derive(Debug)]
pub struct TeeSink<A, B> {
	first: A,
	second: B,
}

impl<A: OutputSink, B: OutputSink> TeeSink<A, B> {
	/// Combines two sinks.
	pub fn new(first: A, second: B) -> Self {
		Self { first, second }
	}
}

impl<A: OutputSink, B: OutputSink> OutputSink for TeeSink<A, B> {
	fn deliver(&mut self, line: &OutputLine) {
		self.first.deliver(line);
		self.second.deliver(line);
	}

	fn flush(&mut self) {
		self.first.flush();
		self.second.flush();
	}
}
