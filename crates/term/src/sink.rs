//! Terminal rendering of output lines.

use std::io::{self, Write};

use crossterm::style::Stylize;
use termtools_output::{Level, OutputLine, OutputSink};

/// Writes each line to a terminal stream, styled by level.
#[derive(Debug)]
pub struct TerminalSink<W: Write + Send = io::Stdout> {
	out: W,
	color: bool,
	failed: bool,
}

impl TerminalSink {
	/// Sink writing to standard output.
	pub fn stdout(color: bool) -> Self {
		Self::new(io::stdout(), color)
	}
}

impl<W: Write + Send> TerminalSink<W> {
	/// Wraps an arbitrary writer.
	pub fn new(out: W, color: bool) -> Self {
		Self {
			out,
			color,
			failed: false,
		}
	}

	fn render(&self, line: &OutputLine) -> String {
		if !self.color {
			return line.text.clone();
		}
		let text = line.text.as_str();
		match line.level {
			Level::Plain => text.to_string(),
			Level::Info => text.cyan().to_string(),
			Level::Success => text.green().to_string(),
			Level::Warn => text.yellow().to_string(),
			Level::Error => text.red().bold().to_string(),
		}
	}
}

impl<W: Write + Send> OutputSink for TerminalSink<W> {
	fn deliver(&mut self, line: &OutputLine) {
		if self.failed {
			return;
		}
		let rendered = self.render(line);
		if let Err(error) = writeln!(self.out, "{rendered}") {
			tracing::warn!(%error, "terminal write failed");
			self.failed = true;
		}
	}

	fn flush(&mut self) {
		if !self.failed {
			let _ = self.out.flush();
		}
	}
}
