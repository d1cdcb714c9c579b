//! Startup and the interactive menu loop.
//!
//! The loop runs on the thread that owns the output channel. Input lines come
//! from a reader thread; output written by background workers arrives as
//! wake-ups on the same `select!`, so it is shown while the user is idle.

use std::io::{self, BufRead, Write};

use crossbeam_channel::{Receiver, select};
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use termtools_output::OutputChannel;
use termtools_registry::{ConfigValue, Registry, RegistryError};
use termtools_worker::{TaskClass, spawn_named_thread};

use crate::builtins;
use crate::render::{self, EXIT_KEY, HELP_ALIAS, HELP_KEY, Painter, RESERVED_KEYS};

/// Display name and registry name.
pub const APP_NAME: &str = "TermTools";

/// Builds the registry: base config, user settings, built-in blueprints.
///
/// `settings` are applied after the defaults, so they can override them, and
/// before registration, so init hooks see them.
pub fn create_app(output: OutputChannel, settings: Vec<(String, ConfigValue)>) -> Result<Registry, RegistryError> {
	let mut registry = Registry::new(APP_NAME, output);
	registry.set_config("debug", false);
	registry.set_config("version", env!("CARGO_PKG_VERSION"));
	registry.set_config("app.name", APP_NAME);
	for (key, value) in settings {
		registry.set_config(key, value);
	}

	for blueprint in builtins::blueprints()? {
		registry.register(blueprint)?;
	}
	report_shadowed_keys(&registry);
	Ok(registry)
}

/// Warns about registered keys the front end intercepts. Returns how many.
pub fn report_shadowed_keys(registry: &Registry) -> usize {
	let shadowed: Vec<&str> = RESERVED_KEYS
		.into_iter()
		.filter(|key| registry.contains_key(key))
		.collect();
	for key in &shadowed {
		let owner = registry.get_item(key).map(|item| item.blueprint()).unwrap_or_default();
		tracing::warn!(key, owner, "menu.key_shadowed");
		registry
			.output()
			.warn(format!("⚠ Menu item '{key}' from '{owner}' is unreachable: the key is reserved"));
	}
	shadowed.len()
}

/// What the loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	/// Keep reading.
	Continue,
	/// Leave the loop.
	Exit,
}

/// Interprets input lines against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
	registry: &'a Registry,
	painter: Painter,
}

impl<'a> Session<'a> {
	/// Creates a session.
	pub fn new(registry: &'a Registry, painter: Painter) -> Self {
		Self { registry, painter }
	}

	/// Writes the main menu.
	pub fn show_menu(self) {
		self.registry.output().write(render::menu(self.registry, self.painter));
	}

	/// Handles one input line: `<key> [args...]`, a reserved key, or blank.
	pub fn handle_line(self, line: &str) -> Flow {
		let mut words = line.split_whitespace();
		let Some(key) = words.next() else {
			self.show_menu();
			return Flow::Continue;
		};
		match key {
			HELP_KEY | HELP_ALIAS => self
				.registry
				.output()
				.write(render::help_tree(self.registry, self.painter)),
			EXIT_KEY => return Flow::Exit,
			_ => {
				let args: Vec<String> = words.map(str::to_string).collect();
				if let Err(error) = self.registry.execute(key, &args) {
					tracing::debug!(key, %error, "menu.dispatch_failed");
				}
			}
		}
		Flow::Continue
	}
}

/// Runs the menu until the exit key, end of input or a message on `stop`,
/// then shuts the registry down and flushes what the workers wrote on their
/// way out.
pub fn run<R>(registry: &Registry, painter: Painter, input: R, stop: Receiver<i32>, interactive: bool) -> io::Result<()>
where
	R: BufRead + Send + 'static,
{
	let lines = spawn_line_reader(input)?;
	let wakeups = registry.output().wakeups();
	let session = Session::new(registry, painter);
	let mut prompt = Prompt::new(interactive, painter);

	session.show_menu();
	loop {
		prompt.show()?;
		select! {
			recv(lines) -> line => {
				prompt.answered();
				let Ok(line) = line else {
					tracing::debug!("menu.input_closed");
					break;
				};
				if session.handle_line(&line) == Flow::Exit {
					break;
				}
			}
			recv(wakeups) -> _ => {
				prompt.clear()?;
				registry.output().drain();
			}
			recv(stop) -> signal => {
				prompt.clear()?;
				tracing::info!(signal = signal.ok(), "menu.interrupted");
				break;
			}
		}
	}

	registry
		.output()
		.success(format!("👋 Thank you for using {APP_NAME}!"));
	let failures = registry.shutdown();
	registry.output().drain();
	tracing::info!(failures, "menu.exit");
	Ok(())
}

fn spawn_line_reader<R>(input: R) -> io::Result<Receiver<String>>
where
	R: BufRead + Send + 'static,
{
	let (tx, rx) = crossbeam_channel::unbounded();
	// Detached: a blocked stdin read must not hold up exit.
	spawn_named_thread(TaskClass::IoBlocking, "input-reader", move || {
		for line in input.lines() {
			match line {
				Ok(line) => {
					if tx.send(line).is_err() {
						break;
					}
				}
				Err(error) => {
					tracing::warn!(%error, "input read failed");
					break;
				}
			}
		}
	})?;
	Ok(rx)
}

/// The input prompt. Only drawn on an interactive terminal.
struct Prompt {
	enabled: bool,
	painter: Painter,
	visible: bool,
}

impl Prompt {
	fn new(enabled: bool, painter: Painter) -> Self {
		Self {
			enabled,
			painter,
			visible: false,
		}
	}

	fn show(&mut self) -> io::Result<()> {
		if !self.enabled || self.visible {
			return Ok(());
		}
		let text = "Enter your choice: ";
		let mut out = io::stdout().lock();
		if self.painter.color() {
			queue!(out, Print(text.yellow()))?;
		} else {
			queue!(out, Print(text))?;
		}
		out.flush()?;
		self.visible = true;
		Ok(())
	}

	/// Erases the prompt so queued output starts on a clean line.
	fn clear(&mut self) -> io::Result<()> {
		if !self.visible {
			return Ok(());
		}
		let mut out = io::stdout().lock();
		queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
		out.flush()?;
		self.visible = false;
		Ok(())
	}

	fn answered(&mut self) {
		self.visible = false;
	}
}

#[cfg(test)]
mod tests;
