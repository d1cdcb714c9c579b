use std::process::Output;

use thiserror::Error;

/// Result returned by menu item handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Result returned by lifecycle hooks.
pub type HookResult = Result<(), HandlerError>;

/// Registration-time failures. Fatal to the registration attempt only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// A blueprint with this name is already registered.
	#[error("blueprint '{0}' is already registered")]
	DuplicateBlueprint(String),
	/// The key is already taken, either inside the same blueprint or by an
	/// already registered one.
	#[error("menu item key '{key}' from '{blueprint}' is already registered by '{existing}'")]
	DuplicateKey {
		/// Conflicting key.
		key: String,
		/// Blueprint that tried to claim the key.
		blueprint: String,
		/// Blueprint that already owns it.
		existing: String,
	},
	/// Menu item keys must be non-empty.
	#[error("blueprint '{0}' tried to add a menu item with an empty key")]
	EmptyKey(String),
}

/// Dispatch-time failures returned by [`Registry::execute`](crate::Registry::execute).
#[derive(Error, Debug)]
pub enum DispatchError {
	/// No menu item is bound to the key.
	#[error("menu item '{0}' not found")]
	UnknownKey(String),
	/// The handler returned an error or panicked.
	#[error("'{title}' failed: {source}")]
	Handler {
		/// Selected key.
		key: String,
		/// Title of the failing item.
		title: String,
		/// What went wrong inside the handler.
		#[source]
		source: HandlerError,
	},
}

impl DispatchError {
	/// Returns the handler error, if the failure came from a handler.
	pub fn handler_error(&self) -> Option<&HandlerError> {
		match self {
			Self::Handler { source, .. } => Some(source),
			Self::UnknownKey(_) => None,
		}
	}
}

/// Errors raised inside handlers and hooks.
#[derive(Error, Debug)]
pub enum HandlerError {
	/// General failure with message.
	#[error("{0}")]
	Failed(String),
	/// An argument was provided but invalid.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// File or process I/O failed.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	/// An external command exited unsuccessfully.
	#[error("`{program}` exited with {}", display_exit_code(.exit_code))]
	Command {
		/// Program and arguments, as run.
		program: String,
		/// Exit code, if the process exited normally.
		exit_code: Option<i32>,
		/// Captured standard output.
		stdout: String,
		/// Captured standard error.
		stderr: String,
	},
	/// The handler panicked.
	#[error("panicked: {0}")]
	Panicked(String),
}

impl HandlerError {
	/// Creates a [`HandlerError::Failed`].
	pub fn failed(message: impl Into<String>) -> Self {
		Self::Failed(message.into())
	}

	/// Creates a [`HandlerError::Command`] from a finished process.
	pub fn command(program: impl Into<String>, output: &Output) -> Self {
		Self::Command {
			program: program.into(),
			exit_code: output.status.code(),
			stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
			stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
		}
	}

	/// Stable label for the error kind.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Failed(_) => "failed",
			Self::InvalidArgument(_) => "invalid_argument",
			Self::Io(_) => "io",
			Self::Command { .. } => "command",
			Self::Panicked(_) => "panic",
		}
	}

	/// Captured `(stdout, stderr)` for external command failures.
	pub fn captured_streams(&self) -> Option<(&str, &str)> {
		match self {
			Self::Command { stdout, stderr, .. } => Some((stdout, stderr)),
			_ => None,
		}
	}
}

fn display_exit_code(code: &Option<i32>) -> String {
	match code {
		Some(code) => format!("exit code {code}"),
		None => "no exit code (terminated by signal)".to_string(),
	}
}
