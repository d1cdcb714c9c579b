//! Background worker primitives for long-running handler actions.
//!
//! Handlers that represent timed or scheduled work must not block the
//! presentation loop. They start a [`BackgroundTask`] and return immediately;
//! the task receives a [`CancelToken`] it is expected to check between units of
//! work (see [`CancelToken::sleep`]). There is no preemptive termination.

mod class;
mod set;
mod spawn;
mod task;
mod token;

pub use class::TaskClass;
pub use set::WorkerSet;
pub use spawn::spawn_named_thread;
pub use task::BackgroundTask;
pub use token::CancelToken;

/// Errors produced while managing background workers.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
	/// The OS refused to start the thread.
	#[error("failed to spawn worker '{name}': {source}")]
	Spawn {
		/// Worker name.
		name: String,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},
	/// The worker body panicked.
	#[error("worker '{name}' panicked: {message}")]
	Panicked {
		/// Worker name.
		name: String,
		/// Panic payload rendered as text.
		message: String,
	},
	/// A worker with the same name is still running.
	#[error("worker '{0}' is already running")]
	AlreadyRunning(String),
}

/// Renders a panic payload as text.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"non-string panic payload".to_string()
	}
}
