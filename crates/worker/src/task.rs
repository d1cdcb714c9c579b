use std::thread::JoinHandle;

use crate::{CancelToken, TaskClass, WorkerError, panic_message, spawn_named_thread};

/// A named worker thread paired with its cancellation token.
#[derive(Debug)]
pub struct BackgroundTask {
	name: String,
	class: TaskClass,
	token: CancelToken,
	handle: JoinHandle<()>,
}

impl BackgroundTask {
	/// Starts `body` on a new thread named `name`.
	///
	/// The body receives a clone of the task's token and should return soon
	/// after it is cancelled.
	pub fn spawn<F>(class: TaskClass, name: impl Into<String>, body: F) -> Result<Self, WorkerError>
	where
		F: FnOnce(CancelToken) + Send + 'static,
	{
		Self::spawn_with_token(class, name, CancelToken::new(), body)
	}

	/// Like [`BackgroundTask::spawn`] but with a caller-provided token.
	pub fn spawn_with_token<F>(
		class: TaskClass,
		name: impl Into<String>,
		token: CancelToken,
		body: F,
	) -> Result<Self, WorkerError>
	where
		F: FnOnce(CancelToken) + Send + 'static,
	{
		let name = name.into();
		let worker_token = token.clone();
		let handle = spawn_named_thread(class, name.clone(), move || body(worker_token))
			.map_err(|source| WorkerError::Spawn {
				name: name.clone(),
				source,
			})?;
		tracing::debug!(worker = %name, worker_class = class.as_str(), "worker.started");
		Ok(Self {
			name,
			class,
			token,
			handle,
		})
	}

	/// Worker name (also the OS thread name).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Worker class.
	pub fn class(&self) -> TaskClass {
		self.class
	}

	/// Token observed by the worker.
	pub fn token(&self) -> &CancelToken {
		&self.token
	}

	/// Requests cooperative cancellation.
	pub fn cancel(&self) {
		tracing::debug!(worker = %self.name, "worker.cancel");
		self.token.cancel();
	}

	/// Returns true once the worker body has returned.
	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}

	/// Waits for the worker body to return.
	pub fn join(self) -> Result<(), WorkerError> {
		let Self { name, handle, .. } = self;
		match handle.join() {
			Ok(()) => {
				tracing::debug!(worker = %name, "worker.joined");
				Ok(())
			}
			Err(payload) => Err(WorkerError::Panicked {
				message: panic_message(payload.as_ref()),
				name,
			}),
		}
	}

	/// Cancels the worker and waits for it to return.
	pub fn cancel_and_join(self) -> Result<(), WorkerError> {
		self.cancel();
		self.join()
	}
}
