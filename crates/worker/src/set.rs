use parking_lot::Mutex;

use crate::{BackgroundTask, CancelToken, TaskClass, WorkerError};

/// A set of named background tasks owned by one feature.
///
/// Names are unique among running tasks; finished tasks are reaped lazily
/// whenever the set is touched.
#[derive(Debug, Default)]
pub struct WorkerSet {
	tasks: Mutex<Vec<BackgroundTask>>,
}

impl WorkerSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a task unless one with the same name is still running.
	pub fn spawn<F>(&self, class: TaskClass, name: impl Into<String>, body: F) -> Result<CancelToken, WorkerError>
	where
		F: FnOnce(CancelToken) + Send + 'static,
	{
		let name = name.into();
		let mut tasks = self.tasks.lock();
		reap(&mut tasks);
		if tasks.iter().any(|task| task.name() == name) {
			return Err(WorkerError::AlreadyRunning(name));
		}
		let task = BackgroundTask::spawn(class, name, body)?;
		let token = task.token().clone();
		tasks.push(task);
		Ok(token)
	}

	/// Returns true if a task named `name` is still running.
	pub fn is_running(&self, name: &str) -> bool {
		let mut tasks = self.tasks.lock();
		reap(&mut tasks);
		tasks.iter().any(|task| task.name() == name)
	}

	/// Names of running tasks, in start order.
	pub fn running(&self) -> Vec<String> {
		let mut tasks = self.tasks.lock();
		reap(&mut tasks);
		tasks.iter().map(|task| task.name().to_string()).collect()
	}

	/// Cancels the task named `name`. Returns false if no such task is running.
	///
	/// Does not wait for the task to return.
	pub fn cancel(&self, name: &str) -> bool {
		let mut tasks = self.tasks.lock();
		reap(&mut tasks);
		match tasks.iter().find(|task| task.name() == name) {
			Some(task) => {
				task.cancel();
				true
			}
			None => false,
		}
	}

	/// Cancels every task and waits for all of them, returning the failures.
	pub fn shutdown(&self) -> Vec<WorkerError> {
		let tasks = std::mem::take(&mut *self.tasks.lock());
		for task in &tasks {
			task.cancel();
		}
		tasks
			.into_iter()
			.filter_map(|task| task.join().err())
			.inspect(|error| tracing::warn!(%error, "worker.shutdown failure"))
			.collect()
	}
}

fn reap(tasks: &mut Vec<BackgroundTask>) {
	let mut index = 0;
	while index < tasks.len() {
		if tasks[index].is_finished() {
			let task = tasks.remove(index);
			if let Err(error) = task.join() {
				tracing::warn!(%error, "worker.reap failure");
			}
		} else {
			index += 1;
		}
	}
}
