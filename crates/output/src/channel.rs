use std::fmt;
use std::sync::Arc;
use std::thread::ThreadId;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use crate::line::PendingLine;
use crate::{Delivery, Level, OutputSink};

struct SinkState {
	sink: Box<dyn OutputSink>,
	delivered: u64,
}

impl SinkState {
	fn deliver(&mut self, pending: PendingLine, delivery: Delivery) {
		self.delivered += 1;
		let line = pending.stamp(self.delivered, delivery);
		self.sink.deliver(&line);
	}

	fn flush_queue(&mut self, queue: &Receiver<PendingLine>) -> usize {
		let mut count = 0;
		while let Ok(pending) = queue.try_recv() {
			self.deliver(pending, Delivery::Queued);
			count += 1;
		}
		count
	}
}

struct Shared {
	owner: ThreadId,
	state: Mutex<SinkState>,
	queue_tx: Sender<PendingLine>,
	queue_rx: Receiver<PendingLine>,
	wake_tx: Sender<()>,
	wake_rx: Receiver<()>,
}

/// Cloneable, thread-safe handle to the presentation layer's output stream.
#[derive(Clone)]
pub struct OutputChannel {
	shared: Arc<Shared>,
}

impl fmt::Debug for OutputChannel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OutputChannel")
			.field("owner", &self.shared.owner)
			.field("pending", &self.shared.queue_rx.len())
			.finish_non_exhaustive()
	}
}

impl OutputChannel {
	/// Creates a channel owned by the calling thread, delivering into `sink`.
	pub fn new(sink: impl OutputSink + 'static) -> Self {
		let (queue_tx, queue_rx) = crossbeam_channel::unbounded();
		// Capacity one: a pending wake-up already covers every later line.
		let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
		Self {
			shared: Arc::new(Shared {
				owner: std::thread::current().id(),
				state: Mutex::new(SinkState {
					sink: Box::new(sink),
					delivered: 0,
				}),
				queue_tx,
				queue_rx,
				wake_tx,
				wake_rx,
			}),
		}
	}

	/// Returns true when called on the thread that created the channel.
	pub fn is_owner_thread(&self) -> bool {
		std::thread::current().id() == self.shared.owner
	}

	/// Writes one unstyled line.
	pub fn write(&self, text: impl Into<String>) {
		self.write_level(Level::Plain, text);
	}

	/// Writes one informational line.
	pub fn info(&self, text: impl Into<String>) {
		self.write_level(Level::Info, text);
	}

	/// Writes one success line.
	pub fn success(&self, text: impl Into<String>) {
		self.write_level(Level::Success, text);
	}

	/// Writes one warning line.
	pub fn warn(&self, text: impl Into<String>) {
		self.write_level(Level::Warn, text);
	}

	/// Writes one error line.
	pub fn error(&self, text: impl Into<String>) {
		self.write_level(Level::Error, text);
	}

	/// Writes one line at `level`.
	///
	/// Safe from any thread. Never waits on the presentation loop: off the
	/// owner thread the line is only enqueued.
	pub fn write_level(&self, level: Level, text: impl Into<String>) {
		let pending = PendingLine::new(level, text.into());
		if self.is_owner_thread() {
			let mut state = self.shared.state.lock();
			state.flush_queue(&self.shared.queue_rx);
			state.deliver(pending, Delivery::Direct);
			state.sink.flush();
			return;
		}

		if self.shared.queue_tx.send(pending).is_err() {
			// Unreachable while `Shared` holds the receiver.
			tracing::error!("output queue disconnected");
			return;
		}
		match self.shared.wake_tx.try_send(()) {
			Ok(()) | Err(TrySendError::Full(())) => {}
			Err(TrySendError::Disconnected(())) => tracing::error!("output wake-up disconnected"),
		}
	}

	/// Delivers every queued line to the sink, returning how many were delivered.
	///
	/// Only has an effect on the owner thread; elsewhere it returns 0 and leaves
	/// the queue untouched.
	pub fn drain(&self) -> usize {
		if !self.is_owner_thread() {
			tracing::trace!("output.drain ignored off the owner thread");
			return 0;
		}
		// Consume any wake-up; the queue is about to be emptied.
		let _ = self.shared.wake_rx.try_recv();
		let mut state = self.shared.state.lock();
		let count = state.flush_queue(&self.shared.queue_rx);
		if count > 0 {
			state.sink.flush();
			tracing::trace!(count, "output.drain");
		}
		count
	}

	/// Receiver signalled whenever a line is queued from another thread.
	///
	/// Signals are coalesced: one pending signal may stand for many lines.
	pub fn wakeups(&self) -> Receiver<()> {
		self.shared.wake_rx.clone()
	}

	/// Number of queued lines not yet delivered.
	pub fn pending(&self) -> usize {
		self.shared.queue_rx.len()
	}

	/// Number of lines delivered to the sink so far.
	pub fn delivered(&self) -> u64 {
		self.shared.state.lock().delivered
	}
}
