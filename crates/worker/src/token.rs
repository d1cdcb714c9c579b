use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Longest uninterrupted sleep inside [`CancelToken::sleep`].
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cooperative cancellation signal shared between a worker and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
	inner: CancellationToken,
}

impl CancelToken {
	/// Creates a fresh, uncancelled token.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		self.inner.cancel();
	}

	/// Returns true once cancellation has been requested.
	pub fn is_cancelled(&self) -> bool {
		self.inner.is_cancelled()
	}

	/// Creates a child token, cancelled whenever this one is.
	pub fn child(&self) -> Self {
		Self {
			inner: self.inner.child_token(),
		}
	}

	/// Sleeps for `duration`, waking periodically to check for cancellation.
	///
	/// Returns `true` if the full duration elapsed, `false` if cancelled first.
	/// A duration past the end of the clock has no deadline: the call only
	/// returns once cancelled.
	pub fn sleep(&self, duration: Duration) -> bool {
		let deadline = Instant::now().checked_add(duration);
		loop {
			if self.is_cancelled() {
				return false;
			}
			let remaining = match deadline {
				Some(deadline) => deadline.saturating_duration_since(Instant::now()),
				None => SLEEP_SLICE,
			};
			if remaining.is_zero() {
				return true;
			}
			std::thread::sleep(remaining.min(SLEEP_SLICE));
		}
	}
}
