//! Termination signals forwarded into the menu loop.

use std::io;

use crossbeam_channel::Receiver;

/// Returns a receiver yielding SIGINT and SIGTERM as they arrive.
///
/// The first signal lets the menu loop leave through its normal shutdown
/// path; a second one exits the process at once.
#[cfg(not(windows))]
pub fn stop_requests() -> io::Result<Receiver<i32>> {
	use signal_hook::consts::signal::{SIGINT, SIGTERM};
	use termtools_worker::{TaskClass, spawn_named_thread};

	let mut signals = signal_hook::iterator::Signals::new([SIGINT, SIGTERM])?;
	let (tx, rx) = crossbeam_channel::bounded(1);
	spawn_named_thread(TaskClass::IoBlocking, "signal-listener", move || {
		let mut requested = false;
		for signal in signals.forever() {
			if requested {
				tracing::warn!(signal, "signal.force_exit");
				std::process::exit(128 + signal);
			}
			requested = true;
			tracing::info!(signal, "signal.stop_requested");
			if tx.send(signal).is_err() {
				break;
			}
		}
	})?;
	Ok(rx)
}

/// Signal listening is unavailable; the loop only ends on input.
#[cfg(windows)]
pub fn stop_requests() -> io::Result<Receiver<i32>> {
	tracing::warn!("signal listener is not supported on windows");
	Ok(crossbeam_channel::never())
}
