//! Output channel shared by the dispatcher, handlers and background workers.
//!
//! The presentation layer owns exactly one [`OutputChannel`]. Every clone of it
//! can be written from any thread; lines are delivered to the channel's
//! [`OutputSink`] one at a time, so a single `write` is never interleaved with
//! another.
//!
//! # Delivery
//!
//! The channel remembers the thread that created it (the presentation thread).
//!
//! - Writes on that thread first flush anything queued by other threads, then go
//!   straight to the sink.
//! - Writes on any other thread are pushed onto an unbounded queue and a wake-up
//!   is raised. They return as soon as the line is enqueued, even when the
//!   presentation loop is not draining.
//! - The presentation loop calls [`OutputChannel::drain`] (typically after
//!   waiting on [`OutputChannel::wakeups`]) to deliver queued lines on its own
//!   thread.
//!
//! The sink is therefore only ever touched from the owner thread.

mod channel;
mod line;
mod sink;

pub use channel::OutputChannel;
pub use line::{Delivery, Level, OutputLine};
pub use sink::{LogFileSink, MemorySink, NullSink, OutputSink, TeeSink};
