//! Per-factory sequence counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter owned by one factory.
///
/// Starts at 0; the first [`next_value`](Self::next_value) returns 1.
#[derive(Debug, Default)]
pub struct Sequence {
	counter: AtomicU64,
}

impl Sequence {
	/// Creates a counter at 0.
	pub fn new() -> Self {
		Self {
			counter: AtomicU64::new(0),
		}
	}

	/// Increments the counter and returns the new value.
	pub fn next_value(&self) -> u64 {
		self.counter.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Last value handed out, 0 if none.
	pub fn current(&self) -> u64 {
		self.counter.load(Ordering::SeqCst)
	}
}
