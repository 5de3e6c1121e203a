//! Single-slot request debouncing.
//!
//! Typing pauses trigger requests, not keystrokes. Each qualifying keystroke
//! re-arms one deadline slot, replacing whatever was pending, so at most one
//! request fires per pause. The scheduler holds no timer thread; hosts poll
//! [`DebounceScheduler::fire_due`] from their event loop or tick.

use std::time::{Duration, Instant};

use tracing::trace;

/// One replaceable deadline for the next suggestion request.
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
	delay: Duration,
	deadline: Option<Instant>,
}

impl DebounceScheduler {
	/// Creates a disarmed scheduler with the given quiet-period delay.
	pub fn new(delay: Duration) -> Self {
		Self { delay, deadline: None }
	}

	/// Arms the slot at `now + delay`, replacing any pending deadline.
	pub fn arm(&mut self, now: Instant) {
		self.deadline = Some(now + self.delay);
		trace!(delay_ms = self.delay.as_millis() as u64, "debounce.arm");
	}

	/// Clears any pending deadline.
	pub fn cancel(&mut self) {
		if self.deadline.take().is_some() {
			trace!("debounce.cancel");
		}
	}

	/// Returns true while a deadline is pending.
	pub fn is_armed(&self) -> bool {
		self.deadline.is_some()
	}

	/// The pending deadline, if armed.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Consumes the deadline if it has passed. Fires at most once per arm.
	pub fn fire_due(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DELAY: Duration = Duration::from_millis(1000);

	#[test]
	fn test_fires_once_after_delay() {
		let mut debounce = DebounceScheduler::new(DELAY);
		let start = Instant::now();
		debounce.arm(start);
		assert!(debounce.is_armed());
		assert!(!debounce.fire_due(start + Duration::from_millis(999)));
		assert!(debounce.fire_due(start + DELAY));
		// One-shot: the same arm never fires twice.
		assert!(!debounce.fire_due(start + Duration::from_secs(10)));
		assert!(!debounce.is_armed());
	}

	#[test]
	fn test_rearm_replaces_deadline() {
		let mut debounce = DebounceScheduler::new(DELAY);
		let start = Instant::now();
		debounce.arm(start);
		// A second keystroke pushes the deadline out.
		debounce.arm(start + Duration::from_millis(500));
		assert!(!debounce.fire_due(start + DELAY));
		assert!(debounce.fire_due(start + Duration::from_millis(1500)));
	}

	#[test]
	fn test_cancel_disarms() {
		let mut debounce = DebounceScheduler::new(DELAY);
		let start = Instant::now();
		debounce.arm(start);
		debounce.cancel();
		assert!(!debounce.is_armed());
		assert!(!debounce.fire_due(start + Duration::from_secs(10)));
	}
}
