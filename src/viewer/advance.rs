use crate::types::TimerHandle;

/// One-shot auto-advance token. The actual delay lives in the reactor
/// scheduler; this tracks which pending advance, if any, is still
/// allowed to move the active index when its event arrives.
pub struct AdvanceScheduler {
	pending: Option<TimerHandle>,
	next_id: u64,
}

impl AdvanceScheduler {
	pub fn new() -> Self {
		Self {
			pending: None,
			next_id: 0,
		}
	}

	/// Arm an advance. Any previously pending handle goes stale.
	pub fn schedule(&mut self) -> TimerHandle {
		self.next_id += 1;
		let handle = TimerHandle(self.next_id);
		self.pending = Some(handle);
		handle
	}

	/// Disarm `handle`. No-op when it already fired, was already
	/// cancelled, or was superseded.
	pub fn cancel(&mut self, handle: TimerHandle) {
		if self.pending == Some(handle) {
			self.pending = None;
		}
	}

	/// Consume the pending advance. True at most once per scheduled
	/// handle; a stale handle never fires.
	pub fn on_due(&mut self, handle: TimerHandle) -> bool {
		if self.pending == Some(handle) {
			self.pending = None;
			true
		} else {
			false
		}
	}
}

impl Default for AdvanceScheduler {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fires_exactly_once() {
		let mut advance = AdvanceScheduler::new();
		let handle = advance.schedule();
		assert!(advance.on_due(handle));
		assert!(!advance.on_due(handle));
	}

	#[test]
	fn cancelled_handle_never_fires() {
		let mut advance = AdvanceScheduler::new();
		let handle = advance.schedule();
		advance.cancel(handle);
		advance.cancel(handle);
		assert!(!advance.on_due(handle));
	}

	#[test]
	fn rescheduling_supersedes_the_old_handle() {
		let mut advance = AdvanceScheduler::new();
		let old = advance.schedule();
		let new = advance.schedule();
		assert!(!advance.on_due(old));
		assert!(advance.on_due(new));
	}
}
