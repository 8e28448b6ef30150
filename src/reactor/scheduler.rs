use super::event::Event;
use super::queue::EventQueue;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

struct ScheduledEvent {
	emit_at: Instant,
	event: Event,
}

impl PartialEq for ScheduledEvent {
	fn eq(&self, other: &Self) -> bool {
		self.emit_at == other.emit_at
	}
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ScheduledEvent {
	fn cmp(&self, other: &Self) -> Ordering {
		other.emit_at.cmp(&self.emit_at)
	}
}

/// Delay queue for timer-driven events.
///
/// The caller supplies the current instant on every call, so the
/// reactor observes one consistent "now" per frame and tests can drive
/// logical time deterministically. Scheduled events carry no identity
/// of their own; staleness is decided by the receiving component, which
/// compares the embedded [`crate::types::TimerHandle`] against its live
/// one at delivery time.
pub struct Scheduler {
	pending: BinaryHeap<ScheduledEvent>,
}

impl Scheduler {
	pub fn new() -> Self {
		Self {
			pending: BinaryHeap::new(),
		}
	}

	/// Schedule an event to fire `delay` after `now`
	pub fn schedule(&mut self, now: Instant, event: Event, delay: Duration) {
		self.pending.push(ScheduledEvent {
			emit_at: now + delay,
			event,
		});
	}

	/// Drain every event due at `now` into the queue
	pub fn tick(&mut self, now: Instant, queue: &mut EventQueue) {
		while let Some(scheduled) = self.pending.peek() {
			if scheduled.emit_at > now {
				break;
			}
			if let Some(scheduled) = self.pending.pop() {
				queue.push(scheduled.event);
			}
		}
	}
}

impl Default for Scheduler {
	fn default() -> Self {
		Self::new()
	}
}
