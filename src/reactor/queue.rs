use super::event::Event;
use std::collections::VecDeque;

const PRIORITY_LEVELS: usize = 4;

/// Priority event queue. Input events outrank timer ticks, which
/// outrank prefetch hints; FIFO within a level.
pub struct EventQueue {
	queues: [VecDeque<Event>; PRIORITY_LEVELS],
}

impl EventQueue {
	pub fn new() -> Self {
		Self {
			queues: std::array::from_fn(|_| VecDeque::new()),
		}
	}

	/// Push an event into its priority level
	pub fn push(&mut self, event: Event) {
		let priority = event.priority();
		self.queues[priority.as_index()].push_back(event);
	}

	/// Pop the highest priority event available
	pub fn pop(&mut self) -> Option<Event> {
		self.queues.iter_mut().find_map(|queue| queue.pop_front())
	}

	pub fn is_empty(&self) -> bool {
		self.queues.iter().all(|queue| queue.is_empty())
	}
}

impl Default for EventQueue {
	fn default() -> Self {
		Self::new()
	}
}
