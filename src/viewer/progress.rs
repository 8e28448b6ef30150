use crate::types::TimerHandle;
use std::time::Duration;

/// Outcome of delivering a scheduled cadence tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
	/// The tick belonged to a cancelled or superseded run
	Stale,
	/// Progress advanced; schedule another tick after the cadence
	Ticked { percent: f32 },
	/// Progress reached 100. Reported exactly once per run; every
	/// later tick for the same handle is stale.
	Completed,
}

/// Drives the active story's progress from 0 to 100 over its duration,
/// one fixed-cadence tick at a time. At most one run is live; starting
/// a new run or cancelling invalidates the previous handle, so ticks
/// already in flight miss on delivery.
pub struct ProgressTimer {
	cadence: Duration,
	run: Option<Run>,
	next_id: u64,
}

struct Run {
	handle: TimerHandle,
	duration_ms: u64,
	elapsed_ms: u64,
	done: bool,
}

impl ProgressTimer {
	pub fn new(cadence: Duration) -> Self {
		Self {
			cadence,
			run: None,
			next_id: 0,
		}
	}

	/// Arm a run over `duration`. Any previous run's handle goes stale.
	pub fn start(&mut self, duration: Duration) -> TimerHandle {
		self.next_id += 1;
		let handle = TimerHandle(self.next_id);
		self.run = Some(Run {
			handle,
			duration_ms: (duration.as_millis() as u64).max(1),
			elapsed_ms: 0,
			done: false,
		});
		handle
	}

	/// Stop the run owning `handle`. Safe to call with a stale handle
	/// or after completion; both are no-ops.
	pub fn cancel(&mut self, handle: TimerHandle) {
		if self.run.as_ref().is_some_and(|r| r.handle == handle) {
			self.run = None;
		}
	}

	pub fn on_tick(&mut self, handle: TimerHandle) -> TickOutcome {
		let cadence_ms = (self.cadence.as_millis() as u64).max(1);
		let Some(run) = self.run.as_mut() else {
			return TickOutcome::Stale;
		};
		if run.handle != handle || run.done {
			return TickOutcome::Stale;
		}

		run.elapsed_ms = (run.elapsed_ms + cadence_ms).min(run.duration_ms);
		if run.elapsed_ms >= run.duration_ms {
			run.done = true;
			TickOutcome::Completed
		} else {
			TickOutcome::Ticked {
				percent: (run.elapsed_ms as f32 / run.duration_ms as f32) * 100.0,
			}
		}
	}
}
