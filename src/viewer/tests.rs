use super::*;
use crate::api::Story;
use crate::reactor::{EventQueue, Scheduler, StoreEvent};
use std::time::Instant;

fn feed(n: usize, duration_ms: u64) -> Vec<Story> {
	(0..n)
		.map(|i| Story {
			url: format!("https://example.com/story-{i}.jpg"),
			kind: MediaKind::Image,
			duration: Some(duration_ms),
			header: None,
			see_more: None,
		})
		.collect()
}

/// Drives queue + scheduler + viewer with synthetic time. Media load
/// requests are recorded instead of fetched; tests feed the ready
/// signals by hand.
struct Harness {
	queue: EventQueue,
	scheduler: Scheduler,
	store: crate::store::StoryStore,
	viewer: ViewerSession,
	now: Instant,
	media_requests: Vec<(usize, String)>,
}

impl Harness {
	fn new(stories: Vec<Story>) -> Self {
		Self::with_config(stories, ViewerConfig::default())
	}

	fn with_config(stories: Vec<Story>, config: ViewerConfig) -> Self {
		let mut store = crate::store::StoryStore::new();
		let _ = store.handle(&Event::Store(StoreEvent::StoriesReceived { stories }));
		Self {
			queue: EventQueue::new(),
			scheduler: Scheduler::new(),
			store,
			viewer: ViewerSession::new(config),
			now: Instant::now(),
			media_requests: Vec::new(),
		}
	}

	fn dispatch(&mut self, event: Event) {
		self.queue.push(event);
		self.drain();
	}

	fn drain(&mut self) {
		while let Some(event) = self.queue.pop() {
			let response = match &event {
				Event::Viewer(_) => self.viewer.handle(&event, &self.store),
				Event::Store(_) => self.store.handle(&event),
				Event::Media(MediaEvent::LoadRequest { index, url, .. }) => {
					self.media_requests.push((*index, url.clone()));
					ComponentResponse::none()
				}
				_ => ComponentResponse::none(),
			};
			for e in response.events {
				self.queue.push(e);
			}
			for (e, d) in response.scheduled {
				self.scheduler.schedule(self.now, e, d);
			}
		}
	}

	fn advance_ms(&mut self, ms: u64) {
		let target = self.now + Duration::from_millis(ms);
		while self.now < target {
			self.now = (self.now + Duration::from_millis(10)).min(target);
			self.scheduler.tick(self.now, &mut self.queue);
			self.drain();
		}
	}

	fn open(&mut self, index: usize) {
		self.dispatch(Event::Viewer(ViewerEvent::Open { index }));
	}

	fn ready(&mut self, index: usize) {
		self.dispatch(Event::Viewer(ViewerEvent::MediaReady { index }));
	}

	fn tap_left(&mut self) {
		self.dispatch(Event::Viewer(ViewerEvent::Tapped {
			x: 10.0,
			width: 400.0,
		}));
	}

	fn tap_right(&mut self) {
		self.dispatch(Event::Viewer(ViewerEvent::Tapped {
			x: 390.0,
			width: 400.0,
		}));
	}

	fn close(&mut self) {
		self.dispatch(Event::Viewer(ViewerEvent::Close));
	}

	fn snapshot(&self) -> ViewerSnapshot {
		self.viewer.snapshot().expect("viewer should be open")
	}
}

#[test]
fn opening_starts_loading_with_zero_progress() {
	let mut h = Harness::new(feed(3, 5000));
	h.open(1);

	let snap = h.snapshot();
	assert_eq!(snap.active_index, 1);
	assert_eq!(snap.progress, 0.0);
	assert!(snap.is_loading);
	assert_eq!(h.media_requests.len(), 1);
	assert_eq!(h.media_requests[0].0, 1);
}

#[test]
fn nothing_moves_while_media_never_loads() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(0);
	h.advance_ms(60_000);

	let snap = h.snapshot();
	assert_eq!(snap.active_index, 0);
	assert_eq!(snap.progress, 0.0);
	assert!(snap.is_loading);
}

#[test]
fn media_ready_for_another_index_is_ignored() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(0);
	h.ready(1);

	assert!(h.snapshot().is_loading);
	h.advance_ms(10_000);
	assert_eq!(h.snapshot().active_index, 0);
	assert_eq!(h.snapshot().progress, 0.0);
}

#[test]
fn late_media_ready_after_navigation_is_ignored() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(0);
	h.tap_right();
	assert_eq!(h.snapshot().active_index, 1);

	// The slow load for story 0 finishes after we moved on
	h.ready(0);
	assert!(h.snapshot().is_loading);
	h.advance_ms(10_000);
	assert_eq!(h.snapshot().active_index, 1);
	assert_eq!(h.snapshot().progress, 0.0);
}

#[test]
fn progress_completes_and_auto_advances_on_schedule() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(0);
	h.ready(0);

	h.advance_ms(4_999);
	let snap = h.snapshot();
	assert_eq!(snap.active_index, 0);
	assert!((snap.progress - 99.0).abs() < 0.01);

	// One more cadence: progress hits 100 and the advance fires
	h.advance_ms(1);
	let snap = h.snapshot();
	assert_eq!(snap.active_index, 1);
	assert_eq!(snap.progress, 0.0);
	assert!(snap.is_loading);
	assert_eq!(h.media_requests.last().map(|(i, _)| *i), Some(1));
}

#[test]
fn tapping_back_right_after_auto_advance_returns_with_reset_progress() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(0);
	h.ready(0);
	h.advance_ms(5_000);
	assert_eq!(h.snapshot().active_index, 1);

	h.advance_ms(1);
	h.tap_left();
	let snap = h.snapshot();
	assert_eq!(snap.active_index, 0);
	assert_eq!(snap.progress, 0.0);
	assert!(snap.is_loading);
}

#[test]
fn previous_at_first_story_stays_put() {
	let mut h = Harness::new(feed(3, 5000));
	h.open(0);
	h.ready(0);
	h.advance_ms(1_000);
	let before = h.snapshot();

	h.tap_left();
	let after = h.snapshot();
	assert_eq!(after.active_index, 0);
	// Absorbed at the boundary: not an index change, no reset
	assert_eq!(after.progress, before.progress);
	assert!(!after.is_loading);
}

#[test]
fn last_story_stays_open_after_completion() {
	let mut h = Harness::new(feed(2, 1000));
	h.open(1);
	h.ready(1);
	h.advance_ms(2_000);

	assert!(h.viewer.is_open());
	let snap = h.snapshot();
	assert_eq!(snap.active_index, 1);
	assert_eq!(snap.progress, 100.0);

	h.tap_right();
	assert_eq!(h.snapshot().active_index, 1);
}

#[test]
fn next_wraps_to_first_story_when_looping() {
	let config = ViewerConfig {
		loop_playback: true,
		..ViewerConfig::default()
	};
	let mut h = Harness::with_config(feed(2, 1000), config);
	h.open(1);
	h.ready(1);

	h.tap_right();
	let snap = h.snapshot();
	assert_eq!(snap.active_index, 0);
	assert!(snap.is_loading);

	// Auto-advance wraps too
	h.ready(0);
	h.advance_ms(1_000);
	h.ready(1);
	h.advance_ms(1_000);
	assert_eq!(h.snapshot().active_index, 0);
}

#[test]
fn rapid_double_tap_advances_exactly_one_per_tap() {
	let mut h = Harness::new(feed(5, 5000));
	h.open(0);
	h.ready(0);

	h.tap_right();
	assert_eq!(h.snapshot().active_index, 1);
	h.tap_right();
	assert_eq!(h.snapshot().active_index, 2);
}

#[test]
fn stale_timers_from_previous_story_never_fire() {
	let mut h = Harness::new(feed(3, 5000));
	h.open(0);
	h.ready(0);
	h.advance_ms(1_000);

	// Interrupt story 0 mid-flight; its advance was armed for t=5000
	h.tap_right();
	h.ready(1);

	// t=5000: story 0's stale advance arrives and must be dropped
	h.advance_ms(4_100);
	assert_eq!(h.snapshot().active_index, 1);

	// Story 1 completes on its own schedule at t=6000
	h.advance_ms(900);
	assert_eq!(h.snapshot().active_index, 2);
}

#[test]
fn close_cancels_all_live_timers() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(0);
	h.ready(0);
	h.advance_ms(1_000);
	assert!(h.snapshot().progress > 0.0);

	h.close();
	assert!(!h.viewer.is_open());

	// The already-scheduled tick and advance fire into a closed
	// session and must not resurrect anything
	h.advance_ms(10_000);
	assert!(!h.viewer.is_open());
	assert!(h.viewer.snapshot().is_none());
}

#[test]
fn reopening_after_close_starts_a_fresh_session() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(0);
	h.ready(0);
	h.advance_ms(2_500);
	h.close();

	h.open(0);
	let snap = h.snapshot();
	assert_eq!(snap.progress, 0.0);
	assert!(snap.is_loading);

	// Old session's timers are long gone
	h.advance_ms(5_000);
	assert_eq!(h.snapshot().active_index, 0);
	assert_eq!(h.snapshot().progress, 0.0);
}

#[test]
fn default_duration_applies_when_story_has_none() {
	let stories = vec![
		Story {
			url: "https://example.com/a.jpg".to_owned(),
			kind: MediaKind::Image,
			duration: None,
			header: None,
			see_more: None,
		},
		Story {
			url: "https://example.com/b.jpg".to_owned(),
			kind: MediaKind::Image,
			duration: None,
			header: None,
			see_more: None,
		},
	];
	let mut h = Harness::new(stories);
	h.open(0);
	h.ready(0);

	h.advance_ms(4_999);
	assert_eq!(h.snapshot().active_index, 0);
	h.advance_ms(1);
	assert_eq!(h.snapshot().active_index, 1);
}

#[test]
fn open_clamps_out_of_range_index() {
	let mut h = Harness::new(feed(2, 5000));
	h.open(10);
	assert_eq!(h.snapshot().active_index, 1);
}
