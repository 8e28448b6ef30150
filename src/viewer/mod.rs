mod advance;
mod navigation;
mod progress;

#[cfg(test)]
mod tests;

pub use advance::AdvanceScheduler;
pub use progress::{ProgressTimer, TickOutcome};

use crate::api::MediaKind;
use crate::reactor::{ComponentResponse, Event, MediaEvent, ViewerEvent};
use crate::store::StoryStore;
use crate::types::{NavIntent, TimerHandle};
use std::time::Duration;

/// Playback tunables
#[derive(Debug, Clone)]
pub struct ViewerConfig {
	/// Used when a story carries no duration of its own
	pub default_duration: Duration,
	/// Progress update cadence
	pub tick_cadence: Duration,
	/// Wrap to story 0 instead of stopping at the last one
	pub loop_playback: bool,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			default_duration: Duration::from_millis(5000),
			tick_cadence: Duration::from_millis(50),
			loop_playback: false,
		}
	}
}

/// Read-only view of the session, taken once per frame by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerSnapshot {
	pub active_index: usize,
	/// Percent of the active story's duration elapsed, 0 to 100
	pub progress: f32,
	pub is_loading: bool,
}

struct ViewerState {
	active_index: usize,
	progress: f32,
	is_loading: bool,
	progress_handle: Option<TimerHandle>,
	advance_handle: Option<TimerHandle>,
}

/// The story viewer state machine. Owns the single `ViewerState` for
/// the open session (`None` while closed) and the two timers that may
/// mutate it. Per active story the lifecycle is LOADING until the
/// media gate opens, then PLAYING until the advance fires or input
/// interrupts it; every index change goes through [`Self::enter_index`].
pub struct ViewerSession {
	config: ViewerConfig,
	state: Option<ViewerState>,
	progress_timer: ProgressTimer,
	advance: AdvanceScheduler,
}

impl ViewerSession {
	pub fn new(config: ViewerConfig) -> Self {
		let progress_timer = ProgressTimer::new(config.tick_cadence);
		Self {
			config,
			state: None,
			progress_timer,
			advance: AdvanceScheduler::new(),
		}
	}

	pub fn is_open(&self) -> bool {
		self.state.is_some()
	}

	pub fn snapshot(&self) -> Option<ViewerSnapshot> {
		self.state.as_ref().map(|s| ViewerSnapshot {
			active_index: s.active_index,
			progress: s.progress,
			is_loading: s.is_loading,
		})
	}

	pub fn handle(&mut self, event: &Event, store: &StoryStore) -> ComponentResponse {
		let Event::Viewer(event) = event else {
			return ComponentResponse::none();
		};
		match event {
			ViewerEvent::Open { index } => self.open(*index, store),
			ViewerEvent::Tapped { x, width } => {
				self.navigate(navigation::intent_for_tap(*x, *width), store)
			}
			ViewerEvent::Navigate { intent } => self.navigate(*intent, store),
			ViewerEvent::Close => self.close(),
			ViewerEvent::ProgressTick { handle } => self.on_progress_tick(*handle),
			ViewerEvent::AdvanceDue { handle } => self.on_advance_due(*handle, store),
			ViewerEvent::MediaReady { index } => self.on_media_ready(*index, store),
			ViewerEvent::SetLoop { enabled } => {
				log::info!("Loop playback: {}", enabled);
				self.config.loop_playback = *enabled;
				ComponentResponse::none()
			}
		}
	}

	fn open(&mut self, index: usize, store: &StoryStore) -> ComponentResponse {
		if store.is_empty() {
			log::warn!("Viewer open ignored: no stories");
			return ComponentResponse::none();
		}
		// Opening tears down whatever a previous session left behind
		let _ = self.close();

		let index = index.min(store.len() - 1);
		self.state = Some(ViewerState {
			active_index: index,
			progress: 0.0,
			is_loading: true,
			progress_handle: None,
			advance_handle: None,
		});
		log::info!("Viewer opened at story {}", index);
		self.media_request(index, store)
	}

	fn close(&mut self) -> ComponentResponse {
		if let Some(state) = self.state.take() {
			if let Some(handle) = state.progress_handle {
				self.progress_timer.cancel(handle);
			}
			if let Some(handle) = state.advance_handle {
				self.advance.cancel(handle);
			}
			log::info!("Viewer closed");
		}
		ComponentResponse::none()
	}

	fn navigate(&mut self, intent: NavIntent, store: &StoryStore) -> ComponentResponse {
		let Some(active) = self.state.as_ref().map(|s| s.active_index) else {
			return ComponentResponse::none();
		};
		match navigation::apply_intent(intent, active, store.len(), self.config.loop_playback) {
			Some(next) => self.enter_index(next, store),
			None => {
				log::debug!("Navigation absorbed at boundary (index {})", active);
				ComponentResponse::none()
			}
		}
	}

	/// The single transition point for every active-index change. The
	/// old handles are cancelled before anything about the new index
	/// is set up, so a timer armed for the previous story can never
	/// fire into the new one.
	fn enter_index(&mut self, index: usize, store: &StoryStore) -> ComponentResponse {
		{
			let Some(state) = self.state.as_mut() else {
				return ComponentResponse::none();
			};
			if let Some(handle) = state.progress_handle.take() {
				self.progress_timer.cancel(handle);
			}
			if let Some(handle) = state.advance_handle.take() {
				self.advance.cancel(handle);
			}
			state.active_index = index;
			state.progress = 0.0;
			state.is_loading = true;
		}
		log::debug!("Entering story {}", index);
		self.media_request(index, store)
	}

	fn media_request(&self, index: usize, store: &StoryStore) -> ComponentResponse {
		let Some(story) = store.get(index) else {
			return ComponentResponse::none();
		};
		let mut events = vec![Event::Media(MediaEvent::LoadRequest {
			index,
			url: story.url.clone(),
			video: story.kind == MediaKind::Video,
		})];
		// Warm the cache for the story a forward tap would land on
		if let Some(next) = store.get(index + 1) {
			events.push(Event::Media(MediaEvent::Prefetch {
				urls: vec![(next.url.clone(), next.kind == MediaKind::Video)],
			}));
		}
		ComponentResponse::emit_many(events)
	}

	/// The media gate. Only a ready signal for the active index while
	/// it is still loading arms the timer pair; everything else is a
	/// late or duplicate signal and is dropped.
	fn on_media_ready(&mut self, index: usize, store: &StoryStore) -> ComponentResponse {
		let duration = store
			.get(index)
			.map(|s| s.duration_or(self.config.default_duration))
			.unwrap_or(self.config.default_duration);
		let cadence = self.config.tick_cadence;

		let Some(state) = self.state.as_mut() else {
			return ComponentResponse::none();
		};
		if index != state.active_index || !state.is_loading {
			log::debug!("Ignoring stale media-ready for story {}", index);
			return ComponentResponse::none();
		}

		state.is_loading = false;
		let progress_handle = self.progress_timer.start(duration);
		let advance_handle = self.advance.schedule();
		state.progress_handle = Some(progress_handle);
		state.advance_handle = Some(advance_handle);
		log::debug!("Story {} playing for {:?}", index, duration);

		let mut response = ComponentResponse::schedule(
			Event::Viewer(ViewerEvent::ProgressTick {
				handle: progress_handle,
			}),
			cadence,
		);
		response.scheduled.push((
			Event::Viewer(ViewerEvent::AdvanceDue {
				handle: advance_handle,
			}),
			duration,
		));
		response
	}

	fn on_progress_tick(&mut self, handle: TimerHandle) -> ComponentResponse {
		let cadence = self.config.tick_cadence;
		let Some(state) = self.state.as_mut() else {
			return ComponentResponse::none();
		};
		if state.progress_handle != Some(handle) {
			return ComponentResponse::none();
		}
		match self.progress_timer.on_tick(handle) {
			TickOutcome::Stale => ComponentResponse::none(),
			TickOutcome::Ticked { percent } => {
				state.progress = percent;
				ComponentResponse::schedule(
					Event::Viewer(ViewerEvent::ProgressTick { handle }),
					cadence,
				)
			}
			TickOutcome::Completed => {
				state.progress = 100.0;
				state.progress_handle = None;
				ComponentResponse::none()
			}
		}
	}

	fn on_advance_due(&mut self, handle: TimerHandle, store: &StoryStore) -> ComponentResponse {
		let Some(active) = self
			.state
			.as_ref()
			.filter(|s| s.advance_handle == Some(handle))
			.map(|s| s.active_index)
		else {
			return ComponentResponse::none();
		};
		if !self.advance.on_due(handle) {
			return ComponentResponse::none();
		}
		if let Some(state) = self.state.as_mut() {
			state.advance_handle = None;
		}

		match navigation::apply_intent(
			NavIntent::Next,
			active,
			store.len(),
			self.config.loop_playback,
		) {
			Some(next) => {
				log::debug!("Auto-advance to story {}", next);
				self.enter_index(next, store)
			}
			None => {
				// Last story: stay open, progress pinned at 100
				log::debug!("Auto-advance reached the last story, staying open");
				ComponentResponse::none()
			}
		}
	}
}
