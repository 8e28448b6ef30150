use crate::api::Story;
use crate::types::{NavIntent, TimerHandle};
use std::time::Duration;

#[derive(Clone, Debug)]
pub enum Event {
	Source(SourceEvent),
	Feed(FeedEvent),
	Store(StoreEvent),
	Viewer(ViewerEvent),
	Media(MediaEvent),
	View(ViewEvent),
}

impl Event {
	pub fn priority(&self) -> Priority {
		match self {
			Event::Source(_) => Priority::High,
			Event::Feed(_) => Priority::Normal,
			Event::Store(_) => Priority::Normal,
			Event::View(ViewEvent::FeedError { .. }) => Priority::Critical,
			Event::View(_) => Priority::Normal,
			Event::Viewer(_) => Priority::Normal,
			Event::Media(MediaEvent::Prefetch { .. }) => Priority::Low,
			Event::Media(_) => Priority::Normal,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
	Critical = 0,
	High = 1,
	Normal = 2,
	Low = 3,
}

impl Priority {
	pub fn as_index(&self) -> usize {
		*self as usize
	}
}

/// Raw user input, emitted by the view and mapped by the reactor
#[derive(Clone, Debug)]
pub enum SourceEvent {
	/// A story circle was tapped
	OpenStory { index: usize },
	/// A tap landed on the viewer surface at `x` of `width`
	Tap { x: f32, width: f32 },
	/// Keyboard navigation
	Navigate(NavIntent),
	/// Close button or Escape
	CloseViewer,
}

#[derive(Clone, Debug)]
pub enum FeedEvent {
	FetchRequest,
}

#[derive(Clone, Debug)]
pub enum StoreEvent {
	StoriesReceived { stories: Vec<Story> },
}

#[derive(Clone, Debug)]
pub enum ViewerEvent {
	/// Open the viewer session at `index`
	Open { index: usize },
	/// Tap on the viewer surface, resolved against tap zones
	Tapped { x: f32, width: f32 },
	Navigate { intent: NavIntent },
	Close,
	/// Scheduled progress cadence tick; ignored unless `handle` is live
	ProgressTick { handle: TimerHandle },
	/// Scheduled auto-advance; ignored unless `handle` is live
	AdvanceDue { handle: TimerHandle },
	/// The media for `index` finished loading its first frame
	MediaReady { index: usize },
	SetLoop { enabled: bool },
}

#[derive(Clone, Debug)]
pub enum MediaEvent {
	/// Load the media for the story that just became active
	LoadRequest { index: usize, url: String, video: bool },
	/// Warm the cache; low priority, never tied to the active index
	Prefetch { urls: Vec<(String, bool)> },
}

#[derive(Clone, Debug)]
pub enum ViewEvent {
	/// Story list retrieval failed; terminal for the session
	FeedError { message: String },
	MediaError { message: String },
}

/// Response from component.handle()
#[derive(Default)]
pub struct ComponentResponse {
	/// Events to dispatch immediately
	pub events: Vec<Event>,
	/// Events to schedule (event, delay)
	pub scheduled: Vec<(Event, Duration)>,
}

impl ComponentResponse {
	pub fn none() -> Self {
		Self::default()
	}

	pub fn emit(event: Event) -> Self {
		Self {
			events: vec![event],
			scheduled: vec![],
		}
	}

	pub fn emit_many(events: Vec<Event>) -> Self {
		Self {
			events,
			scheduled: vec![],
		}
	}

	pub fn schedule(event: Event, delay: Duration) -> Self {
		Self {
			events: vec![],
			scheduled: vec![(event, delay)],
		}
	}
}
