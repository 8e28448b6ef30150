pub mod event;
pub mod queue;
pub mod scheduler;

pub use event::{
	ComponentResponse, Event, FeedEvent, MediaEvent, SourceEvent, StoreEvent, ViewEvent,
	ViewerEvent,
};
pub use queue::EventQueue;
pub use scheduler::Scheduler;

use crate::gateway::StoryGateway;
use crate::media::MediaCache;
use crate::store::StoryStore;
use crate::view::ViewManager;
use crate::viewer::{ViewerConfig, ViewerSession};
use eframe::egui;
use std::time::Instant;

pub struct Reactor {
	queue: EventQueue,
	scheduler: Scheduler,

	pub gateway: StoryGateway,
	pub store: StoryStore,
	pub viewer: ViewerSession,
	pub media: MediaCache,
	pub view: ViewManager,
}

impl Reactor {
	pub fn new(ctx: &egui::Context) -> Self {
		log::info!("Initializing all components");
		let mut reactor = Self {
			queue: EventQueue::new(),
			scheduler: Scheduler::new(),
			gateway: StoryGateway::new(),
			store: StoryStore::new(),
			viewer: ViewerSession::new(ViewerConfig::default()),
			media: MediaCache::new(ctx),
			view: ViewManager::new(),
		};

		// The feed is consumed once, at mount time
		reactor.queue.push(Event::Feed(FeedEvent::FetchRequest));
		log::info!("Initialization complete");

		reactor
	}

	fn process_response(&mut self, response: ComponentResponse, now: Instant) {
		for e in response.events {
			self.queue.push(e);
		}
		for (e, d) in response.scheduled {
			self.scheduler.schedule(now, e, d);
		}
	}

	pub fn tick(&mut self, ctx: &egui::Context) {
		let now = Instant::now();

		// Drain scheduled events
		self.scheduler.tick(now, &mut self.queue);

		// Poll async components
		let gateway_response = self.gateway.poll();
		let media_response = self.media.poll();
		self.process_response(gateway_response, now);
		self.process_response(media_response, now);

		// Process event queue until empty
		let mut iterations = 0;
		while let Some(event) = self.queue.pop() {
			log::trace!("Processing event: {:?}", event);
			let response = self.route(&event);
			self.process_response(response, now);

			iterations += 1;
			if iterations > 1000 {
				log::warn!("Event loop exceeded 1000 iterations, breaking");
				break;
			}
		}

		// Render
		let events = self.view.render(
			ctx,
			&self.gateway,
			&self.store,
			&self.viewer,
			&mut self.media,
		);

		// Process any events from rendering immediately
		for event in events {
			log::trace!("Processing render event: {:?}", event);
			let response = self.route(&event);
			self.process_response(response, now);
		}
	}

	fn route(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Source(e) => self.handle_source(e),
			Event::Feed(_) => self.gateway.handle(event),
			Event::Store(_) => self.store.handle(event),
			Event::Viewer(_) => self.viewer.handle(event, &self.store),
			Event::Media(_) => self.media.handle(event),
			Event::View(_) => self.view.handle(event),
		}
	}

	/// Map raw input onto viewer intents. Tap zones and boundary policy
	/// are resolved by the viewer session itself.
	fn handle_source(&mut self, event: &SourceEvent) -> ComponentResponse {
		match event {
			SourceEvent::OpenStory { index } => {
				log::info!("Source open story: {}", index);
				ComponentResponse::emit(Event::Viewer(ViewerEvent::Open { index: *index }))
			}
			SourceEvent::Tap { x, width } => {
				log::debug!("Source tap: x={:.0} width={:.0}", x, width);
				ComponentResponse::emit(Event::Viewer(ViewerEvent::Tapped {
					x: *x,
					width: *width,
				}))
			}
			SourceEvent::Navigate(intent) => {
				log::debug!("Source navigate: {:?}", intent);
				ComponentResponse::emit(Event::Viewer(ViewerEvent::Navigate { intent: *intent }))
			}
			SourceEvent::CloseViewer => {
				log::debug!("Source close viewer");
				ComponentResponse::emit(Event::Viewer(ViewerEvent::Close))
			}
		}
	}
}

impl eframe::App for Reactor {
	fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
		self.tick(ctx);
	}
}
