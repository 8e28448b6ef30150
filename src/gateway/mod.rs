use crate::api::StoryClient;
use crate::reactor::{ComponentResponse, Event, FeedEvent, StoreEvent, ViewEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Message from the fetch task back to the component
pub enum GatewayMessage {
	FetchComplete { stories: Vec<crate::api::Story> },
	FetchError { message: String },
}

/// Fetches the story feed once at startup. A fetch failure is terminal
/// for the session; there is no retry here.
pub struct StoryGateway {
	client: Arc<StoryClient>,
	sender: mpsc::Sender<GatewayMessage>,
	receiver: mpsc::Receiver<GatewayMessage>,
	feed_url: Option<String>,
	fetch_pending: bool,
}

impl StoryGateway {
	pub fn new() -> Self {
		let (sender, receiver) = mpsc::channel(8);
		let feed_url = std::env::var("STORYREEL_FEED_URL").ok();
		match &feed_url {
			Some(url) => log::info!("Feed URL configured: {}", url),
			None => log::info!("No feed URL configured, will use the built-in sample feed"),
		}
		Self {
			client: Arc::new(StoryClient::new()),
			sender,
			receiver,
			feed_url,
			fetch_pending: false,
		}
	}

	pub fn poll(&mut self) -> ComponentResponse {
		let mut responses = Vec::new();
		while let Ok(msg) = self.receiver.try_recv() {
			match msg {
				GatewayMessage::FetchComplete { stories } => {
					log::info!("Feed fetch complete: {} stories", stories.len());
					self.fetch_pending = false;
					responses.push(Event::Store(StoreEvent::StoriesReceived { stories }));
				}
				GatewayMessage::FetchError { message } => {
					log::error!("Feed fetch failed: {}", message);
					self.fetch_pending = false;
					responses.push(Event::View(ViewEvent::FeedError { message }));
				}
			}
		}

		if responses.is_empty() {
			ComponentResponse::none()
		} else {
			ComponentResponse::emit_many(responses)
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Feed(FeedEvent::FetchRequest) => {
				if self.fetch_pending {
					log::debug!("FetchRequest ignored: fetch already pending");
					return ComponentResponse::none();
				}
				match self.feed_url.clone() {
					Some(url) => {
						self.fetch_pending = true;
						self.spawn_fetch(url);
						ComponentResponse::none()
					}
					None => {
						log::info!("Serving built-in sample feed");
						ComponentResponse::emit(Event::Store(StoreEvent::StoriesReceived {
							stories: StoryClient::sample_feed(),
						}))
					}
				}
			}
			_ => ComponentResponse::none(),
		}
	}

	fn spawn_fetch(&self, url: String) {
		log::info!("Spawning feed fetch: {}", url);
		let client = self.client.clone();
		let sender = self.sender.clone();

		tokio::spawn(async move {
			match client.fetch_stories(&url).await {
				Ok(stories) => {
					let _ = sender.send(GatewayMessage::FetchComplete { stories }).await;
				}
				Err(e) => {
					let _ = sender
						.send(GatewayMessage::FetchError {
							message: e.to_string(),
						})
						.await;
				}
			}
		});
	}

	pub fn is_loading(&self) -> bool {
		self.fetch_pending
	}
}

impl Default for StoryGateway {
	fn default() -> Self {
		Self::new()
	}
}
