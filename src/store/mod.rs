use crate::api::Story;
use crate::reactor::{ComponentResponse, Event, MediaEvent, StoreEvent};

/// Ordered story sequence, immutable once fetched. Read-only input to
/// the viewer session and the view; only the feed delivery mutates it,
/// and only once.
pub struct StoryStore {
	stories: Vec<Story>,
}

impl StoryStore {
	pub fn new() -> Self {
		Self {
			stories: Vec::new(),
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Store(StoreEvent::StoriesReceived { stories }) => {
				if !self.stories.is_empty() {
					log::warn!("Store already populated, ignoring feed delivery");
					return ComponentResponse::none();
				}
				if stories.is_empty() {
					log::warn!("Feed delivered no stories");
					return ComponentResponse::none();
				}

				log::info!("Store populated with {} stories", stories.len());
				self.stories = stories.clone();

				// Warm the cache for the circle row avatars
				let avatars: Vec<(String, bool)> = self
					.stories
					.iter()
					.filter_map(|s| s.header.as_ref())
					.map(|h| (h.profile_image.clone(), false))
					.collect();

				if avatars.is_empty() {
					ComponentResponse::none()
				} else {
					ComponentResponse::emit(Event::Media(MediaEvent::Prefetch { urls: avatars }))
				}
			}
			_ => ComponentResponse::none(),
		}
	}

	pub fn get(&self, index: usize) -> Option<&Story> {
		self.stories.get(index)
	}

	pub fn len(&self) -> usize {
		self.stories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stories.is_empty()
	}

	pub fn stories(&self) -> &[Story] {
		&self.stories
	}
}

impl Default for StoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::MediaKind;

	fn story(url: &str) -> Story {
		Story {
			url: url.to_owned(),
			kind: MediaKind::Image,
			duration: None,
			header: None,
			see_more: None,
		}
	}

	fn received(stories: Vec<Story>) -> Event {
		Event::Store(StoreEvent::StoriesReceived { stories })
	}

	#[test]
	fn populates_once_and_exposes_indexed_access() {
		let mut store = StoryStore::new();
		let _ = store.handle(&received(vec![story("a"), story("b")]));

		assert_eq!(store.len(), 2);
		assert_eq!(store.get(0).map(|s| s.url.as_str()), Some("a"));
		assert_eq!(store.get(1).map(|s| s.url.as_str()), Some("b"));
		assert!(store.get(2).is_none());
	}

	#[test]
	fn second_delivery_is_ignored() {
		let mut store = StoryStore::new();
		let _ = store.handle(&received(vec![story("a")]));
		let _ = store.handle(&received(vec![story("x"), story("y")]));

		assert_eq!(store.len(), 1);
		assert_eq!(store.get(0).map(|s| s.url.as_str()), Some("a"));
	}

	#[test]
	fn empty_delivery_leaves_store_empty() {
		let mut store = StoryStore::new();
		let _ = store.handle(&received(vec![]));
		assert!(store.is_empty());
	}
}
