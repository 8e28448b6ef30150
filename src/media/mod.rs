use crate::reactor::{ComponentResponse, Event, MediaEvent, ViewEvent, ViewerEvent};
use crate::types::LoadedMedia;
use eframe::egui;
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::mpsc;

/// Most cached entries kept before pruning
const MAX_CACHE_SIZE: usize = 20;

/// Concurrent fetch limit
const MAX_IN_FLIGHT: usize = 2;

pub enum MediaMessage {
	Fetched {
		url: String,
		result: Result<FetchedPayload, String>,
	},
}

pub enum FetchedPayload {
	Image(egui::ColorImage),
	Video,
}

/// Tracks whether the active story's media has finished loading and
/// tells the viewer when its gate opens. The ready signal is tagged
/// with the story index that requested the load, so a slow fetch that
/// completes after the user has navigated away is dropped here instead
/// of flipping the wrong story out of its loading state.
pub struct MediaCache {
	cache: HashMap<String, LoadedMedia>,
	loading_set: HashSet<String>,
	pending_prefetch: VecDeque<(String, bool)>,
	/// Active story index and its media URL
	current: Option<(usize, String)>,
	sender: mpsc::Sender<MediaMessage>,
	receiver: mpsc::Receiver<MediaMessage>,
	egui_ctx: egui::Context,
}

impl MediaCache {
	pub fn new(ctx: &egui::Context) -> Self {
		log::info!("[Media] Initializing");
		let (sender, receiver) = mpsc::channel(100);
		Self {
			cache: HashMap::new(),
			loading_set: HashSet::new(),
			pending_prefetch: VecDeque::new(),
			current: None,
			sender,
			receiver,
			egui_ctx: ctx.clone(),
		}
	}

	pub fn poll(&mut self) -> ComponentResponse {
		let mut responses = Vec::new();
		while let Ok(msg) = self.receiver.try_recv() {
			match msg {
				MediaMessage::Fetched { url, result } => {
					self.loading_set.remove(&url);
					match result {
						Ok(payload) => {
							log::info!("[Media] Loaded: {}", url);
							let media = match payload {
								FetchedPayload::Image(color_image) => {
									let texture = self.egui_ctx.load_texture(
										&url,
										color_image,
										egui::TextureOptions::LINEAR,
									);
									LoadedMedia::Image { texture }
								}
								FetchedPayload::Video => LoadedMedia::Video,
							};
							self.cache.insert(url.clone(), media);

							if let Some(index) = self.current_index_for(&url) {
								responses
									.push(Event::Viewer(ViewerEvent::MediaReady { index }));
							}
						}
						Err(error) => {
							log::error!("[Media] Load failed: {} - {}", url, error);
							if self.current_index_for(&url).is_some() {
								responses
									.push(Event::View(ViewEvent::MediaError { message: error }));
							}
						}
					}
				}
			}
		}

		// Keep the fetch slots full from the prefetch backlog
		while self.loading_set.len() < MAX_IN_FLIGHT {
			if let Some((url, video)) = self.pending_prefetch.pop_front() {
				self.load_media(url, video, &mut responses);
			} else {
				break;
			}
		}

		self.prune_cache();

		if responses.is_empty() {
			ComponentResponse::none()
		} else {
			ComponentResponse::emit_many(responses)
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		let mut responses = Vec::new();

		match event {
			Event::Media(MediaEvent::LoadRequest { index, url, video }) => {
				log::info!("[Media] LoadRequest: story {} {} (video={})", index, url, video);
				self.current = Some((*index, url.clone()));
				self.load_media(url.clone(), *video, &mut responses);
			}
			Event::Media(MediaEvent::Prefetch { urls }) => {
				log::debug!("[Media] Prefetch requested for {} URLs", urls.len());
				for (url, video) in urls {
					if !self.cache.contains_key(url) && !self.loading_set.contains(url) {
						self.pending_prefetch.push_back((url.clone(), *video));
					}
				}
			}
			_ => {}
		}

		if responses.is_empty() {
			ComponentResponse::none()
		} else {
			ComponentResponse::emit_many(responses)
		}
	}

	/// The active story index, but only while `url` is still its media
	fn current_index_for(&self, url: &str) -> Option<usize> {
		match &self.current {
			Some((index, current_url)) if current_url == url => Some(*index),
			_ => None,
		}
	}

	fn load_media(&mut self, url: String, video: bool, responses: &mut Vec<Event>) {
		if self.cache.contains_key(&url) {
			log::debug!("[Media] Cache hit: {}", url);
			if let Some(index) = self.current_index_for(&url) {
				responses.push(Event::Viewer(ViewerEvent::MediaReady { index }));
			}
			return;
		}

		if self.loading_set.contains(&url) {
			log::debug!("[Media] Already loading: {}", url);
			return;
		}

		if self.loading_set.len() >= MAX_IN_FLIGHT {
			if self.pending_prefetch.iter().any(|(u, _)| u == &url) {
				return;
			}
			log::debug!("[Media] At limit, queuing: {}", url);
			// The active story skips the line
			if self.current_index_for(&url).is_some() {
				self.pending_prefetch.push_front((url, video));
			} else {
				self.pending_prefetch.push_back((url, video));
			}
			return;
		}

		self.loading_set.insert(url.clone());
		log::info!("[Media] Starting load: {} (video={})", url, video);
		self.spawn_fetch(url, video);
	}

	fn spawn_fetch(&self, url: String, video: bool) {
		let sender = self.sender.clone();
		let ctx = self.egui_ctx.clone();

		tokio::spawn(async move {
			let result = async {
				let resp = reqwest::get(&url).await?;
				if !resp.status().is_success() {
					anyhow::bail!("HTTP Status: {}", resp.status());
				}
				let bytes = resp.bytes().await?;
				if video {
					log::debug!("Fetched {} video bytes from {}", bytes.len(), url);
					return Ok(FetchedPayload::Video);
				}
				let img = image::load_from_memory(&bytes)?;
				let size = [img.width() as usize, img.height() as usize];
				let img_buffer = img.to_rgba8();
				let pixels = img_buffer.as_flat_samples();
				let color_image =
					egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
				Ok::<_, anyhow::Error>(FetchedPayload::Image(color_image))
			}
			.await;

			let _ = sender
				.send(MediaMessage::Fetched {
					url,
					result: result.map_err(|e| e.to_string()),
				})
				.await;
			ctx.request_repaint();
		});
	}

	fn prune_cache(&mut self) {
		if self.cache.len() > MAX_CACHE_SIZE {
			let current_url = self.current.as_ref().map(|(_, url)| url.clone());
			let to_remove: Vec<String> = self
				.cache
				.keys()
				.filter(|k| Some(k.as_str()) != current_url.as_deref())
				.take(self.cache.len() - MAX_CACHE_SIZE)
				.cloned()
				.collect();

			if !to_remove.is_empty() {
				log::debug!("[Media] Pruning {} items from cache", to_remove.len());
			}

			for key in to_remove {
				self.cache.remove(&key);
			}
		}
	}

	pub fn get(&self, url: &str) -> Option<&LoadedMedia> {
		self.cache.get(url)
	}
}
