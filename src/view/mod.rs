use crate::api::{Header, Story};
use crate::gateway::StoryGateway;
use crate::media::MediaCache;
use crate::reactor::{ComponentResponse, Event, SourceEvent, ViewEvent, ViewerEvent};
use crate::store::StoryStore;
use crate::types::{LoadedMedia, NavIntent};
use crate::viewer::{ViewerSession, ViewerSnapshot};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Vec2};
use std::time::{Duration, Instant};

/// Viewer open fade, matching the circle-to-fullscreen transition
const FADE_IN: Duration = Duration::from_millis(150);

pub struct ViewManager {
	feed_error: Option<String>,
	media_error: Option<String>,
	loop_enabled: bool,
	opened_at: Option<Instant>,
}

impl ViewManager {
	pub fn new() -> Self {
		Self {
			feed_error: None,
			media_error: None,
			loop_enabled: false,
			opened_at: None,
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::View(ViewEvent::FeedError { message }) => {
				self.feed_error = Some(message.clone());
				ComponentResponse::none()
			}
			Event::View(ViewEvent::MediaError { message }) => {
				self.media_error = Some(message.clone());
				ComponentResponse::none()
			}
			_ => ComponentResponse::none(),
		}
	}

	/// Renders either the circle row or the full-screen viewer and
	/// returns the input events this frame produced. All state changes
	/// go back through the reactor; nothing is mutated here.
	pub fn render(
		&mut self,
		ctx: &egui::Context,
		gateway: &StoryGateway,
		store: &StoryStore,
		viewer: &ViewerSession,
		media: &mut MediaCache,
	) -> Vec<Event> {
		let mut events = Vec::new();

		match viewer.snapshot() {
			Some(snapshot) => {
				if self.opened_at.is_none() {
					self.opened_at = Some(Instant::now());
				}
				if !snapshot.is_loading {
					self.media_error = None;
				}
				self.handle_viewer_keys(ctx, &mut events);
				self.render_viewer(ctx, store, snapshot, media, &mut events);
				// Keep the progress bars moving between input events
				ctx.request_repaint_after(Duration::from_millis(50));
			}
			None => {
				self.opened_at = None;
				self.render_circles(ctx, gateway, store, media, &mut events);
			}
		}

		events
	}

	fn handle_viewer_keys(&self, ctx: &egui::Context, events: &mut Vec<Event>) {
		if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
			events.push(Event::Source(SourceEvent::Navigate(NavIntent::Previous)));
		}
		if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
			events.push(Event::Source(SourceEvent::Navigate(NavIntent::Next)));
		}
		if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
			events.push(Event::Source(SourceEvent::CloseViewer));
		}
	}

	fn render_circles(
		&mut self,
		ctx: &egui::Context,
		gateway: &StoryGateway,
		store: &StoryStore,
		media: &MediaCache,
		events: &mut Vec<Event>,
	) {
		egui::CentralPanel::default().show(ctx, |ui| {
			ui.add_space(8.0);
			ui.heading("Stories");
			ui.add_space(8.0);

			if let Some(message) = &self.feed_error {
				ui.label(
					RichText::new(format!("Failed to load stories: {message}"))
						.color(Color32::RED),
				);
				return;
			}
			if gateway.is_loading() {
				ui.horizontal(|ui| {
					ui.spinner();
					ui.label("Loading stories...");
				});
				return;
			}
			if store.is_empty() {
				ui.label("No stories.");
				return;
			}

			egui::ScrollArea::horizontal().show(ui, |ui| {
				ui.horizontal(|ui| {
					for (index, story) in store.stories().iter().enumerate() {
						if Self::story_circle(ui, story, media) {
							events.push(Event::Source(SourceEvent::OpenStory { index }));
						}
					}
				});
			});

			ui.add_space(12.0);
			let mut loop_enabled = self.loop_enabled;
			if ui.checkbox(&mut loop_enabled, "Loop playback").changed() {
				self.loop_enabled = loop_enabled;
				events.push(Event::Viewer(ViewerEvent::SetLoop {
					enabled: loop_enabled,
				}));
			}
		});
	}

	/// One tappable circle with its heading. Returns true on click.
	fn story_circle(ui: &mut egui::Ui, story: &Story, media: &MediaCache) -> bool {
		let (rect, response) = ui.allocate_exact_size(Vec2::new(72.0, 96.0), Sense::click());
		if !ui.is_rect_visible(rect) {
			return response.clicked();
		}

		let center = Pos2::new(rect.center().x, rect.top() + 34.0);
		let radius = 28.0;

		ui.painter().circle_stroke(
			center,
			radius + 3.0,
			egui::Stroke::new(3.0, Color32::from_rgb(220, 39, 103)),
		);

		let avatar_url = story
			.header
			.as_ref()
			.map(|h| h.profile_image.as_str())
			.unwrap_or(story.url.as_str());
		match media.get(avatar_url) {
			Some(LoadedMedia::Image { texture }) => {
				let avatar_rect = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
				egui::Image::new(texture)
					.rounding(radius)
					.paint_at(ui, avatar_rect);
			}
			_ => {
				ui.painter().circle_filled(center, radius, Color32::from_gray(60));
			}
		}

		let heading = story
			.header
			.as_ref()
			.map(|h| h.heading.as_str())
			.unwrap_or("Story");
		ui.painter().text(
			Pos2::new(rect.center().x, rect.bottom() - 14.0),
			Align2::CENTER_CENTER,
			heading,
			FontId::proportional(11.0),
			ui.visuals().text_color(),
		);

		response.clicked()
	}

	fn render_viewer(
		&self,
		ctx: &egui::Context,
		store: &StoryStore,
		snapshot: ViewerSnapshot,
		media: &MediaCache,
		events: &mut Vec<Event>,
	) {
		let story = store.get(snapshot.active_index);
		let fade = self.fade_alpha();

		egui::CentralPanel::default()
			.frame(egui::Frame::none().fill(Color32::BLACK))
			.show(ctx, |ui| {
				let full_rect = ui.max_rect();

				// Tap zones cover the whole surface; widgets added
				// later sit on top and win the click
				let response = ui.interact(full_rect, ui.id().with("tap_zones"), Sense::click());
				if response.clicked() {
					if let Some(pos) = response.interact_pointer_pos() {
						events.push(Event::Source(SourceEvent::Tap {
							x: pos.x - full_rect.left(),
							width: full_rect.width(),
						}));
					}
				}

				if let Some(story) = story {
					Self::render_media(ui, full_rect, story, media, fade);
				}

				if snapshot.is_loading {
					ui.painter().text(
						full_rect.center(),
						Align2::CENTER_CENTER,
						"Loading...",
						FontId::proportional(16.0),
						Color32::WHITE,
					);
				}

				Self::render_progress_bars(ui, full_rect, store.len(), snapshot);

				if let Some(header) = story.and_then(|s| s.header.as_ref()) {
					Self::render_header(ui, full_rect, header, media);
				}

				if let Some(see_more) = story.and_then(|s| s.see_more.as_deref()) {
					ui.painter().text(
						Pos2::new(full_rect.center().x, full_rect.bottom() - 24.0),
						Align2::CENTER_CENTER,
						see_more,
						FontId::proportional(13.0),
						Color32::WHITE,
					);
				}

				if let Some(message) = &self.media_error {
					ui.painter().text(
						Pos2::new(full_rect.center().x, full_rect.bottom() - 48.0),
						Align2::CENTER_CENTER,
						message,
						FontId::proportional(12.0),
						Color32::RED,
					);
				}

				let close_rect = Rect::from_min_size(
					Pos2::new(full_rect.right() - 44.0, full_rect.top() + 20.0),
					Vec2::splat(36.0),
				);
				let close = ui.put(
					close_rect,
					egui::Button::new(RichText::new("×").size(24.0).color(Color32::WHITE))
						.frame(false),
				);
				if close.clicked() {
					events.push(Event::Source(SourceEvent::CloseViewer));
				}
			});
	}

	fn fade_alpha(&self) -> f32 {
		match self.opened_at {
			Some(opened_at) => {
				(opened_at.elapsed().as_secs_f32() / FADE_IN.as_secs_f32()).clamp(0.0, 1.0)
			}
			None => 1.0,
		}
	}

	fn render_media(
		ui: &mut egui::Ui,
		rect: Rect,
		story: &Story,
		media: &MediaCache,
		fade: f32,
	) {
		match media.get(&story.url) {
			Some(LoadedMedia::Image { texture }) => {
				let img_size = texture.size_vec2();
				if img_size.x <= 0.0 || img_size.y <= 0.0 {
					return;
				}
				// Cover fit: fill the surface, crop the overflow
				let scale = (rect.width() / img_size.x).max(rect.height() / img_size.y);
				let display = Rect::from_center_size(rect.center(), img_size * scale);
				ui.set_clip_rect(rect);
				egui::Image::new(texture)
					.tint(Color32::WHITE.gamma_multiply(fade))
					.paint_at(ui, display);
			}
			Some(LoadedMedia::Video) => {
				ui.painter().rect_filled(rect, 0.0, Color32::from_gray(15));
				ui.painter().text(
					rect.center(),
					Align2::CENTER_CENTER,
					"▶ video",
					FontId::proportional(18.0),
					Color32::from_gray(180),
				);
			}
			None => {}
		}
	}

	fn render_progress_bars(
		ui: &mut egui::Ui,
		rect: Rect,
		count: usize,
		snapshot: ViewerSnapshot,
	) {
		if count == 0 {
			return;
		}
		let margin = 10.0;
		let gap = 4.0;
		let height = 3.0;
		let total_width = rect.width() - margin * 2.0 - gap * (count as f32 - 1.0);
		let bar_width = (total_width / count as f32).max(1.0);
		let top = rect.top() + margin;

		for i in 0..count {
			let left = rect.left() + margin + i as f32 * (bar_width + gap);
			let track = Rect::from_min_size(Pos2::new(left, top), Vec2::new(bar_width, height));
			ui.painter()
				.rect_filled(track, 2.0, Color32::from_white_alpha(60));

			let fraction = if i < snapshot.active_index {
				1.0
			} else if i == snapshot.active_index {
				snapshot.progress / 100.0
			} else {
				0.0
			};
			if fraction > 0.0 {
				let fill =
					Rect::from_min_size(track.min, Vec2::new(bar_width * fraction, height));
				ui.painter().rect_filled(fill, 2.0, Color32::WHITE);
			}
		}
	}

	fn render_header(ui: &mut egui::Ui, rect: Rect, header: &Header, media: &MediaCache) {
		let avatar_center = Pos2::new(rect.left() + 34.0, rect.top() + 48.0);
		let radius = 16.0;

		match media.get(&header.profile_image) {
			Some(LoadedMedia::Image { texture }) => {
				let avatar_rect =
					Rect::from_center_size(avatar_center, Vec2::splat(radius * 2.0));
				egui::Image::new(texture)
					.rounding(radius)
					.paint_at(ui, avatar_rect);
			}
			_ => {
				ui.painter()
					.circle_filled(avatar_center, radius, Color32::from_gray(60));
			}
		}

		let text_left = avatar_center.x + radius + 8.0;
		ui.painter().text(
			Pos2::new(text_left, avatar_center.y - 8.0),
			Align2::LEFT_CENTER,
			&header.heading,
			FontId::proportional(14.0),
			Color32::WHITE,
		);
		ui.painter().text(
			Pos2::new(text_left, avatar_center.y + 8.0),
			Align2::LEFT_CENTER,
			&header.subheading,
			FontId::proportional(11.0),
			Color32::from_white_alpha(200),
		);
	}
}

impl Default for ViewManager {
	fn default() -> Self {
		Self::new()
	}
}
