use serde::{Deserialize, Serialize};

/// One story entry: a single media item with optional overlay content
/// and a display duration. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
	pub url: String,
	#[serde(rename = "type", default)]
	pub kind: MediaKind,
	/// Display duration in milliseconds. Falls back to the configured
	/// default when absent or zero.
	#[serde(default)]
	pub duration: Option<u64>,
	#[serde(default)]
	pub header: Option<Header>,
	#[serde(rename = "seeMore", default)]
	pub see_more: Option<String>,
}

impl Story {
	pub fn duration_or(&self, default: std::time::Duration) -> std::time::Duration {
		match self.duration {
			Some(ms) if ms > 0 => std::time::Duration::from_millis(ms),
			_ => default,
		}
	}
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
	#[default]
	Image,
	Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
	pub heading: String,
	pub subheading: String,
	#[serde(rename = "profileImage")]
	pub profile_image: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedResponse {
	pub stories: Vec<Story>,
}

pub struct StoryClient {
	client: reqwest::Client,
}

impl StoryClient {
	pub fn new() -> Self {
		let client = reqwest::Client::builder()
			.user_agent("Storyreel/0.1")
			.build()
			.expect("Failed to build reqwest client");
		Self { client }
	}

	/// Fetch the story feed from `feed_url`. Expects `{"stories": [...]}`.
	pub async fn fetch_stories(&self, feed_url: &str) -> anyhow::Result<Vec<Story>> {
		log::info!("Fetching story feed from {}", feed_url);

		let response = self.client.get(feed_url).send().await?;

		let status = response.status();
		log::info!("Feed response status: {}", status);

		if !status.is_success() {
			let error_text = response
				.text()
				.await
				.unwrap_or_else(|_| "<failed to read error text>".into());
			log::error!("Feed fetch failed. Status: {}, Body: {}", status, error_text);
			anyhow::bail!("Request failed with status: {}", status);
		}

		let text = response.text().await?;
		log::debug!("Feed response body length: {}", text.len());

		let feed: FeedResponse = serde_json::from_str(&text)?;
		log::info!("Feed contains {} stories", feed.stories.len());

		Ok(feed.stories)
	}

	/// Built-in feed used when no feed URL is configured.
	pub fn sample_feed() -> Vec<Story> {
		fn header(heading: &str, subheading: &str, profile_image: &str) -> Option<Header> {
			Some(Header {
				heading: heading.to_owned(),
				subheading: subheading.to_owned(),
				profile_image: profile_image.to_owned(),
			})
		}

		vec![
			Story {
				url: "https://picsum.photos/1080/1920".to_owned(),
				kind: MediaKind::Image,
				duration: None,
				header: header("aamir", "Posted 5h ago", "https://picsum.photos/1000/1000"),
				see_more: Some("See more".to_owned()),
			},
			Story {
				url: "https://picsum.photos/id/237/1080/1920".to_owned(),
				kind: MediaKind::Image,
				duration: None,
				header: header("aamir", "Posted 32m ago", "https://picsum.photos/1080/1920"),
				see_more: None,
			},
			Story {
				url: "https://picsum.photos/id/1015/1080/1920".to_owned(),
				kind: MediaKind::Image,
				duration: None,
				header: header(
					"aamir/stories",
					"Posted 32m ago",
					"https://avatars0.githubusercontent.com/u/24852829?s=400&v=4",
				),
				see_more: None,
			},
			Story {
				url: "https://storage.googleapis.com/coverr-main/mp4/Footboys.mp4".to_owned(),
				kind: MediaKind::Video,
				duration: Some(1000),
				header: header("Story Title", "Posted now", "https://picsum.photos/1000/1000"),
				see_more: None,
			},
			Story {
				url: "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4"
					.to_owned(),
				kind: MediaKind::Video,
				duration: None,
				header: header("Story Title", "Posted now", "https://picsum.photos/1000/1000"),
				see_more: Some("See more".to_owned()),
			},
			Story {
				url: "https://picsum.photos/id/1025/1080/1920".to_owned(),
				kind: MediaKind::Image,
				duration: None,
				header: header("Story Title", "Posted now", "https://picsum.photos/1000/1000"),
				see_more: None,
			},
		]
	}
}

impl Default for StoryClient {
	fn default() -> Self {
		Self::new()
	}
}
