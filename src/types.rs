use eframe::egui;

/// Media content held by the cache, ready for display
pub enum LoadedMedia {
	Image { texture: egui::TextureHandle },
	/// Video bytes were fetched, which is what opens the load gate.
	/// Playback itself is not wired up; the view renders a placeholder.
	Video,
}

/// Navigation intent derived from a tap zone or a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
	Previous,
	Next,
}

/// Opaque cancellation token for a scheduled timer.
///
/// Handles are allocated monotonically and never reused, so a stale
/// handle compared at delivery time can only ever miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(pub(crate) u64);
