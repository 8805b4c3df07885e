pub mod transport;

#[cfg(test)]
pub mod testing;

pub use transport::DesktopHost;

use crate::player::playlist::PlaylistItem;
use crate::types::MediaKind;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MediaError {
	#[error("failed to load {src}: {reason}")]
	Load { src: String, reason: String },
}

/// Lifecycle notifications reported by a playable element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSignal {
	/// Duration became known; may be NaN or infinite for streams
	MetadataLoaded { duration: f64 },
	TimeUpdate { position: f64 },
	Ended,
	LoadFailed { error: MediaError },
}

/// Something that can play one source. Audio and video share this surface.
pub trait MediaElement {
	fn kind(&self) -> MediaKind;
	fn play(&mut self) -> Result<(), MediaError>;
	fn pause(&mut self);
	fn seek(&mut self, position: f64);
	fn position(&self) -> f64;
	/// `None` until metadata has loaded
	fn duration(&self) -> Option<f64>;
	fn is_playing(&self) -> bool;
	/// Drain signals produced since the last poll
	fn poll_signals(&mut self) -> Vec<MediaSignal>;
}

/// Builds the element matching an item's kind
pub trait MediaHost {
	fn mount(&self, item: &PlaylistItem) -> Box<dyn MediaElement>;
}
