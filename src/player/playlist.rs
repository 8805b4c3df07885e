use crate::types::MediaKind;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaylistItem {
	pub id: u32,
	pub title: String,
	pub kind: MediaKind,
	/// Display string such as "2:58"
	pub duration: String,
	/// URI or local path
	pub src: String,
}

impl PlaylistItem {
	/// Seconds encoded in the display label, if it is `m:ss` or `h:mm:ss`
	pub fn duration_hint(&self) -> Option<f64> {
		parse_clock(&self.duration)
	}
}

fn parse_clock(label: &str) -> Option<f64> {
	let mut total: u64 = 0;
	let mut parts = 0;
	for part in label.trim().split(':') {
		let value: u64 = part.parse().ok()?;
		if parts > 0 && value >= 60 {
			return None;
		}
		total = total * 60 + value;
		parts += 1;
	}
	if (2..=3).contains(&parts) {
		Some(total as f64)
	} else {
		None
	}
}

#[derive(Debug, Error, PartialEq)]
pub enum PlaylistError {
	#[error("playlist is empty")]
	Empty,
	#[error("duplicate playlist id {0}")]
	DuplicateId(u32),
}

/// Fixed, ordered and non-empty list of tracks
#[derive(Debug, Clone)]
pub struct Playlist {
	items: Arc<[PlaylistItem]>,
}

impl Playlist {
	pub fn new(items: Vec<PlaylistItem>) -> Result<Self, PlaylistError> {
		if items.is_empty() {
			return Err(PlaylistError::Empty);
		}
		let mut seen = HashSet::new();
		for item in &items {
			if !seen.insert(item.id) {
				return Err(PlaylistError::DuplicateId(item.id));
			}
		}
		Ok(Self {
			items: items.into(),
		})
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn items(&self) -> &[PlaylistItem] {
		&self.items
	}

	pub fn next_index(&self, index: usize) -> usize {
		(index + 1) % self.len()
	}

	pub fn prev_index(&self, index: usize) -> usize {
		(index + self.len() - 1) % self.len()
	}
}

impl Default for Playlist {
	fn default() -> Self {
		Self {
			items: default_items().into(),
		}
	}
}

/// Built-in meditation library
pub fn default_items() -> Vec<PlaylistItem> {
	const AMBIENT: &str = "https://res.cloudinary.com/diwodg2yv/video/upload/v1756541350/inhale-exhale-ambient-peaceful-meditation-365001_tawmlu.mp3";
	vec![
		PlaylistItem {
			id: 1,
			title: "Morning Mindfulness".into(),
			kind: MediaKind::Audio,
			duration: "2:58".into(),
			src: AMBIENT.into(),
		},
		PlaylistItem {
			id: 2,
			title: "Deep Relaxation".into(),
			kind: MediaKind::Audio,
			duration: "5:47".into(),
			src: "https://res.cloudinary.com/diwodg2yv/video/upload/v1756541386/meditation-music-368634_dcleuk.mp3".into(),
		},
		PlaylistItem {
			id: 3,
			title: "Anxiety Relief".into(),
			kind: MediaKind::Audio,
			duration: "2:58".into(),
			src: AMBIENT.into(),
		},
		PlaylistItem {
			id: 4,
			title: "Morning Yoga".into(),
			kind: MediaKind::Video,
			duration: "0:23".into(),
			src: "https://res.cloudinary.com/diwodg2yv/video/upload/v1756541213/meditation3_t9huin.mp4".into(),
		},
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(id: u32) -> PlaylistItem {
		PlaylistItem {
			id,
			title: format!("Track {}", id),
			kind: MediaKind::Audio,
			duration: "1:00".into(),
			src: format!("/tmp/{}.mp3", id),
		}
	}

	#[test]
	fn test_rejects_empty_and_duplicates() {
		assert_eq!(Playlist::new(vec![]).unwrap_err(), PlaylistError::Empty);
		assert_eq!(
			Playlist::new(vec![item(1), item(2), item(1)]).unwrap_err(),
			PlaylistError::DuplicateId(1)
		);
	}

	#[test]
	fn test_wrapping_indices() {
		let playlist = Playlist::new(vec![item(1), item(2), item(3), item(4)]).unwrap();
		assert_eq!(playlist.next_index(3), 0);
		assert_eq!(playlist.prev_index(0), 3);
		assert_eq!(playlist.next_index(1), 2);
		assert_eq!(playlist.prev_index(2), 1);
	}

	#[test]
	fn test_single_item_wraps_to_itself() {
		let playlist = Playlist::new(vec![item(7)]).unwrap();
		assert_eq!(playlist.next_index(0), 0);
		assert_eq!(playlist.prev_index(0), 0);
	}

	#[test]
	fn test_duration_hint() {
		let mut track = item(1);
		assert_eq!(track.duration_hint(), Some(60.0));
		track.duration = "2:58".into();
		assert_eq!(track.duration_hint(), Some(178.0));
		track.duration = "1:02:03".into();
		assert_eq!(track.duration_hint(), Some(3723.0));
		track.duration = "live".into();
		assert_eq!(track.duration_hint(), None);
		track.duration = "4:75".into();
		assert_eq!(track.duration_hint(), None);
		track.duration = "42".into();
		assert_eq!(track.duration_hint(), None);
	}

	#[test]
	fn test_default_library() {
		let playlist = Playlist::default();
		assert_eq!(playlist.len(), 4);
		assert_eq!(playlist.items()[3].kind, MediaKind::Video);
		assert!(Playlist::new(default_items()).is_ok());
	}
}
