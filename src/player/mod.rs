pub mod playlist;

use crate::media::{MediaElement, MediaError, MediaHost, MediaSignal};
use crate::reactor::{ComponentResponse, Event, PlayerEvent, ViewEvent};
use crate::types::NavDirection;
use playlist::{Playlist, PlaylistItem};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayerError {
	#[error("track {index} is outside the playlist (0..{len})")]
	IndexOutOfRange { index: usize, len: usize },
	#[error(transparent)]
	MediaLoad(#[from] MediaError),
}

/// Mirror of the mounted element's playback clock
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
	pub current: usize,
	pub playing: bool,
	pub elapsed: f64,
	/// Zero until metadata arrives
	pub duration: f64,
}

impl PlaybackSession {
	fn at(current: usize) -> Self {
		Self {
			current,
			playing: false,
			elapsed: 0.0,
			duration: 0.0,
		}
	}

	pub fn progress(&self) -> f64 {
		progress_ratio(self.elapsed, self.duration)
	}
}

/// Elapsed over total, 0 while the total is unknown
pub fn progress_ratio(elapsed: f64, duration: f64) -> f64 {
	if !duration.is_finite() || duration <= 0.0 || !elapsed.is_finite() {
		return 0.0;
	}
	(elapsed / duration).clamp(0.0, 1.0)
}

/// Formats seconds as `m:ss`
pub fn format_time(secs: f64) -> String {
	if !secs.is_finite() || secs <= 0.0 {
		return "0:00".to_string();
	}
	let total = secs.floor() as u64;
	format!("{}:{:02}", total / 60, total % 60)
}

fn known_duration(duration: f64) -> f64 {
	if duration.is_finite() && duration > 0.0 {
		duration
	} else {
		0.0
	}
}

pub struct MediaPlayer {
	playlist: Playlist,
	host: Box<dyn MediaHost>,
	element: Box<dyn MediaElement>,
	session: PlaybackSession,
	/// Bumped on every mount so signals from an older element are dropped
	load_id: u64,
	last_error: Option<PlayerError>,
}

impl MediaPlayer {
	pub fn new(playlist: Playlist, host: Box<dyn MediaHost>) -> Self {
		log::info!("[Player] Initializing with {} tracks", playlist.len());
		let element = host.mount(&playlist.items()[0]);
		let mut player = Self {
			playlist,
			host,
			element,
			session: PlaybackSession::at(0),
			load_id: 1,
			last_error: None,
		};
		player.adopt_element_duration();
		player
	}

	/// Convert element signals into events tagged with the current load
	pub fn poll(&mut self) -> ComponentResponse {
		let load_id = self.load_id;
		let events: Vec<Event> = self
			.element
			.poll_signals()
			.into_iter()
			.map(|signal| {
				Event::Player(match signal {
					MediaSignal::MetadataLoaded { duration } => {
						PlayerEvent::MetadataLoaded { load_id, duration }
					}
					MediaSignal::TimeUpdate { position } => {
						PlayerEvent::TimeUpdate { load_id, position }
					}
					MediaSignal::Ended => PlayerEvent::Ended { load_id },
					MediaSignal::LoadFailed { error } => PlayerEvent::LoadFailed { load_id, error },
				})
			})
			.collect();

		if events.is_empty() {
			ComponentResponse::none()
		} else {
			ComponentResponse::emit_many(events)
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Player(PlayerEvent::SelectTrack { index }) => {
				self.select_track(*index).unwrap_or_else(|e| {
					log::warn!("[Player] Select ignored: {}", e);
					ComponentResponse::none()
				})
			}
			Event::Player(PlayerEvent::Navigate { direction }) => {
				let index = match direction {
					NavDirection::Next => self.playlist.next_index(self.session.current),
					NavDirection::Prev => self.playlist.prev_index(self.session.current),
				};
				self.change_track(index)
			}
			Event::Player(PlayerEvent::TogglePlay) => self.set_playing(!self.session.playing),
			Event::Player(PlayerEvent::Stop) => {
				if self.session.playing {
					self.set_playing(false)
				} else {
					ComponentResponse::none()
				}
			}
			Event::Player(PlayerEvent::MetadataLoaded { load_id, duration }) => {
				if self.is_stale(*load_id) {
					return ComponentResponse::none();
				}
				self.session.duration = known_duration(*duration);
				self.session.elapsed = self.clamp_elapsed(self.session.elapsed);
				log::debug!("[Player] Duration {}s", self.session.duration);
				ComponentResponse::none()
			}
			Event::Player(PlayerEvent::TimeUpdate { load_id, position }) => {
				if self.is_stale(*load_id) || !position.is_finite() {
					return ComponentResponse::none();
				}
				self.session.elapsed = self.clamp_elapsed(*position);
				ComponentResponse::none()
			}
			Event::Player(PlayerEvent::Ended { load_id }) => {
				if self.is_stale(*load_id) {
					return ComponentResponse::none();
				}
				log::info!("[Player] Track {} ended", self.session.current);
				self.session.playing = false;
				ComponentResponse::none()
			}
			Event::Player(PlayerEvent::LoadFailed { load_id, error }) => {
				if self.is_stale(*load_id) {
					return ComponentResponse::none();
				}
				self.fail(error.clone())
			}
			_ => ComponentResponse::none(),
		}
	}

	/// Jump straight to `index`. Never wraps and never starts playback.
	pub fn select_track(&mut self, index: usize) -> Result<ComponentResponse, PlayerError> {
		if index >= self.playlist.len() {
			return Err(PlayerError::IndexOutOfRange {
				index,
				len: self.playlist.len(),
			});
		}
		if index == self.session.current {
			return Ok(ComponentResponse::none());
		}
		Ok(self.change_track(index))
	}

	/// Remount on `index`. The old track's error banner goes with it.
	fn change_track(&mut self, index: usize) -> ComponentResponse {
		let previous = self.session.current;
		self.element.pause();
		self.element.seek(0.0);

		self.session = PlaybackSession::at(index);
		self.last_error = None;

		let item = &self.playlist.items()[index];
		log::info!(
			"[Player] Track {} -> {} ({}, {})",
			previous,
			index,
			item.title,
			item.kind.as_str()
		);
		self.element = self.host.mount(item);
		self.load_id += 1;
		self.adopt_element_duration();
		ComponentResponse::emit(Event::View(ViewEvent::ClearError))
	}

	fn set_playing(&mut self, playing: bool) -> ComponentResponse {
		if playing {
			if let Err(error) = self.element.play() {
				return self.fail(error);
			}
			log::debug!(
				"[Player] Playing {} element for track {}",
				self.element.kind().as_str(),
				self.session.current
			);
			self.session.playing = true;
		} else {
			self.element.pause();
			self.session.playing = false;
			self.session.elapsed = self.clamp_elapsed(self.element.position());
		}
		ComponentResponse::none()
	}

	fn fail(&mut self, error: MediaError) -> ComponentResponse {
		log::error!("[Player] {}", error);
		self.session.playing = false;
		let message = error.to_string();
		self.last_error = Some(PlayerError::MediaLoad(error));
		ComponentResponse::emit(Event::View(ViewEvent::ShowError { message }))
	}

	fn adopt_element_duration(&mut self) {
		if let Some(duration) = self.element.duration() {
			self.session.duration = known_duration(duration);
		}
	}

	fn clamp_elapsed(&self, position: f64) -> f64 {
		let position = position.max(0.0);
		if self.session.duration > 0.0 {
			position.min(self.session.duration)
		} else {
			position
		}
	}

	fn is_stale(&self, load_id: u64) -> bool {
		if load_id != self.load_id {
			log::trace!("[Player] Dropping signal from load {}", load_id);
			return true;
		}
		false
	}

	/// Stop the mounted element before shutdown
	pub fn dispose(&mut self) {
		if self.element.is_playing() {
			self.element.pause();
		}
		self.session.playing = false;
		log::debug!("[Player] Disposed");
	}

	// Accessors for ViewManager
	pub fn session(&self) -> &PlaybackSession {
		&self.session
	}

	pub fn playlist(&self) -> &Playlist {
		&self.playlist
	}

	pub fn current_item(&self) -> &PlaylistItem {
		&self.playlist.items()[self.session.current]
	}

	pub fn last_error(&self) -> Option<&PlayerError> {
		self.last_error.as_ref()
	}
}
