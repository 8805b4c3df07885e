use crate::player::playlist::{self, Playlist, PlaylistItem};
use crate::reactor::{BreathingEvent, ComponentResponse, Event, PlayerEvent, SettingsEvent};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
	pub width: f32,
	pub height: f32,
}

impl Default for WindowConfig {
	fn default() -> Self {
		Self {
			width: 1280.0,
			height: 720.0,
		}
	}
}

/// Startup configuration, read from `config.toml`. Never written back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
	pub log_filter: String,
	pub window: WindowConfig,
	pub playlist: Vec<PlaylistItem>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			log_filter: "info".to_string(),
			window: WindowConfig::default(),
			playlist: playlist::default_items(),
		}
	}
}

impl Config {
	pub fn default_path() -> Option<PathBuf> {
		directories::ProjectDirs::from("org", "stillpoint", "Stillpoint")
			.map(|dirs| dirs.config_dir().join("config.toml"))
	}

	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let content = fs::read_to_string(path)
			.with_context(|| format!("Failed to read config from {:?}", path))?;
		toml::from_str(&content)
			.with_context(|| format!("Failed to parse config TOML from {:?}", path))
	}

	/// Load from the platform config dir. A missing file is not an error.
	pub fn load_or_default() -> anyhow::Result<Self> {
		match Self::default_path() {
			Some(path) if path.exists() => Self::load(&path),
			_ => Ok(Self::default()),
		}
	}

	/// Validated playlist, falling back to the built-in library
	pub fn playlist(&self) -> Playlist {
		match Playlist::new(self.playlist.clone()) {
			Ok(playlist) => playlist,
			Err(e) => {
				log::warn!("Configured playlist rejected ({}), using built-in library", e);
				Playlist::default()
			}
		}
	}
}

pub struct SettingsManager {
	show_breathing: bool,
	show_player: bool,
}

impl SettingsManager {
	pub fn new() -> Self {
		Self {
			show_breathing: true,
			show_player: true,
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Settings(SettingsEvent::ToggleBreathingPanel) => {
				self.show_breathing = !self.show_breathing;
				log::debug!("Breathing panel visible: {}", self.show_breathing);
				if self.show_breathing {
					ComponentResponse::none()
				} else {
					// unmounting drops the running session
					ComponentResponse::emit(Event::Breathing(BreathingEvent::Dispose))
				}
			}
			Event::Settings(SettingsEvent::TogglePlayerPanel) => {
				self.show_player = !self.show_player;
				log::debug!("Player panel visible: {}", self.show_player);
				if self.show_player {
					ComponentResponse::none()
				} else {
					ComponentResponse::emit(Event::Player(PlayerEvent::Stop))
				}
			}
			_ => ComponentResponse::none(),
		}
	}

	// Accessors for ViewManager/UI
	pub fn show_breathing(&self) -> bool {
		self.show_breathing
	}

	pub fn show_player(&self) -> bool {
		self.show_player
	}
}

impl Default for SettingsManager {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::MediaKind;
	use std::io::Write;

	#[test]
	fn test_load_partial_config() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
log_filter = "debug"

[[playlist]]
id = 10
title = "Body Scan"
kind = "audio"
duration = "12:00"
src = "/music/body-scan.ogg"
"#
		)
		.unwrap();

		let config = Config::load(file.path()).unwrap();
		assert_eq!(config.log_filter, "debug");
		assert_eq!(config.window, WindowConfig::default());
		assert_eq!(config.playlist.len(), 1);
		assert_eq!(config.playlist[0].kind, MediaKind::Audio);
		assert_eq!(config.playlist().len(), 1);
	}

	#[test]
	fn test_invalid_toml_is_an_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "log_filter = [").unwrap();
		let err = Config::load(file.path()).unwrap_err();
		assert!(err.to_string().contains("Failed to parse config TOML"));
	}

	#[test]
	fn test_missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(Config::load(&dir.path().join("config.toml")).is_err());
	}

	#[test]
	fn test_empty_playlist_falls_back() {
		let config = Config {
			playlist: vec![],
			..Default::default()
		};
		assert_eq!(config.playlist().len(), 4);
	}

	#[test]
	fn test_hiding_breathing_disposes_session() {
		let mut settings = SettingsManager::new();
		let response = settings.handle(&Event::Settings(SettingsEvent::ToggleBreathingPanel));
		assert!(!settings.show_breathing());
		assert_eq!(
			response.events,
			vec![Event::Breathing(BreathingEvent::Dispose)]
		);

		let response = settings.handle(&Event::Settings(SettingsEvent::ToggleBreathingPanel));
		assert!(settings.show_breathing());
		assert!(response.events.is_empty());
	}

	#[test]
	fn test_hiding_player_stops_playback() {
		let mut settings = SettingsManager::new();
		let response = settings.handle(&Event::Settings(SettingsEvent::TogglePlayerPanel));
		assert!(!settings.show_player());
		assert_eq!(response.events, vec![Event::Player(PlayerEvent::Stop)]);

		let response = settings.handle(&Event::Settings(SettingsEvent::TogglePlayerPanel));
		assert!(settings.show_player());
		assert!(response.events.is_empty());
	}
}
