use super::{MediaElement, MediaError, MediaHost, MediaSignal};
use crate::player::playlist::PlaylistItem;
use crate::types::MediaKind;
use eframe::egui;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How often a playing element reports its position
const REPORT_INTERVAL: Duration = Duration::from_millis(250);

type ProbeResult = Result<(), String>;

/// Playback clock for one source. Decoding and output are left to the platform;
/// this tracks position, learns the duration once the source is reachable, and
/// reports the same signals a native element would.
pub struct Transport {
	src: String,
	hint: Option<f64>,
	duration: Option<f64>,
	failed: Option<MediaError>,
	offset: f64,
	started_at: Option<Instant>,
	last_report: Option<Instant>,
	receiver: mpsc::Receiver<ProbeResult>,
	queued: Vec<MediaSignal>,
}

impl Transport {
	fn new(src: String, hint: Option<f64>, receiver: mpsc::Receiver<ProbeResult>) -> Self {
		Self {
			src,
			hint,
			duration: None,
			failed: None,
			offset: 0.0,
			started_at: None,
			last_report: None,
			receiver,
			queued: Vec::new(),
		}
	}

	fn clamp(&self, position: f64) -> f64 {
		let position = position.max(0.0);
		match self.duration {
			Some(d) if d.is_finite() => position.min(d),
			_ => position,
		}
	}

	fn position_at(&self, now: Instant) -> f64 {
		let running = self
			.started_at
			.map(|t| now.saturating_duration_since(t).as_secs_f64())
			.unwrap_or(0.0);
		self.clamp(self.offset + running)
	}

	fn play_at(&mut self, now: Instant) -> Result<(), MediaError> {
		if let Some(error) = &self.failed {
			return Err(error.clone());
		}
		if self.started_at.is_some() {
			return Ok(());
		}
		if let Some(d) = self.duration {
			if d.is_finite() && self.offset >= d {
				self.offset = 0.0;
			}
		}
		self.started_at = Some(now);
		self.last_report = None;
		Ok(())
	}

	fn pause_at(&mut self, now: Instant) {
		self.offset = self.position_at(now);
		self.started_at = None;
	}

	fn seek_at(&mut self, position: f64, now: Instant) {
		self.offset = self.clamp(position);
		if self.started_at.is_some() {
			self.started_at = Some(now);
		}
		self.queued.push(MediaSignal::TimeUpdate {
			position: self.offset,
		});
	}

	fn poll_at(&mut self, now: Instant) -> Vec<MediaSignal> {
		let mut signals = std::mem::take(&mut self.queued);

		while let Ok(result) = self.receiver.try_recv() {
			match result {
				Ok(()) => {
					let duration = self.hint.unwrap_or(f64::NAN);
					log::debug!("[Media] Metadata ready for {}: {}s", self.src, duration);
					self.duration = Some(duration);
					signals.push(MediaSignal::MetadataLoaded { duration });
				}
				Err(reason) => {
					log::error!("[Media] Load failed: {} - {}", self.src, reason);
					let error = MediaError::Load {
						src: self.src.clone(),
						reason,
					};
					self.failed = Some(error.clone());
					self.started_at = None;
					signals.push(MediaSignal::LoadFailed { error });
				}
			}
		}

		if self.started_at.is_some() {
			let position = self.position_at(now);
			match self.duration {
				Some(d) if d.is_finite() && position >= d => {
					self.offset = d;
					self.started_at = None;
					signals.push(MediaSignal::TimeUpdate { position: d });
					signals.push(MediaSignal::Ended);
				}
				_ => {
					let due = self
						.last_report
						.map(|t| now.saturating_duration_since(t) >= REPORT_INTERVAL)
						.unwrap_or(true);
					if due {
						self.last_report = Some(now);
						signals.push(MediaSignal::TimeUpdate { position });
					}
				}
			}
		}

		signals
	}
}

pub struct AudioElement {
	transport: Transport,
}

impl MediaElement for AudioElement {
	fn kind(&self) -> MediaKind {
		MediaKind::Audio
	}

	fn play(&mut self) -> Result<(), MediaError> {
		self.transport.play_at(Instant::now())
	}

	fn pause(&mut self) {
		self.transport.pause_at(Instant::now());
	}

	fn seek(&mut self, position: f64) {
		self.transport.seek_at(position, Instant::now());
	}

	fn position(&self) -> f64 {
		self.transport.position_at(Instant::now())
	}

	fn duration(&self) -> Option<f64> {
		self.transport.duration
	}

	fn is_playing(&self) -> bool {
		self.transport.started_at.is_some()
	}

	fn poll_signals(&mut self) -> Vec<MediaSignal> {
		self.transport.poll_at(Instant::now())
	}
}

pub struct VideoElement {
	transport: Transport,
}

impl MediaElement for VideoElement {
	fn kind(&self) -> MediaKind {
		MediaKind::Video
	}

	fn play(&mut self) -> Result<(), MediaError> {
		self.transport.play_at(Instant::now())
	}

	fn pause(&mut self) {
		self.transport.pause_at(Instant::now());
	}

	fn seek(&mut self, position: f64) {
		self.transport.seek_at(position, Instant::now());
	}

	fn position(&self) -> f64 {
		self.transport.position_at(Instant::now())
	}

	fn duration(&self) -> Option<f64> {
		self.transport.duration
	}

	fn is_playing(&self) -> bool {
		self.transport.started_at.is_some()
	}

	fn poll_signals(&mut self) -> Vec<MediaSignal> {
		self.transport.poll_at(Instant::now())
	}
}

/// Host used by the desktop shell: probes sources on the tokio runtime
pub struct DesktopHost {
	client: reqwest::Client,
	egui_ctx: egui::Context,
}

impl DesktopHost {
	pub fn new(ctx: &egui::Context) -> Self {
		Self {
			client: reqwest::Client::new(),
			egui_ctx: ctx.clone(),
		}
	}

	fn spawn_probe(&self, src: String) -> mpsc::Receiver<ProbeResult> {
		let (sender, receiver) = mpsc::channel(1);
		let client = self.client.clone();
		let ctx = self.egui_ctx.clone();

		tokio::spawn(async move {
			let result = probe(&client, &src).await;
			let _ = sender.send(result.map_err(|e| e.to_string())).await;
			ctx.request_repaint();
		});

		receiver
	}
}

impl MediaHost for DesktopHost {
	fn mount(&self, item: &PlaylistItem) -> Box<dyn MediaElement> {
		log::info!("[Media] Mounting {} element: {}", item.kind.as_str(), item.src);
		let receiver = self.spawn_probe(item.src.clone());
		let transport = Transport::new(item.src.clone(), item.duration_hint(), receiver);
		match item.kind {
			MediaKind::Audio => Box::new(AudioElement { transport }),
			MediaKind::Video => Box::new(VideoElement { transport }),
		}
	}
}

async fn probe(client: &reqwest::Client, src: &str) -> anyhow::Result<()> {
	if src.starts_with("http://") || src.starts_with("https://") {
		let resp = client.head(src).send().await?;
		if !resp.status().is_success() {
			anyhow::bail!("HTTP Status: {}", resp.status());
		}
	} else {
		let path = src.strip_prefix("file://").unwrap_or(src);
		let meta = tokio::fs::metadata(path).await?;
		if !meta.is_file() {
			anyhow::bail!("not a file");
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn transport(hint: Option<f64>) -> (Transport, mpsc::Sender<ProbeResult>) {
		let (sender, receiver) = mpsc::channel(1);
		(Transport::new("/tmp/calm.mp3".into(), hint, receiver), sender)
	}

	#[test]
	fn test_metadata_uses_duration_hint() {
		let (mut t, sender) = transport(Some(178.0));
		assert_eq!(t.duration, None);
		sender.try_send(Ok(())).unwrap();

		let signals = t.poll_at(Instant::now());
		assert_eq!(signals, vec![MediaSignal::MetadataLoaded { duration: 178.0 }]);
		assert_eq!(t.duration, Some(178.0));
	}

	#[test]
	fn test_unknown_duration_reports_nan() {
		let (mut t, sender) = transport(None);
		sender.try_send(Ok(())).unwrap();
		match t.poll_at(Instant::now()).as_slice() {
			[MediaSignal::MetadataLoaded { duration }] => assert!(duration.is_nan()),
			other => panic!("unexpected signals: {:?}", other),
		}
	}

	#[test]
	fn test_load_failure_blocks_play() {
		let (mut t, sender) = transport(Some(10.0));
		let now = Instant::now();
		t.play_at(now).unwrap();
		sender.try_send(Err("HTTP Status: 404".into())).unwrap();

		let signals = t.poll_at(now);
		assert!(matches!(
			signals.as_slice(),
			[MediaSignal::LoadFailed { error: MediaError::Load { .. } }]
		));
		assert!(t.started_at.is_none());
		assert!(t.play_at(now).is_err());
	}

	#[test]
	fn test_clock_advances_and_pauses() {
		let (mut t, _sender) = transport(None);
		let start = Instant::now();
		t.play_at(start).unwrap();
		assert_eq!(t.position_at(start + Duration::from_secs(3)), 3.0);

		t.pause_at(start + Duration::from_secs(3));
		assert_eq!(t.position_at(start + Duration::from_secs(10)), 3.0);
	}

	#[test]
	fn test_reaching_duration_ends_once() {
		let (mut t, sender) = transport(Some(5.0));
		sender.try_send(Ok(())).unwrap();
		let start = Instant::now();
		t.poll_at(start);
		t.play_at(start).unwrap();

		let signals = t.poll_at(start + Duration::from_secs(6));
		assert_eq!(
			signals,
			vec![MediaSignal::TimeUpdate { position: 5.0 }, MediaSignal::Ended]
		);
		assert!(t.poll_at(start + Duration::from_secs(7)).is_empty());

		// playing again after the end restarts from zero
		t.play_at(start + Duration::from_secs(8)).unwrap();
		assert_eq!(t.position_at(start + Duration::from_secs(9)), 1.0);
	}

	#[test]
	fn test_time_updates_are_throttled() {
		let (mut t, _sender) = transport(None);
		let start = Instant::now();
		t.play_at(start).unwrap();

		assert_eq!(t.poll_at(start).len(), 1);
		assert!(t.poll_at(start + Duration::from_millis(100)).is_empty());
		assert_eq!(
			t.poll_at(start + Duration::from_millis(300)),
			vec![MediaSignal::TimeUpdate { position: 0.3 }]
		);
	}

	#[test]
	fn test_seek_reports_position() {
		let (mut t, _sender) = transport(None);
		let now = Instant::now();
		t.seek_at(12.5, now);
		t.seek_at(-4.0, now);
		assert_eq!(
			t.poll_at(now),
			vec![
				MediaSignal::TimeUpdate { position: 12.5 },
				MediaSignal::TimeUpdate { position: 0.0 },
			]
		);
	}
}
