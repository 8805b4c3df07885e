pub mod event;
pub mod queue;
pub mod scheduler;

pub use event::{
	BreathingEvent, ComponentResponse, Event, PlayerEvent, SettingsEvent, TimerKey, ViewEvent,
};
pub use queue::EventQueue;
pub use scheduler::Scheduler;

use crate::breathing::BreathingTimer;
use crate::media::{DesktopHost, MediaHost};
use crate::player::MediaPlayer;
use crate::player::playlist::Playlist;
use crate::settings::{Config, SettingsManager};
use crate::view::ViewManager;
use eframe::egui;
use std::time::{Duration, Instant};

/// Repaint cadence while media is playing
const PLAYBACK_REPAINT: Duration = Duration::from_millis(250);

pub struct Reactor {
	queue: EventQueue,
	scheduler: Scheduler,

	pub breathing: BreathingTimer,
	pub player: MediaPlayer,
	pub view: ViewManager,
	pub settings: SettingsManager,
}

impl Reactor {
	pub fn new(ctx: &egui::Context, config: &Config) -> Self {
		Self::with_host(config.playlist(), Box::new(DesktopHost::new(ctx)))
	}

	pub fn with_host(playlist: Playlist, host: Box<dyn MediaHost>) -> Self {
		log::info!("Initializing all components");
		let reactor = Self {
			queue: EventQueue::new(),
			scheduler: Scheduler::new(),
			breathing: BreathingTimer::new(),
			player: MediaPlayer::new(playlist, host),
			view: ViewManager::new(),
			settings: SettingsManager::new(),
		};
		log::info!("Initialization complete");
		reactor
	}

	fn process_response(&mut self, response: ComponentResponse) {
		for key in response.cancelled {
			self.scheduler.cancel(key);
		}
		for (key, e, d) in response.armed {
			self.scheduler.arm(key, e, d);
		}
		for e in response.events {
			self.queue.push(e);
		}
	}

	/// Queue an event and run the loop until it settles
	pub fn dispatch(&mut self, event: Event) {
		self.queue.push(event);
		self.drain_queue();
	}

	fn drain_queue(&mut self) {
		let mut iterations = 0;
		while let Some(event) = self.queue.pop() {
			log::trace!("Processing event: {:?}", event);
			let response = self.route(&event);
			self.process_response(response);

			iterations += 1;
			if iterations > 1000 {
				log::warn!("Event loop exceeded 1000 iterations, breaking");
				break;
			}
		}
	}

	pub fn tick(&mut self, ctx: &egui::Context) {
		// Drain scheduled events
		self.scheduler.tick(&mut self.queue);

		// Poll the mounted media element
		let player_response = self.player.poll();
		self.process_response(player_response);

		self.drain_queue();

		// Render
		let events = self
			.view
			.render(ctx, &self.breathing, &self.player, &self.settings);

		// Process any events from rendering immediately
		for event in events {
			log::trace!("Processing render event: {:?}", event);
			self.dispatch(event);
		}

		// Keep frames coming while timers or playback are pending
		if let Some(deadline) = self.scheduler.next_deadline() {
			ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
		}
		if self.player.session().playing {
			ctx.request_repaint_after(PLAYBACK_REPAINT);
		}
	}

	fn route(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Breathing(_) => self.breathing.handle(event),
			Event::Player(_) => self.player.handle(event),
			Event::View(_) => self.view.handle(event),
			Event::Settings(_) => self.settings.handle(event),
		}
	}
}

impl eframe::App for Reactor {
	fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
		self.tick(ctx);
	}

	fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
		log::info!("Shutting down");
		self.dispatch(Event::Breathing(BreathingEvent::Dispose));
		self.player.dispose();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::media::MediaError;
	use crate::media::testing::FakeHost;
	use crate::types::{BreathingPhase, NavDirection};

	fn reactor() -> Reactor {
		Reactor::with_host(Playlist::default(), Box::new(FakeHost::default()))
	}

	#[test]
	fn test_starting_breathing_arms_one_tick() {
		let mut reactor = reactor();
		reactor.dispatch(Event::Breathing(BreathingEvent::Toggle));
		assert!(reactor.breathing.is_active());
		assert!(reactor.scheduler.is_armed(TimerKey::BreathingTick));

		reactor.dispatch(Event::Breathing(BreathingEvent::Toggle));
		assert!(!reactor.scheduler.is_armed(TimerKey::BreathingTick));
	}

	#[test]
	fn test_scheduled_ticks_drive_phases() {
		let mut reactor = reactor();
		reactor.dispatch(Event::Breathing(BreathingEvent::Toggle));

		for _ in 0..4 {
			let due = Instant::now() + Duration::from_secs(2);
			reactor.scheduler.tick_at(due, &mut reactor.queue);
			reactor.drain_queue();
		}
		assert_eq!(reactor.breathing.session().phase(), BreathingPhase::HoldAfterInhale);
		assert_eq!(reactor.breathing.session().remaining(), 4);
		assert!(reactor.scheduler.is_armed(TimerKey::BreathingTick));
	}

	#[test]
	fn test_hiding_panel_disposes_breathing() {
		let mut reactor = reactor();
		reactor.dispatch(Event::Breathing(BreathingEvent::Toggle));
		reactor.dispatch(Event::Settings(SettingsEvent::ToggleBreathingPanel));

		assert!(!reactor.breathing.is_active());
		assert!(!reactor.scheduler.is_armed(TimerKey::BreathingTick));
	}

	#[test]
	fn test_hiding_player_panel_pauses_playback() {
		let mut reactor = reactor();
		reactor.dispatch(Event::Player(PlayerEvent::TogglePlay));
		assert!(reactor.player.session().playing);

		reactor.dispatch(Event::Settings(SettingsEvent::TogglePlayerPanel));
		assert!(!reactor.settings.show_player());
		assert!(!reactor.player.session().playing);
	}

	#[test]
	fn test_track_change_clears_error_banner() {
		let mut reactor = reactor();
		reactor.dispatch(Event::Player(PlayerEvent::LoadFailed {
			load_id: 1,
			error: MediaError::Load {
				src: "a".into(),
				reason: "404".into(),
			},
		}));
		assert!(reactor.player.last_error().is_some());
		assert!(reactor.view.error_message().is_some());

		reactor.dispatch(Event::Player(PlayerEvent::Navigate {
			direction: NavDirection::Next,
		}));
		assert!(reactor.player.last_error().is_none());
		assert!(reactor.view.error_message().is_none());
	}

	#[test]
	fn test_player_events_route_to_player() {
		let mut reactor = reactor();
		reactor.dispatch(Event::Player(PlayerEvent::Navigate {
			direction: NavDirection::Prev,
		}));
		reactor.dispatch(Event::Player(PlayerEvent::TogglePlay));
		assert_eq!(reactor.player.session().current, 3);
		assert!(reactor.player.session().playing);
	}
}
