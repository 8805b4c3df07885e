use crate::media::MediaError;
use crate::types::NavDirection;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
	Breathing(BreathingEvent),
	Player(PlayerEvent),
	View(ViewEvent),
	Settings(SettingsEvent),
}

impl Event {
	pub fn priority(&self) -> Priority {
		match self {
			Event::Player(PlayerEvent::LoadFailed { .. }) => Priority::Critical,
			Event::Player(PlayerEvent::SelectTrack { .. })
			| Event::Player(PlayerEvent::Navigate { .. })
			| Event::Player(PlayerEvent::TogglePlay)
			| Event::Player(PlayerEvent::Stop) => Priority::High,
			Event::Player(PlayerEvent::TimeUpdate { .. }) => Priority::Low,
			Event::Player(_) => Priority::Normal,
			Event::Breathing(_) => Priority::Low,
			Event::View(_) => Priority::Normal,
			Event::Settings(_) => Priority::Normal,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
	Critical = 0,
	High = 1,
	Normal = 2,
	Low = 3,
}

impl Priority {
	pub fn as_index(&self) -> usize {
		*self as usize
	}
}

/// Keys for timers that must exist at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
	BreathingTick,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BreathingEvent {
	/// Start or pause the session
	Toggle,
	Reset,
	/// One second elapsed; stale generations are ignored
	Tick { generation: u64 },
	/// Remaining time hit zero, move to the next phase
	PhaseComplete,
	/// Panel unmounted
	Dispose,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
	SelectTrack { index: usize },
	Navigate { direction: NavDirection },
	TogglePlay,
	/// Panel hidden, pause whatever is playing
	Stop,
	MetadataLoaded { load_id: u64, duration: f64 },
	TimeUpdate { load_id: u64, position: f64 },
	Ended { load_id: u64 },
	LoadFailed { load_id: u64, error: MediaError },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
	ShowError { message: String },
	ClearError,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettingsEvent {
	ToggleBreathingPanel,
	TogglePlayerPanel,
}

/// Response from component.handle()
#[derive(Default, Debug)]
pub struct ComponentResponse {
	/// Events to dispatch immediately
	pub events: Vec<Event>,
	/// Keyed timers to (re)arm, replacing any pending one with the same key
	pub armed: Vec<(TimerKey, Event, Duration)>,
	/// Keyed timers to drop
	pub cancelled: Vec<TimerKey>,
}

impl ComponentResponse {
	pub fn none() -> Self {
		Self::default()
	}

	pub fn emit(event: Event) -> Self {
		Self {
			events: vec![event],
			..Default::default()
		}
	}

	pub fn emit_many(events: Vec<Event>) -> Self {
		Self {
			events,
			..Default::default()
		}
	}

	pub fn arm(key: TimerKey, event: Event, delay: Duration) -> Self {
		Self {
			armed: vec![(key, event, delay)],
			..Default::default()
		}
	}

	pub fn cancel(key: TimerKey) -> Self {
		Self {
			cancelled: vec![key],
			..Default::default()
		}
	}
}
