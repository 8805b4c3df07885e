use crate::reactor::{BreathingEvent, ComponentResponse, Event, TimerKey};
use crate::types::BreathingPhase;
use std::time::Duration;

/// Countdown step
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathingSession {
	active: bool,
	phase: BreathingPhase,
	/// Never above `phase.duration_secs()`
	remaining: u32,
	cycles: u32,
}

impl BreathingSession {
	pub fn new() -> Self {
		Self {
			active: false,
			phase: BreathingPhase::Inhale,
			remaining: BreathingPhase::Inhale.duration_secs(),
			cycles: 0,
		}
	}

	/// Count down one second. Does nothing once the phase has run out.
	pub fn tick(&mut self) -> bool {
		if self.remaining == 0 {
			return false;
		}
		self.remaining -= 1;
		true
	}

	/// Move to the next phase. Returns true when this closed a cycle.
	pub fn advance(&mut self) -> bool {
		let completed = self.phase;
		self.phase = completed.next();
		self.remaining = self.phase.duration_secs();
		if completed.is_last() {
			self.cycles += 1;
			true
		} else {
			false
		}
	}

	pub fn reset(&mut self) {
		*self = Self::new();
	}

	pub fn active(&self) -> bool {
		self.active
	}

	pub fn phase(&self) -> BreathingPhase {
		self.phase
	}

	pub fn remaining(&self) -> u32 {
		self.remaining
	}

	pub fn cycles(&self) -> u32 {
		self.cycles
	}
}

impl Default for BreathingSession {
	fn default() -> Self {
		Self::new()
	}
}

pub struct BreathingTimer {
	session: BreathingSession,
	/// Bumped whenever the pending tick is replaced or cancelled
	generation: u64,
}

impl BreathingTimer {
	pub fn new() -> Self {
		Self {
			session: BreathingSession::new(),
			generation: 0,
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Breathing(BreathingEvent::Toggle) => {
				self.session.active = !self.session.active;
				log::info!(
					"[Breathing] {} at {:?} ({}s left)",
					if self.session.active { "Started" } else { "Paused" },
					self.session.phase,
					self.session.remaining
				);
				self.reschedule()
			}
			Event::Breathing(BreathingEvent::Reset) => {
				log::info!("[Breathing] Reset after {} cycles", self.session.cycles);
				self.session.reset();
				self.disarm()
			}
			Event::Breathing(BreathingEvent::Dispose) => {
				log::debug!("[Breathing] Disposed");
				self.session.reset();
				self.disarm()
			}
			Event::Breathing(BreathingEvent::Tick { generation }) => {
				if *generation != self.generation || !self.session.active {
					log::trace!(
						"[Breathing] Dropping stale tick (gen {} != {})",
						generation,
						self.generation
					);
					return ComponentResponse::none();
				}
				self.session.tick();
				log::trace!(
					"[Breathing] Tick: {:?} {}s left",
					self.session.phase,
					self.session.remaining
				);
				self.reschedule()
			}
			Event::Breathing(BreathingEvent::PhaseComplete) => {
				if !self.session.active || self.session.remaining != 0 {
					return ComponentResponse::none();
				}
				if self.session.advance() {
					log::info!("[Breathing] Cycle {} complete", self.session.cycles);
				}
				log::debug!(
					"[Breathing] Phase {:?} for {}s",
					self.session.phase,
					self.session.remaining
				);
				self.reschedule()
			}
			_ => ComponentResponse::none(),
		}
	}

	/// Cancel whatever is pending, then arm at most one follow-up
	fn reschedule(&mut self) -> ComponentResponse {
		if !self.session.active {
			return self.disarm();
		}
		if self.session.remaining == 0 {
			self.generation += 1;
			let mut response = ComponentResponse::cancel(TimerKey::BreathingTick);
			response
				.events
				.push(Event::Breathing(BreathingEvent::PhaseComplete));
			return response;
		}
		self.generation += 1;
		ComponentResponse::arm(
			TimerKey::BreathingTick,
			Event::Breathing(BreathingEvent::Tick {
				generation: self.generation,
			}),
			TICK_INTERVAL,
		)
	}

	fn disarm(&mut self) -> ComponentResponse {
		self.generation += 1;
		ComponentResponse::cancel(TimerKey::BreathingTick)
	}

	// Accessors for ViewManager
	pub fn session(&self) -> &BreathingSession {
		&self.session
	}

	pub fn is_active(&self) -> bool {
		self.session.active
	}
}

impl Default for BreathingTimer {
	fn default() -> Self {
		Self::new()
	}
}
