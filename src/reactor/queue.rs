use super::event::Event;
use std::collections::VecDeque;

/// Priority event queue with 4 priority levels
pub struct EventQueue {
	queues: [VecDeque<Event>; 4],
}

impl EventQueue {
	pub fn new() -> Self {
		Self {
			queues: [
				VecDeque::new(), // Critical
				VecDeque::new(), // High
				VecDeque::new(), // Normal
				VecDeque::new(), // Low
			],
		}
	}

	/// Push an event to the appropriate priority queue
	pub fn push(&mut self, event: Event) {
		let priority = event.priority();
		self.queues[priority.as_index()].push_back(event);
	}

	/// Pop the highest priority event available
	pub fn pop(&mut self) -> Option<Event> {
		for queue in &mut self.queues {
			if let Some(event) = queue.pop_front() {
				return Some(event);
			}
		}
		None
	}
}

impl Default for EventQueue {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::media::MediaError;
	use crate::reactor::event::{BreathingEvent, PlayerEvent};

	#[test]
	fn test_pops_by_priority_then_fifo() {
		let mut queue = EventQueue::new();
		queue.push(Event::Breathing(BreathingEvent::Toggle));
		queue.push(Event::Breathing(BreathingEvent::PhaseComplete));
		queue.push(Event::Player(PlayerEvent::LoadFailed {
			load_id: 1,
			error: MediaError::Load {
				src: "calm.mp3".into(),
				reason: "gone".into(),
			},
		}));
		queue.push(Event::Player(PlayerEvent::TogglePlay));

		assert!(matches!(
			queue.pop(),
			Some(Event::Player(PlayerEvent::LoadFailed { .. }))
		));
		assert_eq!(queue.pop(), Some(Event::Player(PlayerEvent::TogglePlay)));
		assert_eq!(queue.pop(), Some(Event::Breathing(BreathingEvent::Toggle)));
		assert_eq!(
			queue.pop(),
			Some(Event::Breathing(BreathingEvent::PhaseComplete))
		);
		assert_eq!(queue.pop(), None);
	}
}
