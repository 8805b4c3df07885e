use super::event::{Event, TimerKey};
use super::queue::EventQueue;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

struct ScheduledEvent {
	emit_at: Instant,
	key: TimerKey,
	event: Event,
}

impl PartialEq for ScheduledEvent {
	fn eq(&self, other: &Self) -> bool {
		self.emit_at == other.emit_at
	}
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ScheduledEvent {
	fn cmp(&self, other: &Self) -> Ordering {
		other.emit_at.cmp(&self.emit_at)
	}
}

pub struct Scheduler {
	pending: BinaryHeap<ScheduledEvent>,
}

impl Scheduler {
	pub fn new() -> Self {
		Self {
			pending: BinaryHeap::new(),
		}
	}

	/// Arm the timer for `key`, dropping whatever was pending under it
	pub fn arm(&mut self, key: TimerKey, event: Event, delay: Duration) {
		self.cancel(key);
		self.pending.push(ScheduledEvent {
			emit_at: Instant::now() + delay,
			key,
			event,
		});
	}

	pub fn cancel(&mut self, key: TimerKey) {
		let before = self.pending.len();
		self.pending.retain(|s| s.key != key);
		if self.pending.len() != before {
			log::trace!("[Scheduler] Cancelled {:?}", key);
		}
	}

	pub fn is_armed(&self, key: TimerKey) -> bool {
		self.pending.iter().any(|s| s.key == key)
	}

	/// Earliest pending deadline, if any
	pub fn next_deadline(&self) -> Option<Instant> {
		self.pending.peek().map(|s| s.emit_at)
	}

	/// Poll and drain ready events into the queue
	pub fn tick(&mut self, queue: &mut EventQueue) {
		self.tick_at(Instant::now(), queue);
	}

	pub fn tick_at(&mut self, now: Instant, queue: &mut EventQueue) {
		while let Some(scheduled) = self.pending.peek() {
			if scheduled.emit_at > now {
				break;
			}
			if let Some(scheduled) = self.pending.pop() {
				queue.push(scheduled.event);
			}
		}
	}
}

impl Default for Scheduler {
	fn default() -> Self {
		Self::new()
	}
}
