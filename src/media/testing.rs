use super::{MediaElement, MediaError, MediaHost, MediaSignal};
use crate::player::playlist::PlaylistItem;
use crate::types::MediaKind;
use std::cell::RefCell;
use std::rc::Rc;

pub type Log = Rc<RefCell<Vec<String>>>;
pub type Signals = Rc<RefCell<Vec<MediaSignal>>>;

/// Records every command it receives
pub struct FakeElement {
	id: u32,
	kind: MediaKind,
	log: Log,
	signals: Signals,
	fail_play: bool,
	playing: bool,
	position: f64,
}

impl MediaElement for FakeElement {
	fn kind(&self) -> MediaKind {
		self.kind
	}

	fn play(&mut self) -> Result<(), MediaError> {
		self.log
			.borrow_mut()
			.push(format!("play {} {}", self.kind.as_str(), self.id));
		if self.fail_play {
			return Err(MediaError::Load {
				src: format!("{}.mp3", self.id),
				reason: "unreachable".into(),
			});
		}
		self.playing = true;
		Ok(())
	}

	fn pause(&mut self) {
		self.log.borrow_mut().push(format!("pause {}", self.id));
		self.playing = false;
	}

	fn seek(&mut self, position: f64) {
		self.log
			.borrow_mut()
			.push(format!("seek {} {}", self.id, position));
		self.position = position;
	}

	fn position(&self) -> f64 {
		self.position
	}

	fn duration(&self) -> Option<f64> {
		None
	}

	fn is_playing(&self) -> bool {
		self.playing
	}

	fn poll_signals(&mut self) -> Vec<MediaSignal> {
		std::mem::take(&mut *self.signals.borrow_mut())
	}
}

/// Host whose elements share one command log and one signal inbox
#[derive(Default)]
pub struct FakeHost {
	pub log: Log,
	pub signals: Signals,
	pub fail_play: bool,
}

impl MediaHost for FakeHost {
	fn mount(&self, item: &PlaylistItem) -> Box<dyn MediaElement> {
		self.log.borrow_mut().push(format!("mount {}", item.id));
		Box::new(FakeElement {
			id: item.id,
			kind: item.kind,
			log: self.log.clone(),
			signals: self.signals.clone(),
			fail_play: self.fail_play,
			playing: false,
			position: 0.0,
		})
	}
}
