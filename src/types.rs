use serde::Deserialize;

/// Breathing timer phases, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathingPhase {
	Inhale,
	HoldAfterInhale,
	Exhale,
	HoldAfterExhale,
}

/// Circle easing used while a phase animates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEasing {
	EaseInOut,
	Linear,
}

impl BreathingPhase {
	pub const ALL: [BreathingPhase; 4] = [
		BreathingPhase::Inhale,
		BreathingPhase::HoldAfterInhale,
		BreathingPhase::Exhale,
		BreathingPhase::HoldAfterExhale,
	];

	/// Position within the cycle
	pub fn index(&self) -> usize {
		match self {
			BreathingPhase::Inhale => 0,
			BreathingPhase::HoldAfterInhale => 1,
			BreathingPhase::Exhale => 2,
			BreathingPhase::HoldAfterExhale => 3,
		}
	}

	pub fn next(&self) -> BreathingPhase {
		Self::ALL[(self.index() + 1) % Self::ALL.len()]
	}

	/// Configured length in whole seconds
	pub fn duration_secs(&self) -> u32 {
		match self {
			BreathingPhase::Inhale => 4,
			BreathingPhase::HoldAfterInhale => 4,
			BreathingPhase::Exhale => 6,
			BreathingPhase::HoldAfterExhale => 2,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			BreathingPhase::Inhale => "Inhale",
			BreathingPhase::HoldAfterInhale | BreathingPhase::HoldAfterExhale => "Hold",
			BreathingPhase::Exhale => "Exhale",
		}
	}

	pub fn instruction(&self) -> &'static str {
		match self {
			BreathingPhase::Inhale => "Breathe in slowly through your nose",
			BreathingPhase::HoldAfterInhale => "Hold your breath gently",
			BreathingPhase::Exhale => "Exhale slowly through your mouth",
			BreathingPhase::HoldAfterExhale => "Rest before the next breath",
		}
	}

	/// Circle scale the phase animates towards
	pub fn target_scale(&self) -> f32 {
		match self {
			BreathingPhase::Inhale | BreathingPhase::HoldAfterInhale => 1.2,
			BreathingPhase::Exhale | BreathingPhase::HoldAfterExhale => 0.8,
		}
	}

	pub fn easing(&self) -> PhaseEasing {
		match self {
			BreathingPhase::Inhale | BreathingPhase::Exhale => PhaseEasing::EaseInOut,
			_ => PhaseEasing::Linear,
		}
	}

	/// True for the phase whose completion closes a cycle
	pub fn is_last(&self) -> bool {
		self.index() == Self::ALL.len() - 1
	}
}

/// Kind of playable element a playlist item needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
	Audio,
	Video,
}

impl MediaKind {
	pub fn icon(&self) -> &'static str {
		match self {
			MediaKind::Audio => "🎵",
			MediaKind::Video => "🎥",
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			MediaKind::Audio => "audio",
			MediaKind::Video => "video",
		}
	}
}

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
	Next,
	Prev,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_phase_order_is_cyclic() {
		let mut phase = BreathingPhase::Inhale;
		let mut seen = Vec::new();
		for _ in 0..5 {
			seen.push(phase);
			phase = phase.next();
		}
		assert_eq!(
			seen,
			vec![
				BreathingPhase::Inhale,
				BreathingPhase::HoldAfterInhale,
				BreathingPhase::Exhale,
				BreathingPhase::HoldAfterExhale,
				BreathingPhase::Inhale,
			]
		);
	}

	#[test]
	fn test_cycle_is_sixteen_seconds() {
		let total: u32 = BreathingPhase::ALL.iter().map(|p| p.duration_secs()).sum();
		assert_eq!(total, 16);
		assert!(BreathingPhase::HoldAfterExhale.is_last());
		assert!(!BreathingPhase::Exhale.is_last());
	}

	#[test]
	fn test_media_kind_from_toml() {
		#[derive(Deserialize)]
		struct Wrapper {
			kind: MediaKind,
		}
		let w: Wrapper = toml::from_str("kind = \"video\"").unwrap();
		assert_eq!(w.kind, MediaKind::Video);
	}
}
