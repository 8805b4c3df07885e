use crate::breathing::BreathingTimer;
use crate::player::{MediaPlayer, format_time};
use crate::reactor::{BreathingEvent, ComponentResponse, Event, PlayerEvent, SettingsEvent, ViewEvent};
use crate::settings::SettingsManager;
use crate::types::{BreathingPhase, MediaKind, NavDirection, PhaseEasing};
use eframe::egui::{self, ScrollArea};
use std::time::Instant;

pub mod text_utils;

const EMERALD_300: egui::Color32 = egui::Color32::from_rgb(110, 231, 183);
const EMERALD_400: egui::Color32 = egui::Color32::from_rgb(52, 211, 153);
const EMERALD_500: egui::Color32 = egui::Color32::from_rgb(16, 185, 129);
const EMERALD_600: egui::Color32 = egui::Color32::from_rgb(5, 150, 105);
const SLATE_700: egui::Color32 = egui::Color32::from_rgb(51, 65, 85);
const SLATE_800: egui::Color32 = egui::Color32::from_rgb(30, 41, 59);

/// Breathing circle base radius and ring radius, in points
const CIRCLE_RADIUS: f32 = 64.0;
const RING_RADIUS: f32 = 128.0;

fn phase_color(phase: BreathingPhase) -> egui::Color32 {
	match phase {
		BreathingPhase::Inhale => EMERALD_400,
		BreathingPhase::HoldAfterInhale | BreathingPhase::HoldAfterExhale => EMERALD_500,
		BreathingPhase::Exhale => EMERALD_600,
	}
}

/// Eased interpolation factor for `t` in [0, 1]
pub fn ease(t: f32, easing: PhaseEasing) -> f32 {
	let t = t.clamp(0.0, 1.0);
	match easing {
		PhaseEasing::Linear => t,
		PhaseEasing::EaseInOut => t * t * (3.0 - 2.0 * t),
	}
}

/// Circle scale tween, restarted whenever the target changes
struct CircleTween {
	from: f32,
	to: f32,
	started: Instant,
	secs: f32,
	easing: PhaseEasing,
}

impl CircleTween {
	fn new() -> Self {
		Self {
			from: 1.0,
			to: 1.0,
			started: Instant::now(),
			secs: 0.0,
			easing: PhaseEasing::Linear,
		}
	}

	fn value_at(&self, now: Instant) -> f32 {
		if self.secs <= 0.0 {
			return self.to;
		}
		let t = now.saturating_duration_since(self.started).as_secs_f32() / self.secs;
		self.from + (self.to - self.from) * ease(t, self.easing)
	}

	fn retarget(&mut self, to: f32, secs: f32, easing: PhaseEasing, now: Instant) {
		if (to - self.to).abs() < f32::EPSILON {
			return;
		}
		self.from = self.value_at(now);
		self.to = to;
		self.secs = secs;
		self.easing = easing;
		self.started = now;
	}

	fn is_running(&self, now: Instant) -> bool {
		now.saturating_duration_since(self.started).as_secs_f32() < self.secs
	}
}

pub struct ViewManager {
	error_msg: Option<String>,
	circle: CircleTween,
}

impl ViewManager {
	pub fn new() -> Self {
		Self {
			error_msg: None,
			circle: CircleTween::new(),
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::View(ViewEvent::ShowError { message }) => {
				self.error_msg = Some(message.clone());
				ComponentResponse::none()
			}
			Event::View(ViewEvent::ClearError) => {
				self.error_msg = None;
				ComponentResponse::none()
			}
			_ => ComponentResponse::none(),
		}
	}

	pub fn error_message(&self) -> Option<&str> {
		self.error_msg.as_deref()
	}

	/// Main render function of the whole thing
	pub fn render(
		&mut self,
		ctx: &egui::Context,
		breathing: &BreathingTimer,
		player: &MediaPlayer,
		settings: &SettingsManager,
	) -> Vec<Event> {
		let mut events = Vec::new();

		let is_typing = ctx.memory(|m| m.focused().is_some());
		if !is_typing {
			self.handle_keyboard_input(ctx, settings, &mut events);
		}

		self.render_top_panel(ctx, settings, &mut events);

		egui::CentralPanel::default()
			.frame(egui::Frame::default().fill(egui::Color32::from_rgb(15, 23, 42)).inner_margin(16.0))
			.show(ctx, |ui| {
				self.render_error_banner(ui);

				match (settings.show_breathing(), settings.show_player()) {
					(true, true) => {
						ui.columns(2, |columns| {
							self.render_breathing_panel(&mut columns[0], ctx, breathing, &mut events);
							Self::render_player_panel(&mut columns[1], player, &mut events);
						});
					}
					(true, false) => self.render_breathing_panel(ui, ctx, breathing, &mut events),
					(false, true) => Self::render_player_panel(ui, player, &mut events),
					(false, false) => {
						ui.centered_and_justified(|ui| {
							ui.label("Enable a panel above to start.");
						});
					}
				}
			});

		events
	}

	fn handle_keyboard_input(
		&mut self,
		ctx: &egui::Context,
		settings: &SettingsManager,
		events: &mut Vec<Event>,
	) {
		let (space, b, r, left, right) = ctx.input(|i| {
			(
				i.key_pressed(egui::Key::Space),
				i.key_pressed(egui::Key::B),
				i.key_pressed(egui::Key::R),
				i.key_pressed(egui::Key::ArrowLeft),
				i.key_pressed(egui::Key::ArrowRight),
			)
		});

		if settings.show_breathing() {
			if b {
				events.push(Event::Breathing(BreathingEvent::Toggle));
			}
			if r {
				events.push(Event::Breathing(BreathingEvent::Reset));
			}
		}

		if settings.show_player() {
			if space {
				events.push(Event::Player(PlayerEvent::TogglePlay));
			}
			if left {
				events.push(Event::Player(PlayerEvent::Navigate {
					direction: NavDirection::Prev,
				}));
			}
			if right {
				events.push(Event::Player(PlayerEvent::Navigate {
					direction: NavDirection::Next,
				}));
			}
		}
	}

	fn render_top_panel(
		&mut self,
		ctx: &egui::Context,
		settings: &SettingsManager,
		events: &mut Vec<Event>,
	) {
		egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
			ui.horizontal(|ui| {
				ui.label("Panels:");

				let mut show_breathing = settings.show_breathing();
				if ui.checkbox(&mut show_breathing, "Breathing").changed() {
					events.push(Event::Settings(SettingsEvent::ToggleBreathingPanel));
				}

				let mut show_player = settings.show_player();
				if ui.checkbox(&mut show_player, "Meditation").changed() {
					events.push(Event::Settings(SettingsEvent::TogglePlayerPanel));
				}

				ui.separator();
				ui.label(
					egui::RichText::new("B start/pause · R reset · Space play · ←/→ tracks")
						.color(egui::Color32::GRAY)
						.size(11.0),
				);
			});
		});
	}

	fn render_error_banner(&mut self, ui: &mut egui::Ui) {
		let Some(err) = self.error_message().map(str::to_owned) else {
			return;
		};
		let mut dismissed = false;
		ui.horizontal(|ui| {
			ui.label(egui::RichText::new(err.as_str()).color(egui::Color32::RED));
			if ui.small_button("Dismiss").clicked() {
				dismissed = true;
			}
		});
		if dismissed {
			self.error_msg = None;
		}
		ui.add_space(8.0);
	}

	fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
		egui::Frame::none()
			.fill(SLATE_800)
			.stroke(egui::Stroke::new(1.0, SLATE_700))
			.rounding(16.0)
			.inner_margin(24.0)
			.show(ui, add_contents)
			.inner
	}

	fn render_breathing_panel(
		&mut self,
		ui: &mut egui::Ui,
		ctx: &egui::Context,
		breathing: &BreathingTimer,
		events: &mut Vec<Event>,
	) {
		let session = breathing.session();
		let now = Instant::now();

		let (target, secs, easing) = if session.active() {
			(
				session.phase().target_scale(),
				session.phase().duration_secs() as f32,
				session.phase().easing(),
			)
		} else {
			(1.0, 0.5, PhaseEasing::EaseInOut)
		};
		self.circle.retarget(target, secs, easing, now);
		let scale = self.circle.value_at(now);
		if self.circle.is_running(now) {
			ctx.request_repaint();
		}

		Self::card(ui, |ui| {
			ui.heading(egui::RichText::new("Breathing Exercise").color(egui::Color32::WHITE));
			ui.label("Follow the circle and find your rhythm");
			ui.add_space(16.0);

			ui.vertical_centered(|ui| {
				let size = egui::vec2(RING_RADIUS * 2.0, RING_RADIUS * 2.0);
				let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
				let painter = ui.painter_at(rect);
				let center = rect.center();

				painter.circle_filled(center, CIRCLE_RADIUS * scale, phase_color(session.phase()));
				painter.circle_stroke(
					center,
					RING_RADIUS - 1.0,
					egui::Stroke::new(2.0, EMERALD_400.gamma_multiply(0.2)),
				);
				painter.text(
					center - egui::vec2(0.0, 10.0),
					egui::Align2::CENTER_CENTER,
					session.remaining().to_string(),
					egui::FontId::proportional(24.0),
					egui::Color32::WHITE,
				);
				painter.text(
					center + egui::vec2(0.0, 14.0),
					egui::Align2::CENTER_CENTER,
					session.phase().label(),
					egui::FontId::proportional(14.0),
					egui::Color32::WHITE.gamma_multiply(0.9),
				);

				ui.add_space(16.0);
				ui.label(
					egui::RichText::new(format!(
						"{} ({}s)",
						session.phase().label(),
						session.phase().duration_secs()
					))
					.color(egui::Color32::WHITE)
					.size(18.0),
				);
				ui.label(session.phase().instruction());
				ui.add_space(16.0);

				ui.horizontal(|ui| {
					if ui.button("⟲").on_hover_text("Reset").clicked() {
						events.push(Event::Breathing(BreathingEvent::Reset));
					}
					let label = if breathing.is_active() { "⏸" } else { "▶" };
					let toggle = egui::Button::new(egui::RichText::new(label).size(20.0))
						.fill(EMERALD_500)
						.rounding(24.0);
					if ui.add(toggle).clicked() {
						events.push(Event::Breathing(BreathingEvent::Toggle));
					}
					ui.label(format!("Cycle {}", session.cycles()));
				});
				ui.add_space(16.0);

				Self::render_pattern_grid(ui, session.phase());
			});
		});
	}

	fn render_pattern_grid(ui: &mut egui::Ui, current: BreathingPhase) {
		let pattern = BreathingPhase::ALL
			.iter()
			.map(|p| p.duration_secs().to_string())
			.collect::<Vec<_>>()
			.join("-");
		text_utils::render_rich_text(ui, &format!("*{}* Breathing Pattern", pattern), 14.0, EMERALD_300);
		ui.add_space(8.0);

		ui.columns(BreathingPhase::ALL.len(), |columns| {
			for (column, phase) in columns.iter_mut().zip(BreathingPhase::ALL) {
				let active = phase == current;
				let (fill, text) = if active {
					(EMERALD_500.gamma_multiply(0.2), EMERALD_300)
				} else {
					(SLATE_700.gamma_multiply(0.5), egui::Color32::LIGHT_GRAY)
				};
				egui::Frame::none()
					.fill(fill)
					.rounding(8.0)
					.inner_margin(8.0)
					.show(column, |ui| {
						ui.vertical_centered(|ui| {
							ui.label(egui::RichText::new(phase.label()).color(text).strong());
							ui.label(egui::RichText::new(format!("{}s", phase.duration_secs())).color(text));
						});
					});
			}
		});
	}

	fn render_player_panel(ui: &mut egui::Ui, player: &MediaPlayer, events: &mut Vec<Event>) {
		let session = player.session();
		let item = player.current_item();

		Self::card(ui, |ui| {
			ui.heading(egui::RichText::new("Meditation Sessions").color(egui::Color32::WHITE));
			ui.label("Find your center with our curated meditation library");
			ui.add_space(16.0);

			egui::Frame::none()
				.fill(SLATE_700.gamma_multiply(0.5))
				.rounding(12.0)
				.inner_margin(16.0)
				.show(ui, |ui| {
					ui.label(egui::RichText::new(&item.title).color(egui::Color32::WHITE).size(18.0).strong());
					if let Some(err) = player.last_error() {
						ui.label(egui::RichText::new(format!("⚠ {}", err)).color(egui::Color32::RED).size(11.0));
					}
					match item.kind {
						MediaKind::Audio => {
							ui.label(format!("{} {} • {}", item.kind.icon(), item.kind.as_str(), item.duration));
						}
						MediaKind::Video => {
							let width = ui.available_width();
							let (rect, _) = ui.allocate_exact_size(
								egui::vec2(width, width * 9.0 / 16.0),
								egui::Sense::hover(),
							);
							ui.painter().rect_filled(rect, 8.0, egui::Color32::BLACK);
							ui.painter().text(
								rect.center(),
								egui::Align2::CENTER_CENTER,
								item.kind.icon(),
								egui::FontId::proportional(32.0),
								egui::Color32::WHITE.gamma_multiply(0.6),
							);
						}
					}
				});
			ui.add_space(16.0);

			ui.vertical_centered(|ui| {
				ui.horizontal(|ui| {
					if ui.button("⏮").clicked() {
						events.push(Event::Player(PlayerEvent::Navigate {
							direction: NavDirection::Prev,
						}));
					}
					let label = if session.playing { "⏸" } else { "▶" };
					let toggle = egui::Button::new(egui::RichText::new(label).size(20.0))
						.fill(EMERALD_500)
						.rounding(24.0);
					if ui.add(toggle).clicked() {
						events.push(Event::Player(PlayerEvent::TogglePlay));
					}
					if ui.button("⏭").clicked() {
						events.push(Event::Player(PlayerEvent::Navigate {
							direction: NavDirection::Next,
						}));
					}
				});
			});
			ui.add_space(16.0);

			ui.add(
				egui::ProgressBar::new(session.progress() as f32)
					.fill(EMERALD_400)
					.desired_height(8.0),
			);
			ui.horizontal(|ui| {
				ui.label(format_time(session.elapsed));
				ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
					ui.label(format_time(session.duration));
				});
			});
			ui.add_space(16.0);

			ui.label(egui::RichText::new("Playlist").color(egui::Color32::WHITE).strong());
			ui.separator();
			ScrollArea::vertical().max_height(256.0).show(ui, |ui| {
				for (index, entry) in player.playlist().items().iter().enumerate() {
					let is_current = index == session.current;
					let fill = if is_current {
						egui::Color32::from_rgb(6, 95, 70)
					} else {
						egui::Color32::from_rgb(55, 65, 81)
					};
					let response = egui::Frame::none()
						.fill(fill)
						.rounding(8.0)
						.inner_margin(12.0)
						.show(ui, |ui| {
							ui.set_min_width(ui.available_width());
							ui.horizontal(|ui| {
								ui.vertical(|ui| {
									ui.label(egui::RichText::new(&entry.title).color(egui::Color32::WHITE).strong());
									ui.label(format!("{} {}", entry.kind.icon(), entry.duration));
								});
								if is_current && session.playing {
									ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
										ui.label(egui::RichText::new("●").color(EMERALD_500));
									});
								}
							});
						})
						.response
						.interact(egui::Sense::click());
					if response.clicked() {
						events.push(Event::Player(PlayerEvent::SelectTrack { index }));
					}
					ui.add_space(8.0);
				}
			});
		});
	}
}

impl Default for ViewManager {
	fn default() -> Self {
		Self::new()
	}
}
