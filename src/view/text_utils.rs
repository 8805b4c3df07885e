use eframe::egui;

/// Splits `*emphasised*` runs out of plain text.
///
/// An unterminated `*` emphasises the rest of the string.
pub fn split_emphasis(text: &str) -> Vec<(String, bool)> {
	let mut runs = Vec::new();
	let mut in_bold = false;
	let mut current = String::new();

	for ch in text.chars() {
		if ch == '*' {
			if !current.is_empty() {
				runs.push((std::mem::take(&mut current), in_bold));
			}
			in_bold = !in_bold;
		} else {
			current.push(ch);
		}
	}
	if !current.is_empty() {
		runs.push((current, in_bold));
	}
	runs
}

/// Renders text with simple formatting.
///
/// Supports:
/// - `*text*` in the accent colour
/// - standard text as light gray
pub fn render_rich_text(ui: &mut egui::Ui, text: &str, size: f32, accent: egui::Color32) {
	let mut job = egui::text::LayoutJob::default();
	job.wrap = egui::text::TextWrapping {
		max_width: ui.available_width(),
		..Default::default()
	};
	job.halign = egui::Align::Center;

	for (run, emphasised) in split_emphasis(text) {
		let format = egui::TextFormat {
			font_id: egui::FontId::proportional(size),
			color: if emphasised {
				accent
			} else {
				egui::Color32::LIGHT_GRAY
			},
			..Default::default()
		};
		job.append(&run, 0.0, format);
	}

	ui.label(job);
}
