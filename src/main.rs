#![windows_subsystem = "windows"]

mod breathing;
mod media;
mod player;
mod reactor;
mod settings;
mod types;
mod view;

use reactor::Reactor;
use settings::Config;

#[tokio::main]
async fn main() -> eframe::Result<()> {
	// Config comes first so it can pick the log filter
	let (config, config_error) = match Config::load_or_default() {
		Ok(config) => (config, None),
		Err(e) => (Config::default(), Some(e)),
	};

	env_logger::Builder::from_env(
		env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
	)
	.init();

	if let Some(e) = config_error {
		log::warn!("Falling back to default config: {:#}", e);
	}

	let native_options = eframe::NativeOptions {
		viewport: eframe::egui::ViewportBuilder::default()
			.with_inner_size([config.window.width, config.window.height])
			.with_title("Stillpoint"),
		..Default::default()
	};

	eframe::run_native(
		"Stillpoint",
		native_options,
		Box::new(move |cc| Ok(Box::new(Reactor::new(&cc.egui_ctx, &config)))),
	)
}
