#![windows_subsystem = "windows"]

mod api;
mod gateway;
mod media;
mod reactor;
mod store;
mod types;
mod view;
mod viewer;

use reactor::Reactor;

#[tokio::main]
async fn main() -> eframe::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let native_options = eframe::NativeOptions {
		viewport: eframe::egui::ViewportBuilder::default().with_inner_size([420.0, 760.0]),
		..Default::default()
	};

	eframe::run_native(
		"Storyreel",
		native_options,
		Box::new(|cc| Ok(Box::new(Reactor::new(&cc.egui_ctx)))),
	)
}
