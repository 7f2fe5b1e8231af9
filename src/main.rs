mod app;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::AuthorTallyApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Author Tally",
        options,
        Box::new(|_cc| Ok(Box::new(AuthorTallyApp::default()))),
    )
}
