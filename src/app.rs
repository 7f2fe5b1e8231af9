use std::time::Duration;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AuthorTallyApp {
    pub state: AppState,
}

impl eframe::App for AuthorTallyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_run();
        if self.state.is_running() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: input rows ----
        egui::SidePanel::left("input_panel")
            .default_width(340.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::input_panel(ui, &mut self.state);
            });

        // ---- Central panel: results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::results_panel(ui, &self.state);
        });
    }
}
