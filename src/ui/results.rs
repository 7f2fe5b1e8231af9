use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::ExportTable;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results (central panel)
// ---------------------------------------------------------------------------

/// Render the issues of the last run and the table that would be exported.
pub fn results_panel(ui: &mut Ui, state: &AppState) {
    if state.is_running() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.spinner();
        });
        return;
    }

    let Some(outcome) = &state.outcome else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Fill in the rows on the left, then press Process");
        });
        return;
    };

    if !outcome.issues.is_empty() {
        egui::CollapsingHeader::new(
            RichText::new(format!("{} sources had problems", outcome.issues.len()))
                .color(Color32::YELLOW),
        )
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for issue in &outcome.issues {
                ui.label(format!("{}: {}", issue.source, issue.message));
            }
        });
        ui.separator();
    }

    match &state.table {
        Some(table) => results_table(ui, table),
        None => {
            ui.label("No authors were found.");
        }
    }
}

fn results_table(ui: &mut Ui, table: &ExportTable) {
    // Author name, one column per remark, Total.
    let count_columns = table.column_count().saturating_sub(1);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .min_scrolled_height(0.0)
        .column(Column::initial(220.0).at_least(80.0).clip(true))
        .columns(Column::auto().at_least(50.0), count_columns)
        .header(22.0, |mut header| {
            for caption in &table.header {
                header.col(|ui: &mut Ui| {
                    ui.strong(caption);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.rows.len(), |mut row| {
                let cells = &table.rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
