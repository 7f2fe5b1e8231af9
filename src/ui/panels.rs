use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{OUTPUT_FILE_NAME, TABULAR_EXTENSIONS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – input rows
// ---------------------------------------------------------------------------

/// Render the input form: one frame per row, then "Add row".
pub fn input_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Inputs");
    ui.separator();

    let running = state.is_running();

    // Row edits that change the row list are applied after the loop.
    let mut remove = None;
    let mut pick = None;
    let mut clear = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.add_enabled_ui(!running, |ui: &mut Ui| {
                for row in &mut state.rows {
                    ui.push_id(row.id, |ui: &mut Ui| {
                        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                            ui.horizontal(|ui: &mut Ui| {
                                ui.add(
                                    egui::TextEdit::singleline(&mut row.remark)
                                        .hint_text("Remark")
                                        .desired_width(ui.available_width() - 30.0),
                                );
                                if ui.small_button("−").on_hover_text("Remove row").clicked() {
                                    remove = Some(row.id);
                                }
                            });

                            // URLs are read-only while a file is attached.
                            ui.add_enabled(
                                row.file.is_none(),
                                egui::TextEdit::multiline(&mut row.urls)
                                    .hint_text("Search URLs, one per line")
                                    .desired_rows(2)
                                    .desired_width(f32::INFINITY),
                            );

                            ui.horizontal(|ui: &mut Ui| {
                                if ui.button("File…").clicked() {
                                    pick = Some(row.id);
                                }
                                if let Some(path) = &row.file {
                                    let name = path
                                        .file_name()
                                        .map(|n| n.to_string_lossy().into_owned())
                                        .unwrap_or_else(|| path.display().to_string());
                                    ui.label(name).on_hover_text(path.display().to_string());
                                    if ui.small_button("✕").on_hover_text("Remove file").clicked() {
                                        clear = Some(row.id);
                                    }
                                }
                            });

                            if let Some(note) = &row.file_note {
                                ui.label(RichText::new(note).small().weak());
                            }
                        });
                    });
                    ui.add_space(4.0);
                }

                if ui.button("+ Add row").clicked() {
                    state.add_row();
                }
            });
        });

    if let Some(id) = remove {
        state.remove_row(id);
    }
    if let Some(id) = clear {
        state.clear_row_file(id);
    }
    if let Some(id) = pick {
        open_file_dialog(state, id);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui
            .add_enabled(!state.is_running(), egui::Button::new("Process"))
            .clicked()
        {
            state.start_run();
        }

        if state.is_running() {
            ui.spinner();
            if let Some(line) = &state.progress {
                ui.label(line);
            }
        } else if let Some(outcome) = &state.outcome {
            ui.label(format!(
                "{} authors, {} remarks, {} issues",
                outcome.matrix.len(),
                outcome.labels.len(),
                outcome.issues.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, row_id: u64) {
    let file = rfd::FileDialog::new()
        .set_title("Open publication list")
        .add_filter("Supported files", TABULAR_EXTENSIONS)
        .add_filter("Excel / ODS", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.set_row_file(row_id, path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title(format!("Folder to save {OUTPUT_FILE_NAME} in"))
        .pick_folder();

    if let Some(dir) = dir {
        state.export_to(&dir);
    }
}
