use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::data::aggregate::{run_groups, LiveSources, RunOutcome, RunStep, SourceProvider};
use crate::data::export::{self, ExportTable};
use crate::data::model::InputGroup;
use crate::data::{loader, tabular};

// ---------------------------------------------------------------------------
// Form rows
// ---------------------------------------------------------------------------

/// One row of the input form.
#[derive(Debug, Clone, Default)]
pub struct InputRow {
    /// Stable id for egui widget ids; survives removal of other rows.
    pub id: u64,
    pub remark: String,
    /// One URL per line.
    pub urls: String,
    pub file: Option<PathBuf>,
    /// Result of decoding the picked file, shown under the row.
    pub file_note: Option<String>,
}

impl InputRow {
    pub fn to_group(&self) -> InputGroup {
        InputGroup::from_form(&self.remark, &self.urls, self.file.clone())
    }
}

/// Messages from the worker thread running an aggregation.
#[derive(Debug)]
pub enum RunMessage {
    Progress(String),
    Finished(RunOutcome),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Input form rows, in display (and processing) order.
    pub rows: Vec<InputRow>,
    next_row_id: u64,

    /// Channel of the aggregation currently running, if any.
    run: Option<Receiver<RunMessage>>,

    /// Latest progress line of the running aggregation.
    pub progress: Option<String>,

    /// Last finished run.
    pub outcome: Option<RunOutcome>,

    /// Export table built from `outcome` (None when there is nothing to export).
    pub table: Option<ExportTable>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = Self {
            rows: Vec::new(),
            next_row_id: 0,
            run: None,
            progress: None,
            outcome: None,
            table: None,
            status_message: None,
        };
        state.add_row();
        state
    }
}

impl AppState {
    pub fn add_row(&mut self) {
        self.rows.push(InputRow {
            id: self.next_row_id,
            ..Default::default()
        });
        self.next_row_id += 1;
    }

    pub fn remove_row(&mut self, id: u64) {
        self.rows.retain(|row| row.id != id);
    }

    /// Attach a file to a row and preview its author counts.
    pub fn set_row_file(&mut self, id: u64, path: PathBuf) {
        let note = match preview_file(&path) {
            Ok(note) => note,
            Err(e) => {
                log::error!("Failed to read {}: {e:#}", path.display());
                format!("Error: {e:#}")
            }
        };
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.file = Some(path);
            row.file_note = Some(note);
        }
    }

    pub fn clear_row_file(&mut self, id: u64) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.file = None;
            row.file_note = None;
        }
    }

    /// Form rows translated into input groups, in order.
    pub fn input_groups(&self) -> Vec<InputGroup> {
        self.rows.iter().map(InputRow::to_group).collect()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Start an aggregation over the current form using network and disk.
    pub fn start_run(&mut self) {
        self.start_run_with(LiveSources::default());
    }

    /// Start an aggregation on a worker thread. Groups are processed one by
    /// one there; the UI only polls the channel.
    pub fn start_run_with<S>(&mut self, sources: S)
    where
        S: SourceProvider + Send + 'static,
    {
        if self.is_running() {
            return;
        }
        let groups = self.input_groups();
        log::info!("Starting run over {} input rows", groups.len());

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let outcome = run_groups(&groups, &sources, |step| {
                let line = match step {
                    RunStep::Url { label, url } => format!("[{label}] fetching {url}"),
                    RunStep::File { label, path } => {
                        format!("[{label}] reading {}", path.display())
                    }
                };
                let _ = tx.send(RunMessage::Progress(line));
            });
            let _ = tx.send(RunMessage::Finished(outcome));
        });

        self.run = Some(rx);
        self.progress = None;
        self.outcome = None;
        self.table = None;
        self.status_message = None;
    }

    /// Drain messages from the running aggregation.
    pub fn poll_run(&mut self) {
        let Some(rx) = self.run.take() else {
            return;
        };

        loop {
            match rx.try_recv() {
                Ok(RunMessage::Progress(line)) => self.progress = Some(line),
                Ok(RunMessage::Finished(outcome)) => {
                    self.finish_run(outcome);
                    return;
                }
                Err(TryRecvError::Empty) => {
                    self.run = Some(rx);
                    return;
                }
                Err(TryRecvError::Disconnected) => {
                    log::error!("Aggregation worker stopped without a result");
                    self.status_message = Some("Error: processing stopped unexpectedly".into());
                    self.progress = None;
                    return;
                }
            }
        }
    }

    fn finish_run(&mut self, outcome: RunOutcome) {
        self.progress = None;
        match export::to_table(&outcome.labels, &outcome.matrix) {
            Ok(table) => {
                self.table = Some(table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.outcome = Some(outcome);
    }

    /// Save the current table into `dir`.
    pub fn export_to(&mut self, dir: &Path) {
        let Some(table) = &self.table else {
            self.status_message = Some("Error: nothing to export".into());
            return;
        };
        match export::write_to_dir(table, dir) {
            Ok(path) => {
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Decode a file and summarise its authors for display.
fn preview_file(path: &Path) -> anyhow::Result<String> {
    let grid = loader::load_grid(path)?;
    let summary = tabular::preview(&grid)?;
    log::info!(
        "{}: {} rows, author counts: {:?}",
        path.display(),
        summary.rows,
        summary.counts
    );
    Ok(format!(
        "{} rows, {} distinct authors, {} occurrences",
        summary.rows,
        summary.counts.len(),
        summary.occurrences()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::config::OUTPUT_FILE_NAME;
    use crate::data::aggregate::tests::{two_year_scenario, FakeSources};

    fn wait_for_run(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.is_running() {
            assert!(Instant::now() < deadline, "run did not finish");
            state.poll_run();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn rows_keep_stable_ids() {
        let mut state = AppState::default();
        state.add_row();
        state.add_row();
        let ids: Vec<u64> = state.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        state.remove_row(1);
        state.add_row();
        let ids: Vec<u64> = state.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn rows_become_groups_in_order() {
        let mut state = AppState::default();
        state.rows[0].remark = "b".into();
        state.rows[0].urls = "u1\n\nu2".into();
        state.add_row();

        let groups = state.input_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "b");
        assert_eq!(groups[0].urls, vec!["u1", "u2"]);
        assert_eq!(groups[1].label, "No Remark");
    }

    #[test]
    fn unreadable_file_is_noted_on_the_row() {
        let mut state = AppState::default();
        state.set_row_file(0, PathBuf::from("does-not-exist.csv"));
        let row = &state.rows[0];
        assert_eq!(row.file.as_deref(), Some(Path::new("does-not-exist.csv")));
        assert!(row.file_note.as_deref().unwrap().starts_with("Error:"));

        state.clear_row_file(0);
        assert!(state.rows[0].file.is_none());
        assert!(state.rows[0].file_note.is_none());
    }

    #[test]
    fn picked_csv_is_previewed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.csv");
        std::fs::write(&path, "Title,Authors\nT1,\"Alice; Bob\"\nT2,Alice\n").unwrap();

        let mut state = AppState::default();
        state.set_row_file(0, path);
        assert_eq!(
            state.rows[0].file_note.as_deref(),
            Some("2 rows, 2 distinct authors, 3 occurrences")
        );
    }

    #[test]
    fn finished_run_builds_table_and_exports() {
        let (groups, sources) = two_year_scenario();
        let mut state = AppState::default();
        state.rows.clear();
        for group in &groups {
            state.add_row();
            let row = state.rows.last_mut().unwrap();
            row.remark = group.label.clone();
            row.urls = group.urls.join("\n");
            row.file = group.file.clone();
        }

        state.start_run_with(sources);
        wait_for_run(&mut state);

        let table = state.table.as_ref().expect("table");
        assert_eq!(table.rows.len(), 3);
        assert!(state.status_message.is_none());

        let dir = tempfile::tempdir().unwrap();
        state.export_to(dir.path());
        assert!(dir.path().join(OUTPUT_FILE_NAME).exists());
        assert!(state.status_message.as_deref().unwrap().starts_with("Saved"));
    }

    #[test]
    fn empty_run_reports_nothing_to_export() {
        let mut state = AppState::default();
        state.start_run_with(FakeSources::default());
        wait_for_run(&mut state);

        assert!(state.table.is_none());
        assert_eq!(state.outcome.as_ref().unwrap().labels, vec!["No Remark"]);
        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .contains("no data to export"));

        let dir = tempfile::tempdir().unwrap();
        state.export_to(dir.path());
        assert!(!dir.path().join(OUTPUT_FILE_NAME).exists());
    }
}
