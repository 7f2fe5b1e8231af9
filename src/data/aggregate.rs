use std::path::Path;

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value as JsonValue;

use crate::config::LOG_PREVIEW_ROWS;

use super::model::{Grid, InputGroup};
use super::{remote, tabular};

// ---------------------------------------------------------------------------
// Label index
// ---------------------------------------------------------------------------

/// Labels in first-seen order. Identical strings share one slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelIndex {
    slots: IndexSet<String>,
}

impl LabelIndex {
    /// Position of `label`, registering it if unseen.
    pub fn register(&mut self, label: &str) -> usize {
        self.slots.insert_full(label.to_string()).0
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Count matrix
// ---------------------------------------------------------------------------

/// Author → per-label counts, in first-seen author order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountMatrix {
    rows: IndexMap<String, Vec<u64>>,
}

impl CountMatrix {
    /// Add one occurrence of `author` under `label`.
    ///
    /// `label_count` is the current size of the label universe; the author's
    /// row is created or right-padded with zeros up to it first.
    pub fn record(&mut self, author: &str, label: usize, label_count: usize) {
        debug_assert!(label < label_count);
        let counts = self.rows.entry(author.to_string()).or_default();
        if counts.len() < label_count {
            counts.resize(label_count, 0);
        }
        counts[label] += 1;
    }

    /// Right-pad every row to `label_count`.
    pub fn pad_to(&mut self, label_count: usize) {
        for counts in self.rows.values_mut() {
            if counts.len() < label_count {
                counts.resize(label_count, 0);
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, author: &str) -> Option<&[u64]> {
        self.rows.get(author).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.rows.iter().map(|(a, c)| (a.as_str(), c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Source access
// ---------------------------------------------------------------------------

/// Where a run gets its inputs from. Every call blocks until done.
pub trait SourceProvider {
    fn fetch_json(&self, url: &str) -> Result<JsonValue>;
    fn read_grid(&self, path: &Path) -> Result<Grid>;
}

/// Network + filesystem sources.
pub struct LiveSources {
    agent: ureq::Agent,
}

impl Default for LiveSources {
    fn default() -> Self {
        Self {
            agent: remote::agent(),
        }
    }
}

impl SourceProvider for LiveSources {
    fn fetch_json(&self, url: &str) -> Result<JsonValue> {
        remote::fetch_json(&self.agent, url)
    }

    fn read_grid(&self, path: &Path) -> Result<Grid> {
        super::loader::load_grid(path)
    }
}

// ---------------------------------------------------------------------------
// Aggregation run
// ---------------------------------------------------------------------------

/// A recoverable problem met during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIssue {
    /// URL or file path the issue belongs to.
    pub source: String,
    pub message: String,
}

/// Progress notifications emitted between sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStep<'a> {
    Url { label: &'a str, url: &'a str },
    File { label: &'a str, path: &'a Path },
}

/// Finished run: labels, matrix (padded to the label count) and issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub labels: Vec<String>,
    pub matrix: CountMatrix,
    pub issues: Vec<RunIssue>,
}

/// State of one aggregation run. Owns the label index and matrix; groups
/// are fed strictly one after another.
#[derive(Debug, Default)]
pub struct AggregationRun {
    labels: LabelIndex,
    matrix: CountMatrix,
    issues: Vec<RunIssue>,
}

impl AggregationRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a label and return its slot.
    pub fn register_label(&mut self, label: &str) -> usize {
        self.labels.register(label)
    }

    /// Add one occurrence of `author` under label slot `label`.
    pub fn record(&mut self, author: &str, label: usize) {
        self.matrix.record(author, label, self.labels.len());
    }

    /// Process one group: its URLs in order, then its file.
    pub fn process_group<S, F>(&mut self, group: &InputGroup, sources: &S, progress: &mut F)
    where
        S: SourceProvider + ?Sized,
        F: FnMut(RunStep<'_>),
    {
        let label = self.register_label(&group.label);
        log::info!(
            "Processing group: label={}, file={}, urls={}",
            group.label,
            group
                .file
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".into()),
            group.urls.len()
        );

        for url in &group.urls {
            progress(RunStep::Url {
                label: &group.label,
                url,
            });
            self.process_url(url, label, sources);
        }

        if let Some(path) = &group.file {
            progress(RunStep::File {
                label: &group.label,
                path,
            });
            self.process_file(path, label, sources);
        }
    }

    fn process_url<S: SourceProvider + ?Sized>(&mut self, url: &str, label: usize, sources: &S) {
        let extracted = sources
            .fetch_json(url)
            .and_then(|body| remote::extract_authors(body).map_err(anyhow::Error::from));

        match extracted {
            Ok(found) => {
                log::info!("{url}: {} authors", found.names.len());
                if found.skipped > 0 {
                    log::warn!("{url}: {} invalid author entries skipped", found.skipped);
                    self.issue(url, format!("{} invalid author entries skipped", found.skipped));
                }
                for name in &found.names {
                    self.record(name, label);
                }
            }
            Err(e) => {
                log::error!("Cannot process URL {url}: {e:#}");
                self.issue(url, format!("{e:#}"));
            }
        }
    }

    fn process_file<S: SourceProvider + ?Sized>(&mut self, path: &Path, label: usize, sources: &S) {
        let extracted = sources
            .read_grid(path)
            .and_then(|grid| tabular::extract_authors(&grid).map_err(anyhow::Error::from));

        match extracted {
            Ok(authors) => {
                log::info!("{}: {} authors", path.display(), authors.len());
                log::debug!(
                    "First authors: {:?}",
                    &authors[..authors.len().min(LOG_PREVIEW_ROWS)]
                );
                for name in &authors {
                    self.record(name, label);
                }
            }
            Err(e) => {
                log::error!("Cannot process file {}: {e:#}", path.display());
                self.issue(&path.display().to_string(), format!("{e:#}"));
            }
        }
    }

    fn issue(&mut self, source: &str, message: String) {
        self.issues.push(RunIssue {
            source: source.to_string(),
            message,
        });
    }

    /// Pad every author row to the final label count and hand out the result.
    pub fn finish(mut self) -> RunOutcome {
        self.matrix.pad_to(self.labels.len());
        log::info!(
            "Run finished: {} labels, {} authors, {} issues",
            self.labels.len(),
            self.matrix.len(),
            self.issues.len()
        );
        RunOutcome {
            labels: self.labels.labels().map(str::to_string).collect(),
            matrix: self.matrix,
            issues: self.issues,
        }
    }
}

/// Run every group in order against `sources`.
pub fn run_groups<S, F>(groups: &[InputGroup], sources: &S, mut progress: F) -> RunOutcome
where
    S: SourceProvider + ?Sized,
    F: FnMut(RunStep<'_>),
{
    let mut run = AggregationRun::new();
    for group in groups {
        run.process_group(group, sources, &mut progress);
    }
    run.finish()
}
