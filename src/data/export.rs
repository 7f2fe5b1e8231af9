use std::io;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::config::{AUTHOR_HEADER, LOG_PREVIEW_ROWS, OUTPUT_FILE_NAME, TOTAL_HEADER};
use crate::error::ExportError;

use super::aggregate::CountMatrix;

// ---------------------------------------------------------------------------
// Export table
// ---------------------------------------------------------------------------

/// Flattened result: `Author Name, <labels…>, Total` followed by one row per
/// author. The Total column is left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Build the export table. Fails when no author was recorded at all.
pub fn to_table(labels: &[String], matrix: &CountMatrix) -> Result<ExportTable, ExportError> {
    if matrix.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let header = std::iter::once(AUTHOR_HEADER.to_string())
        .chain(labels.iter().cloned())
        .chain(std::iter::once(TOTAL_HEADER.to_string()))
        .collect();

    let rows: Vec<Vec<String>> = matrix
        .iter()
        .map(|(author, counts)| {
            let mut row = Vec::with_capacity(labels.len() + 2);
            row.push(author.to_string());
            row.extend(
                (0..labels.len()).map(|i| counts.get(i).copied().unwrap_or(0).to_string()),
            );
            row.push(String::new());
            row
        })
        .collect();

    log::debug!(
        "Export rows (first {LOG_PREVIEW_ROWS}): {:?}",
        &rows[..rows.len().min(LOG_PREVIEW_ROWS)]
    );

    Ok(ExportTable { header, rows })
}

/// Render the table as CSV: every field double-quoted, rows separated by
/// `\n`, no trailing newline.
pub fn serialize(table: &ExportTable) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut text =
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Write the serialized table as [`OUTPUT_FILE_NAME`] inside `dir`.
pub fn write_to_dir(table: &ExportTable, dir: &Path) -> Result<PathBuf, ExportError> {
    let text = serialize(table)?;
    let path = dir.join(OUTPUT_FILE_NAME);
    std::fs::write(&path, text)?;
    log::info!("Exported {} authors to {}", table.rows.len(), path.display());
    Ok(path)
}
