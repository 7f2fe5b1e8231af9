use indexmap::IndexMap;

use crate::config::AUTHOR_COLUMN_MARKER;
use crate::error::SourceError;

use super::model::{Cell, Grid};
use super::normalize::{normalize, Delimiters};

// ---------------------------------------------------------------------------
// Tabular source adapter
// ---------------------------------------------------------------------------

/// Index of the first header cell whose text contains the author marker.
pub fn author_column(header: &[Cell]) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell.to_string().contains(AUTHOR_COLUMN_MARKER))
}

/// Collect author keys from a decoded grid.
///
/// The first row is the header. Every following row contributes the
/// normalised names found in the author column, split on `;` and `,`;
/// short rows and blank cells contribute nothing.
pub fn extract_authors(grid: &Grid) -> Result<Vec<String>, SourceError> {
    authors_in_column(grid, Delimiters::SemicolonOrComma)
}

fn authors_in_column(grid: &Grid, delimiters: Delimiters) -> Result<Vec<String>, SourceError> {
    let (header, rows) = grid.split_first().ok_or(SourceError::EmptySource)?;

    let column = author_column(header).ok_or(SourceError::ColumnNotFound {
        marker: AUTHOR_COLUMN_MARKER,
    })?;

    let authors = rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|cell| !cell.is_blank())
        .flat_map(|cell| normalize(&cell.to_string(), delimiters))
        .collect();

    Ok(authors)
}

/// Per-file author counts, shown when a file is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    /// Data rows below the header.
    pub rows: usize,
    /// Author occurrences, in first-seen order.
    pub counts: IndexMap<String, u64>,
}

impl FilePreview {
    pub fn occurrences(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Quick look at a picked file. Author lines are split on `;` only.
pub fn preview(grid: &Grid) -> Result<FilePreview, SourceError> {
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for author in authors_in_column(grid, Delimiters::Semicolon)? {
        *counts.entry(author).or_default() += 1;
    }
    Ok(FilePreview {
        rows: grid.len().saturating_sub(1),
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn empty_grid_is_reported_before_column_lookup() {
        assert_eq!(extract_authors(&Vec::new()), Err(SourceError::EmptySource));
    }

    #[test]
    fn missing_author_header_is_column_not_found() {
        let grid = vec![row(&["Title", "Year"]), row(&["T1", "2020"])];
        assert_eq!(
            extract_authors(&grid),
            Err(SourceError::ColumnNotFound { marker: "Authors" })
        );

        // Case-sensitive.
        let grid = vec![row(&["Title", "authors"])];
        assert!(matches!(
            extract_authors(&grid),
            Err(SourceError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn substring_match_picks_first_column() {
        let header = row(&["Title", "CoAuthors", "Authors"]);
        assert_eq!(author_column(&header), Some(1));
    }

    #[test]
    fn header_only_grid_yields_nothing() {
        let grid = vec![row(&["Authors"])];
        assert_eq!(extract_authors(&grid), Ok(Vec::new()));
    }

    #[test]
    fn rows_are_split_and_normalised() {
        let grid = vec![
            row(&["Title", "Authors"]),
            row(&["T1", "Alice; Bob (X)"]),
            row(&["T2"]),
            vec![Cell::from("T3"), Cell::Empty],
            row(&["T4", "Carol, Dan (1,2)"]),
        ];
        assert_eq!(
            extract_authors(&grid).unwrap(),
            vec!["Alice", "Bob", "Carol", "Dan", "2)"]
        );
    }

    #[test]
    fn non_text_cells_are_read_as_text() {
        let grid = vec![
            vec![Cell::Integer(1), Cell::from("Authors")],
            vec![Cell::Empty, Cell::Integer(42)],
        ];
        assert_eq!(extract_authors(&grid).unwrap(), vec!["42"]);
    }

    #[test]
    fn preview_counts_repeated_authors() {
        let grid = vec![
            row(&["Authors"]),
            row(&["Alice; Bob"]),
            row(&["Alice"]),
        ];
        let summary = preview(&grid).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.occurrences(), 3);
        assert_eq!(
            summary.counts.into_iter().collect::<Vec<_>>(),
            vec![("Alice".to_string(), 2), ("Bob".to_string(), 1)]
        );
    }

    #[test]
    fn preview_splits_on_semicolons_only() {
        let grid = vec![row(&["Authors"]), row(&["Doe, Jane (1); Roe, Rick"])];
        let summary = preview(&grid).unwrap();
        assert_eq!(
            summary.counts.keys().collect::<Vec<_>>(),
            vec!["Doe, Jane", "Roe, Rick"]
        );
        assert_eq!(extract_authors(&grid).unwrap(), vec!["Doe", "Jane", "Roe", "Rick"]);
    }
}
