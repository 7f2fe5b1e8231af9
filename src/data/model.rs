use std::fmt;
use std::path::PathBuf;

use crate::config::DEFAULT_LABEL;

// ---------------------------------------------------------------------------
// Cell – one value of a decoded tabular grid
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the tabular readers.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date / time kept as text.
    Date(String),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::String(s) | Cell::Date(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Empty => Ok(()),
        }
    }
}

impl Cell {
    /// Blank cells carry no author line.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) | Cell::Date(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::String(s.to_string())
    }
}

/// Rows of cells, header first. Rows may have different lengths.
pub type Grid = Vec<Vec<Cell>>;

// ---------------------------------------------------------------------------
// InputGroup – one form row, read once per run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct InputGroup {
    /// Trimmed remark, or [`DEFAULT_LABEL`] when blank.
    pub label: String,
    /// Remote search URLs, in the order they were typed.
    pub urls: Vec<String>,
    /// Optional local tabular file.
    pub file: Option<PathBuf>,
}

impl InputGroup {
    /// Build a group from raw form values: `url_text` holds one URL per line.
    pub fn from_form(remark: &str, url_text: &str, file: Option<PathBuf>) -> Self {
        let label = match remark.trim() {
            "" => DEFAULT_LABEL.to_string(),
            trimmed => trimmed.to_string(),
        };
        let urls = url_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        InputGroup { label, urls, file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_remark_falls_back_to_default_label() {
        let group = InputGroup::from_form("   ", "", None);
        assert_eq!(group.label, DEFAULT_LABEL);
        assert!(group.urls.is_empty());
    }

    #[test]
    fn url_text_is_split_into_trimmed_lines() {
        let group = InputGroup::from_form(
            " 2023 ",
            "https://a.example/q\n\n  https://b.example/q  \r\n",
            None,
        );
        assert_eq!(group.label, "2023");
        assert_eq!(group.urls, vec!["https://a.example/q", "https://b.example/q"]);
    }

    #[test]
    fn blank_cells() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::from("").is_blank());
        assert!(!Cell::from(" ").is_blank());
        assert!(!Cell::Integer(0).is_blank());
        assert_eq!(Cell::Float(2023.0).to_string(), "2023");
    }
}
