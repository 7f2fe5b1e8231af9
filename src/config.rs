use std::time::Duration;

// ---------------------------------------------------------------------------
// Fixed settings
// ---------------------------------------------------------------------------

/// Label used for rows whose remark is left blank.
pub const DEFAULT_LABEL: &str = "No Remark";

/// Substring identifying the author column in a tabular header row.
pub const AUTHOR_COLUMN_MARKER: &str = "Authors";

/// File name the exported document is saved under.
pub const OUTPUT_FILE_NAME: &str = "author_statistics.csv";

/// First header cell of the exported table.
pub const AUTHOR_HEADER: &str = "Author Name";

/// Last header cell of the exported table (its column is left empty).
pub const TOTAL_HEADER: &str = "Total";

/// How many grid rows / authors / result rows are echoed to the debug log.
pub const LOG_PREVIEW_ROWS: usize = 5;

/// Extensions accepted by the file picker.
pub const TABULAR_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "parquet", "pq"];

pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const HTTP_READ_TIMEOUT: Duration = Duration::from_secs(30);
pub const HTTP_USER_AGENT: &str = concat!("author-tally/", env!("CARGO_PKG_VERSION"));
