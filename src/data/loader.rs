use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Cell, Grid};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode a tabular file into a grid of cells.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet only
/// * `.csv`     – every record is a row, the first one being the header
/// * `.parquet` – the header row is made of the column names
pub fn load_grid(path: &Path) -> Result<Grid> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let grid = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_spreadsheet(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::debug!(
        "Decoded {} rows from {}; first rows: {:?}",
        grid.len(),
        path.display(),
        grid.iter()
            .take(crate::config::LOG_PREVIEW_ROWS)
            .map(|row| row.iter().map(Cell::to_string).collect::<Vec<_>>())
            .collect::<Vec<_>>()
    );

    Ok(grid)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> Result<Grid> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;

    let range = workbook
        .worksheet_range_at(0)
        .context("workbook does not contain any worksheets")?
        .context("reading first worksheet")?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect())
}

fn spreadsheet_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::String(s.clone()),
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            Cell::Date(cell.to_string())
        }
        other => Cell::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows may have different lengths; empty fields become [`Cell::Empty`].
fn load_csv(path: &Path) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut grid = Grid::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        grid.push(
            record
                .iter()
                .map(|value| match value {
                    "" => Cell::Empty,
                    text => Cell::String(text.to_string()),
                })
                .collect(),
        );
    }

    Ok(grid)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file as a grid: one header row with the column names,
/// then one row per record. Works with files written by Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Grid> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let header: Vec<Cell> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Cell::String(f.name().clone()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;

    let mut grid = vec![header];
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row}"))?;
            grid.push(cells);
        }
    }

    Ok(grid)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Empty);
    }

    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => match any.downcast_ref::<StringArray>() {
            Some(arr) => Cell::String(arr.value(row).to_string()),
            None => Cell::String(array_value_to_string(col, row)?),
        },
        DataType::Int32 => match any.downcast_ref::<Int32Array>() {
            Some(arr) => Cell::Integer(arr.value(row) as i64),
            None => Cell::String(array_value_to_string(col, row)?),
        },
        DataType::Int64 => match any.downcast_ref::<Int64Array>() {
            Some(arr) => Cell::Integer(arr.value(row)),
            None => Cell::String(array_value_to_string(col, row)?),
        },
        DataType::Float32 => match any.downcast_ref::<Float32Array>() {
            Some(arr) => Cell::Float(arr.value(row) as f64),
            None => Cell::String(array_value_to_string(col, row)?),
        },
        DataType::Float64 => match any.downcast_ref::<Float64Array>() {
            Some(arr) => Cell::Float(arr.value(row)),
            None => Cell::String(array_value_to_string(col, row)?),
        },
        DataType::Boolean => match any.downcast_ref::<BooleanArray>() {
            Some(arr) => Cell::Bool(arr.value(row)),
            None => Cell::String(array_value_to_string(col, row)?),
        },
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            Cell::Date(array_value_to_string(col, row)?)
        }
        // LargeUtf8, dictionaries, lists, ...
        _ => Cell::String(array_value_to_string(col, row)?),
    };

    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_grid(Path::new("authors.txt")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn csv_rows_keep_ragged_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Title,Authors,Year").unwrap();
        writeln!(file, "T1,\"Alice; Bob (X)\",2023").unwrap();
        writeln!(file, "T2").unwrap();
        writeln!(file, "T3,,2024").unwrap();
        drop(file);

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][1], Cell::from("Authors"));
        assert_eq!(grid[1][1], Cell::from("Alice; Bob (X)"));
        assert_eq!(grid[2].len(), 1);
        assert_eq!(grid[3][1], Cell::Empty);
    }

    #[test]
    fn empty_csv_gives_empty_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::File::create(&path).unwrap();
        assert!(load_grid(&path).unwrap().is_empty());
    }

    #[test]
    fn xlsx_reads_first_sheet_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "Title").unwrap();
        first.write_string(0, 1, "Authors").unwrap();
        first.write_string(0, 2, "Year").unwrap();
        first.write_string(1, 0, "T1").unwrap();
        first.write_string(1, 1, "Alice; Bob (X)").unwrap();
        first.write_number(1, 2, 2023).unwrap();
        first.write_string(2, 0, "T2").unwrap();
        first.write_number(2, 2, 2024).unwrap();

        let second = workbook.add_worksheet();
        second.set_name("Other").unwrap();
        second.write_string(0, 0, "Authors").unwrap();
        second.write_string(1, 0, "Mallory").unwrap();

        workbook.save(&path).unwrap();

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][1], Cell::from("Authors"));
        assert_eq!(grid[1][1], Cell::from("Alice; Bob (X)"));
        assert_eq!(grid[1][2], Cell::Float(2023.0));
        assert_eq!(grid[1][2].to_string(), "2023");
        assert_eq!(grid[2][1], Cell::Empty);
        assert!(grid
            .iter()
            .flatten()
            .all(|cell| cell.to_string() != "Mallory"));
    }

    #[test]
    fn parquet_header_is_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Authors", DataType::Utf8, true),
            Field::new("Year", DataType::Int64, false),
        ]));
        let authors: ArrayRef = Arc::new(StringArray::from(vec![Some("Alice; Bob"), None]));
        let years: ArrayRef = Arc::new(Int64Array::from(vec![2023, 2024]));
        let batch = RecordBatch::try_new(schema.clone(), vec![authors, years]).unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let grid = load_grid(&path).unwrap();
        assert_eq!(
            grid,
            vec![
                vec![Cell::from("Authors"), Cell::from("Year")],
                vec![Cell::from("Alice; Bob"), Cell::Integer(2023)],
                vec![Cell::Empty, Cell::Integer(2024)],
            ]
        );
    }
}
