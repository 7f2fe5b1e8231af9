use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const AUTHORS: &[&str] = &[
    "Alice Martin (1)",
    "Bob Chen (2)",
    "Carol Diaz",
    "Dan Okafor (1,3)",
    "Eve Novak",
    "Farid Haddad (2)",
    "Grace Liu",
];

/// Author line of the `i`-th paper: two to four names joined with "; ".
fn author_line(i: usize) -> String {
    let count = 2 + i % 3;
    (0..count)
        .map(|k| AUTHORS[(i * 3 + k * 2) % AUTHORS.len()])
        .collect::<Vec<_>>()
        .join("; ")
}

fn main() {
    let papers = 24;

    let titles: Vec<String> = (0..papers).map(|i| format!("Paper {}", i + 1)).collect();
    let lines: Vec<String> = (0..papers).map(author_line).collect();
    let years: Vec<i64> = (0..papers).map(|i| 2021 + (i % 4) as i64).collect();

    // CSV
    let csv_path = "sample_publications.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(["Title", "Authors", "Year"])
        .expect("Failed to write CSV header");
    for i in 0..papers {
        writer
            .write_record([titles[i].as_str(), lines[i].as_str(), years[i].to_string().as_str()])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("Title", DataType::Utf8, false),
        Field::new("Authors", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(titles.clone())),
            Arc::new(StringArray::from(lines.clone())),
            Arc::new(Int64Array::from(years)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "sample_publications.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {papers} papers to {csv_path} and {parquet_path}");
}
