//! Record Output
//!
//! Table and JSON rendering of records, and naming of snapshot files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;
use inventree::Record;

const RULE: &str =
    "-----------------------------------------------------------------------------------";

/// How records are printed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Format {
    Table,
    Json,
}

pub(crate) fn print_records(records: &[&Record], format: Format) -> Result<()> {
    match format {
        Format::Table => {
            println!("{RULE}");
            println!(
                "{:<12} {:<12} {:<10} {:<15} {:<10}",
                "Date Entered", "Stock Label", "Brand", "Engine Number", "Status"
            );
            println!("{RULE}");
            for record in records {
                println!("{}", table_row(record));
            }
            println!("{RULE}");
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}

fn table_row(record: &Record) -> String {
    format!(
        "{:<12} {:<12} {:<10} {:<15} {:<10}",
        record.date_entered(),
        record.stock_label(),
        record.brand(),
        record.engine_number(),
        record.status()
    )
}

/// Name a snapshot of an inventory file, e.g. `stock.csv` -> `stock_20240601130509.csv`.
pub(crate) fn snapshot_path(path: &Path, timestamp: NaiveDateTime) -> PathBuf {
    let mut name = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push(format!("_{}", timestamp.format("%Y%m%d%H%M%S")));
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}
