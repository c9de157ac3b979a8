//! Materializes a completed run on disk: the full summary as JSON and the
//! tabular columns as CSV.

use crate::models::{Record, RunSummary};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const CSV_HEADER: [&str; 4] = ["title", "price", "availability", "category"];

/// Paths written for one run
#[derive(Debug, Clone)]
pub struct RunFiles {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Write `run_<millis>.json` and `run_<millis>.csv` into `dir`, creating it if needed
pub fn write_run(dir: &Path, summary: &RunSummary) -> Result<RunFiles> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let stem = format!("run_{}", summary.created_at.timestamp_millis());
    let files = RunFiles {
        json: dir.join(format!("{stem}.json")),
        csv: dir.join(format!("{stem}.csv")),
    };

    let json = serde_json::to_string_pretty(summary).context("Failed to serialize run")?;
    std::fs::write(&files.json, json)
        .with_context(|| format!("Failed to write {}", files.json.display()))?;

    let file = std::fs::File::create(&files.csv)
        .with_context(|| format!("Failed to create {}", files.csv.display()))?;
    write_csv(std::io::BufWriter::new(file), &summary.records)
        .with_context(|| format!("Failed to write {}", files.csv.display()))?;

    info!(
        json = %files.json.display(),
        csv = %files.csv.display(),
        records = summary.item_count,
        "Saved run"
    );
    Ok(files)
}

/// Write records as CSV with a header row
pub fn write_csv<W: Write>(mut w: W, records: &[Record]) -> std::io::Result<()> {
    write_row(&mut w, &CSV_HEADER)?;
    for record in records {
        write_row(
            &mut w,
            &[
                record.title.as_str(),
                record.price.as_deref().unwrap_or_default(),
                record.availability.as_deref().unwrap_or_default(),
                record.category.as_deref().unwrap_or_default(),
            ],
        )?;
    }
    w.flush()
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(mut w: W, row: &[&str]) -> std::io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, ",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}
