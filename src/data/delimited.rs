//! Append-only CSV tables

use super::{feature_header, label_header, ExportError, ExportSummary, Exporter};
use crate::game::Match;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const FEATURES_FILE: &str = "features.csv";
pub const LABELS_FILE: &str = "labels.csv";

/// Appends to `features.csv` and `labels.csv` in one directory
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn features_path(&self) -> PathBuf {
        self.output_dir.join(FEATURES_FILE)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.output_dir.join(LABELS_FILE)
    }
}

impl Exporter for CsvExporter {
    fn export(&self, game: &Match) -> Result<ExportSummary, ExportError> {
        let table = game.to_table()?;
        fs::create_dir_all(&self.output_dir)?;

        let key = game.start_time_s().to_string();
        let with_key = |values: &[f64]| {
            std::iter::once(key.clone())
                .chain(values.iter().map(|v| v.to_string()))
                .collect::<Vec<_>>()
        };

        let features_path = self.features_path();
        let rows = append_records(
            &features_path,
            &feature_header(),
            table.rows.iter().map(|row| with_key(row.as_slice())),
        )?;

        let labels_path = self.labels_path();
        append_records(
            &labels_path,
            &label_header(),
            std::iter::once(with_key(&table.label.values()[..])),
        )?;

        tracing::debug!(rows, path = ?features_path, "Appended match to CSV tables");

        Ok(ExportSummary {
            rows,
            paths: vec![features_path, labels_path],
        })
    }
}

/// Append records, writing the header only if the file is new or empty
fn append_records(
    path: &Path,
    header: &[String],
    records: impl Iterator<Item = Vec<String>>,
) -> Result<usize, ExportError> {
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if is_new {
        writer.write_record(header)?;
    }

    let mut count = 0;
    for record in records {
        writer.write_record(&record)?;
        count += 1;
    }
    writer.flush()?;

    Ok(count)
}
