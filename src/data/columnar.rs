//! Parquet tables, one pair of files per match

use super::{feature_header, label_header, ExportError, ExportSummary, Exporter, MATCH_KEY_COLUMN};
use crate::game::Match;
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Feature schema: Int64 key then Float64 columns
pub fn feature_schema() -> Schema {
    keyed_schema(feature_header(), DataType::Float64)
}

/// Label schema: every column Int64
pub fn label_schema() -> Schema {
    keyed_schema(label_header(), DataType::Int64)
}

fn keyed_schema(header: Vec<String>, value_type: DataType) -> Schema {
    let fields: Vec<Field> = header
        .into_iter()
        .map(|name| {
            let data_type = if name == MATCH_KEY_COLUMN {
                DataType::Int64
            } else {
                value_type.clone()
            };
            Field::new(name, data_type, false)
        })
        .collect();
    Schema::new(fields)
}

/// Writes `features_<map>_<start>.parquet` and `labels_<map>_<start>.parquet`
pub struct ParquetExporter {
    output_dir: PathBuf,
}

impl ParquetExporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// File path for a table of `game`
    pub fn file_path(&self, prefix: &str, game: &Match) -> PathBuf {
        let filename = format!("{}_{}_{}.parquet", prefix, game.map_id(), game.start_time_s());
        self.output_dir.join(filename)
    }
}

impl Exporter for ParquetExporter {
    fn export(&self, game: &Match) -> Result<ExportSummary, ExportError> {
        let table = game.to_table()?;
        fs::create_dir_all(&self.output_dir)?;

        let key = game.start_time_s();
        let n_rows = table.rows.len();

        // Features, column-major
        let schema = Arc::new(feature_schema());
        let mut columns: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(vec![key; n_rows]))];
        for col in 0..table.header.len() {
            let values: Vec<f64> = table.rows.iter().map(|row| row[col]).collect();
            columns.push(Arc::new(Float64Array::from(values)));
        }
        let features_path = self.file_path("features", game);
        write_batch(&features_path, RecordBatch::try_new(schema, columns)?)?;

        let label = table.label;
        let schema = Arc::new(label_schema());
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![key])),
            Arc::new(Int64Array::from(vec![i64::from(label.axis_score)])),
            Arc::new(Int64Array::from(vec![i64::from(label.allied_score)])),
            Arc::new(Int64Array::from(vec![i64::from(label.steamroll)])),
        ];
        let labels_path = self.file_path("labels", game);
        write_batch(&labels_path, RecordBatch::try_new(schema, columns)?)?;

        tracing::debug!(rows = n_rows, path = ?features_path, "Wrote match to Parquet");

        Ok(ExportSummary {
            rows: n_rows,
            paths: vec![features_path, labels_path],
        })
    }
}

fn write_batch(path: &Path, batch: RecordBatch) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
