//! Match table export
//!
//! Appends per-snapshot feature rows and per-match label rows to disk

mod columnar;
mod delimited;

pub use columnar::ParquetExporter;
pub use delimited::CsvExporter;

use crate::config::{ExportConfig, ExportFormat};
use crate::game::{LabelRow, Match, MatchError, MatchSnapshot};
use std::path::PathBuf;
use thiserror::Error;

/// Key column joining feature rows to their label row
pub const MATCH_KEY_COLUMN: &str = "match_start";

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Match is not exportable yet
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// What an export wrote
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    /// Feature rows written
    pub rows: usize,
    /// Files touched
    pub paths: Vec<PathBuf>,
}

/// Writes finished matches to persistent storage
pub trait Exporter: Send + Sync {
    fn export(&self, game: &Match) -> Result<ExportSummary, ExportError>;
}

/// Build the configured exporter, if export is enabled
pub fn exporter_for(config: &ExportConfig) -> Option<Box<dyn Exporter>> {
    if !config.enabled {
        return None;
    }
    let exporter: Box<dyn Exporter> = match config.format {
        ExportFormat::Csv => Box::new(CsvExporter::new(config.output_dir.clone())),
        ExportFormat::Parquet => Box::new(ParquetExporter::new(config.output_dir.clone())),
    };
    Some(exporter)
}

/// Feature table columns, key first
pub fn feature_header() -> Vec<String> {
    let mut header = vec![MATCH_KEY_COLUMN.to_string()];
    header.extend(MatchSnapshot::export_header());
    header
}

/// Label table columns, key first
pub fn label_header() -> Vec<String> {
    let mut header = vec![MATCH_KEY_COLUMN.to_string()];
    header.extend(LabelRow::header());
    header
}
