//! Per-team collection of metric series

use super::registry::{MetricKey, REGISTRY};
use super::series::MetricSeries;
use super::{Side, StatsError};
use serde::Serialize;

/// Numeric type of an exported column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    Integer,
    Float,
}

/// One exported column value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportField {
    pub name: String,
    pub value: f64,
    pub kind: NumericKind,
}

impl ExportField {
    fn integer(name: String, value: u32) -> Self {
        Self {
            name,
            value: f64::from(value),
            kind: NumericKind::Integer,
        }
    }

    fn float(name: String, value: f64) -> Self {
        Self {
            name,
            value,
            kind: NumericKind::Float,
        }
    }
}

/// Statistics for one side at one poll tick
#[derive(Debug, Clone)]
pub struct TeamStatSet {
    pub side: Side,
    pub score: u32,
    pub player_count: u32,
    pub time_remaining_secs: f64,
    /// Indexed by `MetricKey::index`
    series: Vec<MetricSeries>,
}

impl TeamStatSet {
    /// Create a stat set with one series per registered metric
    pub fn new(side: Side, capacity: usize) -> Self {
        let series = REGISTRY
            .iter()
            .map(|spec| MetricSeries::new(spec.name, spec.short_name, capacity, spec.aggregates))
            .collect();

        Self {
            side,
            score: 0,
            player_count: 0,
            time_remaining_secs: 0.0,
            series,
        }
    }

    /// Whether `name` is a registered metric field
    pub fn contains(&self, name: &str) -> bool {
        MetricKey::from_rcon_name(name).is_some()
    }

    /// Append a value to the named series and refresh its aggregates
    pub fn add_datum(&mut self, name: &str, value: f64) -> Result<(), StatsError> {
        let key: MetricKey = name.parse()?;
        self.add(key, value)
    }

    /// Typed variant of [`TeamStatSet::add_datum`]
    pub fn add(&mut self, key: MetricKey, value: f64) -> Result<(), StatsError> {
        self.series[key.index()].push(value)
    }

    pub fn series(&self, key: MetricKey) -> &MetricSeries {
        &self.series[key.index()]
    }

    /// Look up a series by endpoint field name
    pub fn get(&self, name: &str) -> Result<&MetricSeries, StatsError> {
        let key: MetricKey = name.parse()?;
        Ok(self.series(key))
    }

    /// Series in registry order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &MetricSeries)> {
        REGISTRY.iter().map(|spec| spec.key).zip(self.series.iter())
    }

    /// Column names matching [`TeamStatSet::export_row`] for `side`
    pub fn export_header(side: Side) -> Vec<String> {
        let prefix = side.as_str();
        let mut header = vec![format!("{prefix}_score"), format!("{prefix}_players")];
        for spec in REGISTRY.iter() {
            for aggregate in spec.aggregates.iter() {
                header.push(format!("{prefix}_{}_{}", spec.key, aggregate.as_str()));
            }
        }
        header
    }

    /// Score, player count, then every requested aggregate in registry order
    pub fn export_row(&self) -> Vec<ExportField> {
        let prefix = self.side.as_str();
        let mut row = vec![
            ExportField::integer(format!("{prefix}_score"), self.score),
            ExportField::integer(format!("{prefix}_players"), self.player_count),
        ];
        for (key, series) in self.iter() {
            for aggregate in series.flags().iter() {
                row.push(ExportField::float(
                    format!("{prefix}_{key}_{}", aggregate.as_str()),
                    series.aggregates().get(aggregate),
                ));
            }
        }
        row
    }
}
