//! Fixed-capacity metric series
//!
//! Values live in a pre-sized buffer; only the first `count` slots are
//! defined and every aggregate is computed over that prefix alone.

use super::StatsError;
use serde::{Deserialize, Serialize};

/// Aggregate kinds, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Sum,
    Mean,
    Median,
    Std,
}

impl Aggregate {
    pub const ALL: [Aggregate; 4] = [
        Aggregate::Sum,
        Aggregate::Mean,
        Aggregate::Median,
        Aggregate::Std,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Sum => "sum",
            Aggregate::Mean => "mean",
            Aggregate::Median => "median",
            Aggregate::Std => "std",
        }
    }
}

/// Which aggregates a series computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateFlags {
    pub sum: bool,
    pub mean: bool,
    pub median: bool,
    pub std: bool,
}

impl AggregateFlags {
    pub const ALL: AggregateFlags = AggregateFlags {
        sum: true,
        mean: true,
        median: true,
        std: true,
    };

    pub fn contains(&self, aggregate: Aggregate) -> bool {
        match aggregate {
            Aggregate::Sum => self.sum,
            Aggregate::Mean => self.mean,
            Aggregate::Median => self.median,
            Aggregate::Std => self.std,
        }
    }

    /// Requested aggregates in export order
    pub fn iter(self) -> impl Iterator<Item = Aggregate> {
        Aggregate::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

/// Cached aggregate values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

impl Aggregates {
    pub fn get(&self, aggregate: Aggregate) -> f64 {
        match aggregate {
            Aggregate::Sum => self.sum,
            Aggregate::Mean => self.mean,
            Aggregate::Median => self.median,
            Aggregate::Std => self.std,
        }
    }
}

/// A named numeric series with a fixed number of slots
#[derive(Debug, Clone)]
pub struct MetricSeries {
    name: String,
    short_name: String,
    flags: AggregateFlags,
    data: Box<[f64]>,
    count: usize,
    cache: Aggregates,
    stale: bool,
}

impl MetricSeries {
    /// Create an empty series with `capacity` slots
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        capacity: usize,
        flags: AggregateFlags,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            flags,
            data: vec![0.0; capacity].into_boxed_slice(),
            count: 0,
            cache: Aggregates::default(),
            stale: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn flags(&self) -> AggregateFlags {
        self.flags
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of defined values
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether cached aggregates lag behind the data
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The defined values, oldest first
    pub fn values(&self) -> &[f64] {
        &self.data[..self.count]
    }

    /// Store `value` in the next free slot
    pub fn append(&mut self, value: f64) -> Result<(), StatsError> {
        if self.count == self.data.len() {
            return Err(StatsError::CapacityExceeded {
                metric: self.name.clone(),
                capacity: self.data.len(),
            });
        }
        self.data[self.count] = value;
        self.count += 1;
        self.stale = true;
        Ok(())
    }

    /// Recompute every requested aggregate over the defined values
    pub fn recompute(&mut self) {
        let values = &self.data[..self.count];
        let mut cache = Aggregates::default();

        if !values.is_empty() {
            let n = values.len() as f64;
            let sum: f64 = values.iter().sum();
            let mean = sum / n;

            if self.flags.sum {
                cache.sum = sum;
            }
            if self.flags.mean {
                cache.mean = mean;
            }
            if self.flags.median {
                cache.median = median(values);
            }
            if self.flags.std {
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                cache.std = variance.sqrt();
            }
        }

        self.cache = cache;
        self.stale = false;
    }

    /// Append then refresh the cache
    pub fn push(&mut self, value: f64) -> Result<(), StatsError> {
        self.append(value)?;
        self.recompute();
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.cache.sum
    }

    pub fn mean(&self) -> f64 {
        self.cache.mean
    }

    pub fn median(&self) -> f64 {
        self.cache.median
    }

    pub fn std(&self) -> f64 {
        self.cache.std
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.cache
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
