//! Tabular training data.
//!
//! A dataset is a CSV file whose header names the seven feature columns.
//! Extra columns (identifiers and the like) are ignored. Rows with a missing
//! or unparsable value in any required column are dropped.

use crate::errors::{FatigueError, Result};
use crate::profile::{Feature, FeatureVector, FEATURE_COUNT};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cleaned rows in model column order
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<FeatureVector>,
    /// Rows discarded for missing values
    pub dropped_rows: usize,
    pub source: Option<PathBuf>,
}

/// One side of a train/test partition
#[derive(Debug, Clone, Default)]
pub struct Split {
    pub rows: Vec<FeatureVector>,
    pub labels: Vec<f64>,
}

impl Split {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Dataset {
    pub fn from_rows(rows: Vec<FeatureVector>) -> Self {
        Self {
            rows,
            dropped_rows: 0,
            source: None,
        }
    }

    /// Load a dataset file. A missing file is a configuration error.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(FatigueError::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }

        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;
        let mut dataset = Self::from_csv_reader(reader)?;
        dataset.source = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            rows = dataset.rows.len(),
            dropped = dataset.dropped_rows,
            "Dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let indices = resolve_columns(&headers)?;

        let mut rows = Vec::new();
        let mut dropped_rows = 0;

        for record in reader.records() {
            let record = record?;
            match parse_row(&record, &indices) {
                Some(row) => rows.push(row),
                None => dropped_rows += 1,
            }
        }

        if dropped_rows > 0 {
            tracing::warn!(dropped_rows, "Dropped rows with missing feature values");
        }
        if rows.is_empty() {
            return Err(FatigueError::EmptyDataset {
                dropped: dropped_rows,
            });
        }

        Ok(Self {
            rows,
            dropped_rows,
            source: None,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Deterministic shuffled partition.
    ///
    /// The test side gets `ceil(n * test_fraction)` rows; both sides must be
    /// non-empty.
    pub fn train_test_split(
        &self,
        labels: &[f64],
        test_fraction: f64,
        seed: u64,
    ) -> Result<(Split, Split)> {
        if labels.len() != self.rows.len() {
            return Err(FatigueError::configuration(format!(
                "label count {} does not match row count {}",
                labels.len(),
                self.rows.len()
            )));
        }
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(FatigueError::configuration(format!(
                "test fraction must lie in (0, 1), got {}",
                test_fraction
            )));
        }

        let n = self.rows.len();
        let test_len = (n as f64 * test_fraction).ceil() as usize;
        if test_len == 0 || test_len >= n {
            return Err(FatigueError::configuration(format!(
                "dataset of {} rows is too small for a {:.0}% test split",
                n,
                test_fraction * 100.0
            )));
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

        let take = |indices: &[usize]| Split {
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
            labels: indices.iter().map(|&i| labels[i]).collect(),
        };
        let (test_idx, train_idx) = order.split_at(test_len);
        Ok((take(train_idx), take(test_idx)))
    }
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<[usize; FEATURE_COUNT]> {
    let mut indices = [0usize; FEATURE_COUNT];
    let mut missing = Vec::new();

    for feature in Feature::ALL {
        match headers.iter().position(|h| h == feature.column()) {
            Some(position) => indices[feature.index()] = position,
            None => missing.push(feature.column().to_string()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(FatigueError::MissingColumns { columns: missing })
    }
}

fn parse_row(record: &csv::StringRecord, indices: &[usize; FEATURE_COUNT]) -> Option<FeatureVector> {
    let mut row = [0.0; FEATURE_COUNT];
    for (slot, &column) in row.iter_mut().zip(indices.iter()) {
        let value: f64 = record.get(column)?.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        *slot = value;
    }
    Some(row)
}

/// One generated observation, written as a CSV row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticRecord {
    pub user_id: String,
    pub screen_time_hours: f64,
    pub continuous_usage_minutes: f64,
    pub night_usage_hours: f64,
    pub breaks_per_day: f64,
    pub sleep_hours: f64,
    pub eye_strain_level: f64,
    pub task_switching_rate: f64,
}

impl SyntheticRecord {
    pub fn features(&self) -> FeatureVector {
        [
            self.screen_time_hours,
            self.continuous_usage_minutes,
            self.night_usage_hours,
            self.breaks_per_day,
            self.sleep_hours,
            self.eye_strain_level,
            self.task_switching_rate,
        ]
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Generate `rows` plausible observations inside the feature domains.
///
/// Night use erodes sleep, long screen days raise eye strain, and long
/// continuous sessions come with fewer breaks.
pub fn generate_synthetic(rows: usize, seed: u64) -> Vec<SyntheticRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let domain = |feature: Feature| feature.domain();

    (0..rows)
        .map(|i| {
            let screen: f64 = rng.gen_range(1.0..=16.0);
            let night = (rng.gen_range(0.0..=1.0_f64).powi(2) * 8.0).min(screen);
            let continuous = domain(Feature::ContinuousUsageMinutes)
                .clamp(screen * rng.gen_range(8.0..=20.0) + rng.gen_range(-20.0..=20.0));
            let breaks = domain(Feature::BreaksPerDay)
                .clamp(15.0 - continuous / 25.0 + rng.gen_range(-3.0..=3.0));
            let sleep = domain(Feature::SleepHours)
                .clamp(8.5 - night * 0.6 + rng.gen_range(-1.5..=1.5));
            let strain = domain(Feature::EyeStrainLevel)
                .clamp(1.0 + screen / 4.0 + rng.gen_range(-1.0..=1.0));
            let switching = domain(Feature::TaskSwitchingRate)
                .clamp(rng.gen_range(1.0..=35.0) + screen * rng.gen_range(0.0..=1.0));

            SyntheticRecord {
                user_id: format!("U{:05}", i + 1),
                screen_time_hours: round_tenth(screen),
                continuous_usage_minutes: continuous.round(),
                night_usage_hours: round_tenth(night),
                breaks_per_day: breaks.round(),
                sleep_hours: round_tenth(sleep),
                eye_strain_level: strain.round(),
                task_switching_rate: switching.round(),
            }
        })
        .collect()
}

/// Write records with a header row
pub fn write_csv(path: &Path, records: &[SyntheticRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
