// Shared fixtures for fatiguemap integration tests
#![allow(dead_code)]

use fatiguemap::config::TrainingConfig;
use fatiguemap::dataset::{generate_synthetic, write_csv};
use fatiguemap::training::{train, TrainingReport};
use std::path::{Path, PathBuf};

/// Write a seeded synthetic dataset under `dir`
pub fn write_dataset(dir: &Path, rows: usize, seed: u64) -> PathBuf {
    let path = dir.join("data").join("digital_fatigue.csv");
    write_csv(&path, &generate_synthetic(rows, seed)).expect("write dataset");
    path
}

/// Small, fast configuration rooted in `dir`
pub fn small_config(dir: &Path) -> TrainingConfig {
    TrainingConfig {
        data_path: write_dataset(dir, 240, 42),
        model_path: dir.join("model").join("fatigue_model.bin"),
        n_estimators: 12,
        max_depth: 8,
        min_samples_leaf: 2,
        ..TrainingConfig::default()
    }
}

/// Train a small model in `dir` and return its configuration and report
pub fn trained(dir: &Path) -> (TrainingConfig, TrainingReport) {
    let config = small_config(dir);
    let report = train(&config).expect("training succeeds");
    (config, report)
}

/// Staging files left beside `path`
pub fn leftover_temp_files(path: &Path) -> Vec<PathBuf> {
    let Some(dir) = path.parent() else {
        return Vec::new();
    };
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.contains(".tmp."))
                })
                .collect()
        })
        .unwrap_or_default()
}
