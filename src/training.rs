//! Offline training pipeline.
//!
//! load data -> engineer labels -> split -> fit -> validate -> publish ->
//! reload and verify. Configuration errors abort before the artifact path
//! is touched; a staged artifact that fails verification is discarded and
//! never replaces the published one, and a published artifact that fails
//! its reload check is rolled back to the previous one.

use crate::artifact::{ArtifactMetadata, ArtifactStore, ModelArtifact};
use crate::config::TrainingConfig;
use crate::dataset::Dataset;
use crate::errors::{FatigueError, Result};
use crate::model::{
    check_predictions, mean_absolute_error, probe_predictor, FatiguePredictor, ForestParams,
    RandomForest,
};
use crate::observability::{
    increment_fitted, set_current_file, set_phase, set_progress, TrainingPhase,
};
use crate::profile::feature_columns;
use crate::target::{engineer_labels, LabelScale};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Summary of a finished training run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub trained_at: DateTime<Utc>,
    pub rows_used: usize,
    pub dropped_rows: usize,
    pub training_rows: usize,
    pub test_rows: usize,
    /// Mean absolute error on the held-out rows, in label points
    pub validation_mae: f64,
    pub label_scale: LabelScale,
    pub params: ForestParams,
    pub seed: u64,
    pub duration_secs: f64,
}

/// Run the full pipeline
pub fn train(config: &TrainingConfig) -> Result<TrainingReport> {
    train_with_progress(config, || {})
}

/// Like [`train`], calling `on_tree_fitted` once per fitted tree
pub fn train_with_progress<F>(
    config: &TrainingConfig,
    on_tree_fitted: F,
) -> Result<TrainingReport>
where
    F: Fn() + Sync,
{
    let started = Instant::now();
    config.validate()?;
    let params = config.forest_params();

    let dataset = {
        let _phase = set_phase(TrainingPhase::LoadingData);
        let _file = set_current_file(&config.data_path);
        Dataset::from_csv_path(&config.data_path)?
    };

    let engineered = {
        let _phase = set_phase(TrainingPhase::EngineeringLabels);
        engineer_labels(&dataset.rows)?
    };

    let (train_split, test_split) = {
        let _phase = set_phase(TrainingPhase::Splitting);
        dataset.train_test_split(&engineered.labels, config.test_fraction, config.seed)?
    };
    tracing::info!(
        training_rows = train_split.len(),
        test_rows = test_split.len(),
        "Split dataset"
    );

    let model = {
        let _phase = set_phase(TrainingPhase::Fitting);
        set_progress(0, params.n_estimators);
        RandomForest::fit(
            &train_split.rows,
            &train_split.labels,
            &params,
            config.seed,
            || {
                increment_fitted();
                on_tree_fitted();
            },
        )?
    };

    let validation_mae = {
        let _phase = set_phase(TrainingPhase::Validating);
        probe_predictor(&model)?;
        let predictions = model.predict_batch(&test_split.rows)?;
        check_predictions(model.name(), &predictions, test_split.len())?;
        mean_absolute_error(&test_split.labels, &predictions)
    };
    tracing::info!(validation_mae, "Validation mean absolute error");

    let artifact = ModelArtifact {
        metadata: ArtifactMetadata {
            trained_at: Utc::now(),
            training_rows: train_split.len(),
            test_rows: test_split.len(),
            dropped_rows: dataset.dropped_rows,
            validation_mae,
            label_scale: engineered.scale,
            params,
            seed: config.seed,
            feature_names: feature_columns().into_iter().map(String::from).collect(),
        },
        model,
    };

    let store = ArtifactStore::new(&config.model_path);
    {
        let _phase = set_phase(TrainingPhase::Publishing);
        let _file = set_current_file(&config.model_path);
        let staged = store.stage(&artifact)?;
        if staged.verify()? != artifact {
            return Err(FatigueError::model_unavailable(
                staged.temp_path(),
                "staged artifact does not match the fitted model",
            ));
        }
        staged.commit_checked(|published| {
            let _phase = set_phase(TrainingPhase::Verifying);
            let reloaded = ArtifactStore::new(published).load()?;
            if reloaded.model != artifact.model {
                return Err(FatigueError::model_unavailable(
                    published,
                    "published artifact differs from the fitted model",
                ));
            }
            Ok(())
        })?;
    }

    let report = TrainingReport {
        data_path: config.data_path.clone(),
        model_path: config.model_path.clone(),
        trained_at: artifact.metadata.trained_at,
        rows_used: dataset.len(),
        dropped_rows: dataset.dropped_rows,
        training_rows: artifact.metadata.training_rows,
        test_rows: artifact.metadata.test_rows,
        validation_mae,
        label_scale: engineered.scale,
        params,
        seed: config.seed,
        duration_secs: started.elapsed().as_secs_f64(),
    };
    tracing::info!(
        path = %report.model_path.display(),
        secs = report.duration_secs,
        "Training complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{generate_synthetic, write_csv};
    use std::fs;
    use tempfile::TempDir;

    fn small_config(dir: &TempDir) -> TrainingConfig {
        TrainingConfig {
            data_path: dir.path().join("data.csv"),
            model_path: dir.path().join("model/fatigue_model.bin"),
            n_estimators: 8,
            max_depth: 5,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_missing_dataset_never_touches_artifact() {
        let dir = TempDir::new().unwrap();
        let config = small_config(&dir);

        let err = train(&config).unwrap_err();
        assert!(matches!(err, FatigueError::DatasetNotFound { .. }));
        assert!(!config.model_path.exists());
        assert!(!dir.path().join("model").exists());
    }

    #[test]
    fn test_train_publishes_loadable_artifact() {
        let dir = TempDir::new().unwrap();
        let config = small_config(&dir);
        write_csv(&config.data_path, &generate_synthetic(150, 5)).unwrap();

        let report = train(&config).unwrap();

        assert_eq!(report.rows_used, 150);
        assert_eq!(report.test_rows, 30);
        assert_eq!(report.training_rows, 120);
        assert!(report.validation_mae.is_finite());

        let artifact = ArtifactStore::new(&config.model_path).load().unwrap();
        assert_eq!(artifact.metadata.seed, 42);
        assert_eq!(artifact.model.tree_count(), 8);
    }

    #[test]
    fn test_no_staging_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let config = small_config(&dir);
        write_csv(&config.data_path, &generate_synthetic(60, 1)).unwrap();

        train(&config).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path().join("model"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("fatigue_model.bin")]);
    }
}
