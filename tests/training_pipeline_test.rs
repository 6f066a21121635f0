mod common;

use common::{leftover_temp_files, small_config, trained};
use fatiguemap::artifact::ArtifactStore;
use fatiguemap::errors::FatigueError;
use fatiguemap::model::FatiguePredictor;
use fatiguemap::profile::UsageProfile;
use fatiguemap::training::train;
use indoc::indoc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_training_publishes_loadable_artifact() {
    let dir = TempDir::new().unwrap();
    let (config, report) = trained(dir.path());

    assert_eq!(report.rows_used, 240);
    assert_eq!(report.dropped_rows, 0);
    assert_eq!(report.test_rows, 48);
    assert_eq!(report.training_rows, 192);
    assert!(report.validation_mae.is_finite());
    assert_eq!(report.model_path, config.model_path);

    let artifact = ArtifactStore::new(&config.model_path).load().unwrap();
    assert_eq!(artifact.metadata.training_rows, 192);
    assert_eq!(artifact.metadata.seed, 42);

    let score = artifact
        .model
        .predict(&UsageProfile::default().to_features())
        .unwrap();
    assert!(score.is_finite());
    assert!(leftover_temp_files(&config.model_path).is_empty());
}

#[test]
fn test_same_seed_trains_identical_models() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let (a, _) = trained(first.path());
    let (b, _) = trained(second.path());

    let model_a = ArtifactStore::new(&a.model_path).load().unwrap().model;
    let model_b = ArtifactStore::new(&b.model_path).load().unwrap().model;
    assert_eq!(model_a, model_b);
}

#[test]
fn test_missing_dataset_aborts_before_touching_artifact() {
    let dir = TempDir::new().unwrap();
    let (mut config, _) = trained(dir.path());
    let before = std::fs::read(&config.model_path).unwrap();

    config.data_path = dir.path().join("missing.csv");
    let err = train(&config).unwrap_err();

    assert!(matches!(err, FatigueError::DatasetNotFound { .. }));
    assert_eq!(std::fs::read(&config.model_path).unwrap(), before);
}

#[test]
fn test_missing_columns_are_fatal() {
    let dir = TempDir::new().unwrap();
    let mut config = small_config(dir.path());
    let data = dir.path().join("partial.csv");
    std::fs::write(
        &data,
        indoc! {"
            user_id,screen_time_hours,sleep_hours
            U1,5,7
            U2,9,6
        "},
    )
    .unwrap();
    config.data_path = data;

    match train(&config).unwrap_err() {
        FatigueError::MissingColumns { columns } => {
            assert!(columns.contains(&"night_usage_hours".to_string()));
            assert!(!columns.contains(&"sleep_hours".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.model_path.exists());
}

#[test]
fn test_constant_dataset_is_degenerate() {
    let dir = TempDir::new().unwrap();
    let mut config = small_config(dir.path());
    let data = dir.path().join("constant.csv");
    let mut csv = String::from(
        "screen_time_hours,continuous_usage_minutes,night_usage_hours,breaks_per_day,sleep_hours,eye_strain_level,task_switching_rate\n",
    );
    for _ in 0..20 {
        csv.push_str("6,90,1,4,7,3,18\n");
    }
    std::fs::write(&data, csv).unwrap();
    config.data_path = data;

    let err = train(&config).unwrap_err();
    assert!(matches!(err, FatigueError::DegenerateLabelRange { .. }));
    assert!(!config.model_path.exists());
}

#[test]
fn test_rows_with_missing_values_are_dropped() {
    let dir = TempDir::new().unwrap();
    let mut config = small_config(dir.path());
    let mut contents = std::fs::read_to_string(&config.data_path).unwrap();
    contents.push_str("U99999,5,,1,4,7,3,18\n");
    let data = dir.path().join("with_gaps.csv");
    std::fs::write(&data, contents).unwrap();
    config.data_path = data;

    let report = train(&config).unwrap();
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.rows_used, 240);
}

#[test]
fn test_invalid_hyperparameters_are_configuration_errors() {
    let dir = TempDir::new().unwrap();
    let mut config = small_config(dir.path());
    config.test_fraction = 1.5;

    let err = train(&config).unwrap_err();
    assert!(matches!(err, FatigueError::Configuration(_)));
    assert!(!err.is_recoverable());
}
