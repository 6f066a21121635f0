mod common;

use common::{leftover_temp_files, trained};
use fatiguemap::artifact::ArtifactStore;
use fatiguemap::errors::{ErrorCategory, FatigueError};
use fatiguemap::model::FatiguePredictor;
use fatiguemap::profile::UsageProfile;
use tempfile::TempDir;

#[test]
fn test_reloaded_artifact_predicts_one_finite_value() {
    let dir = TempDir::new().unwrap();
    let (config, _) = trained(dir.path());

    let artifact = ArtifactStore::new(&config.model_path).load().unwrap();
    let predictions = artifact
        .model
        .predict_batch(&[UsageProfile::default().to_features()])
        .unwrap();

    assert_eq!(predictions.len(), 1);
    assert!(predictions[0].is_finite());
}

#[test]
fn test_truncated_artifact_fails_at_load() {
    let dir = TempDir::new().unwrap();
    let (config, _) = trained(dir.path());

    let bytes = std::fs::read(&config.model_path).unwrap();
    std::fs::write(&config.model_path, &bytes[..bytes.len() / 2]).unwrap();

    let err = ArtifactStore::new(&config.model_path).load().unwrap_err();
    assert!(matches!(err, FatigueError::ModelUnavailable { .. }));
    assert_eq!(err.category(), ErrorCategory::Artifact);
    assert!(err.is_recoverable());
}

#[test]
fn test_garbage_file_fails_at_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.bin");
    std::fs::write(&path, b"definitely not a model").unwrap();

    let err = ArtifactStore::new(&path).load().unwrap_err();
    assert!(err.to_string().contains("bad magic"));
}

#[test]
fn test_interrupted_publish_keeps_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let (config, _) = trained(dir.path());
    let store = ArtifactStore::new(&config.model_path);
    let published = store.load().unwrap();
    let before = std::fs::read(&config.model_path).unwrap();

    // Stage a replacement but never commit it, as if the process died
    // between writing the staging file and renaming it.
    let mut replacement = published.clone();
    replacement.metadata.seed = 7;
    let staged = store.stage(&replacement).unwrap();
    assert!(staged.temp_path().exists());
    drop(staged);

    assert_eq!(std::fs::read(&config.model_path).unwrap(), before);
    assert_eq!(store.load().unwrap(), published);
    assert!(leftover_temp_files(&config.model_path).is_empty());
}

#[test]
fn test_crash_leftover_staging_file_does_not_affect_load() {
    let dir = TempDir::new().unwrap();
    let (config, _) = trained(dir.path());
    let store = ArtifactStore::new(&config.model_path);
    let published = store.load().unwrap();

    // A staging file whose cleanup never ran
    let staged = store.stage(&published).unwrap();
    let temp = staged.temp_path().to_path_buf();
    std::mem::forget(staged);
    std::fs::write(&temp, b"FTGM partial").unwrap();

    assert_eq!(store.load().unwrap(), published);
    std::fs::remove_file(temp).unwrap();
}

#[test]
fn test_commit_replaces_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let (config, _) = trained(dir.path());
    let store = ArtifactStore::new(&config.model_path);

    let mut replacement = store.load().unwrap();
    replacement.metadata.seed = 99;
    store.publish(&replacement).unwrap();

    assert_eq!(store.load().unwrap().metadata.seed, 99);
}
