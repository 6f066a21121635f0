//! Persisted model artifact.
//!
//! On disk an artifact is a small fixed header followed by a postcard
//! payload:
//!
//! ```text
//! b"FTGM" | format version (u16 LE) | payload length (u64 LE) | payload
//! ```
//!
//! Publishing goes through a staging file in the destination directory
//! that is renamed over the final path only once it is completely written
//! and synced. Readers therefore see either the previous artifact or the
//! new one, never a partial file. A commit whose follow-up check fails puts
//! the previous artifact back.

use crate::errors::{FatigueError, Result};
use crate::model::{probe_predictor, ForestParams, RandomForest};
use crate::profile::feature_columns;
use crate::target::LabelScale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const MAGIC: &[u8; 4] = b"FTGM";
pub const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 8;

/// Facts about the training run that produced a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub test_rows: usize,
    pub dropped_rows: usize,
    pub validation_mae: f64,
    pub label_scale: LabelScale,
    pub params: ForestParams,
    pub seed: u64,
    /// Column order the model expects
    pub feature_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ArtifactMetadata,
    pub model: RandomForest,
}

/// Serialize an artifact into its on-disk representation
pub fn encode(artifact: &ModelArtifact) -> Result<Vec<u8>> {
    let payload = postcard::to_allocvec(artifact)
        .map_err(|e| std::io::Error::other(format!("failed to encode model: {}", e)))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Parse the on-disk representation. The error string names what is wrong.
pub fn decode(bytes: &[u8]) -> std::result::Result<ModelArtifact, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!(
            "truncated header ({} of {} bytes)",
            bytes.len(),
            HEADER_LEN
        ));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);

    if &header[0..4] != MAGIC {
        return Err("not a fatiguemap model file (bad magic)".to_string());
    }
    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != FORMAT_VERSION {
        return Err(format!(
            "unsupported format version {} (expected {})",
            version, FORMAT_VERSION
        ));
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&header[6..14]);
    let declared = u64::from_le_bytes(len_bytes);
    if declared != payload.len() as u64 {
        return Err(format!(
            "payload length mismatch (header says {} bytes, file has {})",
            declared,
            payload.len()
        ));
    }

    postcard::from_bytes(payload).map_err(|e| format!("corrupted payload: {}", e))
}

/// Structural and capability checks applied to every loaded artifact
fn verify(artifact: &ModelArtifact) -> std::result::Result<(), String> {
    let expected = feature_columns();
    if artifact.metadata.feature_names != expected {
        return Err(format!(
            "feature columns {:?} do not match expected {:?}",
            artifact.metadata.feature_names, expected
        ));
    }
    if !artifact.model.is_well_formed() {
        return Err("model structure is malformed".to_string());
    }
    probe_predictor(&artifact.model).map_err(|e| format!("capability probe failed: {}", e))
}

/// Reads and publishes the artifact at one fixed path
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load, decode and probe the artifact.
    ///
    /// Every failure is reported as [`FatigueError::ModelUnavailable`].
    pub fn load(&self) -> Result<ModelArtifact> {
        let unavailable = |reason: String| FatigueError::model_unavailable(&self.path, reason);

        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => unavailable("file not found".to_string()),
            _ => unavailable(format!("cannot read file: {}", e)),
        })?;
        let artifact = decode(&bytes).map_err(unavailable)?;
        verify(&artifact).map_err(unavailable)?;

        tracing::debug!(
            path = %self.path.display(),
            trees = artifact.model.tree_count(),
            trained_at = %artifact.metadata.trained_at,
            "Loaded model artifact"
        );
        Ok(artifact)
    }

    /// Write the artifact to a staging file beside the final path.
    ///
    /// Nothing at the final path changes until [`StagedArtifact::commit`].
    pub fn stage(&self, artifact: &ModelArtifact) -> Result<StagedArtifact> {
        let bytes = encode(artifact)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staged = StagedArtifact {
            temp_path: create_temp_path(&self.path),
            final_path: self.path.clone(),
            committed: false,
        };

        let mut file = File::create(&staged.temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;

        tracing::debug!(
            temp = %staged.temp_path.display(),
            bytes = bytes.len(),
            "Staged model artifact"
        );
        Ok(staged)
    }

    /// Stage and commit in one step
    pub fn publish(&self, artifact: &ModelArtifact) -> Result<PathBuf> {
        self.stage(artifact)?.commit()
    }
}

/// Unique sibling path for staging writes to `target`
fn create_temp_path(target: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

    let name = format!(
        ".{}.tmp.{}.{}.{}",
        target
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("model"),
        std::process::id(),
        timestamp,
        counter
    );
    target.with_file_name(name)
}

/// A fully written artifact waiting to be renamed into place.
///
/// Dropping it without committing removes the staging file.
#[derive(Debug)]
pub struct StagedArtifact {
    temp_path: PathBuf,
    final_path: PathBuf,
    committed: bool,
}

impl StagedArtifact {
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Load the staged bytes back through the normal load checks
    pub fn verify(&self) -> Result<ModelArtifact> {
        ArtifactStore::new(self.temp_path.clone()).load()
    }

    /// Atomically replace the final artifact with the staged one
    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.temp_path, &self.final_path)?;
        self.committed = true;
        tracing::info!(path = %self.final_path.display(), "Published model artifact");
        Ok(self.final_path.clone())
    }

    /// Commit, then run `check` against the published path.
    ///
    /// If the check fails the previous artifact is restored, or the new file
    /// removed when there was none, and the check's error is returned.
    pub fn commit_checked<F>(self, check: F) -> Result<PathBuf>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let previous = match fs::read(&self.final_path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let final_path = self.commit()?;
        if let Err(e) = check(&final_path) {
            match restore(&final_path, previous.as_deref()) {
                Ok(()) => tracing::warn!(
                    path = %final_path.display(),
                    error = %e,
                    "Published artifact failed its check, previous artifact restored"
                ),
                Err(restore_err) => tracing::error!(
                    path = %final_path.display(),
                    error = %e,
                    restore_error = %restore_err,
                    "Published artifact failed its check and could not be rolled back"
                ),
            }
            return Err(e);
        }
        Ok(final_path)
    }
}

/// Put `previous` back at `path`, or remove `path` when there was nothing
fn restore(path: &Path, previous: Option<&[u8]>) -> Result<()> {
    let Some(bytes) = previous else {
        fs::remove_file(path)?;
        return Ok(());
    };

    let temp_path = create_temp_path(path);
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                tracing::warn!(
                    temp = %self.temp_path.display(),
                    error = %e,
                    "Failed to remove abandoned staging file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::generate_synthetic;
    use crate::target::engineer_labels;
    use tempfile::TempDir;

    fn sample_artifact() -> ModelArtifact {
        let rows: Vec<_> = generate_synthetic(80, 3).iter().map(|r| r.features()).collect();
        let engineered = engineer_labels(&rows).unwrap();
        let params = ForestParams {
            n_estimators: 5,
            max_depth: 4,
            min_samples_leaf: 2,
            max_features: None,
        };
        let model = RandomForest::fit(&rows, &engineered.labels, &params, 3, || {}).unwrap();
        ModelArtifact {
            metadata: ArtifactMetadata {
                trained_at: Utc::now(),
                training_rows: rows.len(),
                test_rows: 0,
                dropped_rows: 0,
                validation_mae: 1.5,
                label_scale: engineered.scale,
                params,
                seed: 3,
                feature_names: feature_columns().into_iter().map(String::from).collect(),
            },
            model,
        }
    }

    #[test]
    fn test_encode_decode_preserves_artifact() {
        let artifact = sample_artifact();
        let decoded = decode(&encode(&artifact).unwrap()).unwrap();
        assert_eq!(decoded, artifact);
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut bytes = encode(&sample_artifact()).unwrap();
        bytes[0] = b'X';
        assert!(decode(&bytes).unwrap_err().contains("bad magic"));
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let bytes = encode(&sample_artifact()).unwrap();
        let err = decode(&bytes[..bytes.len() - 10]).unwrap_err();
        assert!(err.contains("length mismatch"));
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let mut bytes = encode(&sample_artifact()).unwrap();
        bytes[4] = 9;
        assert!(decode(&bytes).unwrap_err().contains("unsupported format version"));
    }

    #[test]
    fn test_load_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("absent.bin"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, FatigueError::ModelUnavailable { .. }));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_dropped_stage_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.bin"));

        let staged = store.stage(&sample_artifact()).unwrap();
        let temp = staged.temp_path().to_path_buf();
        assert!(temp.exists());
        assert_eq!(temp.parent(), Some(dir.path()));
        drop(staged);

        assert!(!temp.exists());
        assert!(!store.exists());
    }

    #[test]
    fn test_staged_artifact_verifies_before_commit() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.bin"));
        let artifact = sample_artifact();

        let staged = store.stage(&artifact).unwrap();
        assert_eq!(staged.verify().unwrap(), artifact);
        staged.commit().unwrap();
        assert_eq!(store.load().unwrap(), artifact);
    }

    #[test]
    fn test_failed_check_restores_previous_artifact() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.bin"));
        let previous = sample_artifact();
        store.publish(&previous).unwrap();

        let mut next = sample_artifact();
        next.metadata.validation_mae = 9.0;
        let err = store
            .stage(&next)
            .unwrap()
            .commit_checked(|path| Err(FatigueError::model_unavailable(path, "reload mismatch")))
            .unwrap_err();

        assert!(err.to_string().contains("reload mismatch"));
        assert_eq!(store.load().unwrap(), previous);
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_failed_check_without_previous_removes_artifact() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.bin"));

        let result = store
            .stage(&sample_artifact())
            .unwrap()
            .commit_checked(|path| Err(FatigueError::model_unavailable(path, "reload mismatch")));

        assert!(result.is_err());
        assert!(!store.exists());
    }

    #[test]
    fn test_passing_check_keeps_new_artifact() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.bin"));
        store.publish(&sample_artifact()).unwrap();

        let mut next = sample_artifact();
        next.metadata.validation_mae = 9.0;
        let checked = store
            .stage(&next)
            .unwrap()
            .commit_checked(|path| ArtifactStore::new(path).load().map(|_| ()))
            .unwrap();

        assert_eq!(checked, store.path());
        assert_eq!(store.load().unwrap(), next);
    }

    #[test]
    fn test_publish_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested/model/fatigue_model.bin"));
        store.publish(&sample_artifact()).unwrap();
        assert!(store.load().is_ok());
    }

    #[test]
    fn test_verify_rejects_reordered_columns() {
        let mut artifact = sample_artifact();
        artifact.metadata.feature_names.swap(0, 1);
        assert!(verify(&artifact).unwrap_err().contains("feature columns"));
    }
}
